// ============================================================
// Layer 6 — Vocabulary Store
// ============================================================
// Writes the character map next to the exported graph so the
// extension can encode passwords exactly as training did:
//
//   personal_lstm.onnx  →  personal_lstm.json
//   { "a": 1, ..., "~": 94, "<PAD>": 0, "<UNK>": 95 }

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::domain::vocab::Vocabulary;
use crate::error::Result;
use crate::infra::artifacts::write_json_atomic;

pub struct VocabStore;

impl VocabStore {
    /// Companion path for a graph file: same base name, `.json` extension.
    pub fn companion_path(graph_path: &Path) -> PathBuf {
        graph_path.with_extension("json")
    }

    /// The vocabulary as a JSON object in id order.
    pub fn to_json(vocab: &Vocabulary) -> Value {
        let map: Map<String, Value> = vocab
            .entries()
            .map(|(symbol, id)| (symbol, Value::from(id)))
            .collect();
        Value::Object(map)
    }

    pub fn save(vocab: &Vocabulary, path: &Path) -> Result<()> {
        write_json_atomic(path, &Self::to_json(vocab))?;
        tracing::info!("Vocabulary ({} ids) saved to '{}'", vocab.size(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_companion_path() {
        assert_eq!(
            VocabStore::companion_path(Path::new("out/personal_lstm.onnx")),
            PathBuf::from("out/personal_lstm.json")
        );
        assert_eq!(
            VocabStore::companion_path(Path::new("model")),
            PathBuf::from("model.json")
        );
    }

    #[test]
    fn test_json_contents_and_order() {
        let json = VocabStore::to_json(&Vocabulary::new());
        let obj  = json.as_object().unwrap();
        assert_eq!(obj.len(), 96);
        assert_eq!(obj["a"], 1);
        assert_eq!(obj["\\"], 90);
        assert_eq!(obj["<PAD>"], 0);
        assert_eq!(obj["<UNK>"], 95);
        assert_eq!(obj.keys().next().map(String::as_str), Some("a"));
        assert_eq!(obj.keys().last().map(String::as_str), Some("<UNK>"));
    }

    #[test]
    fn test_save_writes_file() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("char_to_idx.json");
        VocabStore::save(&Vocabulary::new(), &path).unwrap();

        let back: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back, VocabStore::to_json(&Vocabulary::new()));
    }
}
