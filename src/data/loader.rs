// ============================================================
// Layer 4 — Corpus Loader
// ============================================================
// Reads a password export into a Corpus. The format is picked
// from the file extension:
//
//   .txt   one password per line, verbatim
//   .csv   header row + records; the password is the column
//          selected by `col` (negative = counted from the end)
//   .json  array of objects; each object's "password" field
//
// Anything else is an UnsupportedFormat error before any
// training work starts.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::domain::corpus::Corpus;
use crate::domain::traits::PasswordSource;
use crate::error::{PipelineError, Result};

/// Format of a corpus file, decided by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorpusFormat {
    Text,
    Table,
    Records,
}

impl CorpusFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "txt"  => Ok(CorpusFormat::Text),
            "csv"  => Ok(CorpusFormat::Table),
            "json" => Ok(CorpusFormat::Records),
            _ => Err(PipelineError::UnsupportedFormat {
                path:      path.to_path_buf(),
                extension: ext,
            }),
        }
    }
}

/// Resolve a possibly negative column selector against a row width.
/// `-1` is the last column, `-2` the one before it.
pub fn resolve_column(col: i64, width: usize) -> Option<usize> {
    let idx = if col < 0 { width as i64 + col } else { col };
    (0..width as i64).contains(&idx).then_some(idx as usize)
}

/// Loads a password corpus from one file.
pub struct CorpusLoader {
    path: PathBuf,
    col:  i64,
}

impl CorpusLoader {
    pub fn new(path: impl Into<PathBuf>, col: i64) -> Self {
        Self { path: path.into(), col }
    }

    fn load_text(&self) -> Result<Vec<String>> {
        let bytes = fs::read(&self.path).map_err(|e| PipelineError::io(&self.path, e))?;
        Ok(String::from_utf8_lossy(&bytes)
            .lines()
            .map(str::to_string)
            .collect())
    }

    fn load_table(&self) -> Result<Vec<String>> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)?;

        let width = rdr.byte_headers()?.len();
        let idx   = resolve_column(self.col, width).ok_or_else(|| PipelineError::ColumnOutOfRange {
            path:    self.path.clone(),
            col:     self.col,
            columns: width,
        })?;
        tracing::debug!("Column {} resolved to index {} of {}", self.col, idx, width);

        let mut passwords = Vec::new();
        for record in rdr.byte_records() {
            let record = record?;
            // Short rows behave like a missing JSON field.
            let field = record.get(idx).unwrap_or_default();
            passwords.push(String::from_utf8_lossy(field).into_owned());
        }
        Ok(passwords)
    }

    fn load_records(&self) -> Result<Vec<String>> {
        let bytes = fs::read(&self.path).map_err(|e| PipelineError::io(&self.path, e))?;
        let json: Value = serde_json::from_slice(&bytes)?;

        let Value::Array(rows) = json else {
            return Err(self.malformed("top-level value is not a list of records"));
        };

        rows.iter()
            .enumerate()
            .map(|(i, row)| match row {
                Value::Object(fields) => Ok(field_as_text(fields.get("password"))),
                _ => Err(self.malformed(&format!("record {i} is not an object"))),
            })
            .collect()
    }

    fn malformed(&self, reason: &str) -> PipelineError {
        PipelineError::MalformedCorpus {
            path:   self.path.clone(),
            reason: reason.to_string(),
        }
    }
}

/// Missing or null → "", strings verbatim, other scalars as their JSON text.
fn field_as_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s))   => s.clone(),
        Some(other)              => other.to_string(),
    }
}

impl PasswordSource for CorpusLoader {
    fn load(&self) -> Result<Corpus> {
        let format = CorpusFormat::from_path(&self.path)?;
        tracing::info!("Loading {:?} corpus from '{}'", format, self.path.display());

        let passwords = match format {
            CorpusFormat::Text    => self.load_text()?,
            CorpusFormat::Table   => self.load_table()?,
            CorpusFormat::Records => self.load_records()?,
        };

        if passwords.is_empty() {
            return Err(PipelineError::CorpusEmpty { path: self.path.clone() });
        }

        let corpus = Corpus::new(passwords);
        tracing::info!(
            "Loaded {} passwords ({} distinct)",
            corpus.len(),
            corpus.distinct()
        );
        Ok(corpus)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_resolve_column() {
        assert_eq!(resolve_column(-1, 3), Some(2));
        assert_eq!(resolve_column(-2, 3), Some(1));
        assert_eq!(resolve_column(-1, 7), Some(6));
        assert_eq!(resolve_column(-2, 7), Some(5));
        assert_eq!(resolve_column(0, 3), Some(0));
        assert_eq!(resolve_column(3, 3), None);
        assert_eq!(resolve_column(-4, 3), None);
        assert_eq!(resolve_column(-1, 0), None);
    }

    #[test]
    fn test_text_lines_verbatim() {
        let dir  = TempDir::new().unwrap();
        let path = write(&dir, "pw.txt", "hunter2\n  spaced  \n\nhunter2\n");
        let c    = CorpusLoader::new(&path, -1).load().unwrap();
        assert_eq!(c.passwords(), ["hunter2", "  spaced  ", "", "hunter2"]);
        assert_eq!(c.counts()["hunter2"], 2);
    }

    #[test]
    fn test_table_negative_columns() {
        let dir  = TempDir::new().unwrap();
        let path = write(
            &dir,
            "export.csv",
            "url,username,password\nexample.com,bob,Secret1!\nmail.com,alice,qwerty\n",
        );

        let last = CorpusLoader::new(&path, -1).load().unwrap();
        assert_eq!(last.passwords(), ["Secret1!", "qwerty"]);

        let second_last = CorpusLoader::new(&path, -2).load().unwrap();
        assert_eq!(second_last.passwords(), ["bob", "alice"]);
    }

    #[test]
    fn test_table_negative_columns_independent_of_width() {
        let dir  = TempDir::new().unwrap();
        let wide = write(&dir, "wide.csv", "a,b,c,d,user,pass\n1,2,3,4,bob,pw1\n");
        let thin = write(&dir, "thin.csv", "user,pass\nbob,pw1\n");

        for path in [&wide, &thin] {
            assert_eq!(CorpusLoader::new(path, -1).load().unwrap().passwords(), ["pw1"]);
            assert_eq!(CorpusLoader::new(path, -2).load().unwrap().passwords(), ["bob"]);
        }
    }

    #[test]
    fn test_table_numbers_are_text() {
        let dir  = TempDir::new().unwrap();
        let path = write(&dir, "nums.csv", "name,password\nbob,123456\n");
        let c    = CorpusLoader::new(&path, -1).load().unwrap();
        assert_eq!(c.passwords(), ["123456"]);
    }

    #[test]
    fn test_table_column_out_of_range() {
        let dir  = TempDir::new().unwrap();
        let path = write(&dir, "x.csv", "a,b\n1,2\n");
        let err  = CorpusLoader::new(&path, -3).load().unwrap_err();
        assert!(matches!(err, PipelineError::ColumnOutOfRange { columns: 2, col: -3, .. }));
    }

    #[test]
    fn test_records_missing_field_is_empty() {
        let dir  = TempDir::new().unwrap();
        let path = write(
            &dir,
            "vault.json",
            r#"[{"password":"abc123"},{"user":"bob"},{"password":null},{"password":42}]"#,
        );
        let c = CorpusLoader::new(&path, -1).load().unwrap();
        assert_eq!(c.passwords(), ["abc123", "", "", "42"]);
    }

    #[test]
    fn test_records_must_be_a_list() {
        let dir  = TempDir::new().unwrap();
        let path = write(&dir, "vault.json", r#"{"password":"abc"}"#);
        let err  = CorpusLoader::new(&path, -1).load().unwrap_err();
        assert!(matches!(err, PipelineError::MalformedCorpus { .. }));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir  = TempDir::new().unwrap();
        let path = write(&dir, "pw.xlsx", "whatever");
        let err  = CorpusLoader::new(&path, -1).load().unwrap_err();
        assert!(matches!(
            err,
            PipelineError::UnsupportedFormat { ref extension, .. } if extension == "xlsx"
        ));
    }

    #[test]
    fn test_empty_corpus_fails_fast() {
        let dir  = TempDir::new().unwrap();
        let path = write(&dir, "empty.txt", "");
        let err  = CorpusLoader::new(&path, -1).load().unwrap_err();
        assert!(matches!(err, PipelineError::CorpusEmpty { .. }));

        let path = write(&dir, "empty.json", "[]");
        let err  = CorpusLoader::new(&path, -1).load().unwrap_err();
        assert!(matches!(err, PipelineError::CorpusEmpty { .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = CorpusLoader::new("/definitely/not/here.txt", -1).load().unwrap_err();
        assert!(matches!(err, PipelineError::Io { .. }));
    }
}
