// ============================================================
// Layer 6 — ONNX Export
// ============================================================
// Writes the trained model as an ONNX graph for in-browser
// inference, plus the vocabulary file the browser side uses
// to encode input:
//
//   input  "input"   int64 [1, seq]
//     Gather(embedding)              → [1, seq, E]
//     Transpose(1,0,2)               → [seq, 1, E]
//     LSTM → Squeeze(axis 1)         → [seq, 1, H]   (per layer)
//     Transpose(1,0,2)               → [1, seq, H]
//     MatMul(head) → Add(bias)       → [1, seq, V]
//   output "output"  float [1, seq, V]
//
// Batch is fixed at 1; sequence length is symbolic.
//
// ONNX LSTM gates are ordered i, o, f, c. Burn keeps one Linear
// per gate with weights stored [in, out], so each gate weight is
// transposed and stacked in that order.

pub mod graph;
pub mod proto;

use std::path::{Path, PathBuf};

use burn::{
    nn::{GateController, Linear, Lstm},
    prelude::*,
};

use crate::domain::vocab::Vocabulary;
use crate::error::{PipelineError, Result};
use crate::infra::artifacts::write_atomic;
use crate::infra::vocab_store::VocabStore;
use crate::ml::model::PasswordLstm;

use graph::{Attribute, Dim, Graph, Initializer, Node, ValueInfo};

const PRODUCER: &str = "password-lstm";

/// Files produced by one export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedArtifacts {
    pub graph: PathBuf,
    pub vocab: PathBuf,
}

pub struct OnnxExporter;

impl OnnxExporter {
    /// Write `model` to `path` and the vocabulary next to it.
    pub fn export<B: Backend>(
        model: &PasswordLstm<B>,
        vocab: &Vocabulary,
        path:  &Path,
    ) -> Result<ExportedArtifacts> {
        let graph = build_graph(model)?;
        let bytes = graph.to_model_bytes(PRODUCER);
        write_atomic(path, &bytes)?;
        tracing::info!(
            "Exported ONNX graph to '{}' ({} nodes, {} bytes)",
            path.display(),
            graph.nodes.len(),
            bytes.len(),
        );

        let vocab_path = VocabStore::companion_path(path);
        VocabStore::save(vocab, &vocab_path)?;

        Ok(ExportedArtifacts { graph: path.to_path_buf(), vocab: vocab_path })
    }
}

fn floats<B: Backend, const D: usize>(tensor: Tensor<B, D>) -> Vec<f32> {
    tensor.into_data().iter::<f32>().collect()
}

fn dims<B: Backend, const D: usize>(tensor: &Tensor<B, D>) -> Vec<i64> {
    tensor.dims().iter().map(|&d| d as i64).collect()
}

/// Gates in ONNX order: input, output, forget, cell.
fn onnx_gates<B: Backend>(lstm: &Lstm<B>) -> [&GateController<B>; 4] {
    [&lstm.input_gate, &lstm.output_gate, &lstm.forget_gate, &lstm.cell_gate]
}

fn stacked_weight<B: Backend>(
    lstm: &Lstm<B>,
    pick: fn(&GateController<B>) -> &Linear<B>,
) -> Tensor<B, 2> {
    let parts = onnx_gates(lstm)
        .into_iter()
        .map(|g| pick(g).weight.val().transpose())
        .collect();
    Tensor::cat(parts, 0)
}

fn stacked_bias<B: Backend>(
    lstm:   &Lstm<B>,
    pick:   fn(&GateController<B>) -> &Linear<B>,
    hidden: usize,
) -> Tensor<B, 1> {
    let parts = onnx_gates(lstm)
        .into_iter()
        .map(|g| {
            let linear = pick(g);
            match &linear.bias {
                Some(b) => b.val(),
                None    => Tensor::zeros([hidden], &linear.weight.val().device()),
            }
        })
        .collect();
    Tensor::cat(parts, 0)
}

fn input_side<B: Backend>(g: &GateController<B>) -> &Linear<B> {
    &g.input_transform
}

fn hidden_side<B: Backend>(g: &GateController<B>) -> &Linear<B> {
    &g.hidden_transform
}

/// Translate the model's parameters into an ONNX graph.
pub fn build_graph<B: Backend>(model: &PasswordLstm<B>) -> Result<Graph> {
    if model.layers.is_empty() {
        return Err(PipelineError::Tensor("model has no recurrent layers".into()));
    }

    let mut g = Graph { name: "password_lstm".into(), ..Graph::default() };

    let embedding = model.embedding.weight.val();
    let [vocab_size, _] = embedding.dims();
    g.initializers.push(Initializer::float("embedding.weight", dims(&embedding), floats(embedding)));
    g.initializers.push(Initializer::int64("squeeze_axes", vec![1], vec![1]));

    g.inputs.push(ValueInfo {
        name:  "input".into(),
        float: false,
        shape: vec![Dim::Fixed(1), Dim::Named("seq")],
    });

    g.nodes.push(
        Node::new("Gather", "embed")
            .inputs(["embedding.weight", "input"])
            .output("embedded"),
    );
    g.nodes.push(
        Node::new("Transpose", "to_time_major")
            .inputs(["embedded"])
            .output("x0")
            .attr("perm", Attribute::Ints(vec![1, 0, 2])),
    );

    let mut x = "x0".to_string();
    let mut hidden = 0;
    for (i, lstm) in model.layers.iter().enumerate() {
        let w = stacked_weight(lstm, input_side);
        let r = stacked_weight(lstm, hidden_side);
        let [gates_h, d_in] = w.dims();
        hidden = gates_h / 4;

        let b = Tensor::cat(
            vec![stacked_bias(lstm, input_side, hidden), stacked_bias(lstm, hidden_side, hidden)],
            0,
        );

        let (wn, rn, bn) = (format!("lstm{i}.W"), format!("lstm{i}.R"), format!("lstm{i}.B"));
        g.initializers.push(Initializer::float(&wn, vec![1, gates_h as i64, d_in as i64], floats(w)));
        g.initializers.push(Initializer::float(&rn, vec![1, gates_h as i64, hidden as i64], floats(r)));
        g.initializers.push(Initializer::float(&bn, vec![1, 2 * gates_h as i64], floats(b)));

        let y = format!("lstm{i}.Y");
        g.nodes.push(
            Node::new("LSTM", format!("lstm{i}"))
                .inputs([x.as_str(), wn.as_str(), rn.as_str(), bn.as_str()])
                .output(&y)
                .attr("hidden_size", Attribute::Int(hidden as i64))
                .attr("layout", Attribute::Int(0)),
        );

        let next = format!("x{}", i + 1);
        g.nodes.push(
            Node::new("Squeeze", format!("squeeze{i}"))
                .inputs([y.as_str(), "squeeze_axes"])
                .output(&next),
        );
        x = next;
    }

    let head_w = model.head.weight.val();
    let head_b = match &model.head.bias {
        Some(b) => b.val(),
        None    => Tensor::zeros([vocab_size], &head_w.device()),
    };
    g.initializers.push(Initializer::float("head.weight", dims(&head_w), floats(head_w)));
    g.initializers.push(Initializer::float("head.bias", dims(&head_b), floats(head_b)));

    g.nodes.push(
        Node::new("Transpose", "to_batch_major")
            .inputs([x.as_str()])
            .output("hidden")
            .attr("perm", Attribute::Ints(vec![1, 0, 2])),
    );
    g.nodes.push(
        Node::new("MatMul", "head_matmul")
            .inputs(["hidden", "head.weight"])
            .output("projected"),
    );
    g.nodes.push(
        Node::new("Add", "head_bias")
            .inputs(["projected", "head.bias"])
            .output("output"),
    );

    g.outputs.push(ValueInfo {
        name:  "output".into(),
        float: true,
        shape: vec![Dim::Fixed(1), Dim::Named("seq"), Dim::Fixed(vocab_size as i64)],
    });

    tracing::debug!(
        "Built ONNX graph ({} layers, hidden={}): {}",
        model.layers.len(),
        hidden,
        g.op_types().join(" → ")
    );
    Ok(g)
}
