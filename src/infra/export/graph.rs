// ============================================================
// Layer 6 — ONNX Graph Model
// ============================================================
// A small in-memory ONNX graph (nodes, float/int64 initializers,
// typed inputs/outputs) and its ModelProto encoding.
//
// Field numbers follow onnx.proto:
//   ModelProto        ir_version=1 producer_name=2 graph=7 opset_import=8
//   GraphProto        node=1 name=2 initializer=5 input=11 output=12
//   NodeProto         input=1 output=2 name=3 op_type=4 attribute=5
//   AttributeProto    name=1 i=3 ints=8 type=20
//   TensorProto       dims=1 data_type=2 name=8 raw_data=9
//   ValueInfoProto    name=1 type=2

use super::proto::ProtoWriter;

pub const IR_VERSION: i64 = 8;
pub const OPSET:      i64 = 17;

const ELEM_FLOAT: i64 = 1;
const ELEM_INT64: i64 = 7;

const ATTR_INT:  i64 = 2;
const ATTR_INTS: i64 = 7;

#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    Int(i64),
    Ints(Vec<i64>),
}

#[derive(Debug, Clone)]
pub struct Node {
    pub op_type:    &'static str,
    pub name:       String,
    pub inputs:     Vec<String>,
    pub outputs:    Vec<String>,
    pub attributes: Vec<(&'static str, Attribute)>,
}

impl Node {
    pub fn new(op_type: &'static str, name: impl Into<String>) -> Self {
        Self {
            op_type,
            name:       name.into(),
            inputs:     Vec::new(),
            outputs:    Vec::new(),
            attributes: Vec::new(),
        }
    }

    pub fn inputs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inputs = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn output(mut self, name: impl Into<String>) -> Self {
        self.outputs.push(name.into());
        self
    }

    pub fn attr(mut self, name: &'static str, value: Attribute) -> Self {
        self.attributes.push((name, value));
        self
    }

    fn encode(&self, w: &mut ProtoWriter) {
        for input in &self.inputs {
            w.string(1, input);
        }
        for output in &self.outputs {
            w.string(2, output);
        }
        w.string(3, &self.name);
        w.string(4, self.op_type);
        for (name, value) in &self.attributes {
            w.message(5, |a| {
                a.string(1, name);
                match value {
                    Attribute::Int(i) => {
                        a.int(3, *i);
                        a.int(20, ATTR_INT);
                    }
                    Attribute::Ints(v) => {
                        a.ints(8, v);
                        a.int(20, ATTR_INTS);
                    }
                }
            });
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TensorData {
    Float(Vec<f32>),
    Int64(Vec<i64>),
}

#[derive(Debug, Clone)]
pub struct Initializer {
    pub name: String,
    pub dims: Vec<i64>,
    pub data: TensorData,
}

impl Initializer {
    pub fn float(name: impl Into<String>, dims: Vec<i64>, values: Vec<f32>) -> Self {
        Self { name: name.into(), dims, data: TensorData::Float(values) }
    }

    pub fn int64(name: impl Into<String>, dims: Vec<i64>, values: Vec<i64>) -> Self {
        Self { name: name.into(), dims, data: TensorData::Int64(values) }
    }

    pub fn element_count(&self) -> usize {
        self.dims.iter().product::<i64>().max(0) as usize
    }

    fn encode(&self, w: &mut ProtoWriter) {
        w.ints(1, &self.dims);
        let (elem, len, raw): (i64, usize, Vec<u8>) = match &self.data {
            TensorData::Float(v) => (ELEM_FLOAT, v.len(), v.iter().flat_map(|x| x.to_le_bytes()).collect()),
            TensorData::Int64(v) => (ELEM_INT64, v.len(), v.iter().flat_map(|x| x.to_le_bytes()).collect()),
        };
        debug_assert_eq!(len, self.element_count(), "initializer {} shape/data mismatch", self.name);
        w.int(2, elem);
        w.string(8, &self.name);
        w.bytes(9, &raw);
    }
}

/// One dimension of a graph input/output shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Dim {
    Fixed(i64),
    Named(&'static str),
}

#[derive(Debug, Clone)]
pub struct ValueInfo {
    pub name:  String,
    pub float: bool,
    pub shape: Vec<Dim>,
}

impl ValueInfo {
    fn encode(&self, w: &mut ProtoWriter) {
        w.string(1, &self.name);
        w.message(2, |ty| {
            ty.message(1, |tensor| {
                tensor.int(1, if self.float { ELEM_FLOAT } else { ELEM_INT64 });
                tensor.message(2, |shape| {
                    for dim in &self.shape {
                        shape.message(1, |d| match dim {
                            Dim::Fixed(n) => { d.int(1, *n); }
                            Dim::Named(p) => { d.string(2, p); }
                        });
                    }
                });
            });
        });
    }
}

#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub name:         String,
    pub nodes:        Vec<Node>,
    pub initializers: Vec<Initializer>,
    pub inputs:       Vec<ValueInfo>,
    pub outputs:      Vec<ValueInfo>,
}

impl Graph {
    /// Node op types in execution order.
    pub fn op_types(&self) -> Vec<&'static str> {
        self.nodes.iter().map(|n| n.op_type).collect()
    }

    /// Serialise as a complete ModelProto.
    pub fn to_model_bytes(&self, producer: &str) -> Vec<u8> {
        let mut w = ProtoWriter::new();
        w.int(1, IR_VERSION);
        w.string(2, producer);
        w.message(7, |g| self.encode(g));
        w.message(8, |op| {
            op.string(1, "");
            op.int(2, OPSET);
        });
        w.into_bytes()
    }

    fn encode(&self, w: &mut ProtoWriter) {
        for node in &self.nodes {
            w.message(1, |n| node.encode(n));
        }
        w.string(2, &self.name);
        for init in &self.initializers {
            w.message(5, |t| init.encode(t));
        }
        for input in &self.inputs {
            w.message(11, |v| input.encode(v));
        }
        for output in &self.outputs {
            w.message(12, |v| output.encode(v));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_header_bytes() {
        let bytes = Graph::default().to_model_bytes("p");
        // ir_version = 8, then producer_name = "p"
        assert_eq!(&bytes[..5], &[0x08, 0x08, 0x12, 0x01, b'p']);
    }

    #[test]
    fn test_float_initializer_raw_data() {
        let init = Initializer::float("w", vec![2], vec![1.0, -2.0]);
        let mut w = ProtoWriter::new();
        init.encode(&mut w);
        let bytes = w.into_bytes();

        let mut raw = 1.0f32.to_le_bytes().to_vec();
        raw.extend_from_slice(&(-2.0f32).to_le_bytes());
        assert!(bytes.ends_with(&raw));
        assert_eq!(init.element_count(), 2);
    }

    #[test]
    fn test_node_attribute_encoding() {
        let node = Node::new("Transpose", "t")
            .inputs(["x"])
            .output("y")
            .attr("perm", Attribute::Ints(vec![1, 0, 2]));
        let mut w = ProtoWriter::new();
        node.encode(&mut w);
        let bytes = w.into_bytes();

        // attribute message ends with type = INTS
        assert!(bytes.ends_with(&[0xa0, 0x01, 0x07]));
        assert!(bytes.windows(9).any(|s| s == b"Transpose"));
    }
}
