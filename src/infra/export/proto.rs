// ============================================================
// Layer 6 — Protobuf Wire Writer
// ============================================================
// Just enough of the protobuf wire format to emit an ONNX
// ModelProto:
//
//   tag    = (field_number << 3) | wire_type
//   varint = wire type 0   (ints, enums)
//   len    = wire type 2   (strings, bytes, nested messages)
//
// Repeated scalars are written unpacked, one tag per element.

const VARINT: u64 = 0;
const LEN:    u64 = 2;

#[derive(Debug, Default)]
pub struct ProtoWriter {
    buf: Vec<u8>,
}

impl ProtoWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    fn raw_varint(&mut self, mut value: u64) {
        while value >= 0x80 {
            self.buf.push((value as u8 & 0x7f) | 0x80);
            value >>= 7;
        }
        self.buf.push(value as u8);
    }

    fn tag(&mut self, field: u32, wire_type: u64) {
        self.raw_varint((u64::from(field) << 3) | wire_type);
    }

    /// int32 / int64 / enum field. Negative values take ten bytes.
    pub fn int(&mut self, field: u32, value: i64) -> &mut Self {
        self.tag(field, VARINT);
        self.raw_varint(value as u64);
        self
    }

    pub fn ints(&mut self, field: u32, values: &[i64]) -> &mut Self {
        for &v in values {
            self.int(field, v);
        }
        self
    }

    pub fn bytes(&mut self, field: u32, value: &[u8]) -> &mut Self {
        self.tag(field, LEN);
        self.raw_varint(value.len() as u64);
        self.buf.extend_from_slice(value);
        self
    }

    pub fn string(&mut self, field: u32, value: &str) -> &mut Self {
        self.bytes(field, value.as_bytes())
    }

    /// Nested message built by `build`.
    pub fn message<F>(&mut self, field: u32, build: F) -> &mut Self
    where
        F: FnOnce(&mut ProtoWriter),
    {
        let mut inner = ProtoWriter::new();
        build(&mut inner);
        self.bytes(field, &inner.buf)
    }
}
