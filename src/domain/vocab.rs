// ============================================================
// Layer 3 — Character Vocabulary
// ============================================================
// Fixed bijection between the 94 printable, non-space ASCII
// symbols and the ids 1..=94. Id 0 is padding, id 95 is the
// unknown-character sentinel.
//
// The table never depends on the corpus or on a random seed:
// a checkpoint trained today must decode with the same ids
// tomorrow.
//
//   id 0        <PAD>
//   ids 1..26   a..z
//   ids 27..52  A..Z
//   ids 53..62  0..9
//   ids 63..94  punctuation (ALPHABET order below)
//   id 95       <UNK>

/// Every encodable symbol, in id order (id = index + 1).
pub const ALPHABET: &str = concat!(
    "abcdefghijklmnopqrstuvwxyz",
    "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
    "0123456789",
    "!@#$%^&*()-_=+[]{}|;:,.<>?/\\",
    "\"'`~",
);

pub const PAD_ID: u32 = 0;
pub const UNK_ID: u32 = 95;
pub const PAD_TOKEN: &str = "<PAD>";
pub const UNK_TOKEN: &str = "<UNK>";

/// Number of distinct ids the model must predict over (PAD + 94 + UNK).
pub const VOCAB_SIZE: usize = 96;

/// Immutable character ↔ id table.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    /// ASCII code point → id; 0 marks "not in the alphabet".
    ascii_to_id: [u32; 128],
    id_to_char:  Vec<char>,
}

impl Vocabulary {
    pub fn new() -> Self {
        let mut ascii_to_id = [0u32; 128];
        let mut id_to_char  = Vec::with_capacity(ALPHABET.len());

        for (i, c) in ALPHABET.chars().enumerate() {
            ascii_to_id[c as usize] = i as u32 + 1;
            id_to_char.push(c);
        }

        Self { ascii_to_id, id_to_char }
    }

    /// Id for a single character. Characters outside the alphabet map
    /// to `UNK_ID`; `PAD_ID` is never returned.
    pub fn encode(&self, c: char) -> u32 {
        if c.is_ascii() {
            match self.ascii_to_id[c as usize] {
                PAD_ID => UNK_ID,
                id     => id,
            }
        } else {
            UNK_ID
        }
    }

    /// Character for an alphabet id, `None` for PAD, UNK or out of range.
    #[cfg(test)]
    pub fn decode(&self, id: u32) -> Option<char> {
        if id == PAD_ID {
            return None;
        }
        self.id_to_char.get(id as usize - 1).copied()
    }

    /// Total number of ids, sentinels included.
    pub fn size(&self) -> usize {
        VOCAB_SIZE
    }

    /// `(symbol, id)` pairs in id order: the alphabet, then `<PAD>` and `<UNK>`.
    pub fn entries(&self) -> impl Iterator<Item = (String, u32)> + '_ {
        self.id_to_char
            .iter()
            .enumerate()
            .map(|(i, c)| (c.to_string(), i as u32 + 1))
            .chain([
                (PAD_TOKEN.to_string(), PAD_ID),
                (UNK_TOKEN.to_string(), UNK_ID),
            ])
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new()
    }
}
