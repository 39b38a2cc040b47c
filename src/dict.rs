//! Dictionary artifact codec (IPDC)
//!
//! The dictionary holds the interned location strings and the deduplicated
//! (country, province, city) triples. It is written once by the compiler and
//! decoded once per process at query time.
//!
//! # Wire format (little-endian throughout)
//!
//! ```text
//! magic   4 bytes  "IPDC" (0x49 0x50 0x44 0x43)
//! version 1 byte
//! u32     string count N
//! u32     triple count M
//! N x     (u16 byte length, UTF-8 bytes)
//! M x     (u16 country idx, u16 province idx, u16 city idx)
//! ```
//!
//! There is no checksum. Decoding is defensive: a bad magic, or any
//! truncation past it, degrades to an empty (or partially decoded)
//! dictionary instead of failing - queries against it resolve to null
//! fields, which is the intended behavior for a corrupt artifact.

/// Magic bytes identifying a dictionary artifact ("IPDC")
pub const DICT_MAGIC: [u8; 4] = [0x49, 0x50, 0x44, 0x43];

/// Format version written by the encoder. The decoder reads the version
/// byte but accepts any value; the record layout has never changed.
pub const DICT_VERSION: u8 = 1;

/// Decoded dictionary: ordered string table plus ordered triple table.
///
/// Indices are only meaningful for the artifact set they were built with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dictionary {
    /// Interned strings, first-seen order. Index 0-based; `""` = unknown.
    pub strings: Vec<String>,
    /// (country, province, city) string-index triples, first-seen order
    pub triples: Vec<(u16, u16, u16)>,
}

impl Dictionary {
    /// Create a dictionary from its ordered tables
    pub fn new(strings: Vec<String>, triples: Vec<(u16, u16, u16)>) -> Self {
        Self { strings, triples }
    }

    /// Resolve a triple index, substituting `(0, 0, 0)` when out of range.
    ///
    /// An out-of-range index only happens with a corrupt or mismatched
    /// artifact pair; substituting the first entry keeps the query path
    /// infallible.
    pub fn triple(&self, idx: u16) -> (u16, u16, u16) {
        self.triples.get(idx as usize).copied().unwrap_or((0, 0, 0))
    }

    /// Resolve a string index to its text, `""` when out of range
    pub fn string(&self, idx: u16) -> &str {
        self.strings.get(idx as usize).map(String::as_str).unwrap_or("")
    }

    /// True if both tables are empty
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty() && self.triples.is_empty()
    }
}

/// Encode a dictionary into its on-disk representation
pub fn encode_dictionary(dict: &Dictionary) -> Vec<u8> {
    let mut out = Vec::with_capacity(13 + dict.strings.len() * 8 + dict.triples.len() * 6);
    out.extend_from_slice(&DICT_MAGIC);
    out.push(DICT_VERSION);
    out.extend_from_slice(&(dict.strings.len() as u32).to_le_bytes());
    out.extend_from_slice(&(dict.triples.len() as u32).to_le_bytes());
    for s in &dict.strings {
        let bytes = s.as_bytes();
        out.extend_from_slice(&(bytes.len() as u16).to_le_bytes());
        out.extend_from_slice(bytes);
    }
    for &(a, b, c) in &dict.triples {
        out.extend_from_slice(&a.to_le_bytes());
        out.extend_from_slice(&b.to_le_bytes());
        out.extend_from_slice(&c.to_le_bytes());
    }
    out
}

/// Decode a dictionary artifact.
///
/// Never fails: a missing or wrong magic yields an empty dictionary, and a
/// truncated body yields however many complete entries were present.
pub fn decode_dictionary(data: &[u8]) -> Dictionary {
    if data.len() < 13 || data[0..4] != DICT_MAGIC {
        return Dictionary::default();
    }
    // data[4] is the version byte; read but not enforced
    let str_count = u32::from_le_bytes([data[5], data[6], data[7], data[8]]) as usize;
    let tri_count = u32::from_le_bytes([data[9], data[10], data[11], data[12]]) as usize;
    let mut off = 13;

    let mut strings = Vec::with_capacity(str_count.min(data.len() / 2));
    for _ in 0..str_count {
        if off + 2 > data.len() {
            break;
        }
        let len = u16::from_le_bytes([data[off], data[off + 1]]) as usize;
        off += 2;
        if off + len > data.len() {
            break;
        }
        strings.push(String::from_utf8_lossy(&data[off..off + len]).into_owned());
        off += len;
    }

    let mut triples = Vec::with_capacity(tri_count.min(data.len() / 6));
    for _ in 0..tri_count {
        if off + 6 > data.len() {
            break;
        }
        let a = u16::from_le_bytes([data[off], data[off + 1]]);
        let b = u16::from_le_bytes([data[off + 2], data[off + 3]]);
        let c = u16::from_le_bytes([data[off + 4], data[off + 5]]);
        triples.push((a, b, c));
        off += 6;
    }

    Dictionary { strings, triples }
}
