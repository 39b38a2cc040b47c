//! String and triple interning for the compile phase
//!
//! Location names repeat massively across the source dataset (one country
//! string covers tens of thousands of rows), so the compiler deduplicates
//! every string and every (country, province, city) combination into small
//! stable indices. Indices are assigned in first-seen order, which keeps the
//! build artifacts byte-reproducible for identical input.

use crate::error::{IpRegionError, Result};
use rustc_hash::FxHashMap;

/// Both the string table and the triple table are indexed with u16 on disk.
const MAX_TABLE_LEN: usize = u16::MAX as usize + 1;

/// Deduplicating table of location strings and (country, province, city)
/// triples.
///
/// The empty string is a valid entry and means "unknown".
#[derive(Debug, Default)]
pub struct Interner {
    strings: Vec<String>,
    string_index: FxHashMap<String, u16>,
    triples: Vec<(u16, u16, u16)>,
    triple_index: FxHashMap<(u16, u16, u16), u16>,
}

impl Interner {
    /// Create an empty interner
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern one string, returning its stable index.
    ///
    /// Returns the existing index if `s` was seen before, else appends it.
    pub fn intern_string(&mut self, s: &str) -> Result<u16> {
        if let Some(&idx) = self.string_index.get(s) {
            return Ok(idx);
        }
        if self.strings.len() >= MAX_TABLE_LEN {
            return Err(IpRegionError::ResourceLimitExceeded(format!(
                "string table full ({} entries)",
                MAX_TABLE_LEN
            )));
        }
        let idx = self.strings.len() as u16;
        self.strings.push(s.to_string());
        self.string_index.insert(s.to_string(), idx);
        Ok(idx)
    }

    /// Intern a (country, province, city) triple, returning its stable index.
    pub fn intern_triple(&mut self, country: &str, province: &str, city: &str) -> Result<u16> {
        let key = (
            self.intern_string(country)?,
            self.intern_string(province)?,
            self.intern_string(city)?,
        );
        if let Some(&idx) = self.triple_index.get(&key) {
            return Ok(idx);
        }
        if self.triples.len() >= MAX_TABLE_LEN {
            return Err(IpRegionError::ResourceLimitExceeded(format!(
                "triple table full ({} entries)",
                MAX_TABLE_LEN
            )));
        }
        let idx = self.triples.len() as u16;
        self.triples.push(key);
        self.triple_index.insert(key, idx);
        Ok(idx)
    }

    /// Number of distinct strings interned so far
    pub fn string_count(&self) -> usize {
        self.strings.len()
    }

    /// Number of distinct triples interned so far
    pub fn triple_count(&self) -> usize {
        self.triples.len()
    }

    /// Consume the interner, yielding the ordered string and triple tables
    pub fn into_tables(self) -> (Vec<String>, Vec<(u16, u16, u16)>) {
        (self.strings, self.triples)
    }
}
