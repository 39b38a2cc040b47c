//! Per-octet chunk artifact codec (IPCH)
//!
//! Each chunk holds the ranges for one /8 block, delta-encoded against the
//! previous record's start and compressed with LEB128-style varints. The
//! format has no random access: records can only be reconstructed
//! sequentially, which is why the global sort order must be preserved
//! exactly by the compiler and sharder.
//!
//! # Wire format (little-endian throughout)
//!
//! ```text
//! magic   4 bytes  "IPCH" (0x49 0x50 0x43 0x48)
//! version 1 byte
//! u32     record count R
//! R x     varint(start - prev_start), varint(end - start), u16 triple idx
//! ```
//!
//! Decoding shares the dictionary codec's degrade-to-empty policy: a bad
//! magic yields an empty record list, and truncation or a corrupt varint
//! yields the records decoded so far.

use crate::record::GeoRecord;

/// Magic bytes identifying a chunk artifact ("IPCH")
pub const CHUNK_MAGIC: [u8; 4] = [0x49, 0x50, 0x43, 0x48];

/// Format version written by the encoder; read but not enforced on decode.
pub const CHUNK_VERSION: u8 = 1;

/// A u32 varint never needs more than 5 bytes. Bounding the decode loop
/// keeps a corrupted file from driving an unbounded read.
const MAX_VARINT_LEN: u32 = 5;

/// Append `value` as a little-endian base-128 varint (7 data bits per byte,
/// continuation flag in bit 7)
pub fn write_varint(out: &mut Vec<u8>, mut value: u32) {
    while value >= 0x80 {
        out.push((value as u8 & 0x7F) | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

/// Read one varint from `data` starting at `off`.
///
/// Returns the value and the new offset, or `None` on truncation, on a
/// varint longer than 5 bytes, or on 32-bit overflow.
pub fn read_varint(data: &[u8], mut off: usize) -> Option<(u32, usize)> {
    let mut value: u32 = 0;
    let mut shift: u32 = 0;
    for _ in 0..MAX_VARINT_LEN {
        let byte = *data.get(off)?;
        off += 1;
        let bits = (byte & 0x7F) as u32;
        // The 5th byte may only carry the low 4 bits of a u32
        if shift == 28 && bits > 0x0F {
            return None;
        }
        value |= bits << shift;
        if byte & 0x80 == 0 {
            return Some((value, off));
        }
        shift += 7;
    }
    None
}

/// Encode one octet bucket's records into a chunk artifact.
///
/// `records` must be sorted ascending by start and non-overlapping; the
/// compiler and sharder guarantee this.
pub fn encode_chunk(records: &[GeoRecord]) -> Vec<u8> {
    let mut out = Vec::with_capacity(9 + records.len() * 8);
    out.extend_from_slice(&CHUNK_MAGIC);
    out.push(CHUNK_VERSION);
    out.extend_from_slice(&(records.len() as u32).to_le_bytes());
    let mut prev_start = 0u32;
    for rec in records {
        write_varint(&mut out, rec.start.wrapping_sub(prev_start));
        write_varint(&mut out, rec.end.wrapping_sub(rec.start));
        out.extend_from_slice(&rec.triple.to_le_bytes());
        prev_start = rec.start;
    }
    out
}

/// Decode a chunk artifact into its record list.
///
/// Never fails: bad magic yields an empty list, truncation yields the
/// complete records decoded up to that point.
pub fn decode_chunk(data: &[u8]) -> Vec<GeoRecord> {
    if data.len() < 9 || data[0..4] != CHUNK_MAGIC {
        return Vec::new();
    }
    // data[4] is the version byte; read but not enforced
    let count = u32::from_le_bytes([data[5], data[6], data[7], data[8]]) as usize;
    let mut records = Vec::with_capacity(count.min(data.len() / 4));
    let mut off = 9;
    let mut prev_start = 0u32;
    for _ in 0..count {
        let Some((delta, next)) = read_varint(data, off) else {
            break;
        };
        let Some((len, next)) = read_varint(data, next) else {
            break;
        };
        if next + 2 > data.len() {
            break;
        }
        let triple = u16::from_le_bytes([data[next], data[next + 1]]);
        off = next + 2;
        let start = prev_start.wrapping_add(delta);
        records.push(GeoRecord::new(start, start.wrapping_add(len), triple));
        prev_start = start;
    }
    records
}
