//! Range record type shared by the compiler, sharder, and codecs

/// One contiguous IPv4 block resolving to a single location triple.
///
/// `start` and `end` are big-endian-packed addresses, `end` inclusive.
/// `triple` indexes the dictionary's triple table.
///
/// Invariant (within any single scope - the global list or one octet
/// bucket): records are sorted ascending by `start`, mutually
/// non-overlapping, and no two consecutive records satisfy
/// `a.end + 1 == b.start && a.triple == b.triple`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeoRecord {
    /// First address of the block
    pub start: u32,
    /// Last address of the block (inclusive)
    pub end: u32,
    /// Index into the dictionary's triple table
    pub triple: u16,
}

impl GeoRecord {
    /// Create a new record
    pub fn new(start: u32, end: u32, triple: u16) -> Self {
        Self { start, end, triple }
    }

    /// True if `addr` falls inside this record's block
    pub fn contains(&self, addr: u32) -> bool {
        self.start <= addr && addr <= self.end
    }
}

/// Append `rec` to `out`, extending the previous record in place when it is
/// adjacent and shares the same triple.
///
/// This is the single merge rule used both by the compiler's linear pass and
/// by the sharder's per-bucket re-merge.
pub fn push_merged(out: &mut Vec<GeoRecord>, rec: GeoRecord) {
    if let Some(last) = out.last_mut() {
        if last.triple == rec.triple && last.end.checked_add(1) == Some(rec.start) {
            last.end = rec.end;
            return;
        }
    }
    out.push(rec);
}
