//! Range compiler: raw source rows to a dictionary plus a sorted range list
//!
//! The source dataset is a newline-delimited text file where each row is
//! `startIP|endIP|country|province|city|isp...` (at least 6 pipe fields,
//! only the first five consumed). The compiler interns every location
//! triple, coalesces runs of adjacent rows that resolve to the same triple,
//! and finishes with a defensive sort by start address.
//!
//! Compilation is deliberately single-threaded: artifact bytes must be
//! reproducible, which pins both the interner's first-seen index assignment
//! and the final record order.

use crate::dict::Dictionary;
use crate::error::{IpRegionError, Result};
use crate::interner::Interner;
use crate::record::{push_merged, GeoRecord};
use std::net::Ipv4Addr;

/// Output of a compile run: the immutable dictionary and the global,
/// sorted, merged range list (not yet sharded by octet).
#[derive(Debug, Clone)]
pub struct CompiledDatabase {
    /// Interned strings and triples
    pub dictionary: Dictionary,
    /// Global range list, sorted ascending by start
    pub records: Vec<GeoRecord>,
}

/// Counters reported after a compile run
#[derive(Debug, Clone, Copy, Default)]
pub struct CompileStats {
    /// Rows consumed (6+ fields, valid addresses)
    pub rows: usize,
    /// Blank, comment, or short rows skipped
    pub skipped: usize,
    /// Distinct strings interned
    pub strings: usize,
    /// Distinct triples interned
    pub triples: usize,
    /// Ranges after merging
    pub records: usize,
}

/// Streaming row compiler.
///
/// Feed rows in file order with [`add_row`](Compiler::add_row), then call
/// [`finish`](Compiler::finish). For whole-buffer input use
/// [`compile_text`].
#[derive(Debug, Default)]
pub struct Compiler {
    interner: Interner,
    records: Vec<GeoRecord>,
    rows: usize,
    skipped: usize,
}

impl Compiler {
    /// Create an empty compiler
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one source row.
    ///
    /// Blank lines, `#` comments, and rows with fewer than 6 pipe fields are
    /// skipped. Rows with enough fields but a malformed address or an
    /// inverted range are a fatal error naming `line_no` - the original
    /// generator let garbage addresses propagate silently, which is exactly
    /// the failure mode strict validation exists to catch.
    pub fn add_row(&mut self, line: &str, line_no: usize) -> Result<()> {
        let line = line.trim_end_matches('\r');
        if line.is_empty() || line.starts_with('#') {
            self.skipped += 1;
            return Ok(());
        }
        let mut fields = line.splitn(7, '|');
        let start_ip = fields.next().unwrap_or("");
        let end_ip = fields.next().unwrap_or("");
        let country = fields.next();
        let province = fields.next();
        let city = fields.next();
        // Field 5 (isp) must exist for the row to count, even though its
        // value is not consumed
        if fields.next().is_none() {
            self.skipped += 1;
            return Ok(());
        }

        let start = parse_ipv4(start_ip).ok_or_else(|| {
            IpRegionError::InvalidRow(format!("line {}: bad start address {:?}", line_no, start_ip))
        })?;
        let end = parse_ipv4(end_ip).ok_or_else(|| {
            IpRegionError::InvalidRow(format!("line {}: bad end address {:?}", line_no, end_ip))
        })?;
        if end < start {
            return Err(IpRegionError::InvalidRow(format!(
                "line {}: inverted range {} > {}",
                line_no, start_ip, end_ip
            )));
        }

        let triple = self.interner.intern_triple(
            normalize(country.unwrap_or("")),
            normalize(province.unwrap_or("")),
            normalize(city.unwrap_or("")),
        )?;

        push_merged(&mut self.records, GeoRecord::new(start, end, triple));
        self.rows += 1;
        Ok(())
    }

    /// Finish the compile: defensive re-sort by start (input is expected
    /// already sorted, but that is never assumed) and freeze the dictionary.
    pub fn finish(self) -> (CompiledDatabase, CompileStats) {
        let mut records = self.records;
        records.sort_by_key(|r| r.start);
        let stats = CompileStats {
            rows: self.rows,
            skipped: self.skipped,
            strings: self.interner.string_count(),
            triples: self.interner.triple_count(),
            records: records.len(),
        };
        let (strings, triples) = self.interner.into_tables();
        (
            CompiledDatabase {
                dictionary: Dictionary::new(strings, triples),
                records,
            },
            stats,
        )
    }
}

/// Compile a whole source dataset held in memory
pub fn compile_text(text: &str) -> Result<(CompiledDatabase, CompileStats)> {
    let mut compiler = Compiler::new();
    for (i, line) in text.lines().enumerate() {
        compiler.add_row(line, i + 1)?;
    }
    Ok(compiler.finish())
}

/// Parse a strict dotted-quad IPv4 address into its big-endian u32 packing.
///
/// `Ipv4Addr`'s parser already enforces exactly four decimal octets in
/// 0-255 and rejects empty parts, signs, and non-numeric input.
pub fn parse_ipv4(s: &str) -> Option<u32> {
    s.parse::<Ipv4Addr>().ok().map(u32::from)
}

/// Field value `"0"` or empty means "unknown" and maps to the empty string
fn normalize(field: &str) -> &str {
    if field == "0" {
        ""
    } else {
        field
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
1.0.0.0|1.0.0.255|CN|Beijing|Haidian|telecom
1.0.1.0|1.0.1.255|CN|Beijing|Haidian|unicom
# comment line

1.0.2.0|1.0.2.255|CN|Shanghai|0|telecom
short|row
2.0.0.0|2.0.0.255|US|0|0|isp
";

    #[test]
    fn test_compile_merges_adjacent_same_triple() {
        let (db, stats) = compile_text(SAMPLE).unwrap();
        // First two rows share a triple and are adjacent: merged
        assert_eq!(db.records[0], GeoRecord::new(0x0100_0000, 0x0100_01FF, 0));
        assert_eq!(db.records.len(), 3);
        assert_eq!(stats.rows, 4);
        assert_eq!(stats.skipped, 3); // comment, blank line, short row
        assert_eq!(stats.records, 3);
    }

    #[test]
    fn test_zero_and_empty_fields_normalize_to_unknown() {
        let (db, _) = compile_text("1.0.0.0|1.0.0.9|CN|0||isp\n").unwrap();
        let (_, province, city) = db.dictionary.triple(0);
        assert_eq!(db.dictionary.string(province), "");
        assert_eq!(db.dictionary.string(city), "");
    }

    #[test]
    fn test_first_seen_intern_order_is_stable() {
        let (db, _) = compile_text(SAMPLE).unwrap();
        assert_eq!(db.dictionary.strings[0], "CN");
        assert_eq!(db.dictionary.strings[1], "Beijing");
        assert_eq!(db.dictionary.strings[2], "Haidian");
    }

    #[test]
    fn test_deterministic_output() {
        let a = compile_text(SAMPLE).unwrap().0;
        let b = compile_text(SAMPLE).unwrap().0;
        assert_eq!(a.dictionary, b.dictionary);
        assert_eq!(a.records, b.records);
    }

    #[test]
    fn test_unsorted_input_is_resorted() {
        let text = "9.0.0.0|9.0.0.255|US|0|0|isp\n1.0.0.0|1.0.0.255|CN|0|0|isp\n";
        let (db, _) = compile_text(text).unwrap();
        assert!(db.records.windows(2).all(|w| w[0].start <= w[1].start));
    }

    #[test]
    fn test_malformed_address_is_fatal() {
        let err = compile_text("1.0.0.0|999.0.0.1|CN|0|0|isp\n").unwrap_err();
        assert!(matches!(err, IpRegionError::InvalidRow(_)));
        let err = compile_text("nonsense|1.0.0.1|CN|0|0|isp\n").unwrap_err();
        assert!(matches!(err, IpRegionError::InvalidRow(_)));
    }

    #[test]
    fn test_inverted_range_is_fatal() {
        let err = compile_text("2.0.0.0|1.0.0.0|CN|0|0|isp\n").unwrap_err();
        assert!(matches!(err, IpRegionError::InvalidRow(_)));
    }

    #[test]
    fn test_error_names_line_number() {
        let text = "1.0.0.0|1.0.0.255|CN|0|0|isp\nbad.ip|1.0.0.1|CN|0|0|isp\n";
        let err = compile_text(text).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_parse_ipv4_strictness() {
        assert_eq!(parse_ipv4("1.2.3.4"), Some(0x0102_0304));
        assert_eq!(parse_ipv4("255.255.255.255"), Some(u32::MAX));
        assert_eq!(parse_ipv4("0.0.0.0"), Some(0));
        assert_eq!(parse_ipv4("1.2.3"), None);
        assert_eq!(parse_ipv4("1.2.3.4.5"), None);
        assert_eq!(parse_ipv4("999.1.1.1"), None);
        assert_eq!(parse_ipv4("1.2.3.x"), None);
        assert_eq!(parse_ipv4(""), None);
        assert_eq!(parse_ipv4("1.2.3.-4"), None);
    }

    #[test]
    fn test_merge_invariant_holds_globally() {
        let (db, _) = compile_text(SAMPLE).unwrap();
        for w in db.records.windows(2) {
            assert!(w[0].end < w[1].start, "records overlap or are unsorted");
            assert!(
                !(w[0].end + 1 == w[1].start && w[0].triple == w[1].triple),
                "unmerged adjacent records with equal triple"
            );
        }
    }
}
