//! Lookup engine: lazy-loading, binary-searching query path
//!
//! A [`GeoDatabase`] is an owned handle over an artifact directory. The
//! dictionary and each of the 256 chunks are decoded at most once, on first
//! use, into `OnceLock` slots - concurrent first loads of the same artifact
//! block on a single initializer, so no decode work is duplicated and the
//! cache is populated exactly once per slot for the life of the value.
//! There is no eviction: the table is read-only and bounded to 256 chunks
//! plus one dictionary.
//!
//! The query path never fails. Malformed input, a missing artifact, a
//! corrupt artifact, and an out-of-range index all resolve to null fields.

use crate::compiler::parse_ipv4;
use crate::dict::Dictionary;
use crate::error::{IpRegionError, Result};
use crate::record::GeoRecord;
use crate::store;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Result of one lookup. Fields are either all `Some` or all `None` at the
/// triple level; an individual field is additionally `None` when its
/// interned string is empty ("unknown").
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LookupResult {
    /// Resolved country, if known
    pub country: Option<String>,
    /// Resolved province, if known
    pub province: Option<String>,
    /// Resolved city, if known
    pub city: Option<String>,
}

impl LookupResult {
    fn empty() -> Self {
        Self::default()
    }

    /// True if no field resolved
    pub fn is_empty(&self) -> bool {
        self.country.is_none() && self.province.is_none() && self.city.is_none()
    }
}

/// Read-only IPv4 geolocation database over an artifact directory.
///
/// # Examples
///
/// ```no_run
/// use ipregion::GeoDatabase;
///
/// let db = GeoDatabase::open("artifacts/")?;
/// let result = db.lookup("1.2.3.4");
/// println!("{:?} {:?} {:?}", result.country, result.province, result.city);
/// # Ok::<(), ipregion::IpRegionError>(())
/// ```
pub struct GeoDatabase {
    dir: PathBuf,
    dictionary: OnceLock<Dictionary>,
    chunks: [OnceLock<Vec<GeoRecord>>; crate::shard::OCTET_COUNT],
}

impl GeoDatabase {
    /// Open a database over an artifact directory.
    ///
    /// Only the directory's existence is checked here; artifacts are
    /// decoded lazily on first use. A directory with missing or corrupt
    /// artifacts opens successfully and resolves every query to null
    /// fields.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        if !dir.is_dir() {
            return Err(IpRegionError::Io(format!(
                "not a directory: {}",
                dir.display()
            )));
        }
        Ok(Self {
            dir,
            dictionary: OnceLock::new(),
            chunks: std::array::from_fn(|_| OnceLock::new()),
        })
    }

    /// Look up a dotted-quad IPv4 string.
    ///
    /// Infallible: malformed input and every artifact-level fault resolve
    /// to an all-null result.
    pub fn lookup(&self, ip: &str) -> LookupResult {
        match parse_ipv4(ip) {
            Some(value) => self.lookup_u32(value),
            None => LookupResult::empty(),
        }
    }

    /// Look up an already-parsed IPv4 address
    pub fn lookup_u32(&self, value: u32) -> LookupResult {
        let octet = (value >> 24) as u8;
        let records = self.chunk(octet);

        let mut lo = 0usize;
        let mut hi = records.len();
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let rec = &records[mid];
            if value < rec.start {
                hi = mid;
            } else if value > rec.end {
                lo = mid + 1;
            } else {
                return self.resolve(rec.triple);
            }
        }
        LookupResult::empty()
    }

    /// Resolve a triple index against the dictionary, mapping empty strings
    /// to `None`
    fn resolve(&self, triple: u16) -> LookupResult {
        let dict = self.dictionary();
        let (country, province, city) = dict.triple(triple);
        let field = |idx: u16| {
            let s = dict.string(idx);
            if s.is_empty() {
                None
            } else {
                Some(s.to_string())
            }
        };
        LookupResult {
            country: field(country),
            province: field(province),
            city: field(city),
        }
    }

    /// The decoded dictionary, loaded on first use
    pub fn dictionary(&self) -> &Dictionary {
        self.dictionary
            .get_or_init(|| store::load_dictionary(&self.dir))
    }

    /// One octet's decoded records, loaded on first use
    pub fn chunk(&self, octet: u8) -> &[GeoRecord] {
        self.chunks[octet as usize]
            .get_or_init(|| store::load_chunk(&self.dir, octet))
    }

    /// True if this octet's chunk is already decoded (it does not trigger a
    /// load)
    pub fn chunk_loaded(&self, octet: u8) -> bool {
        self.chunks[octet as usize].get().is_some()
    }

    /// Artifact directory this database reads from
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
