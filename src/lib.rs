//! ipregion - Compact IPv4 geolocation database
//!
//! ipregion resolves an IPv4 address to a (country, province, city) triple
//! from a precomputed binary database partitioned by top octet for fast
//! partial loading. The crate covers both halves of that database: the
//! offline compiler that turns the pipe-delimited ip2region source list
//! into binary artifacts, and the lookup engine that loads those artifacts
//! lazily and answers point queries by binary search.
//!
//! # Quick Start
//!
//! ```rust
//! use ipregion::{compile_text, write_database, GeoDatabase};
//!
//! // Compile a source dataset into a dictionary plus per-octet chunks
//! let source = "1.0.0.0|1.255.255.255|CN|Beijing|Haidian|telecom\n";
//! let (compiled, stats) = compile_text(source)?;
//! assert_eq!(stats.records, 1);
//!
//! # let dir = std::env::temp_dir().join("ipregion_doctest_db");
//! # std::fs::create_dir_all(&dir).unwrap();
//! write_database(&dir, &compiled)?;
//!
//! // Query it
//! let db = GeoDatabase::open(&dir)?;
//! let result = db.lookup("1.2.3.4");
//! assert_eq!(result.country.as_deref(), Some("CN"));
//! assert_eq!(result.city.as_deref(), Some("Haidian"));
//!
//! // Malformed input is a silent miss, never an error
//! assert!(db.lookup("999.1.1.1").is_empty());
//! # let _ = std::fs::remove_dir_all(&dir);
//! # Ok::<(), ipregion::IpRegionError>(())
//! ```
//!
//! # Architecture
//!
//! ```text
//! build time                              query time
//! ┌─────────────────────────────┐         ┌──────────────────────────────┐
//! │ source rows                 │         │ GeoDatabase::lookup("a.b.c.d")│
//! │   │ compiler (intern+merge) │         │   │ parse, octet = a          │
//! │   ▼                         │         │   ▼                           │
//! │ global range list           │         │ chunk cache (256 OnceLock)    │
//! │   │ octet sharder (clip)    │         │   │ decode on first use       │
//! │   ▼                         │         │   ▼                           │
//! │ dict.bin + chunks/aN.bin    │────────▶│ binary search → dictionary    │
//! └─────────────────────────────┘         └──────────────────────────────┘
//! ```
//!
//! All artifacts are little-endian. A corrupt or missing artifact degrades
//! to an empty table; queries touching it resolve to null fields. Only the
//! offline compiler can fail.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Module declarations
/// Per-octet chunk artifact codec (IPCH)
pub mod chunk;
/// Range compiler: source rows to dictionary + sorted ranges
pub mod compiler;
/// Lookup engine
pub mod database;
/// Dictionary artifact codec (IPDC)
pub mod dict;
/// Error types for ipregion operations
pub mod error;
pub mod interner;
pub mod record;
/// Octet sharding of the global range list
pub mod shard;
/// Source dataset providers (local file, remote fetch)
pub mod source;
/// Artifact directory layout and I/O
pub mod store;

// Re-exports for consumers

/// Lookup engine over an artifact directory
pub use crate::database::{GeoDatabase, LookupResult};

pub use crate::compiler::{compile_text, CompileStats, CompiledDatabase, Compiler};
pub use crate::dict::Dictionary;
pub use crate::error::{IpRegionError, Result};
pub use crate::record::GeoRecord;
pub use crate::source::{FileSource, RemoteSource, SourceProvider};
pub use crate::store::{write_database, WriteStats};

// Version information
/// Library version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
