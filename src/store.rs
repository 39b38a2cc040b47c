//! Artifact directory layout and I/O
//!
//! A compiled database is a directory:
//!
//! ```text
//! <dir>/dict.bin        dictionary artifact (IPDC)
//! <dir>/chunks/a<N>.bin chunk artifact for octet N (IPCH), absent if empty
//! ```
//!
//! Reads go through `memmap2` and decode straight from the mapping, so a
//! chunk is never buffered twice on its one-time load. A missing or
//! unreadable artifact decodes as empty - the degrade-to-empty policy the
//! codecs already implement for corrupt bytes.

use crate::chunk::encode_chunk;
use crate::compiler::CompiledDatabase;
use crate::dict::{decode_dictionary, encode_dictionary, Dictionary};
use crate::error::{IpRegionError, Result};
use crate::record::GeoRecord;
use crate::shard::shard_by_octet;
use memmap2::Mmap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Dictionary artifact file name
pub const DICT_FILE: &str = "dict.bin";

/// Subdirectory holding the chunk artifacts
pub const CHUNKS_DIR: &str = "chunks";

/// Path of the chunk artifact for one octet
pub fn chunk_path(dir: &Path, octet: u8) -> PathBuf {
    dir.join(CHUNKS_DIR).join(format!("a{}.bin", octet))
}

/// Byte totals reported after writing an artifact set
#[derive(Debug, Clone, Copy, Default)]
pub struct WriteStats {
    /// Size of the dictionary artifact
    pub dict_bytes: usize,
    /// Number of non-empty chunk artifacts written
    pub chunks_written: usize,
    /// Total size of all chunk artifacts
    pub chunk_bytes: usize,
}

/// Shard, encode, and write a compiled database into `dir`.
///
/// Creates `dir` and its `chunks/` subdirectory as needed and removes any
/// stale chunk artifacts from a previous build, so the directory always
/// reflects exactly one compile run. Any I/O failure aborts with an error;
/// no attempt is made to roll back files already written - the caller
/// treats the whole run as failed and must not serve from the directory.
pub fn write_database(dir: &Path, db: &CompiledDatabase) -> Result<WriteStats> {
    let chunks_dir = dir.join(CHUNKS_DIR);
    fs::create_dir_all(&chunks_dir)
        .map_err(|e| IpRegionError::Io(format!("create {}: {}", chunks_dir.display(), e)))?;

    // Clear stale chunks so octets that became empty don't linger
    for entry in fs::read_dir(&chunks_dir)
        .map_err(|e| IpRegionError::Io(format!("read {}: {}", chunks_dir.display(), e)))?
    {
        let entry = entry.map_err(|e| IpRegionError::Io(e.to_string()))?;
        if entry.path().extension().is_some_and(|ext| ext == "bin") {
            fs::remove_file(entry.path())
                .map_err(|e| IpRegionError::Io(format!("remove stale chunk: {}", e)))?;
        }
    }

    let dict_bytes = encode_dictionary(&db.dictionary);
    let dict_path = dir.join(DICT_FILE);
    fs::write(&dict_path, &dict_bytes)
        .map_err(|e| IpRegionError::Io(format!("write {}: {}", dict_path.display(), e)))?;

    let mut stats = WriteStats {
        dict_bytes: dict_bytes.len(),
        ..Default::default()
    };

    let buckets = shard_by_octet(&db.records);
    for (octet, bucket) in buckets.iter().enumerate() {
        if bucket.is_empty() {
            continue;
        }
        let bytes = encode_chunk(bucket);
        let path = chunk_path(dir, octet as u8);
        fs::write(&path, &bytes)
            .map_err(|e| IpRegionError::Io(format!("write {}: {}", path.display(), e)))?;
        stats.chunks_written += 1;
        stats.chunk_bytes += bytes.len();
    }

    Ok(stats)
}

/// Map an artifact file read-only, `None` if it is missing or unmappable
fn map_artifact(path: &Path) -> Option<Mmap> {
    let file = File::open(path).ok()?;
    // SAFETY: artifacts are written once and opened read-only; the mapping
    // is dropped before this function's caller returns its decoded copy
    unsafe { Mmap::map(&file) }.ok()
}

/// Load and decode the dictionary artifact from `dir`.
///
/// A missing or corrupt artifact yields an empty dictionary.
pub fn load_dictionary(dir: &Path) -> Dictionary {
    match map_artifact(&dir.join(DICT_FILE)) {
        Some(map) => decode_dictionary(&map),
        None => Dictionary::default(),
    }
}

/// Load and decode one octet's chunk artifact from `dir`.
///
/// A missing or corrupt artifact yields an empty record list.
pub fn load_chunk(dir: &Path, octet: u8) -> Vec<GeoRecord> {
    match map_artifact(&chunk_path(dir, octet)) {
        Some(map) => crate::chunk::decode_chunk(&map),
        None => Vec::new(),
    }
}
