use anyhow::{Context, Result};
use ipregion::GeoDatabase;
use serde_json::json;
use std::path::PathBuf;

pub fn cmd_inspect(database: PathBuf, as_json: bool) -> Result<()> {
    let db = GeoDatabase::open(&database)
        .with_context(|| format!("Failed to open database: {}", database.display()))?;

    let dict = db.dictionary();

    // Forces every chunk to decode; inspect is an offline tool, so eager
    // loading is fine here
    let mut non_empty = 0usize;
    let mut total_records = 0usize;
    let mut per_octet: Vec<(u8, usize)> = Vec::new();
    for octet in 0..=255u8 {
        let len = db.chunk(octet).len();
        if len > 0 {
            non_empty += 1;
            total_records += len;
            per_octet.push((octet, len));
        }
    }

    if as_json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "directory": database.display().to_string(),
                "strings": dict.strings.len(),
                "triples": dict.triples.len(),
                "chunks": non_empty,
                "records": total_records,
                "per_octet": per_octet
                    .iter()
                    .map(|(octet, len)| json!({ "octet": octet, "records": len }))
                    .collect::<Vec<_>>(),
            }))?
        );
    } else {
        println!("Database: {}", database.display());
        println!("  strings: {}", dict.strings.len());
        println!("  triples: {}", dict.triples.len());
        println!("  chunks:  {} non-empty", non_empty);
        println!("  records: {}", total_records);
        for (octet, len) in &per_octet {
            println!("    {}.0.0.0/8: {} records", octet, len);
        }
    }

    Ok(())
}
