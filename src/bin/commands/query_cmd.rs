use anyhow::{Context, Result};
use ipregion::GeoDatabase;
use serde_json::json;
use std::path::PathBuf;

pub fn cmd_query(database: PathBuf, ip: String, quiet: bool) -> Result<()> {
    let db = GeoDatabase::open(&database)
        .with_context(|| format!("Failed to open database: {}", database.display()))?;

    let result = db.lookup(&ip);
    let found = !result.is_empty();

    if quiet {
        // Quiet mode: no output, just exit code
        std::process::exit(if found { 0 } else { 1 });
    }

    println!(
        "{}",
        serde_json::to_string_pretty(&json!({
            "ip": ip,
            "country": result.country,
            "province": result.province,
            "city": result.city,
        }))?
    );

    std::process::exit(if found { 0 } else { 1 });
}
