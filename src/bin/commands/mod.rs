mod build_cmd;
mod fetch_cmd;
mod inspect_cmd;
mod query_cmd;

pub use build_cmd::cmd_build;
pub use fetch_cmd::cmd_fetch;
pub use inspect_cmd::cmd_inspect;
pub use query_cmd::cmd_query;

use anyhow::{Context, Result};
use ipregion::{CompileStats, CompiledDatabase, SourceProvider};
use std::path::Path;

/// Shared driver for `build` and `fetch`: pull the dataset from the
/// provider, compile it, and write the artifact set.
pub(crate) fn compile_and_write(
    provider: &dyn SourceProvider,
    output: &Path,
    verbose: bool,
) -> Result<()> {
    let text = provider
        .fetch()
        .with_context(|| format!("Failed to read source dataset from {}", provider.describe()))?;

    let (compiled, stats): (CompiledDatabase, CompileStats) =
        ipregion::compile_text(&text).context("Failed to compile source dataset")?;

    let write_stats = ipregion::write_database(output, &compiled)
        .with_context(|| format!("Failed to write artifacts to {}", output.display()))?;

    if verbose {
        println!("Compiled {}:", provider.describe());
        println!("  rows consumed:  {}", stats.rows);
        println!("  rows skipped:   {}", stats.skipped);
        println!("  strings:        {}", stats.strings);
        println!("  triples:        {}", stats.triples);
        println!("  ranges:         {}", stats.records);
        println!(
            "  dictionary:     {} bytes, chunks: {} files / {} bytes",
            write_stats.dict_bytes, write_stats.chunks_written, write_stats.chunk_bytes
        );
    }
    println!("✓ Database built: {}", output.display());
    Ok(())
}
