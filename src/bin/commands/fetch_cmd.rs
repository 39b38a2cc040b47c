use anyhow::Result;
use ipregion::RemoteSource;
use std::path::PathBuf;

use crate::commands::compile_and_write;

pub fn cmd_fetch(output: PathBuf, urls: Vec<String>, verbose: bool) -> Result<()> {
    let provider = if urls.is_empty() {
        RemoteSource::new()
    } else {
        RemoteSource::with_urls(urls)
    };
    // A failed fetch propagates as an error and exits nonzero before any
    // artifact is touched
    compile_and_write(&provider, &output, verbose)
}
