use anyhow::Result;
use ipregion::FileSource;
use std::path::PathBuf;

use crate::commands::compile_and_write;

pub fn cmd_build(input: PathBuf, output: PathBuf, verbose: bool) -> Result<()> {
    let provider = FileSource::new(&input);
    compile_and_write(&provider, &output, verbose)
}
