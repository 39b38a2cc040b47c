mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::{cmd_build, cmd_fetch, cmd_inspect, cmd_query};

#[derive(Parser)]
#[command(name = "ipregion")]
#[command(
    about = "Compact IPv4 geolocation database with octet-sharded chunks",
    long_about = "ipregion - compile and query a compact IPv4 -> (country, province, city) database\n\n\
    The compiler turns the pipe-delimited ip2region source list into a dictionary artifact\n\
    plus one chunk artifact per /8 block; the query engine loads artifacts lazily and\n\
    answers point lookups by binary search.\n\n\
    Examples:\n\
      ipregion build ipv4_source.txt -o artifacts/\n\
      ipregion fetch -o artifacts/\n\
      ipregion query artifacts/ 1.2.3.4\n\
      ipregion inspect artifacts/ --json"
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build artifacts from a local source dataset
    Build {
        /// Source dataset (pipe-delimited rows), "-" for stdin, .gz supported
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output artifact directory
        #[arg(short, long, value_name = "DIR")]
        output: PathBuf,

        /// Print compile statistics
        #[arg(short, long)]
        verbose: bool,
    },

    /// Fetch the upstream dataset and build artifacts
    Fetch {
        /// Output artifact directory
        #[arg(short, long, value_name = "DIR")]
        output: PathBuf,

        /// Override source URL (repeatable; tried in order)
        #[arg(long, value_name = "URL")]
        url: Vec<String>,

        /// Print compile statistics
        #[arg(short, long)]
        verbose: bool,
    },

    /// Look up one IPv4 address
    Query {
        /// Artifact directory
        #[arg(value_name = "DIR")]
        database: PathBuf,

        /// Dotted-quad IPv4 address
        #[arg(value_name = "IP")]
        ip: String,

        /// Quiet mode - no output, only exit code (0 = found, 1 = not found)
        #[arg(short, long)]
        quiet: bool,
    },

    /// Inspect an artifact directory
    Inspect {
        /// Artifact directory
        #[arg(value_name = "DIR")]
        database: PathBuf,

        /// Output statistics as JSON
        #[arg(short, long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            input,
            output,
            verbose,
        } => cmd_build(input, output, verbose),
        Commands::Fetch {
            output,
            url,
            verbose,
        } => cmd_fetch(output, url, verbose),
        Commands::Query {
            database,
            ip,
            quiet,
        } => cmd_query(database, ip, quiet),
        Commands::Inspect { database, json } => cmd_inspect(database, json),
    }
}
