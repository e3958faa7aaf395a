// Desktop/tooling crate: unwrap/expect/panic acceptable in non-embedded code.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod check;
mod inspect;
mod pack_content;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Matrix Show development tasks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack a content directory into a flash data-partition image
    PackContent {
        /// Directory whose tree mirrors the on-flash paths (scenes/, scroll/, ...)
        content_dir: PathBuf,
        /// Output image file
        out: PathBuf,
    },
    /// List the records and catalog entries of a flash image
    Inspect {
        /// Image file (from pack-content or a flash dump of the data partition)
        image: PathBuf,
        /// Print a JSON report instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Check no_std builds, the host driver, clippy and formatting
    Check,
    /// Run all tests (unit, integration, and doc)
    Test {
        /// Run only unit tests
        #[arg(long)]
        unit: bool,
        /// Run only integration tests
        #[arg(long)]
        integration: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::PackContent { content_dir, out } => pack_content::run(&content_dir, &out),
        Commands::Inspect { image, json } => inspect::run(&image, json),
        Commands::Check => check::run(),
        Commands::Test { unit, integration } => test::run(unit, integration),
    }
}
