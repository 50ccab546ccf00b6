// src/bin/inspect_handoff.rs

use anyhow::Result;
use clap::Parser;
use pq_handoff::inspect::describe_parquet;
use std::path::PathBuf;

/// Print the footer summary of a handoff Parquet file.
#[derive(Debug, Parser)]
#[command(name = "inspect_handoff", version, about)]
struct Args {
    #[arg(value_name = "PARQUET_FILE")]
    path: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let summary = describe_parquet(&args.path)?;
    println!("=== Parquet File: {} ===", args.path.display());
    print!("{summary}");
    Ok(())
}
