// src/main.rs

use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{builder::TypedValueParser, Parser};
use pq_handoff::{pipeline, sample::MAX_SAMPLE_ROWS};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Generate the Parquet/CSV handoff sample files used in the docs.
#[derive(Debug, Parser)]
#[command(name = "pq-handoff", version, about)]
struct Cli {
    /// Directory to write sample files into.
    #[arg(long, value_name = "DIR", default_value = "examples")]
    outdir: PathBuf,

    /// Number of demo rows to emit (at most 8).
    #[arg(long, value_name = "N", default_value_t = MAX_SAMPLE_ROWS,
          value_parser = clap::value_parser!(u8).range(0..=MAX_SAMPLE_ROWS as i64).map(usize::from))]
    rows: usize,

    /// Lay the dates out against this day instead of today (YYYY-MM-DD).
    #[arg(long = "as-of", value_name = "DATE")]
    as_of: Option<NaiveDate>,

    /// Read both files back and check they agree.
    #[arg(long)]
    verify: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ─── logging (stderr; stdout only carries the written paths) ──────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let config = pipeline::Config {
        outdir: cli.outdir,
        rows: cli.rows,
        today: cli.as_of.unwrap_or_else(|| Local::now().date_naive()),
        verify: cli.verify,
    };
    info!(?config, "startup");

    let paths = pipeline::run(&config)?;
    println!("Wrote: {}", paths.parquet.display());
    println!("Wrote: {}", paths.csv.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_write_eight_rows_into_examples() {
        let cli = Cli::try_parse_from(["pq-handoff"]).unwrap();
        assert_eq!(cli.outdir, PathBuf::from("examples"));
        assert_eq!(cli.rows, MAX_SAMPLE_ROWS);
        assert_eq!(cli.as_of, None);
        assert!(!cli.verify);
    }

    #[test]
    fn rows_outside_range_are_rejected() {
        assert!(Cli::try_parse_from(["pq-handoff", "--rows", "9"]).is_err());
        assert!(Cli::try_parse_from(["pq-handoff", "--rows", "-1"]).is_err());
        assert!(Cli::try_parse_from(["pq-handoff", "--rows", "many"]).is_err());
    }

    #[test]
    fn explicit_arguments_are_parsed() {
        let cli = Cli::try_parse_from([
            "pq-handoff",
            "--outdir",
            "out",
            "--rows",
            "0",
            "--as-of",
            "2025-01-11",
            "--verify",
        ])
        .unwrap();
        assert_eq!(cli.outdir, PathBuf::from("out"));
        assert_eq!(cli.rows, 0);
        assert_eq!(cli.as_of, NaiveDate::from_ymd_opt(2025, 1, 11));
        assert!(cli.verify);
    }
}
