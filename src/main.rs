use anyhow::{Context, Result};
use clap::Parser;
use housing_core::models::DEFAULT_ROLLING_PRECEDING;
use housing_core::writer::{
    write_csv, write_json, write_records_csv, write_records_parquet, write_summaries_csv,
};
use housing_core::{Pipeline, PipelineConfig, RunReport};
use log::info;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Instant;

mod report;

#[derive(Parser, Debug)]
#[command(name = "housing_pipeline")]
#[command(about = "Clean, deduplicate and summarize the Nashville housing sales table")]
struct Args {
    /// Raw dataset (CSV)
    #[arg(short, long)]
    input: PathBuf,

    /// Cleaned table output (CSV)
    #[arg(short, long)]
    output: PathBuf,

    /// City summary output (CSV), defaults to <output stem>_summary.csv
    #[arg(long)]
    summary_output: Option<PathBuf>,

    /// Only clean the table, do not compute city analytics
    #[arg(long)]
    skip_analytics: bool,

    /// Also write the cleaned table as Parquet
    #[arg(long)]
    parquet: Option<PathBuf>,

    /// Write the per-sale rolling sale-price series (CSV) here
    #[arg(long)]
    rolling_output: Option<PathBuf>,

    /// Write the JSON run report here
    #[arg(long)]
    report: Option<PathBuf>,

    /// Rows preceding the current one in the rolling sale-price window
    #[arg(long, default_value_t = DEFAULT_ROLLING_PRECEDING)]
    rolling_preceding: usize,
}

fn default_summary_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("cleaned");
    output.with_file_name(format!("{}_summary.csv", stem))
}

fn run(args: &Args) -> Result<RunReport> {
    let start = Instant::now();
    let config = PipelineConfig {
        rolling_preceding: args.rolling_preceding,
        skip_analytics: args.skip_analytics,
    };

    let output = Pipeline::new(config)
        .run_path(&args.input)
        .with_context(|| format!("failed to load {}", args.input.display()))?;

    write_records_csv(&args.output, &output.records)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    if !args.skip_analytics {
        let summary_path = args
            .summary_output
            .clone()
            .unwrap_or_else(|| default_summary_path(&args.output));
        write_summaries_csv(&summary_path, &output.summaries)
            .with_context(|| format!("failed to write {}", summary_path.display()))?;

        if let Some(rolling_path) = &args.rolling_output {
            let file = File::create(rolling_path)
                .with_context(|| format!("failed to create {}", rolling_path.display()))?;
            write_csv(file, &output.rolling)
                .with_context(|| format!("failed to write {}", rolling_path.display()))?;
        }
    }

    if let Some(parquet_path) = &args.parquet {
        write_records_parquet(parquet_path, &output.records)
            .with_context(|| format!("failed to write {}", parquet_path.display()))?;
    }

    if let Some(report_path) = &args.report {
        write_json(report_path, &output.report)
            .with_context(|| format!("failed to write {}", report_path.display()))?;
        info!("Run report written to {}", report_path.display());
    }

    report::print_run_summary(&output.report, &output.summaries, start.elapsed());
    Ok(output.report)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    info!("Starting housing pipeline");
    run(&args)?;

    Ok(())
}
