use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;

use gate_count_processing::export::{DEFAULT_OUTPUT_DIR, ExportOptions};
use gate_count_processing::ingestion::{
    ExcelSheetSelection, IngestionFormat, IngestionOptions, TracingObserver,
};
use gate_count_processing::pipeline::{self, PipelineConfig};

const USAGE_MISSING: &str =
    "Exiting program, provide the file name to parse - E.G. gate-counts <FILE_NAME>.csv";
const USAGE_EXTENSION: &str =
    "Exiting program, file provided is not a .csv or .xlsx - E.G. gate-counts <FILE_NAME>.csv";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Split a wide gate count sheet into one CSV per location",
    long_about = None
)]
struct Cli {
    /// Source file (.csv or .xlsx)
    input: Option<PathBuf>,

    /// Directory receiving one CSV per location
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Worksheet to read from an .xlsx file (defaults to the first sheet)
    #[arg(long)]
    sheet: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let Some(input) = cli.input else {
        println!("{USAGE_MISSING}");
        return Ok(());
    };
    let Some(format) = IngestionFormat::from_path(&input) else {
        println!("{USAGE_EXTENSION}");
        return Ok(());
    };

    let config = PipelineConfig {
        ingestion: IngestionOptions {
            format: Some(format),
            excel_sheet_selection: cli
                .sheet
                .map(ExcelSheetSelection::Sheet)
                .unwrap_or_default(),
            observer: Some(Arc::new(TracingObserver)),
            ..Default::default()
        },
        export: ExportOptions {
            output_dir: cli.output_dir,
        },
    };

    pipeline::run(&input, &config)
        .with_context(|| format!("failed to process {}", input.display()))?;
    Ok(())
}
