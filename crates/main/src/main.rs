use std::error::Error;
use std::io;
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::Parser;
use counter_ritual::pdf::DisabledPdf;
use counter_ritual::ritual::{DEFAULT_BACKUP_DIR, DEFAULT_OUTPUT_DIR};
use counter_ritual::{Layout, Ritual};
use tracing_subscriber::EnvFilter;

/// Writes today's counter-report to `output/`, keeps yesterday's copy in `backup/`,
/// then chimes and opens the result as configured in `config.yaml`.
///
/// PDF output needs the Noto Sans Myanmar fonts under `assets/fonts` next to the
/// binary or in the directory named by `COUNTER_RITUAL_FONTS_DIR`; without them
/// only the Markdown report is written.
#[derive(Parser)]
#[command(author, version, about = "Daily counter-report generator")]
struct Cli {
    /// Configuration file, created with defaults when missing.
    #[arg(long, default_value = counter_ritual::config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Directory receiving the dated reports.
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Directory receiving the copy of yesterday's report.
    #[arg(long, default_value = DEFAULT_BACKUP_DIR)]
    backup_dir: PathBuf,

    /// Run as if today were this date (YYYY-MM-DD).
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Skip the PDF copy.
    #[arg(long)]
    no_pdf: bool,
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("Error: {}", err);
        print_error_sources(err.as_ref());
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let layout = Layout {
        config_path: cli.config,
        output_dir: cli.output_dir,
        backup_dir: cli.backup_dir,
    };
    let today = cli.date.unwrap_or_else(|| Local::now().date_naive());
    log::debug!("Running for {today} with {layout:?}");

    let ritual = Ritual::new(layout);
    let mut rng = rand::thread_rng();
    let mut stdout = io::stdout().lock();

    if cli.no_pdf {
        ritual
            .with_pdf_backend(DisabledPdf::new("turned off with --no-pdf"))
            .run(today, &mut rng, &mut stdout)?;
    } else {
        ritual.run(today, &mut rng, &mut stdout)?;
    }
    Ok(())
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
