//! One complete report run, from directory setup to opening the result.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use log::{info, warn};
use rand::Rng;
use thiserror::Error;

use crate::backup::{self, BackupError};
use crate::config::{Config, ConfigError, ConfigSource, DEFAULT_CONFIG_FILE};
use crate::mock::MockRecord;
use crate::notify::{self, Desktop, OpenOutcome, SoundOutcome, SystemDesktop};
use crate::pdf::{GenpdfBackend, PdfBackend, PdfOutcome};
use crate::report;

pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const DEFAULT_BACKUP_DIR: &str = "backup";

const BANNER_WIDTH: usize = 60;
const BANNER_INDENT: &str = "           ";

/// File system locations used by a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    pub config_path: PathBuf,
    pub output_dir: PathBuf,
    pub backup_dir: PathBuf,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from(DEFAULT_CONFIG_FILE),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            backup_dir: PathBuf::from(DEFAULT_BACKUP_DIR),
        }
    }
}

impl Layout {
    /// Places the config file and both directories under `root`.
    pub fn rooted_at(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            config_path: root.join(DEFAULT_CONFIG_FILE),
            output_dir: root.join(DEFAULT_OUTPUT_DIR),
            backup_dir: root.join(DEFAULT_BACKUP_DIR),
        }
    }

    /// Path of the Markdown report for `date`.
    pub fn markdown_path(&self, date: NaiveDate) -> PathBuf {
        self.output_dir.join(report::report_file_name(date, "md"))
    }

    /// Path of the PDF report for `date`.
    pub fn pdf_path(&self, date: NaiveDate) -> PathBuf {
        self.output_dir.join(report::report_file_name(date, "pdf"))
    }

    fn ensure_dirs(&self) -> Result<(), RitualError> {
        for dir in [&self.output_dir, &self.backup_dir] {
            fs::create_dir_all(dir).map_err(|source| RitualError::CreateDir {
                path: dir.clone(),
                source,
            })?;
        }
        Ok(())
    }
}

/// Failures that abort a run.
#[derive(Debug, Error)]
pub enum RitualError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to create directory {}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write report {}", .path.display())]
    WriteReport {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Backup(#[from] BackupError),
    #[error("failed to print run summary")]
    Output(#[source] io::Error),
}

/// Everything a finished run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub config: Config,
    pub config_source: ConfigSource,
    pub record: MockRecord,
    pub report: String,
    pub markdown_path: PathBuf,
    pub pdf: PdfOutcome,
    pub backups: Vec<PathBuf>,
    pub sound: SoundOutcome,
    pub open: OpenOutcome,
}

impl RunSummary {
    /// The file that auto-open targets: the PDF when one was written, else the Markdown.
    pub fn primary_file(&self) -> &Path {
        primary_file(&self.pdf, &self.markdown_path)
    }
}

fn primary_file<'a>(pdf: &'a PdfOutcome, markdown_path: &'a Path) -> &'a Path {
    pdf.path().unwrap_or(markdown_path)
}

/// A configured report run.
///
/// The PDF renderer and the desktop integration default to the real ones and can be
/// swapped out, which is how the tests simulate missing capabilities.
pub struct Ritual<P = GenpdfBackend, D = SystemDesktop> {
    layout: Layout,
    pdf: P,
    desktop: D,
}

impl Ritual {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            pdf: GenpdfBackend,
            desktop: SystemDesktop,
        }
    }
}

impl<P: PdfBackend, D: Desktop> Ritual<P, D> {
    /// Replaces the PDF renderer.
    pub fn with_pdf_backend<Q: PdfBackend>(self, pdf: Q) -> Ritual<Q, D> {
        Ritual {
            layout: self.layout,
            pdf,
            desktop: self.desktop,
        }
    }

    /// Replaces the desktop integration.
    pub fn with_desktop<E: Desktop>(self, desktop: E) -> Ritual<P, E> {
        Ritual {
            layout: self.layout,
            pdf: self.pdf,
            desktop,
        }
    }

    /// Produces the report for `today`, printing the summary block to `out`.
    pub fn run<R, W>(
        &self,
        today: NaiveDate,
        rng: &mut R,
        out: &mut W,
    ) -> Result<RunSummary, RitualError>
    where
        R: Rng + ?Sized,
        W: Write + ?Sized,
    {
        self.layout.ensure_dirs()?;
        let (config, config_source) = Config::load_or_init(&self.layout.config_path)?;

        let record = MockRecord::generate(rng);
        let report = report::render(&config, &record, today);

        let markdown_path = self.layout.markdown_path(today);
        if markdown_path.exists() {
            info!("Overwriting earlier report {}", markdown_path.display());
        }
        fs::write(&markdown_path, &report).map_err(|source| RitualError::WriteReport {
            path: markdown_path.clone(),
            source,
        })?;
        info!("Wrote {}", markdown_path.display());

        let pdf = self
            .pdf
            .render(&report, &config.emoji, &self.layout.pdf_path(today));
        match &pdf {
            PdfOutcome::Written(_) => {}
            PdfOutcome::Unavailable(reason) => {
                info!("PDF renderer unavailable: {reason}");
                writeln!(out, "PDF skipped: {reason}").map_err(RitualError::Output)?;
            }
            PdfOutcome::Failed(err) => {
                warn!("PDF rendering failed: {err}");
                writeln!(out, "PDF failed: {err}").map_err(RitualError::Output)?;
            }
        }

        let backups = backup::rotate(&self.layout.output_dir, &self.layout.backup_dir, today)?;

        print_summary(out, today, &report, &markdown_path, &pdf, &backups)
            .map_err(RitualError::Output)?;

        let sound = notify::chime(&self.desktop, config.sound, out);
        let open = notify::reveal(
            &self.desktop,
            config.auto_open_pdf,
            primary_file(&pdf, &markdown_path),
        );

        Ok(RunSummary {
            config,
            config_source,
            record,
            report,
            markdown_path,
            pdf,
            backups,
            sound,
            open,
        })
    }
}

fn print_summary<W: Write + ?Sized>(
    out: &mut W,
    today: NaiveDate,
    text: &str,
    markdown_path: &Path,
    pdf: &PdfOutcome,
    backups: &[PathBuf],
) -> io::Result<()> {
    let rule = "=".repeat(BANNER_WIDTH);
    writeln!(out, "\n{rule}")?;
    writeln!(out, "{BANNER_INDENT}Zaw Min Tun Counter Ritual COMPLETE")?;
    writeln!(out, "{BANNER_INDENT}{}", report::display_date(today))?;
    writeln!(out, "{rule}")?;
    writeln!(out, "{text}")?;
    writeln!(out, "\nSaved → {}", markdown_path.display())?;
    if let Some(path) = pdf.path() {
        writeln!(out, "Saved → {}", path.display())?;
    }
    for path in backups {
        writeln!(out, "Backed up → {}", path.display())?;
    }
    Ok(())
}
