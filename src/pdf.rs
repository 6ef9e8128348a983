//! Best-effort PDF copy of the Markdown report.
//!
//! Conversion goes through a [`PdfBackend`] so that "no PDF renderer on this
//! machine" is an ordinary [`PdfOutcome::Unavailable`] value rather than an
//! error. [`GenpdfBackend`] is the real renderer; [`DisabledPdf`] never renders.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{info, warn};
use thiserror::Error;

use crate::builder::{PdfBuildError, PdfBuilder};
use crate::fonts;
use crate::model::{Block, Cover, ReportDocument, RichParagraph, Section};
use crate::richtext::parse_markup_lossy;

/// What happened to the PDF copy of a report.
#[derive(Debug)]
pub enum PdfOutcome {
    Written(PathBuf),
    /// The renderer cannot run here; the reason is meant for the user.
    Unavailable(String),
    Failed(PdfError),
}

impl PdfOutcome {
    /// Path of the written PDF, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            PdfOutcome::Written(path) => Some(path),
            _ => None,
        }
    }
}

/// Failures of an available renderer.
#[derive(Debug, Error)]
pub enum PdfError {
    #[error(transparent)]
    Build(PdfBuildError),
    #[error("failed to write PDF {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Something that can turn report Markdown into a PDF file.
pub trait PdfBackend {
    /// Renders `markdown` to `path`. `title` is stored as document metadata.
    fn render(&self, markdown: &str, title: &str, path: &Path) -> PdfOutcome;
}

/// Renders PDFs with `genpdf`, using the fonts found by [`crate::fonts`].
#[derive(Clone, Copy, Debug, Default)]
pub struct GenpdfBackend;

impl PdfBackend for GenpdfBackend {
    fn render(&self, markdown: &str, title: &str, path: &Path) -> PdfOutcome {
        let builder = PdfBuilder::new(document_from_markdown(markdown))
            .with_title(title)
            .with_running_header(title);

        let pdf = match builder.render() {
            Ok(pdf) => pdf,
            Err(PdfBuildError::FontLoad(err)) if fonts::fonts_missing(&err) => {
                return PdfOutcome::Unavailable(err.to_string());
            }
            Err(err) => return PdfOutcome::Failed(PdfError::Build(err)),
        };

        if let Err(source) = fs::write(path, &pdf.bytes) {
            if path.exists() {
                if let Err(remove_err) = fs::remove_file(path) {
                    warn!("Failed to remove partial PDF {}: {remove_err}", path.display());
                }
            }
            return PdfOutcome::Failed(PdfError::Write {
                path: path.to_path_buf(),
                source,
            });
        }

        info!("Wrote {} ({} bytes)", path.display(), pdf.bytes.len());
        PdfOutcome::Written(path.to_path_buf())
    }
}

/// Backend used when PDF output is switched off.
#[derive(Clone, Debug)]
pub struct DisabledPdf {
    reason: String,
}

impl DisabledPdf {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl PdfBackend for DisabledPdf {
    fn render(&self, _markdown: &str, _title: &str, _path: &Path) -> PdfOutcome {
        PdfOutcome::Unavailable(self.reason.clone())
    }
}

/// Maps report Markdown onto the document model.
///
/// `# ` starts the cover title, `### ` opens a section, consecutive `- ` lines
/// form one bullet list, `---` breaks the page and any other non-blank line is
/// a paragraph. Lines before the first section belong to the cover.
pub fn document_from_markdown(markdown: &str) -> ReportDocument {
    let mut title: Option<String> = None;
    let mut cover_blocks: Vec<Block> = Vec::new();
    let mut sections: Vec<Section> = Vec::new();
    let mut bullets: Vec<RichParagraph> = Vec::new();

    fn push(cover_blocks: &mut Vec<Block>, sections: &mut [Section], block: Block) {
        match sections.last_mut() {
            Some(section) => section.push_block(block),
            None => cover_blocks.push(block),
        }
    }

    for raw in markdown.lines() {
        let line = raw.trim_end();

        if let Some(item) = line.strip_prefix("- ") {
            bullets.push(RichParagraph::new(parse_markup_lossy(item.trim())));
            continue;
        }
        if !bullets.is_empty() {
            let list = Block::bullet_list(std::mem::take(&mut bullets));
            push(&mut cover_blocks, &mut sections, list);
        }

        if line.trim().is_empty() {
            continue;
        }

        if line.trim() == "---" {
            push(&mut cover_blocks, &mut sections, Block::PageBreak);
        } else if let Some(heading) = line.strip_prefix("### ") {
            sections.push(Section::new(heading.trim()));
        } else if let Some(heading) = line.strip_prefix("# ") {
            if title.is_none() && sections.is_empty() {
                title = Some(heading.trim().to_string());
            } else {
                sections.push(Section::new(heading.trim()));
            }
        } else {
            let paragraph = Block::paragraph(parse_markup_lossy(line.trim()));
            push(&mut cover_blocks, &mut sections, paragraph);
        }
    }

    if !bullets.is_empty() {
        push(&mut cover_blocks, &mut sections, Block::bullet_list(bullets));
    }

    ReportDocument {
        cover: Cover::new(title.unwrap_or_default()).with_blocks(cover_blocks),
        sections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::mock::MockRecord;
    use crate::report;
    use chrono::NaiveDate;

    fn sample_markdown(language: &str) -> String {
        let config = Config {
            language: language.to_string(),
            ..Config::default()
        };
        let record = MockRecord {
            statement: "Accuses US destabilization",
            risk_level: 8.9,
            sentiment_percent: 91,
            counter_points: 7,
            alignment_score: 0.931,
        };
        report::render(
            &config,
            &record,
            NaiveDate::from_ymd_opt(2026, 10, 18).expect("valid date"),
        )
    }

    #[test]
    fn english_report_maps_to_cover_and_section() {
        let document = document_from_markdown(&sample_markdown("en"));

        assert_eq!(
            document.cover.title(),
            "Zaw Min Tun Counter-Report – 18 October 2026"
        );
        assert_eq!(document.cover.blocks().len(), 2);
        match &document.cover.blocks()[0] {
            Block::Paragraph(p) => {
                assert_eq!(p.plain_text(), "Author: U Ingar SOE + Grok");
                assert!(p.spans()[0].is_bold());
            }
            other => panic!("unexpected block {other:?}"),
        }

        assert_eq!(document.sections.len(), 1);
        let section = &document.sections[0];
        assert_eq!(section.title(), "Today's Zaw Min Tun Team Flags");
        assert_eq!(section.blocks().len(), 3);
        match &section.blocks()[0] {
            Block::BulletList(items) => {
                assert_eq!(items.len(), 5);
                assert_eq!(
                    items[1].plain_text(),
                    "Team Impunity Risk Level → 8.9/10"
                );
            }
            other => panic!("unexpected block {other:?}"),
        }
    }

    #[test]
    fn burmese_report_keeps_the_same_shape() {
        let document = document_from_markdown(&sample_markdown("my"));
        assert!(document.cover.title().starts_with("ဇော်မင်း ထွန်း"));
        assert_eq!(document.sections.len(), 1);
        assert_eq!(document.sections[0].blocks().len(), 3);
    }

    #[test]
    fn trailing_list_is_flushed() {
        let document = document_from_markdown("# T\n### S\n- a\n- **b**");
        match &document.sections[0].blocks()[0] {
            Block::BulletList(items) => {
                assert_eq!(items.len(), 2);
                assert!(items[1].spans()[0].is_bold());
            }
            other => panic!("unexpected block {other:?}"),
        }
    }

    #[test]
    fn horizontal_rule_breaks_the_page() {
        let document = document_from_markdown("# T\nintro\n---\n### S\ntext");
        assert_eq!(document.cover.blocks().len(), 2);
        assert_eq!(document.cover.blocks()[1], Block::PageBreak);
        assert_eq!(document.sections[0].title(), "S");
    }

    #[test]
    fn disabled_backend_reports_unavailable_and_writes_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("report.pdf");
        let outcome = DisabledPdf::new("turned off").render("# T", "T", &path);
        assert!(matches!(outcome, PdfOutcome::Unavailable(ref reason) if reason == "turned off"));
        assert!(outcome.path().is_none());
        assert!(!path.exists());
    }
}
