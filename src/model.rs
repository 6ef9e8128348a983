//! Data structures describing the logical content of a rendered report.
//!
//! The types in this module mirror the building blocks the PDF builder feeds
//! into `genpdf`, without referencing the rendering crate directly. The
//! Markdown converter in [`crate::pdf`] produces them and
//! [`crate::builder::PdfBuilder`] turns them into pages.

use crate::richtext::Span;

/// Left-aligned paragraph made of inline styled spans.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RichParagraph {
    spans: Vec<Span>,
}

impl RichParagraph {
    pub fn new(spans: impl Into<Vec<Span>>) -> Self {
        Self {
            spans: spans.into(),
        }
    }

    /// Returns the spans that make up the paragraph.
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Concatenated text of all spans, without styling.
    pub fn plain_text(&self) -> String {
        self.spans.iter().map(Span::text).collect()
    }
}

/// Individual content blocks that make up sections and the cover.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Block {
    /// Styled paragraph content.
    Paragraph(RichParagraph),
    /// Bulleted list, one paragraph per item.
    BulletList(Vec<RichParagraph>),
    /// Explicit page break request.
    PageBreak,
}

impl Block {
    /// Convenience helper for building a paragraph block.
    pub fn paragraph(spans: impl Into<Vec<Span>>) -> Self {
        Self::Paragraph(RichParagraph::new(spans))
    }

    /// Convenience helper for building a bullet list block.
    pub fn bullet_list<I>(items: I) -> Self
    where
        I: IntoIterator<Item = RichParagraph>,
    {
        Self::BulletList(items.into_iter().collect())
    }
}

/// Title and opening blocks shown at the top of the first page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cover {
    title: String,
    blocks: Vec<Block>,
}

impl Cover {
    /// Creates a new cover with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            blocks: Vec::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Extends the cover with multiple blocks and returns the updated instance.
    pub fn with_blocks<I>(mut self, blocks: I) -> Self
    where
        I: IntoIterator<Item = Block>,
    {
        self.blocks.extend(blocks);
        self
    }
}

/// Logical representation of a document section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Section {
    title: String,
    blocks: Vec<Block>,
}

impl Section {
    /// Creates a new section with the provided title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            blocks: Vec::new(),
        }
    }

    /// Returns the title of the section.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the blocks contained in the section.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub(crate) fn push_block(&mut self, block: Block) {
        self.blocks.push(block);
    }
}

/// A whole report: cover plus ordered sections.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportDocument {
    pub cover: Cover,
    pub sections: Vec<Section>,
}
