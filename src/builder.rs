//! Document construction on top of `genpdf`.
//!
//! [`DocumentBuilder`] prepares an empty `genpdf::Document` (fonts, paper,
//! margins, running header and footer). [`PdfBuilder`] fills it with a
//! [`ReportDocument`] and renders the bytes.

use genpdf::elements::{Break, PageBreak, Paragraph, UnorderedList};
use genpdf::error::{Error, ErrorKind};
use genpdf::fonts::{FontData, FontFamily};
use genpdf::style::{self, Style};
use genpdf::{self, Alignment, Element, Margins, Mm, PageDecorator, PaperSize, Position};
use thiserror::Error as ThisError;

use crate::fonts;
use crate::model::{Block, ReportDocument, RichParagraph};

const DEFAULT_MARGIN_MM: f64 = 18.0;
const FOOTER_HEIGHT_MM: f64 = 8.0;
const BODY_FONT_SIZE: u8 = 11;
const TITLE_FONT_SIZE: u8 = 18;
const SECTION_FONT_SIZE: u8 = 14;
const RUNNING_FONT_SIZE: u8 = 8;

fn mm_from_f64(value: f64) -> Mm {
    Mm::from(printpdf::Mm(value))
}

type ElementFactory = dyn Fn(usize) -> Box<dyn Element>;

/// Builder for `genpdf::Document` instances pre-configured with the crate defaults.
#[derive(Default)]
pub struct DocumentBuilder {
    title: Option<String>,
    margins: Option<Margins>,
    header: Option<Box<ElementFactory>>,
    footer: Option<FooterSpec>,
}

impl DocumentBuilder {
    /// Creates a new builder instance with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the title stored in the PDF metadata.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the margins applied through the page decorator.
    pub fn with_margins(mut self, margins: impl Into<Margins>) -> Self {
        self.margins = Some(margins.into());
        self
    }

    /// Configures a header callback that is invoked for every page.
    pub fn with_header<F, E>(mut self, header: F) -> Self
    where
        F: Fn(usize) -> E + 'static,
        E: Element + 'static,
    {
        self.header = Some(Box::new(move |page| {
            Box::new(header(page)) as Box<dyn Element>
        }));
        self
    }

    /// Configures a footer callback with a fixed height that is invoked for every page.
    pub fn with_footer<F, E>(mut self, height: impl Into<Mm>, footer: F) -> Self
    where
        F: Fn(usize) -> E + 'static,
        E: Element + 'static,
    {
        self.footer = Some(FooterSpec::new(height, footer));
        self
    }

    /// Builds a configured A4 document using `font_family`.
    pub fn build(self, font_family: FontFamily<FontData>) -> genpdf::Document {
        let mut document = genpdf::Document::new(font_family);
        document.set_paper_size(PaperSize::A4);
        document.set_font_size(BODY_FONT_SIZE);
        if let Some(title) = self.title {
            document.set_title(title);
        }

        let decorator = ConfiguredPageDecorator::new(self.margins, self.header, self.footer);
        document.set_page_decorator(decorator);
        document
    }
}

/// Definition of a footer rendered through the page decorator.
pub struct FooterSpec {
    height: Mm,
    factory: Box<ElementFactory>,
}

impl FooterSpec {
    /// Creates a new footer specification.
    pub fn new<F, E>(height: impl Into<Mm>, factory: F) -> Self
    where
        F: Fn(usize) -> E + 'static,
        E: Element + 'static,
    {
        Self {
            height: height.into(),
            factory: Box::new(move |page| Box::new(factory(page)) as Box<dyn Element>),
        }
    }
}

struct ConfiguredPageDecorator {
    page: usize,
    margins: Option<Margins>,
    header: Option<Box<ElementFactory>>,
    footer: Option<FooterSpec>,
}

impl ConfiguredPageDecorator {
    fn new(
        margins: Option<Margins>,
        header: Option<Box<ElementFactory>>,
        footer: Option<FooterSpec>,
    ) -> Self {
        Self {
            page: 0,
            margins,
            header,
            footer,
        }
    }
}

impl PageDecorator for ConfiguredPageDecorator {
    fn decorate_page<'a>(
        &mut self,
        context: &genpdf::Context,
        mut area: genpdf::render::Area<'a>,
        style: style::Style,
    ) -> Result<genpdf::render::Area<'a>, Error> {
        self.page += 1;

        if let Some(margins) = self.margins {
            area.add_margins(margins);
        }

        if let Some(header_cb) = &self.header {
            let mut element = header_cb(self.page);
            let result = element.render(context, area.clone(), style)?;
            area.add_offset(Position::new(0, result.size.height));
        }

        if let Some(footer) = &self.footer {
            let available = area.size().height;
            if footer.height > available {
                return Err(Error::new(
                    "Footer height exceeds available space",
                    ErrorKind::InvalidData,
                ));
            }

            let mut footer_area = area.clone();
            footer_area.add_offset(Position::new(0, available - footer.height));
            let mut element = (footer.factory)(self.page);
            let result = element.render(context, footer_area, style)?;
            if result.has_more {
                return Err(Error::new(
                    "Footer element does not fit into the reserved space",
                    ErrorKind::PageSizeExceeded,
                ));
            }

            area.set_height(available - footer.height);
        }

        Ok(area)
    }
}

/// Errors raised while turning a [`ReportDocument`] into PDF bytes.
#[derive(Debug, ThisError)]
pub enum PdfBuildError {
    /// No usable font family could be loaded.
    #[error("failed to load fonts: {0}")]
    FontLoad(#[source] Error),
    #[error("failed to render PDF: {0}")]
    Render(#[source] Error),
}

/// Rendered PDF output.
#[derive(Clone, Debug)]
pub struct RenderedPdf {
    pub bytes: Vec<u8>,
}

/// Renders a [`ReportDocument`] with the crate's page layout.
pub struct PdfBuilder {
    document: ReportDocument,
    title: Option<String>,
    running_header: Option<String>,
}

impl PdfBuilder {
    pub fn new(document: ReportDocument) -> Self {
        Self {
            document,
            title: None,
            running_header: None,
        }
    }

    /// Sets the PDF metadata title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Prints `text` in small type at the top of every page.
    pub fn with_running_header(mut self, text: impl Into<String>) -> Self {
        self.running_header = Some(text.into());
        self
    }

    /// Loads the default fonts and renders the document.
    pub fn render(self) -> Result<RenderedPdf, PdfBuildError> {
        let font_family = fonts::default_font_family().map_err(PdfBuildError::FontLoad)?;
        self.render_with_fonts(font_family)
    }

    /// Renders the document with an explicitly provided font family.
    pub fn render_with_fonts(
        self,
        font_family: FontFamily<FontData>,
    ) -> Result<RenderedPdf, PdfBuildError> {
        let margin = mm_from_f64(DEFAULT_MARGIN_MM);
        let mut builder = DocumentBuilder::new()
            .with_margins(Margins::trbl(margin, margin, margin, margin))
            .with_footer(mm_from_f64(FOOTER_HEIGHT_MM), |page| {
                Paragraph::new(format!("{page}"))
                    .aligned(Alignment::Center)
                    .styled(Style::new().with_font_size(RUNNING_FONT_SIZE))
            });
        if let Some(title) = self.title {
            builder = builder.with_title(title);
        }
        if let Some(text) = self.running_header {
            builder = builder.with_header(move |_| {
                Paragraph::new(text.clone())
                    .aligned(Alignment::Right)
                    .styled(Style::new().with_font_size(RUNNING_FONT_SIZE))
            });
        }

        let mut document = builder.build(font_family);
        push_content(&mut document, &self.document);

        let mut bytes = Vec::new();
        document.render(&mut bytes).map_err(PdfBuildError::Render)?;
        Ok(RenderedPdf { bytes })
    }
}

fn push_content(document: &mut genpdf::Document, report: &ReportDocument) {
    document.push(
        Paragraph::new(report.cover.title())
            .styled(Style::new().bold().with_font_size(TITLE_FONT_SIZE)),
    );
    document.push(Break::new(1.0));
    for block in report.cover.blocks() {
        push_block(document, block);
    }

    for section in &report.sections {
        document.push(Break::new(1.0));
        document.push(
            Paragraph::new(section.title())
                .styled(Style::new().bold().with_font_size(SECTION_FONT_SIZE)),
        );
        document.push(Break::new(0.5));
        for block in section.blocks() {
            push_block(document, block);
        }
    }
}

fn push_block(document: &mut genpdf::Document, block: &Block) {
    match block {
        Block::Paragraph(paragraph) => {
            document.push(paragraph_element(paragraph));
            document.push(Break::new(0.5));
        }
        Block::BulletList(items) => {
            let mut list = UnorderedList::new();
            for item in items {
                list.push(paragraph_element(item));
            }
            document.push(list);
            document.push(Break::new(0.5));
        }
        Block::PageBreak => document.push(PageBreak::new()),
    }
}

fn paragraph_element(paragraph: &RichParagraph) -> Paragraph {
    let mut element = Paragraph::default();
    for span in paragraph.spans() {
        element.push(span.to_styled_string());
    }
    element
}
