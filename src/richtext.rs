//! Inline emphasis parsing for report lines.
//!
//! The report is Markdown, but the PDF renderer only needs the inline emphasis
//! it uses: `**bold**` and `*italic*`. This module turns a line into a list of
//! [`Span`]s which the builder converts into [`genpdf`] styled strings.
//!
//! [genpdf]: https://docs.rs/genpdf/

use genpdf::style::{Style, StyledString};
use thiserror::Error;

/// A slice of text together with inline style attributes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Span {
    text: String,
    bold: bool,
    italic: bool,
}

impl Span {
    /// Creates a new span with the provided text and no styles applied.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Returns the raw text contained in this span.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_bold(&self) -> bool {
        self.bold
    }

    pub fn is_italic(&self) -> bool {
        self.italic
    }

    /// Convenience shorthand that marks the span as bold.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Convenience shorthand that marks the span as italic.
    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    fn to_style(&self) -> Style {
        let mut style = Style::new();
        if self.bold {
            style.set_bold();
        }
        if self.italic {
            style.set_italic();
        }
        style
    }

    /// Converts the span into a [`StyledString`] for `genpdf` paragraphs.
    pub fn to_styled_string(&self) -> StyledString {
        StyledString::new(self.text.clone(), self.to_style())
    }
}

/// Parse errors produced by [`parse_markup`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{message} (at byte {index})")]
pub struct ParseError {
    index: usize,
    message: String,
}

impl ParseError {
    fn new(index: usize, message: impl Into<String>) -> Self {
        Self {
            index,
            message: message.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct StyleState {
    bold: bool,
    italic: bool,
}

impl StyleState {
    fn to_span(self, text: impl Into<String>) -> Span {
        Span {
            text: text.into(),
            bold: self.bold,
            italic: self.italic,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Marker {
    Bold,
    Italic,
}

impl Marker {
    fn token(self) -> &'static str {
        match self {
            Marker::Bold => "**",
            Marker::Italic => "*",
        }
    }

    fn description(self) -> &'static str {
        match self {
            Marker::Bold => "bold span",
            Marker::Italic => "italic span",
        }
    }
}

/// Parses `**bold**` and `*italic*` emphasis into a list of [`Span`]s.
///
/// Emphasis may nest (`**very *cool***`). Unterminated markers are reported as
/// [`ParseError`] with the byte position where input ran out.
pub fn parse_markup(input: &str) -> Result<Vec<Span>, ParseError> {
    let (spans, _) = parse_inner(input, 0, StyleState::default(), None)?;
    Ok(spans)
}

/// Like [`parse_markup`], but falls back to a single plain span when the line
/// does not parse, so stray asterisks are printed as written.
pub fn parse_markup_lossy(input: &str) -> Vec<Span> {
    parse_markup(input).unwrap_or_else(|err| {
        log::debug!("Rendering line literally: {err}");
        vec![Span::new(input)]
    })
}

fn parse_inner(
    input: &str,
    mut index: usize,
    state: StyleState,
    closing: Option<Marker>,
) -> Result<(Vec<Span>, usize), ParseError> {
    let mut spans = Vec::new();
    let mut buffer = String::new();

    while index < input.len() {
        let rest = &input[index..];

        if let Some(marker) = closing {
            // A closing `*` must not swallow the first half of a `**` opener.
            let closes = match marker {
                Marker::Bold => rest.starts_with("**"),
                Marker::Italic => rest.starts_with('*') && !starts_nested_bold(rest, state),
            };
            if closes {
                flush_buffer(&mut buffer, &mut spans, state);
                return Ok((spans, index + marker.token().len()));
            }
        }

        let opener = if rest.starts_with("**") && !state.bold {
            Some(Marker::Bold)
        } else if rest.starts_with('*') && !state.italic {
            Some(Marker::Italic)
        } else {
            None
        };

        if let Some(marker) = opener {
            flush_buffer(&mut buffer, &mut spans, state);
            let mut nested_state = state;
            match marker {
                Marker::Bold => nested_state.bold = true,
                Marker::Italic => nested_state.italic = true,
            }
            let (nested, next) = parse_inner(
                input,
                index + marker.token().len(),
                nested_state,
                Some(marker),
            )?;
            spans.extend(nested);
            index = next;
            continue;
        }

        let Some(ch) = rest.chars().next() else {
            break;
        };
        buffer.push(ch);
        index += ch.len_utf8();
    }

    if let Some(marker) = closing {
        Err(ParseError::new(
            index,
            format!("unterminated {}", marker.description()),
        ))
    } else {
        flush_buffer(&mut buffer, &mut spans, state);
        Ok((spans, index))
    }
}

fn starts_nested_bold(rest: &str, state: StyleState) -> bool {
    !state.bold && rest.starts_with("**") && !rest.starts_with("***")
}

fn flush_buffer(buffer: &mut String, spans: &mut Vec<Span>, state: StyleState) {
    if buffer.is_empty() {
        return;
    }
    spans.push(state.to_span(std::mem::take(buffer)));
}
