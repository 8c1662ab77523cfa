//! Styled text fragments shared by the render plan and both output formats.
//!
//! A [`Span`] carries the inline attributes the résumé layout needs (size, color, bold and
//! underline) expressed in the shared style tokens. The PDF path turns spans into
//! [`genpdf::style::StyledString`]s, the DOCX path into [`docx_rs::Run`]s, so both formats
//! read the exact same attributes.

use docx_rs::{Run, RunFonts};
use genpdf::style::{Color, Style, StyledString};

use crate::style::{self, Rgb};

/// A slice of text together with inline style attributes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Span {
    text: String,
    size: u8,
    color: Rgb,
    bold: bool,
    underline: bool,
}

impl Span {
    /// Creates a regular-weight span with the given point size and color.
    pub fn new(text: impl Into<String>, size: u8, color: Rgb) -> Self {
        Self {
            text: text.into(),
            size,
            color,
            bold: false,
            underline: false,
        }
    }

    /// Returns the raw text contained in this span.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the font size in points.
    pub fn size(&self) -> u8 {
        self.size
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn is_bold(&self) -> bool {
        self.bold
    }

    pub fn is_underlined(&self) -> bool {
        self.underline
    }

    /// Marks the span as bold.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Marks the span as underlined.
    pub fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    /// Replaces the text while keeping the style attributes.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Builds the genpdf [`Style`] representation for the span.
    ///
    /// The underline flag has no genpdf counterpart and is dropped here; the PDF elements read
    /// it from the span directly.
    pub fn to_style(&self) -> Style {
        let mut style = Style::new();
        let Rgb(r, g, b) = self.color;
        style.set_color(Color::Rgb(r, g, b));
        style.set_font_size(self.size);
        if self.bold {
            style.set_bold();
        }
        style
    }

    /// Converts the span to a genpdf [`StyledString`].
    pub fn to_styled_string(&self) -> StyledString {
        StyledString::new(self.text.clone(), self.to_style())
    }

    /// Converts the span to a DOCX run using half-point sizes.
    pub fn to_run(&self) -> Run {
        let fonts = RunFonts::new()
            .ascii(style::DOCX_FONT)
            .hi_ansi(style::DOCX_FONT)
            .cs(style::DOCX_FONT);
        let mut run = Run::new()
            .add_text(self.text.as_str())
            .size(style::size::half_points(self.size))
            .color(self.color.hex())
            .fonts(fonts);
        if self.bold {
            run = run.bold();
        }
        if self.underline {
            run = run.underline("single");
        }
        run
    }
}

/// Concatenates the text of a sequence of spans.
pub fn plain_text<'a, I>(spans: I) -> String
where
    I: IntoIterator<Item = &'a Span>,
{
    spans.into_iter().map(Span::text).collect()
}
