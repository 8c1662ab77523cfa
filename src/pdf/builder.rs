//! Construction of `genpdf::Document` instances configured for the résumé page.

use genpdf::error::Error;
use genpdf::{Document, Size};

use crate::config::RenderOptions;
use crate::fonts;
use crate::style::layout;

/// Builder for `genpdf::Document` instances pre-configured with the renderer defaults.
///
/// Documents are A4 with no page margins: the two-column page paints edge to edge and
/// applies its own padding.
pub struct DocumentBuilder {
    paper_size: Size,
    title: Option<String>,
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self {
            paper_size: Size::new(layout::PAGE_WIDTH_MM, layout::PAGE_HEIGHT_MM),
            title: None,
        }
    }
}

impl DocumentBuilder {
    /// Creates a new builder instance with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the document title metadata.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Loads the font family and builds the document.
    pub fn build(self, options: &RenderOptions) -> Result<Document, Error> {
        let font_family = fonts::load_font_family(options)?;
        let mut document = Document::new(font_family);
        document.set_paper_size(self.paper_size);
        document.set_minimal_conformance();
        if let Some(title) = self.title {
            document.set_title(title);
        }
        Ok(document)
    }
}
