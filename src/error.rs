//! Error types shared by the model boundary and the two renderers.

use thiserror::Error;

/// Errors produced while turning external input into an [`OptimizedResume`].
///
/// [`OptimizedResume`]: crate::model::OptimizedResume
#[derive(Debug, Error)]
pub enum ModelError {
    /// The input was not valid JSON or did not match the résumé schema.
    #[error("résumé JSON does not match the expected schema: {0}")]
    Json(#[from] serde_json::Error),
    /// Reading the input failed.
    #[error("failed to read résumé input: {0}")]
    Io(#[from] std::io::Error),
    /// The JSON parsed but an entry is structurally unusable.
    #[error("invalid résumé entry at {path}: {reason}")]
    Invalid {
        /// Field path of the offending entry, e.g. `experience[2]`.
        path: String,
        /// Human-readable description of the problem.
        reason: String,
    },
}

impl ModelError {
    pub(crate) fn invalid(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Errors that can occur while adding fills and link annotations to a rendered PDF.
#[derive(Debug, Error)]
pub enum OverlayError {
    /// The PDF bytes could not be parsed or written by `lopdf`.
    #[error("failed to process PDF bytes: {0}")]
    Parse(#[from] lopdf::Error),
    /// Writing the annotated document failed.
    #[error("failed to write the finished PDF: {0}")]
    Io(#[from] std::io::Error),
    /// A fill or link region refers to a page the rendered document does not have.
    #[error("overlay refers to missing page {page}")]
    MissingPage {
        /// The requested (1-indexed) page number.
        page: usize,
    },
    /// The page object could not be edited as a dictionary.
    #[error("page {page} is not a dictionary")]
    InvalidPage {
        /// The (1-indexed) page number.
        page: usize,
    },
}

/// Errors returned by [`render_pdf`](crate::pdf::render_pdf) and
/// [`render_docx`](crate::docx::render_docx).
#[derive(Debug, Error)]
pub enum RenderError {
    /// No usable font family could be loaded for the PDF path.
    #[error("failed to load fonts: {0}")]
    FontLoad(#[source] genpdf::error::Error),
    /// genpdf failed while laying out or serializing the document.
    #[error("failed to render PDF: {0}")]
    Pdf(#[source] genpdf::error::Error),
    /// Fills or link annotations could not be added to the rendered PDF.
    #[error("failed to finish PDF page overlay: {0}")]
    Overlay(#[from] OverlayError),
    /// The DOCX package could not be written.
    #[error("failed to write DOCX package: {0}")]
    Docx(String),
}
