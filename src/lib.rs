//! Two-column résumé rendering to PDF and DOCX.
//!
//! An [`OptimizedResume`] is parsed from JSON, turned into a format-neutral [`ResumePlan`],
//! and rendered either with genpdf ([`render_pdf`]) or docx-rs ([`render_docx`]). Both
//! documents share the same palette, section order and text budgets.
//!
//! ```no_run
//! use resume_render::{render_docx, render_pdf, OptimizedResume};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let resume = OptimizedResume::from_json(r#"{"fullName":"Jane Doe"}"#)?;
//! std::fs::write("resume.pdf", render_pdf(&resume)?)?;
//! std::fs::write("resume.docx", render_docx(&resume)?)?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod docx;
pub mod error;
pub mod fonts;
pub mod model;
pub mod pdf;
pub mod plan;
pub mod richtext;
pub mod style;

pub use config::RenderOptions;
pub use docx::{render_docx, DocxRenderer};
pub use error::{ModelError, OverlayError, RenderError};
pub use model::OptimizedResume;
pub use pdf::{render_pdf, PdfRenderer, RenderedPdf};
pub use plan::ResumePlan;
