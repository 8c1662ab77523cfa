//! Render options and their environment-variable sources.

use std::env;
use std::path::PathBuf;

/// Environment variable pointing at a directory with the bundled Roboto files.
pub const FONTS_DIR_ENV: &str = "RESUME_RENDER_FONTS_DIR";

/// Options consumed by the PDF renderer.
///
/// The DOCX renderer needs no configuration: word processors resolve fonts themselves.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderOptions {
    fonts_dir: Option<PathBuf>,
    title: Option<String>,
}

impl RenderOptions {
    /// Creates options with no overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads [`FONTS_DIR_ENV`]. An empty value is ignored.
    pub fn from_env() -> Self {
        Self {
            fonts_dir: env_path(FONTS_DIR_ENV),
            title: None,
        }
    }

    /// Directory searched first for the bundled font family.
    pub fn fonts_dir(&self) -> Option<&PathBuf> {
        self.fonts_dir.as_ref()
    }

    /// Title metadata override; defaults to the résumé's display name.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Sets the font directory and returns the updated options.
    pub fn with_fonts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fonts_dir = Some(dir.into());
        self
    }

    /// Sets the document title and returns the updated options.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

fn env_path(var: &str) -> Option<PathBuf> {
    env::var_os(var).and_then(|value| {
        let path = PathBuf::from(value);
        if path.as_os_str().is_empty() {
            None
        } else {
            Some(path)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_overrides() {
        let options = RenderOptions::new()
            .with_fonts_dir("/opt/fonts")
            .with_title("Jane Doe");
        assert_eq!(options.fonts_dir(), Some(&PathBuf::from("/opt/fonts")));
        assert_eq!(options.title(), Some("Jane Doe"));
        assert_eq!(RenderOptions::new().fonts_dir(), None);
    }
}
