//! Font loading for the PDF renderer.
//!
//! genpdf embeds TrueType fonts and loads a family from four files named
//! `<Family>-Regular.ttf`, `-Bold`, `-Italic` and `-BoldItalic`. The résumé is typeset in
//! Roboto, searched in this order:
//!
//! 1. the directory configured through [`RenderOptions::with_fonts_dir`] or
//!    `RESUME_RENDER_FONTS_DIR`,
//! 2. `assets/fonts` next to the running executable,
//! 3. this crate's `assets/fonts`,
//! 4. the system Roboto packages.
//!
//! Liberation Sans, which follows the same file naming and ships with most Linux
//! distributions, is used when no Roboto directory is complete.

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use genpdf::error::Error;
use genpdf::fonts::{self, FontData, FontFamily};
use log::{debug, warn};

use crate::config::{RenderOptions, FONTS_DIR_ENV};

/// Name of the bundled font family.
pub const DEFAULT_FONT_FAMILY_NAME: &str = "Roboto";

const FALLBACK_FONT_FAMILY_NAME: &str = "LiberationSans";

const STYLE_SUFFIXES: [&str; 4] = ["Regular", "Bold", "Italic", "BoldItalic"];

const SYSTEM_ROBOTO_DIRS: &[&str] = &[
    "/usr/share/fonts/truetype/roboto/unhinted/RobotoTTF",
    "/usr/share/fonts/truetype/roboto/hinted",
    "/usr/share/fonts/google-roboto",
    "/usr/share/fonts/TTF",
];

const SYSTEM_LIBERATION_DIRS: &[&str] = &[
    "/usr/share/fonts/truetype/liberation",
    "/usr/share/fonts/truetype/liberation2",
    "/usr/share/fonts/liberation-sans",
    "/usr/share/fonts/TTF",
];

/// A directory expected to hold all four files of one family.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontSource {
    pub directory: PathBuf,
    pub family: &'static str,
}

impl FontSource {
    fn new(directory: impl Into<PathBuf>, family: &'static str) -> Self {
        Self {
            directory: directory.into(),
            family,
        }
    }

    fn file_paths(&self) -> impl Iterator<Item = PathBuf> + '_ {
        STYLE_SUFFIXES
            .iter()
            .map(move |suffix| self.directory.join(format!("{}-{}.ttf", self.family, suffix)))
    }

    fn missing_files(&self) -> Vec<PathBuf> {
        self.file_paths().filter(|path| !path.is_file()).collect()
    }

    fn is_fallback(&self) -> bool {
        self.family != DEFAULT_FONT_FAMILY_NAME
    }
}

/// Returns the `assets/fonts` directory of this crate.
pub fn bundled_fonts_source_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts")
}

/// Every place a font family is looked for, most specific first.
pub fn font_sources(options: &RenderOptions) -> Vec<FontSource> {
    let mut roboto_dirs: Vec<PathBuf> = options.fonts_dir().cloned().into_iter().collect();
    if let Some(bin_dir) = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        roboto_dirs.push(bin_dir.join("assets/fonts"));
    }
    roboto_dirs.push(bundled_fonts_source_dir());
    roboto_dirs.extend(SYSTEM_ROBOTO_DIRS.iter().map(PathBuf::from));

    let mut sources: Vec<FontSource> = Vec::new();
    let roboto = roboto_dirs
        .into_iter()
        .map(|dir| FontSource::new(dir, DEFAULT_FONT_FAMILY_NAME));
    let liberation = SYSTEM_LIBERATION_DIRS
        .iter()
        .map(|dir| FontSource::new(*dir, FALLBACK_FONT_FAMILY_NAME));
    for source in roboto.chain(liberation) {
        if !sources.contains(&source) {
            sources.push(source);
        }
    }
    sources
}

/// Picks the first source that holds a complete family.
///
/// The error lists every directory that was checked and what it lacked.
pub fn resolve_font_source(options: &RenderOptions) -> Result<FontSource, Error> {
    let mut attempts = Vec::new();
    for source in font_sources(options) {
        if !source.directory.is_dir() {
            attempts.push(format!("{} (directory missing)", source.directory.display()));
            continue;
        }
        let missing = source.missing_files();
        if missing.is_empty() {
            return Ok(source);
        }
        let names = missing
            .iter()
            .filter_map(|path| path.file_name())
            .map(|name| name.to_string_lossy())
            .collect::<Vec<_>>()
            .join(", ");
        attempts.push(format!("{} (missing {})", source.directory.display(), names));
    }

    Err(Error::new(
        format!(
            "Unable to locate the {} font family. Checked: {}. Set {}.",
            DEFAULT_FONT_FAMILY_NAME,
            attempts.join(", "),
            FONTS_DIR_ENV
        ),
        io::Error::new(io::ErrorKind::NotFound, "no complete font family found"),
    ))
}

/// Loads the résumé font family, falling back to Liberation Sans when Roboto is missing.
pub fn load_font_family(options: &RenderOptions) -> Result<FontFamily<FontData>, Error> {
    let source = resolve_font_source(options)?;
    if source.is_fallback() {
        warn!(
            "{} fonts unavailable; falling back to '{}' from {}",
            DEFAULT_FONT_FAMILY_NAME,
            source.family,
            source.directory.display()
        );
    } else {
        debug!("loading {} from {}", source.family, source.directory.display());
    }

    fonts::from_files(&source.directory, source.family, None).map_err(|err| {
        Error::new(
            format!(
                "Failed to load font family '{}' from {}: {}",
                source.family,
                source.directory.display(),
                err
            ),
            io::Error::new(io::ErrorKind::Other, err.to_string()),
        )
    })
}

/// Indicates whether a font family can be resolved with the given options.
pub fn fonts_available(options: &RenderOptions) -> bool {
    resolve_font_source(options).is_ok()
}
