//! Visual tokens shared by the PDF and DOCX renderers.
//!
//! Both output formats read colors, proportions, type sizes, glyphs and content budgets from
//! here so that the same résumé looks the same in either format.

/// An opaque RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Returns the lowercase `rrggbb` form used by word-processor markup.
    pub fn hex(self) -> String {
        format!("{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    /// Composites `self` at the given opacity over an opaque `background`.
    pub const fn over(self, background: Rgb, alpha_percent: u16) -> Rgb {
        const fn mix(fg: u8, bg: u8, alpha: u16) -> u8 {
            ((fg as u16 * alpha + bg as u16 * (100 - alpha) + 50) / 100) as u8
        }
        Rgb(
            mix(self.0, background.0, alpha_percent),
            mix(self.1, background.1, alpha_percent),
            mix(self.2, background.2, alpha_percent),
        )
    }
}

/// Color palette.
pub mod palette {
    use super::Rgb;

    /// Deep navy; sidebar background and role titles.
    pub const PRIMARY: Rgb = Rgb(0x0f, 0x17, 0x2a);
    /// Royal blue; main-column headings, company names, bullets.
    pub const SECONDARY: Rgb = Rgb(0x1e, 0x40, 0xaf);
    /// Sky blue; sidebar headings, links, subtitle.
    pub const ACCENT: Rgb = Rgb(0x0e, 0xa5, 0xe9);
    /// Amber; achievement stars.
    pub const HIGHLIGHT: Rgb = Rgb(0xf5, 0x9e, 0x0b);
    /// Emerald.
    pub const SUCCESS: Rgb = Rgb(0x10, 0xb9, 0x81);
    /// Dark slate body text.
    pub const TEXT: Rgb = Rgb(0x1e, 0x29, 0x3b);
    /// Medium slate for meta lines.
    pub const TEXT_LIGHT: Rgb = Rgb(0x47, 0x55, 0x69);
    pub const WHITE: Rgb = Rgb(0xff, 0xff, 0xff);

    /// Contact labels and education dates on the sidebar.
    pub const MUTED: Rgb = Rgb(0x94, 0xa3, 0xb8);
    /// Project descriptions on the sidebar.
    pub const SOFT: Rgb = Rgb(0xcb, 0xd5, 0xe1);
    /// Skill tag fill: accent at 30 % over the sidebar background.
    pub const TAG_FILL: Rgb = ACCENT.over(PRIMARY, 30);
}

/// Column proportions, in percent of the usable width.
pub mod layout {
    /// The main column takes the remaining width.
    pub const SIDEBAR_PERCENT: u8 = 32;

    /// A4 paper in millimetres.
    pub const PAGE_WIDTH_MM: f64 = 210.0;
    pub const PAGE_HEIGHT_MM: f64 = 297.0;

    /// Inner padding of the PDF columns in millimetres.
    pub const SIDEBAR_PADDING_V_MM: f64 = 4.2;
    pub const SIDEBAR_PADDING_H_MM: f64 = 3.5;
    pub const MAIN_PADDING_V_MM: f64 = 4.2;
    pub const MAIN_PADDING_H_MM: f64 = 5.6;

    /// Indentation of bullet lines in the main column, in millimetres.
    pub const BULLET_INDENT_MM: f64 = 2.8;

    /// DOCX page margins (0.3 in) and bullet indent (0.15 in), in twips.
    pub const DOCX_PAGE_MARGIN_TWIPS: i32 = 432;
    pub const DOCX_BULLET_INDENT_TWIPS: i32 = 216;
    /// A4 in twips.
    pub const DOCX_PAGE_WIDTH_TWIPS: u32 = 11_906;
    pub const DOCX_PAGE_HEIGHT_TWIPS: u32 = 16_838;
}

/// Type scale in points. DOCX sizes are derived with [`half_points`].
pub mod size {
    pub const NAME: u8 = 14;
    pub const SUBTITLE: u8 = 8;
    pub const SIDEBAR_HEADING: u8 = 9;
    pub const MAIN_HEADING: u8 = 11;
    pub const CONTACT_LABEL: u8 = 6;
    pub const CONTACT_VALUE: u8 = 7;
    pub const SKILL_TAG: u8 = 7;
    pub const DEGREE: u8 = 8;
    pub const INSTITUTION: u8 = 7;
    pub const SIDEBAR_META: u8 = 6;
    pub const PROJECT_NAME: u8 = 8;
    pub const PROJECT_DETAIL: u8 = 7;
    pub const SIDEBAR_ITEM: u8 = 7;
    pub const ROLE: u8 = 10;
    pub const COMPANY: u8 = 9;
    pub const EXPERIENCE_META: u8 = 8;
    pub const BODY: u8 = 9;

    /// Converts a point size into the half-point unit used by word-processor markup.
    pub const fn half_points(points: u8) -> usize {
        points as usize * 2
    }
}

/// Glyphs shared by both formats.
pub mod glyph {
    pub const EXPERIENCE_BULLET: &str = "▸";
    pub const ACHIEVEMENT_STAR: &str = "★";
    pub const LIST_BULLET: &str = "▪";
    pub const SEPARATOR: &str = "•";
}

/// Content budgets.
pub mod budget {
    /// Characters of a project description kept in the sidebar.
    pub const PROJECT_DESCRIPTION_CHARS: usize = 90;
    pub const ELLIPSIS: &str = "...";
    /// Tech stack entries shown per project.
    pub const TECH_STACK_ENTRIES: usize = 5;
    /// Characters of a linkedin/website URL shown as link text.
    pub const LINK_DISPLAY_CHARS: usize = 30;
}

/// Font family requested from word processors.
pub const DOCX_FONT: &str = "Arial";
