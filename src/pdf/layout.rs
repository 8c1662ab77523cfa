//! Geometry recorded while the résumé page is laid out.
//!
//! genpdf only draws text and hairlines. Everything else the page needs (the sidebar band,
//! tag backgrounds, heading rules and link annotations) is recorded here in page coordinates
//! and added afterwards by [`overlay`](crate::pdf::overlay). The log also keeps the placement
//! of every block, which tells callers on which page and where each piece of content ended up.
//!
//! Elements do not know their absolute position on the page. The column that renders them
//! sets an anchor first; elements then record rectangles relative to that anchor.

use std::cell::RefCell;
use std::rc::Rc;

use crate::plan::Column;
use crate::style::Rgb;

/// A layout log shared between the page element and the elements it renders.
pub type SharedLayoutLog = Rc<RefCell<LayoutLog>>;

/// A rectangle in millimetres from the page's top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x_mm: f64,
    pub y_mm: f64,
    pub width_mm: f64,
    pub height_mm: f64,
}

impl Rect {
    pub fn new(x_mm: f64, y_mm: f64, width_mm: f64, height_mm: f64) -> Self {
        Self {
            x_mm,
            y_mm,
            width_mm,
            height_mm,
        }
    }

    /// Bottom edge measured from the top of the page.
    pub fn bottom_mm(&self) -> f64 {
        self.y_mm + self.height_mm
    }
}

/// A solid fill painted underneath the page content.
#[derive(Clone, Debug, PartialEq)]
pub struct FillRect {
    /// 1-indexed page number.
    pub page: usize,
    pub rect: Rect,
    pub color: Rgb,
}

/// A clickable rectangle.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkRegion {
    /// 1-indexed page number.
    pub page: usize,
    pub rect: Rect,
    /// Link target such as `mailto:jane@x.com` or `https://example.com`.
    pub target: String,
}

/// Where a block of the render plan was drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct Placement {
    /// 1-indexed page number.
    pub page: usize,
    pub column: Column,
    pub rect: Rect,
    /// Visible text of the block.
    pub text: String,
}

#[derive(Clone, Copy, Debug, Default)]
struct Anchor {
    page: usize,
    x_mm: f64,
    y_mm: f64,
}

/// Fills, links and placements recorded during one render.
#[derive(Debug, Default)]
pub struct LayoutLog {
    anchor: Anchor,
    fills: Vec<FillRect>,
    links: Vec<LinkRegion>,
    placements: Vec<Placement>,
}

impl LayoutLog {
    /// Creates an empty log behind a shared handle.
    pub fn shared() -> SharedLayoutLog {
        Rc::new(RefCell::new(Self::default()))
    }

    /// Moves the anchor that relative rectangles are measured from.
    pub(crate) fn anchor(&mut self, page: usize, x_mm: f64, y_mm: f64) {
        self.anchor = Anchor { page, x_mm, y_mm };
    }

    fn absolute(&self, dx_mm: f64, dy_mm: f64, width_mm: f64, height_mm: f64) -> Rect {
        Rect::new(
            self.anchor.x_mm + dx_mm,
            self.anchor.y_mm + dy_mm,
            width_mm,
            height_mm,
        )
    }

    /// Records a fill relative to the anchor.
    pub(crate) fn fill(
        &mut self,
        dx_mm: f64,
        dy_mm: f64,
        width_mm: f64,
        height_mm: f64,
        color: Rgb,
    ) {
        if width_mm <= 0.0 || height_mm <= 0.0 {
            return;
        }
        let rect = self.absolute(dx_mm, dy_mm, width_mm, height_mm);
        self.fills.push(FillRect {
            page: self.anchor.page,
            rect,
            color,
        });
    }

    /// Records a link rectangle relative to the anchor.
    pub(crate) fn link(
        &mut self,
        dx_mm: f64,
        dy_mm: f64,
        width_mm: f64,
        height_mm: f64,
        target: &str,
    ) {
        let rect = self.absolute(dx_mm, dy_mm, width_mm, height_mm);
        self.links.push(LinkRegion {
            page: self.anchor.page,
            rect,
            target: target.to_owned(),
        });
    }

    /// Records the placement of a block drawn at the anchor.
    pub(crate) fn place(&mut self, column: Column, width_mm: f64, height_mm: f64, text: &str) {
        let rect = self.absolute(0.0, 0.0, width_mm, height_mm);
        self.placements.push(Placement {
            page: self.anchor.page,
            column,
            rect,
            text: text.to_owned(),
        });
    }

    pub fn fills(&self) -> &[FillRect] {
        &self.fills
    }

    pub fn links(&self) -> &[LinkRegion] {
        &self.links
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Consumes the log and returns the block placements in drawing order.
    pub fn into_placements(self) -> Vec<Placement> {
        self.placements
    }
}
