//! PDF rendering with genpdf.
//!
//! The render plan is mapped onto the custom elements in [`elements`], genpdf writes the
//! document, and [`overlay::apply_overlay`] paints the fills and adds the link annotations
//! recorded in the [`layout::LayoutLog`] while the page was laid out.

pub mod builder;
pub mod elements;
pub mod layout;
pub mod overlay;

use std::rc::Rc;

use genpdf::elements::Paragraph as TextParagraph;
use genpdf::{Element, Margins};
use log::{debug, info};

use crate::config::RenderOptions;
use crate::error::RenderError;
use crate::model::OptimizedResume;
use crate::plan::{self, Alignment, Block, Paragraph, ResumePlan, Section};
use crate::style::{layout as geometry, palette};

use self::builder::DocumentBuilder;
use self::elements::{
    mm_from_f64, Column, ColumnItem, HeadingRule, JustifiedText, LinkText, TagCloud,
    TwoColumnPage,
};
use self::layout::{LayoutLog, Placement, SharedLayoutLog};

/// A rendered PDF together with where each block of the plan ended up.
#[derive(Clone, Debug)]
pub struct RenderedPdf {
    /// The finished document, fills and link annotations included.
    pub bytes: Vec<u8>,
    /// Number of pages genpdf produced. The sidebar band is recorded once per page.
    pub pages: usize,
    /// Every drawn block in drawing order. A block split across pages appears once per page.
    pub placements: Vec<Placement>,
}

impl RenderedPdf {
    /// Placements on the given 1-indexed page.
    pub fn placements_on(&self, page: usize) -> impl Iterator<Item = &Placement> {
        self.placements
            .iter()
            .filter(move |placement| placement.page == page)
    }
}

/// Renders résumés into single-document PDF bytes.
#[derive(Clone, Debug)]
pub struct PdfRenderer {
    options: RenderOptions,
}

impl Default for PdfRenderer {
    fn default() -> Self {
        Self::new(RenderOptions::from_env())
    }
}

impl PdfRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Renders the résumé to PDF bytes.
    pub fn render(&self, resume: &OptimizedResume) -> Result<Vec<u8>, RenderError> {
        self.render_plan(&ResumePlan::from_resume(resume))
    }

    /// Renders an already built plan to PDF bytes.
    pub fn render_plan(&self, plan: &ResumePlan) -> Result<Vec<u8>, RenderError> {
        self.render_document(plan).map(|rendered| rendered.bytes)
    }

    /// Renders the plan and returns the bytes together with the block placements.
    pub fn render_document(&self, plan: &ResumePlan) -> Result<RenderedPdf, RenderError> {
        let title = self.options.title().unwrap_or_else(|| plan.title());
        let mut document = DocumentBuilder::new()
            .with_title(title)
            .build(&self.options)
            .map_err(RenderError::FontLoad)?;

        let log = LayoutLog::shared();
        document.push(TwoColumnPage::new(
            column(plan::Column::Sidebar, plan.sidebar(), &log),
            column(plan::Column::Main, plan.main(), &log),
            palette::PRIMARY,
            Rc::clone(&log),
        ));

        let mut bytes = Vec::new();
        document.render(&mut bytes).map_err(RenderError::Pdf)?;

        let log = log.take();
        let pages = log
            .fills()
            .iter()
            .map(|fill| fill.page)
            .max()
            .unwrap_or(1);
        debug!(
            "genpdf wrote {} bytes on {} pages with {} fills and {} link regions",
            bytes.len(),
            pages,
            log.fills().len(),
            log.links().len()
        );
        let bytes = overlay::apply_overlay(&bytes, &log, geometry::PAGE_HEIGHT_MM)?;
        info!("rendered PDF for '{}' ({} bytes)", plan.title(), bytes.len());

        Ok(RenderedPdf {
            bytes,
            pages,
            placements: log.into_placements(),
        })
    }
}

/// Renders the résumé to PDF bytes with options read from the environment.
pub fn render_pdf(resume: &OptimizedResume) -> Result<Vec<u8>, RenderError> {
    PdfRenderer::default().render(resume)
}

fn column(kind: plan::Column, sections: &[Section], log: &SharedLayoutLog) -> Column {
    Column::new(
        kind,
        sections
            .iter()
            .flat_map(Section::blocks)
            .map(|block| column_item(block, log))
            .collect(),
    )
}

fn column_item(block: &Block, log: &SharedLayoutLog) -> ColumnItem {
    let text = block.text();
    match block {
        Block::Heading(heading) => ColumnItem::new(
            HeadingRule::new(
                &heading.span(),
                heading.color(),
                heading.rule_weight(),
                Rc::clone(log),
            ),
            text,
        )
        .with_spacing(heading.space_before(), heading.space_after()),
        Block::Paragraph(paragraph) => paragraph_item(paragraph, text, log)
            .with_spacing(paragraph.space_before(), paragraph.space_after()),
        Block::Tags(tags) => ColumnItem::new(
            TagCloud::new(tags.tags(), tags.fill(), Rc::clone(log)),
            text,
        ),
    }
}

fn paragraph_item(paragraph: &Paragraph, text: String, log: &SharedLayoutLog) -> ColumnItem {
    if let Some(target) = paragraph.link() {
        return ColumnItem::new(
            LinkText::new(paragraph.spans(), target, Rc::clone(log)),
            text,
        );
    }

    let indent = if paragraph.is_indented() {
        geometry::BULLET_INDENT_MM
    } else {
        0.0
    };
    let margins = Margins::trbl(0, 0, 0, mm_from_f64(indent));

    match paragraph.alignment() {
        Alignment::Justified => {
            ColumnItem::new(JustifiedText::new(paragraph.spans()).padded(margins), text)
        }
        Alignment::Left => {
            let mut element = TextParagraph::default();
            for span in paragraph.spans() {
                element.push(span.to_styled_string());
            }
            ColumnItem::new(element.padded(margins), text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_block_becomes_one_column_item() {
        let resume = OptimizedResume::from_json(
            r#"{"fullName":"Jane Doe","contactInfo":{"email":"jane@x.com"},"skills":["SQL"]}"#,
        )
        .unwrap();
        let plan = ResumePlan::from_resume(&resume);
        let log = LayoutLog::shared();
        let blocks: usize = plan.sidebar().iter().map(|s| s.blocks().len()).sum();
        let items = plan
            .sidebar()
            .iter()
            .flat_map(Section::blocks)
            .map(|block| column_item(block, &log))
            .count();
        assert_eq!(items, blocks);
    }

    #[test]
    fn renderer_keeps_configured_options() {
        let options = RenderOptions::new().with_title("Custom");
        let renderer = PdfRenderer::new(options.clone());
        assert_eq!(renderer.options(), &options);
    }

    #[test]
    fn placements_are_filtered_by_page() {
        let placement = |page| Placement {
            page,
            column: plan::Column::Main,
            rect: layout::Rect::default(),
            text: format!("page {page}"),
        };
        let rendered = RenderedPdf {
            bytes: Vec::new(),
            pages: 2,
            placements: vec![placement(1), placement(2), placement(2)],
        };
        assert_eq!(rendered.placements_on(2).count(), 2);
        assert_eq!(rendered.placements_on(3).count(), 0);
    }
}
