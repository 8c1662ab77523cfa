//! DOCX rendering with docx-rs.
//!
//! The page is a single borderless table with one row: a shaded sidebar cell and a main cell.
//! Every plan block becomes one paragraph in its cell; the word processor handles pagination.

use std::io::Cursor;

use docx_rs::{
    AlignmentType, BorderType, Docx, Hyperlink, HyperlinkType, LineSpacing, PageMargin,
    Paragraph as DocxParagraph, ParagraphBorder, ParagraphBorderPosition, ParagraphBorders,
    Run, ShdType, Shading, Table, TableBorders, TableCell, TableLayoutType, TableRow,
    WidthType,
};
use log::{debug, info};

use crate::error::RenderError;
use crate::model::OptimizedResume;
use crate::plan::{Alignment, Block, Heading, Paragraph, ResumePlan, Section, TagList};
use crate::style::{layout, palette, Rgb};

const NBSP: char = '\u{00A0}';
const TAG_SEPARATOR: &str = "  ";

fn twips(points: f64) -> u32 {
    (points * 20.0).round() as u32
}

/// Border sizes are expressed in eighths of a point.
fn border_eighths(points: f64) -> usize {
    (points * 8.0).round() as usize
}

fn content_width_twips() -> usize {
    (layout::DOCX_PAGE_WIDTH_TWIPS as usize)
        .saturating_sub(2 * layout::DOCX_PAGE_MARGIN_TWIPS as usize)
}

fn column_widths_twips() -> (usize, usize) {
    let total = content_width_twips();
    let sidebar = total * usize::from(layout::SIDEBAR_PERCENT) / 100;
    (sidebar, total - sidebar)
}

/// Renders résumés into DOCX bytes.
#[derive(Clone, Copy, Debug, Default)]
pub struct DocxRenderer;

impl DocxRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Renders the résumé to DOCX bytes.
    pub fn render(&self, resume: &OptimizedResume) -> Result<Vec<u8>, RenderError> {
        self.render_plan(&ResumePlan::from_resume(resume))
    }

    /// Renders an already built plan to DOCX bytes.
    pub fn render_plan(&self, plan: &ResumePlan) -> Result<Vec<u8>, RenderError> {
        let mut buffer = Vec::new();
        build_document(plan)
            .build()
            .pack(Cursor::new(&mut buffer))
            .map_err(|err| RenderError::Docx(err.to_string()))?;
        info!("rendered DOCX for '{}' ({} bytes)", plan.title(), buffer.len());
        Ok(buffer)
    }
}

/// Renders the résumé to DOCX bytes.
pub fn render_docx(resume: &OptimizedResume) -> Result<Vec<u8>, RenderError> {
    DocxRenderer::new().render(resume)
}

fn build_document(plan: &ResumePlan) -> Docx {
    let (sidebar_width, main_width) = column_widths_twips();
    debug!(
        "docx columns: sidebar {} twips, main {} twips",
        sidebar_width, main_width
    );

    let sidebar = cell(plan.sidebar(), sidebar_width).shading(
        Shading::new()
            .shd_type(ShdType::Clear)
            .color("auto")
            .fill(palette::PRIMARY.hex()),
    );
    let main = cell(plan.main(), main_width);

    let table = Table::new(vec![TableRow::new(vec![sidebar, main])])
        .set_grid(vec![sidebar_width, main_width])
        .width(sidebar_width + main_width, WidthType::Dxa)
        .layout(TableLayoutType::Fixed)
        .set_borders(TableBorders::with_empty());

    let margin = layout::DOCX_PAGE_MARGIN_TWIPS;
    Docx::new()
        .page_size(layout::DOCX_PAGE_WIDTH_TWIPS, layout::DOCX_PAGE_HEIGHT_TWIPS)
        .page_margin(
            PageMargin::new()
                .top(margin)
                .right(margin)
                .bottom(margin)
                .left(margin),
        )
        .add_table(table)
}

fn cell(sections: &[Section], width: usize) -> TableCell {
    let paragraphs: Vec<DocxParagraph> = sections
        .iter()
        .flat_map(Section::blocks)
        .map(block_paragraph)
        .collect();

    let mut cell = TableCell::new().width(width, WidthType::Dxa);
    if paragraphs.is_empty() {
        // A cell must hold at least one paragraph to be valid.
        return cell.add_paragraph(DocxParagraph::new());
    }
    for paragraph in paragraphs {
        cell = cell.add_paragraph(paragraph);
    }
    cell
}

fn block_paragraph(block: &Block) -> DocxParagraph {
    match block {
        Block::Heading(heading) => heading_paragraph(heading),
        Block::Paragraph(paragraph) => text_paragraph(paragraph),
        Block::Tags(tags) => tag_paragraph(tags),
    }
}

fn spacing(before: f64, after: f64) -> LineSpacing {
    LineSpacing::new().before(twips(before)).after(twips(after))
}

fn heading_paragraph(heading: &Heading) -> DocxParagraph {
    DocxParagraph::new()
        .add_run(heading.span().to_run())
        .line_spacing(spacing(heading.space_before(), heading.space_after()))
        .set_borders(ParagraphBorders::with_empty().set(bottom_rule(
            heading.color(),
            heading.rule_weight(),
        )))
}

fn bottom_rule(color: Rgb, weight_pt: f64) -> ParagraphBorder {
    ParagraphBorder::new(ParagraphBorderPosition::Bottom)
        .val(BorderType::Single)
        .size(border_eighths(weight_pt))
        .color(color.hex())
}

fn text_paragraph(paragraph: &Paragraph) -> DocxParagraph {
    let runs: Vec<Run> = paragraph.spans().iter().map(|span| span.to_run()).collect();

    let mut docx_paragraph = DocxParagraph::new().line_spacing(spacing(
        paragraph.space_before(),
        paragraph.space_after(),
    ));
    match paragraph.link() {
        Some(target) => {
            let hyperlink = runs.into_iter().fold(
                Hyperlink::new(target, HyperlinkType::External),
                Hyperlink::add_run,
            );
            docx_paragraph = docx_paragraph.add_hyperlink(hyperlink);
        }
        None => {
            docx_paragraph = runs.into_iter().fold(docx_paragraph, DocxParagraph::add_run);
        }
    }

    if paragraph.alignment() == Alignment::Justified {
        docx_paragraph = docx_paragraph.align(AlignmentType::Both);
    }
    if paragraph.is_indented() {
        docx_paragraph =
            docx_paragraph.indent(Some(layout::DOCX_BULLET_INDENT_TWIPS), None, None, None);
    }
    docx_paragraph
}

fn tag_paragraph(tags: &TagList) -> DocxParagraph {
    let mut paragraph = DocxParagraph::new().line_spacing(spacing(0.0, 4.0));
    for (index, tag) in tags.tags().iter().enumerate() {
        if index > 0 {
            paragraph = paragraph.add_run(tag.clone().with_text(TAG_SEPARATOR).to_run());
        }
        let unbreakable: String = tag
            .text()
            .chars()
            .map(|ch| if ch == ' ' { NBSP } else { ch })
            .collect();
        paragraph = paragraph.add_run(tag.clone().with_text(unbreakable).to_run());
    }
    paragraph
}
