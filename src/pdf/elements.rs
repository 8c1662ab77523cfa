//! genpdf elements for the two-column résumé page.
//!
//! genpdf lays elements out top to bottom only, so the page itself is one custom element,
//! [`TwoColumnPage`], that drives two independent [`Column`]s. The remaining elements cover
//! what genpdf does not ship with: headings with a colored rule, justified paragraphs, tag
//! clouds and wrapped link text.
//!
//! genpdf can only stroke hairlines. Solid areas (the sidebar band, heading rules, tag
//! backgrounds) and link rectangles are recorded in the shared
//! [`LayoutLog`](crate::pdf::layout::LayoutLog) instead and
//! painted afterwards by [`overlay`](crate::pdf::overlay).

use genpdf::error::{Error, ErrorKind};
use genpdf::fonts::FontCache;
use genpdf::style::{Style, StyledString};
use genpdf::{render, Element, Margins, Mm, Position, RenderResult, Size};

use crate::pdf::layout::SharedLayoutLog;
use crate::plan;
use crate::richtext::Span;
use crate::style::{layout, Rgb};

const MM_PER_POINT: f64 = 25.4 / 72.0;
const RULE_GAP_MM: f64 = 0.8;
const TAG_PADDING_H_MM: f64 = 1.4;
const TAG_PADDING_V_MM: f64 = 0.7;
const TAG_GAP_MM: f64 = 1.0;
const DEFAULT_UNDERLINE_OFFSET_MM: f64 = 0.4;

pub(crate) fn mm_from_f64(value: f64) -> Mm {
    Mm::from(printpdf::Mm(value))
}

pub(crate) fn mm_to_f64(value: Mm) -> f64 {
    let mm: printpdf::Mm = value.into();
    mm.0
}

/// Converts a length in points to millimetres.
pub(crate) fn mm_from_points(points: f64) -> Mm {
    mm_from_f64(points * MM_PER_POINT)
}

/// One entry of a [`Column`]: an element, the spacing around it and its visible text.
pub struct ColumnItem {
    element: Box<dyn Element>,
    text: String,
    space_before: Mm,
    space_after: Mm,
}

impl ColumnItem {
    /// Wraps an element without any spacing.
    pub fn new<E: Element + 'static>(element: E, text: impl Into<String>) -> Self {
        Self {
            element: Box::new(element),
            text: text.into(),
            space_before: Mm::default(),
            space_after: Mm::default(),
        }
    }

    /// Sets the vertical spacing in points and returns the updated item.
    pub fn with_spacing(mut self, before_pt: f64, after_pt: f64) -> Self {
        self.space_before = mm_from_points(before_pt);
        self.space_after = mm_from_points(after_pt);
        self
    }
}

/// A vertical stack of items that resumes where it stopped when continued on a new page.
pub struct Column {
    kind: plan::Column,
    items: Vec<ColumnItem>,
    next: usize,
}

struct ColumnPass {
    has_more: bool,
    progressed: bool,
    height: Mm,
}

impl Column {
    pub fn new(kind: plan::Column, items: Vec<ColumnItem>) -> Self {
        Self {
            kind,
            items,
            next: 0,
        }
    }

    fn is_done(&self) -> bool {
        self.next >= self.items.len()
    }

    /// Renders as many remaining items as fit into `area`.
    ///
    /// `origin` is the absolute top-left corner of `area` on the page in millimetres. Each
    /// item is anchored there before it renders, and its placement is logged afterwards.
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: &render::Area<'_>,
        style: Style,
        page: usize,
        origin: (f64, f64),
        log: &SharedLayoutLog,
    ) -> Result<ColumnPass, Error> {
        let available = area.size().height;
        let mut offset = Mm::default();
        let mut progressed = false;

        while let Some(item) = self.items.get_mut(self.next) {
            let before = if offset > Mm::default() {
                item.space_before
            } else {
                Mm::default()
            };
            if offset + before >= available {
                return Ok(ColumnPass {
                    has_more: true,
                    progressed,
                    height: offset,
                });
            }

            log.borrow_mut()
                .anchor(page, origin.0, origin.1 + mm_to_f64(offset + before));
            let mut item_area = area.clone();
            item_area.add_offset(Position::new(0, offset + before));
            let result = item.element.render(context, item_area, style)?;

            if result.size.height > Mm::default() {
                progressed = true;
                log.borrow_mut().place(
                    self.kind,
                    mm_to_f64(result.size.width),
                    mm_to_f64(result.size.height),
                    &item.text,
                );
            }

            offset += before + result.size.height;
            if result.has_more {
                return Ok(ColumnPass {
                    has_more: true,
                    progressed,
                    height: offset,
                });
            }

            offset += item.space_after;
            self.next += 1;
        }

        Ok(ColumnPass {
            has_more: false,
            progressed,
            height: offset,
        })
    }
}

/// The full résumé page: a shaded sidebar and a main column laid out side by side.
///
/// Content that does not fit continues on the next page; the sidebar band is recorded for
/// every page and each column resumes where it stopped.
pub struct TwoColumnPage {
    sidebar: Column,
    main: Column,
    sidebar_fill: Rgb,
    page: usize,
    log: SharedLayoutLog,
}

impl TwoColumnPage {
    pub fn new(sidebar: Column, main: Column, sidebar_fill: Rgb, log: SharedLayoutLog) -> Self {
        Self {
            sidebar,
            main,
            sidebar_fill,
            page: 0,
            log,
        }
    }
}

impl Element for TwoColumnPage {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        self.page += 1;
        let page_size = area.size();
        let sidebar_width_mm =
            mm_to_f64(page_size.width) * f64::from(layout::SIDEBAR_PERCENT) / 100.0;
        let sidebar_width = mm_from_f64(sidebar_width_mm);

        {
            let mut log = self.log.borrow_mut();
            log.anchor(self.page, 0.0, 0.0);
            log.fill(
                0.0,
                0.0,
                sidebar_width_mm,
                mm_to_f64(page_size.height),
                self.sidebar_fill,
            );
        }

        let sidebar_pad_v = mm_from_f64(layout::SIDEBAR_PADDING_V_MM);
        let sidebar_pad_h = mm_from_f64(layout::SIDEBAR_PADDING_H_MM);
        let mut sidebar_area = area.clone();
        sidebar_area.set_width(sidebar_width);
        sidebar_area.add_margins(Margins::trbl(
            sidebar_pad_v,
            sidebar_pad_h,
            sidebar_pad_v,
            sidebar_pad_h,
        ));

        let main_pad_v = mm_from_f64(layout::MAIN_PADDING_V_MM);
        let main_pad_h = mm_from_f64(layout::MAIN_PADDING_H_MM);
        let mut main_area = area.clone();
        main_area.add_offset(Position::new(sidebar_width, 0));
        main_area.add_margins(Margins::trbl(main_pad_v, main_pad_h, main_pad_v, main_pad_h));

        let sidebar = if self.sidebar.is_done() {
            None
        } else {
            Some(self.sidebar.render(
                context,
                &sidebar_area,
                style,
                self.page,
                (layout::SIDEBAR_PADDING_H_MM, layout::SIDEBAR_PADDING_V_MM),
                &self.log,
            )?)
        };
        let main = if self.main.is_done() {
            None
        } else {
            Some(self.main.render(
                context,
                &main_area,
                style,
                self.page,
                (
                    sidebar_width_mm + layout::MAIN_PADDING_H_MM,
                    layout::MAIN_PADDING_V_MM,
                ),
                &self.log,
            )?)
        };

        let has_more = [&sidebar, &main]
            .iter()
            .any(|pass| pass.as_ref().map_or(false, |pass| pass.has_more));
        let progressed = [&sidebar, &main]
            .iter()
            .any(|pass| pass.as_ref().map_or(false, |pass| pass.progressed));
        if has_more && !progressed {
            return Err(Error::new(
                "Résumé content does not fit on an empty page",
                ErrorKind::PageSizeExceeded,
            ));
        }

        log::debug!(
            "rendered page {}: sidebar {:?} mm, main {:?} mm, more: {}",
            self.page,
            sidebar.as_ref().map(|pass| mm_to_f64(pass.height)),
            main.as_ref().map(|pass| mm_to_f64(pass.height)),
            has_more
        );

        let mut result = RenderResult::default();
        result.size = page_size;
        result.has_more = has_more;
        Ok(result)
    }
}

/// A section heading followed by a colored rule spanning the column width.
pub struct HeadingRule {
    text: StyledString,
    rule_color: Rgb,
    rule_weight: Mm,
    log: SharedLayoutLog,
}

impl HeadingRule {
    pub fn new(span: &Span, rule_color: Rgb, rule_weight_pt: f64, log: SharedLayoutLog) -> Self {
        Self {
            text: span.to_styled_string(),
            rule_color,
            rule_weight: mm_from_points(rule_weight_pt),
            log,
        }
    }
}

impl Element for HeadingRule {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let text_style = style.and(self.text.style);
        let line_height = text_style.line_height(&context.font_cache);
        let rule_top = line_height + mm_from_f64(RULE_GAP_MM);
        let height = rule_top + self.rule_weight;

        let mut result = RenderResult::default();
        if height > area.size().height {
            result.has_more = true;
            return Ok(result);
        }

        match area.text_section(&context.font_cache, Position::new(0, 0), text_style) {
            Some(mut section) => section.print_str(&self.text.s, text_style)?,
            None => {
                result.has_more = true;
                return Ok(result);
            }
        }

        self.log.borrow_mut().fill(
            0.0,
            mm_to_f64(rule_top),
            mm_to_f64(area.size().width),
            mm_to_f64(self.rule_weight),
            self.rule_color,
        );

        result.size = Size::new(area.size().width, height);
        Ok(result)
    }
}

#[derive(Clone, Debug)]
struct Word {
    text: String,
    style: Style,
    underline: bool,
    /// Continues the previous word without a space. Set on the tail of a split word.
    glued: bool,
}

fn split_words(spans: &[Span]) -> Vec<Word> {
    spans
        .iter()
        .flat_map(|span| {
            let style = span.to_style();
            let underline = span.is_underlined();
            span.text().split_whitespace().map(move |text| Word {
                text: text.to_owned(),
                style,
                underline,
                glued: false,
            })
        })
        .collect()
}

fn text_width(text: &str, style: Style, font_cache: &FontCache) -> Mm {
    StyledString::new(text.to_owned(), style).width(font_cache)
}

/// Breaks `words[index]` after the longest prefix that fits `max_width`.
///
/// At least one character stays on the line, so an area narrower than a single glyph still
/// makes progress.
fn split_overlong(
    words: &mut Vec<Word>,
    index: usize,
    style: Style,
    max_width: Mm,
    font_cache: &FontCache,
) {
    let word_style = style.and(words[index].style);
    if text_width(&words[index].text, word_style, font_cache) <= max_width {
        return;
    }
    let chars: Vec<char> = words[index].text.chars().collect();
    let mut split = 1;
    for end in 2..chars.len() {
        let prefix: String = chars[..end].iter().collect();
        if text_width(&prefix, word_style, font_cache) > max_width {
            break;
        }
        split = end;
    }
    if split >= chars.len() {
        return;
    }

    let mut tail = words[index].clone();
    tail.text = chars[split..].iter().collect();
    tail.glued = true;
    words[index].text = chars[..split].iter().collect();
    words.insert(index + 1, tail);
}

struct Line {
    end: usize,
    widths: Vec<Mm>,
    width: Mm,
    height: Mm,
    glyph_height: Mm,
    space: Mm,
}

/// Collects the words starting at `start` that fit on one line of `max_width`.
fn fit_line(
    words: &mut Vec<Word>,
    start: usize,
    style: Style,
    max_width: Mm,
    font_cache: &FontCache,
) -> Line {
    split_overlong(words, start, style, max_width, font_cache);

    let first_style = style.and(words[start].style);
    let first_width = text_width(&words[start].text, first_style, font_cache);
    let mut line = Line {
        end: start + 1,
        widths: vec![first_width],
        width: first_width,
        height: first_style.line_height(font_cache),
        glyph_height: first_style
            .font(font_cache)
            .glyph_height(first_style.font_size()),
        space: text_width(" ", first_style, font_cache),
    };

    while let Some(word) = words.get(line.end) {
        let word_style = style.and(word.style);
        let width = text_width(&word.text, word_style, font_cache);
        let gap = if word.glued { Mm::default() } else { line.space };
        if line.width + gap + width > max_width {
            break;
        }
        line.width += gap + width;
        line.height = line.height.max(word_style.line_height(font_cache));
        line.glyph_height = line.glyph_height.max(
            word_style
                .font(font_cache)
                .glyph_height(word_style.font_size()),
        );
        line.widths.push(width);
        line.end += 1;
    }
    line
}

/// Prints one line of words at `y` and returns the x position of every word.
fn print_words(
    area: &render::Area<'_>,
    font_cache: &FontCache,
    words: &[Word],
    line: &Line,
    style: Style,
    y: Mm,
    stretch: Mm,
) -> Result<Vec<Mm>, Error> {
    let mut positions = Vec::with_capacity(words.len());
    let mut x = Mm::default();
    for (index, (word, width)) in words.iter().zip(&line.widths).enumerate() {
        if index > 0 && !word.glued {
            x += line.space + stretch;
        }
        let word_style = style.and(word.style);
        if let Some(mut section) = area.text_section(font_cache, Position::new(x, y), word_style)
        {
            section.print_str(&word.text, word_style)?;
        }
        positions.push(x);
        x += *width;
    }
    Ok(positions)
}

/// A fully justified paragraph. Every line but the last is stretched to the area width.
pub struct JustifiedText {
    words: Vec<Word>,
    next_word: usize,
}

impl JustifiedText {
    pub fn new(spans: &[Span]) -> Self {
        Self {
            words: split_words(spans),
            next_word: 0,
        }
    }
}

impl Element for JustifiedText {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let font_cache = &context.font_cache;
        let available = area.size();
        let mut result = RenderResult::default();
        let mut y = Mm::default();

        while self.next_word < self.words.len() {
            let start = self.next_word;
            let line = fit_line(&mut self.words, start, style, available.width, font_cache);
            if y + line.height > available.height {
                result.has_more = true;
                break;
            }

            let gaps = self.words[start + 1..line.end]
                .iter()
                .filter(|word| !word.glued)
                .count();
            let stretch = if line.end == self.words.len() || gaps == 0 {
                Mm::default()
            } else {
                (available.width - line.width) / gaps as f64
            };

            print_words(
                &area,
                font_cache,
                &self.words[start..line.end],
                &line,
                style,
                y,
                stretch,
            )?;
            y += line.height;
            self.next_word = line.end;
        }

        result.size = Size::new(available.width, y);
        Ok(result)
    }
}

/// Left-aligned text that is one link. Every line it wraps onto gets its own link rectangle.
///
/// Words that are wider than the column (long e-mail addresses, bare URLs) are broken
/// between characters. Underlined spans get a hairline under the baseline.
pub struct LinkText {
    words: Vec<Word>,
    target: String,
    next_word: usize,
    underline_offset: Mm,
    log: SharedLayoutLog,
}

impl LinkText {
    pub fn new(spans: &[Span], target: impl Into<String>, log: SharedLayoutLog) -> Self {
        Self {
            words: split_words(spans),
            target: target.into(),
            next_word: 0,
            underline_offset: mm_from_f64(DEFAULT_UNDERLINE_OFFSET_MM),
            log,
        }
    }

    fn draw_underlines(
        &self,
        area: &render::Area<'_>,
        words: &[Word],
        line: &Line,
        positions: &[Mm],
        style: Style,
        baseline: Mm,
    ) {
        for ((word, x), width) in words.iter().zip(positions).zip(&line.widths) {
            if !word.underline {
                continue;
            }
            let mut line_style = Style::new();
            if let Some(color) = style.and(word.style).color() {
                line_style = line_style.with_color(color);
            }
            area.draw_line(
                vec![
                    Position::new(*x, baseline),
                    Position::new(*x + *width, baseline),
                ],
                line_style,
            );
        }
    }
}

impl Element for LinkText {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let font_cache = &context.font_cache;
        let available = area.size();
        let mut result = RenderResult::default();
        let mut width = Mm::default();
        let mut y = Mm::default();

        while self.next_word < self.words.len() {
            let start = self.next_word;
            let line = fit_line(&mut self.words, start, style, available.width, font_cache);
            if y + line.height > available.height {
                result.has_more = true;
                break;
            }

            let words = &self.words[start..line.end];
            let positions =
                print_words(&area, font_cache, words, &line, style, y, Mm::default())?;
            let baseline = y + line.glyph_height + self.underline_offset;
            self.draw_underlines(&area, words, &line, &positions, style, baseline);
            self.log.borrow_mut().link(
                0.0,
                mm_to_f64(y),
                mm_to_f64(line.width),
                mm_to_f64(line.height),
                &self.target,
            );

            width = width.max(line.width);
            y += line.height;
            self.next_word = line.end;
        }

        result.size = Size::new(width, y);
        Ok(result)
    }
}

/// Inline tags on a filled background, wrapped between tags and never inside one.
pub struct TagCloud {
    tags: Vec<StyledString>,
    fill: Rgb,
    next_tag: usize,
    log: SharedLayoutLog,
}

impl TagCloud {
    pub fn new(tags: &[Span], fill: Rgb, log: SharedLayoutLog) -> Self {
        Self {
            tags: tags.iter().map(Span::to_styled_string).collect(),
            fill,
            next_tag: 0,
            log,
        }
    }
}

impl Element for TagCloud {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let font_cache = &context.font_cache;
        let available = area.size();
        let pad_h = mm_from_f64(TAG_PADDING_H_MM);
        let pad_v = mm_from_f64(TAG_PADDING_V_MM);
        let gap = mm_from_f64(TAG_GAP_MM);

        let mut result = RenderResult::default();
        let mut x = Mm::default();
        let mut y = Mm::default();
        let mut row_height = Mm::default();

        while let Some(tag) = self.tags.get(self.next_tag) {
            let tag_style = style.and(tag.style);
            let tag_width = text_width(&tag.s, tag_style, font_cache) + pad_h + pad_h;
            let tag_height = tag_style.line_height(font_cache) + pad_v + pad_v;

            if x > Mm::default() && x + tag_width > available.width {
                x = Mm::default();
                y += row_height + gap;
                row_height = Mm::default();
            }
            if y + tag_height > available.height {
                result.has_more = true;
                break;
            }

            self.log.borrow_mut().fill(
                mm_to_f64(x),
                mm_to_f64(y),
                mm_to_f64(tag_width),
                mm_to_f64(tag_height),
                self.fill,
            );
            if let Some(mut section) =
                area.text_section(font_cache, Position::new(x + pad_h, y + pad_v), tag_style)
            {
                section.print_str(&tag.s, tag_style)?;
            }

            x += tag_width + gap;
            row_height = row_height.max(tag_height);
            self.next_tag += 1;
        }

        result.size = Size::new(available.width, y + row_height);
        Ok(result)
    }
}
