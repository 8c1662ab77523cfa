//! Fills and link annotations added to a rendered PDF with `lopdf`.
//!
//! genpdf strokes hairlines only and has no notion of hyperlinks. The résumé page records
//! both in a [`LayoutLog`] while it is laid out; once genpdf has serialized the document,
//! [`apply_overlay`] reopens the bytes and
//!
//! * prepends one content stream per page that paints the recorded fills (`q rg re f Q`), so
//!   the text genpdf wrote lands on top of them, and
//! * attaches a `/Link` annotation with a `/URI` action for every recorded link region.

use std::collections::BTreeMap;

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use crate::error::OverlayError;
use crate::pdf::layout::{FillRect, LayoutLog, LinkRegion, Rect};
use crate::style::Rgb;

const POINTS_PER_MM: f64 = 72.0 / 25.4;

type PageMap = BTreeMap<u32, ObjectId>;

/// Returns `[x y width height]` in PDF points with the origin at the bottom-left corner.
fn fill_box(rect: &Rect, page_height_mm: f64) -> [f64; 4] {
    [
        rect.x_mm * POINTS_PER_MM,
        (page_height_mm - rect.bottom_mm()) * POINTS_PER_MM,
        rect.width_mm * POINTS_PER_MM,
        rect.height_mm * POINTS_PER_MM,
    ]
}

/// Returns the annotation rectangle `[x1 y1 x2 y2]` in PDF points (origin bottom-left),
/// widened to whole points.
fn annotation_rect(rect: &Rect, page_height_mm: f64) -> [i64; 4] {
    let left = rect.x_mm * POINTS_PER_MM;
    let right = (rect.x_mm + rect.width_mm) * POINTS_PER_MM;
    let top = (page_height_mm - rect.y_mm) * POINTS_PER_MM;
    let bottom = (page_height_mm - rect.bottom_mm()) * POINTS_PER_MM;
    [
        left.floor() as i64,
        bottom.floor() as i64,
        right.ceil() as i64,
        top.ceil() as i64,
    ]
}

fn real(value: f64) -> Object {
    Object::Real(value as _)
}

fn component(value: u8) -> Object {
    real(f64::from(value) / 255.0)
}

/// Paints every recorded fill and adds every recorded link, then re-serializes the document.
///
/// When the log holds neither fills nor links the input is returned unchanged.
pub fn apply_overlay(
    pdf_bytes: &[u8],
    log: &LayoutLog,
    page_height_mm: f64,
) -> Result<Vec<u8>, OverlayError> {
    if log.fills().is_empty() && log.links().is_empty() {
        return Ok(pdf_bytes.to_vec());
    }

    let mut document = Document::load_mem(pdf_bytes)?;
    let pages = document.get_pages();

    add_fills(&mut document, &pages, log.fills(), page_height_mm)?;
    add_links(&mut document, &pages, log.links(), page_height_mm)?;

    let mut buffer = Vec::new();
    document.save_to(&mut buffer)?;
    log::debug!(
        "painted {} fills and added {} link annotations ({} bytes)",
        log.fills().len(),
        log.links().len(),
        buffer.len()
    );
    Ok(buffer)
}

fn page_ref(pages: &PageMap, page: usize) -> Result<ObjectId, OverlayError> {
    u32::try_from(page)
        .ok()
        .and_then(|number| pages.get(&number).copied())
        .ok_or(OverlayError::MissingPage { page })
}

fn page_dictionary(
    document: &mut Document,
    page: usize,
    page_id: ObjectId,
) -> Result<&mut Dictionary, OverlayError> {
    document
        .get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|_| OverlayError::InvalidPage { page })
}

fn fill_operations(fill: &FillRect, page_height_mm: f64) -> [Operation; 3] {
    let Rgb(r, g, b) = fill.color;
    let [x, y, width, height] = fill_box(&fill.rect, page_height_mm);
    [
        Operation::new("rg", vec![component(r), component(g), component(b)]),
        Operation::new("re", vec![real(x), real(y), real(width), real(height)]),
        Operation::new("f", vec![]),
    ]
}

fn add_fills(
    document: &mut Document,
    pages: &PageMap,
    fills: &[FillRect],
    page_height_mm: f64,
) -> Result<(), OverlayError> {
    let mut per_page: BTreeMap<usize, Vec<Operation>> = BTreeMap::new();
    for fill in fills {
        per_page
            .entry(fill.page)
            .or_insert_with(|| vec![Operation::new("q", vec![])])
            .extend(fill_operations(fill, page_height_mm));
    }

    for (page, mut operations) in per_page {
        let page_id = page_ref(pages, page)?;
        operations.push(Operation::new("Q", vec![]));
        let mut content = Content { operations }.encode()?;
        // Streams of one page are concatenated; keep the next stream's first operator apart.
        content.push(b'\n');
        let stream_id = document.add_object(Stream::new(Dictionary::new(), content));

        let dictionary = page_dictionary(document, page, page_id)?;
        let mut contents = vec![Object::Reference(stream_id)];
        match dictionary.get(b"Contents") {
            Ok(Object::Array(existing)) => contents.extend(existing.iter().cloned()),
            Ok(existing) => contents.push(existing.clone()),
            Err(_) => {}
        }
        dictionary.set("Contents", Object::Array(contents));
    }
    Ok(())
}

fn annotation(region: &LinkRegion, page_height_mm: f64) -> Dictionary {
    let mut action = Dictionary::new();
    action.set("Type", Object::Name("Action".into()));
    action.set("S", Object::Name("URI".into()));
    action.set("URI", Object::string_literal(region.target.as_str()));

    let mut dictionary = Dictionary::new();
    dictionary.set("Type", Object::Name("Annot".into()));
    dictionary.set("Subtype", Object::Name("Link".into()));
    dictionary.set(
        "Rect",
        Object::Array(
            annotation_rect(&region.rect, page_height_mm)
                .iter()
                .map(|value| Object::Integer(*value))
                .collect(),
        ),
    );
    dictionary.set(
        "Border",
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(0),
        ]),
    );
    dictionary.set("A", Object::Dictionary(action));
    dictionary
}

fn add_links(
    document: &mut Document,
    pages: &PageMap,
    links: &[LinkRegion],
    page_height_mm: f64,
) -> Result<(), OverlayError> {
    let mut per_page: BTreeMap<usize, Vec<Object>> = BTreeMap::new();
    for region in links {
        page_ref(pages, region.page)?;
        let annotation_id =
            document.add_object(Object::Dictionary(annotation(region, page_height_mm)));
        per_page
            .entry(region.page)
            .or_default()
            .push(Object::Reference(annotation_id));
    }

    for (page, annotations) in per_page {
        let page_id = page_ref(pages, page)?;
        let dictionary = page_dictionary(document, page, page_id)?;
        let mut existing = match dictionary.get(b"Annots") {
            Ok(Object::Array(existing)) => existing.clone(),
            _ => Vec::new(),
        };
        existing.extend(annotations);
        dictionary.set("Annots", Object::Array(existing));
    }
    Ok(())
}
