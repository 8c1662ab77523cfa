use std::env;
use std::io::{Cursor, Read};

use lopdf::content::Content;
use lopdf::{Document, Object};
use resume_render::plan::Column;
use resume_render::style::{layout, palette, Rgb};
use resume_render::{
    render_docx, OptimizedResume, PdfRenderer, RenderError, RenderOptions, RenderedPdf,
    ResumePlan,
};
use sha2::{Digest, Sha256};

const MINIMAL: &str = r#"{
    "fullName": "Jane Doe",
    "contactInfo": { "email": "jane@x.com" },
    "skills": ["SQL"]
}"#;

const FULL: &str = r#"{
    "fullName": "Jane Doe",
    "contactInfo": {
        "email": "jane@x.com",
        "phone": "+1 555 0100",
        "linkedin": "linkedin.com/in/jane",
        "website": "https://www.janedoe.dev",
        "location": "Berlin"
    },
    "professionalSummary": "Engineer who ships reliable data platforms.",
    "skills": ["SQL", "Machine Learning"],
    "experience": [{
        "company": "Acme",
        "role": "Staff Engineer",
        "date": "2020 - Present",
        "location": "Remote",
        "description": ["One", "Two", "Three", "Four", "Five", "Six"]
    }],
    "education": [{ "institution": "TU Berlin", "degree": "MSc Informatics", "date": "2016", "gpa": 3.9 }],
    "projects": [{
        "name": "Ledger",
        "description": "A double entry bookkeeping engine that reconciles payouts across providers and currencies every night without manual steps",
        "techStack": ["Rust", "Postgres", "Kafka", "gRPC", "Redis", "Terraform", "K8s"],
        "link": "github.com/jane/ledger"
    }],
    "certifications": ["CKA"],
    "languages": ["English", "German"],
    "achievements": ["Cut cloud spend by 40%"]
}"#;

fn resume(json: &str) -> OptimizedResume {
    OptimizedResume::from_json(json).expect("valid resume")
}

/// Concatenates every part of the DOCX package so text and relationship targets can be
/// searched together.
fn docx_parts(bytes: &[u8]) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("docx is a zip archive");
    let mut all = String::new();
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).expect("zip entry");
        let mut part = String::new();
        if entry.read_to_string(&mut part).is_ok() {
            all.push_str(&part);
        }
    }
    all
}

/// Returns the contents of every `<w:t>` run text element in document order.
fn document_text(bytes: &[u8]) -> Vec<String> {
    let xml = docx_parts(bytes);
    let mut texts = Vec::new();
    let mut rest = xml.as_str();
    while let Some(start) = rest.find("<w:t") {
        rest = &rest[start + "<w:t".len()..];
        if !(rest.starts_with('>') || rest.starts_with(' ')) {
            continue;
        }
        let Some(open_end) = rest.find('>') else { break };
        if rest[..open_end].ends_with('/') {
            rest = &rest[open_end + 1..];
            continue;
        }
        let body = &rest[open_end + 1..];
        let Some(close) = body.find("</w:t>") else { break };
        texts.push(body[..close].to_owned());
        rest = &body[close..];
    }
    texts
}

#[test]
fn docx_minimal_resume_shows_only_present_sections() {
    let bytes = render_docx(&resume(MINIMAL)).expect("render docx");
    assert!(bytes.starts_with(b"PK"));

    let parts = docx_parts(&bytes);
    assert!(parts.contains("JANE DOE"));
    assert!(parts.contains("CONTACT"));
    assert!(parts.contains("SKILLS"));
    assert!(parts.contains("SQL"));
    assert!(parts.contains("mailto:jane@x.com"));
    for absent in [
        "PROJECTS",
        "EDUCATION",
        "PROFESSIONAL EXPERIENCE",
        "PROFESSIONAL SUMMARY",
        "KEY ACHIEVEMENTS",
        "CERTIFICATIONS",
        "LANGUAGES",
        "PHONE",
    ] {
        assert!(!parts.contains(absent), "unexpected section {absent}");
    }
}

#[test]
fn docx_links_use_normalized_targets() {
    let parts = docx_parts(&render_docx(&resume(FULL)).expect("render docx"));
    assert!(parts.contains("https://linkedin.com/in/jane"));
    assert!(parts.contains("https://www.janedoe.dev"));
    assert!(parts.contains("tel:+15550100"));
    assert!(parts.contains("https://github.com/jane/ledger"));
    assert!(parts.contains("janedoe.dev"));
}

#[test]
fn docx_truncates_descriptions_and_caps_tech_stack() {
    let text = document_text(&render_docx(&resume(FULL)).expect("render docx")).join("\n");
    assert!(text.contains("A double entry bookkeeping engine"));
    assert!(text.contains("..."));
    assert!(!text.contains("without manual steps"));
    assert!(text.contains("Rust • Postgres • Kafka • gRPC • Redis"));
    assert!(!text.contains("Terraform"));
    assert!(text.contains("GPA: 3.9"));
}

#[test]
fn docx_keeps_bullet_order() {
    let text = document_text(&render_docx(&resume(FULL)).expect("render docx"));
    let bullets: Vec<&str> = text
        .iter()
        .map(String::as_str)
        .filter(|line| ["One", "Two", "Three", "Four", "Five", "Six"].contains(line))
        .collect();
    assert_eq!(bullets, vec!["One", "Two", "Three", "Four", "Five", "Six"]);
    assert_eq!(text.iter().filter(|line| line.starts_with('▸')).count(), 6);
}

#[test]
fn docx_text_is_stable_across_renders() {
    let model = resume(FULL);
    let first = document_text(&render_docx(&model).expect("first render"));
    let second = document_text(&render_docx(&model).expect("second render"));
    assert_eq!(first, second);
}

const POINTS_PER_MM: f64 = 72.0 / 25.4;

/// Renders with fonts from the environment.
///
/// Without fonts the test is skipped with a message; on CI (`CI` set) missing fonts fail the
/// test instead, so PDF coverage cannot silently disappear there.
fn render_pdf_with_fonts(json: &str, test: &str) -> Option<RenderedPdf> {
    let plan = ResumePlan::from_resume(&resume(json));
    match PdfRenderer::new(RenderOptions::from_env()).render_document(&plan) {
        Ok(rendered) => Some(rendered),
        Err(RenderError::FontLoad(err)) => {
            assert!(
                env::var_os("CI").is_none(),
                "{test}: fonts are required on CI. Set RESUME_RENDER_FONTS_DIR. {err}"
            );
            eprintln!("Skipping {test}: {err}");
            None
        }
        Err(other) => panic!("{test}: render pdf: {other}"),
    }
}

fn scrub_pdf(bytes: &[u8]) -> Vec<u8> {
    fn scrub_segment(data: &mut [u8], tag: &[u8], terminator: u8) {
        let mut index = 0;
        while index + tag.len() < data.len() {
            if data[index..].starts_with(tag) {
                let mut cursor = index + tag.len();
                while cursor < data.len() && data[cursor] != terminator {
                    if terminator == b')'
                        || !matches!(data[cursor], b'<' | b'>' | b' ' | b'\n' | b'\r' | b'\t')
                    {
                        data[cursor] = b'0';
                    }
                    cursor += 1;
                }
                index = cursor;
            } else {
                index += 1;
            }
        }
    }

    let mut normalized = bytes.to_vec();
    scrub_segment(&mut normalized, b"/CreationDate(", b')');
    scrub_segment(&mut normalized, b"/ModDate(", b')');
    scrub_segment(&mut normalized, b"/ID[", b']');
    scrub_segment(&mut normalized, b"/Producer(", b')');
    normalized
}

fn normalized_hash(bytes: &[u8]) -> [u8; 32] {
    Sha256::digest(scrub_pdf(bytes)).into()
}

fn number(object: &Object) -> f64 {
    match object {
        Object::Integer(value) => *value as f64,
        Object::Real(value) => f64::from(*value),
        other => panic!("expected a number, got {other:?}"),
    }
}

fn close(actual: f64, expected: f64, tolerance: f64) -> bool {
    (actual - expected).abs() <= tolerance
}

/// A filled rectangle decoded from a page content stream, in points.
#[derive(Debug)]
struct PaintedFill {
    color: [f64; 3],
    rect: [f64; 4],
}

impl PaintedFill {
    fn has_color(&self, rgb: Rgb) -> bool {
        let Rgb(r, g, b) = rgb;
        [r, g, b]
            .iter()
            .zip(self.color)
            .all(|(expected, actual)| close(actual, f64::from(*expected) / 255.0, 1e-3))
    }
}

/// Every `re` followed by `f` on the page, with the fill color set by the last `rg`.
fn painted_fills(bytes: &[u8], page: u32) -> Vec<PaintedFill> {
    let document = Document::load_mem(bytes).expect("valid pdf");
    let page_id = *document.get_pages().get(&page).expect("page exists");
    let content = document.get_page_content(page_id).expect("page content");
    let operations = Content::decode(&content).expect("decodable content").operations;

    let mut fills = Vec::new();
    let mut color = [0.0; 3];
    for (index, operation) in operations.iter().enumerate() {
        match operation.operator.as_str() {
            "rg" if operation.operands.len() == 3 => {
                for (slot, operand) in color.iter_mut().zip(&operation.operands) {
                    *slot = number(operand);
                }
            }
            "re" if operations.get(index + 1).map(|next| next.operator.as_str()) == Some("f") => {
                let mut rect = [0.0; 4];
                for (slot, operand) in rect.iter_mut().zip(&operation.operands) {
                    *slot = number(operand);
                }
                fills.push(PaintedFill { color, rect });
            }
            _ => {}
        }
    }
    fills
}

#[derive(Debug)]
struct LinkAnnotation {
    page: u32,
    target: String,
    rect: [f64; 4],
}

fn link_annotations(bytes: &[u8]) -> Vec<LinkAnnotation> {
    let document = Document::load_mem(bytes).expect("valid pdf");
    let mut links = Vec::new();
    for (page, page_id) in document.get_pages() {
        let dictionary = document.get_dictionary(page_id).expect("page dictionary");
        let Ok(annotations) = dictionary.get(b"Annots").and_then(Object::as_array) else {
            continue;
        };
        for annotation in annotations {
            let annotation = match annotation {
                Object::Reference(id) => document.get_dictionary(*id).expect("annotation"),
                Object::Dictionary(dictionary) => dictionary,
                other => panic!("unexpected annotation {other:?}"),
            };
            let target = annotation
                .get(b"A")
                .and_then(Object::as_dict)
                .and_then(|action| action.get(b"URI"))
                .and_then(Object::as_str)
                .expect("URI action");
            let mut rect = [0.0; 4];
            let values = annotation
                .get(b"Rect")
                .and_then(Object::as_array)
                .expect("annotation rect");
            for (slot, value) in rect.iter_mut().zip(values) {
                *slot = number(value);
            }
            links.push(LinkAnnotation {
                page,
                target: String::from_utf8_lossy(target).into_owned(),
                rect,
            });
        }
    }
    links
}

fn placed_texts(rendered: &RenderedPdf) -> Vec<&str> {
    rendered
        .placements
        .iter()
        .map(|placement| placement.text.as_str())
        .collect()
}

fn sidebar_width_pt() -> f64 {
    layout::PAGE_WIDTH_MM * f64::from(layout::SIDEBAR_PERCENT) / 100.0 * POINTS_PER_MM
}

#[test]
fn pdf_minimal_resume_shows_only_present_sections() {
    let test = "pdf_minimal_resume_shows_only_present_sections";
    let Some(rendered) = render_pdf_with_fonts(MINIMAL, test) else {
        return;
    };
    assert!(rendered.bytes.starts_with(b"%PDF"));
    assert_eq!(rendered.pages, 1);

    let texts = placed_texts(&rendered);
    for present in ["JANE DOE", "CONTACT", "EMAIL", "jane@x.com", "SKILLS", "SQL"] {
        assert!(texts.contains(&present), "missing {present} in {texts:?}");
    }
    for absent in [
        "PROJECTS",
        "EDUCATION",
        "PROFESSIONAL EXPERIENCE",
        "PROFESSIONAL SUMMARY",
        "KEY ACHIEVEMENTS",
        "CERTIFICATIONS",
        "LANGUAGES",
        "PHONE",
    ] {
        assert!(!texts.contains(&absent), "unexpected section {absent}");
    }
    assert!(rendered
        .placements
        .iter()
        .all(|placement| placement.column == Column::Sidebar));

    let links = link_annotations(&rendered.bytes);
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].target, "mailto:jane@x.com");
}

#[test]
fn pdf_paints_sidebar_band_rules_and_tags() {
    let test = "pdf_paints_sidebar_band_rules_and_tags";
    let Some(rendered) = render_pdf_with_fonts(MINIMAL, test) else {
        return;
    };
    let fills = painted_fills(&rendered.bytes, 1);

    let band = fills
        .iter()
        .find(|fill| fill.has_color(palette::PRIMARY))
        .expect("sidebar band is painted");
    assert!(close(band.rect[0], 0.0, 0.01));
    assert!(close(band.rect[1], 0.0, 0.01));
    assert!(close(band.rect[2], sidebar_width_pt(), 0.5));
    assert!(close(band.rect[3], layout::PAGE_HEIGHT_MM * POINTS_PER_MM, 0.5));

    // One accent rule under CONTACT and one under SKILLS.
    let rules = fills
        .iter()
        .filter(|fill| fill.has_color(palette::ACCENT))
        .count();
    assert_eq!(rules, 2);

    let tags: Vec<&PaintedFill> = fills
        .iter()
        .filter(|fill| fill.has_color(palette::TAG_FILL))
        .collect();
    assert_eq!(tags.len(), 1);
    assert!(tags[0].rect[0] + tags[0].rect[2] <= sidebar_width_pt());
}

#[test]
fn pdf_full_resume_applies_text_budgets() {
    let test = "pdf_full_resume_applies_text_budgets";
    let Some(rendered) = render_pdf_with_fonts(FULL, test) else {
        return;
    };
    let texts = placed_texts(&rendered);

    let description = texts
        .iter()
        .find(|text| text.starts_with("A double entry bookkeeping engine"))
        .expect("project description placed");
    assert!(description.chars().count() <= 93);
    assert!(description.ends_with("..."));
    assert!(texts.contains(&"Rust • Postgres • Kafka • gRPC • Redis"));
    assert!(!texts.iter().any(|text| text.contains("Terraform")));

    let bullets: Vec<&str> = texts
        .iter()
        .copied()
        .filter(|text| text.starts_with('▸'))
        .collect();
    assert_eq!(
        bullets,
        vec!["▸ One", "▸ Two", "▸ Three", "▸ Four", "▸ Five", "▸ Six"]
    );

    let column_of = |text: &str| {
        rendered
            .placements
            .iter()
            .find(|placement| placement.text == text)
            .map(|placement| placement.column)
    };
    assert_eq!(column_of("SKILLS"), Some(Column::Sidebar));
    assert_eq!(column_of("PROFESSIONAL EXPERIENCE"), Some(Column::Main));

    let tags = painted_fills(&rendered.bytes, 1)
        .into_iter()
        .filter(|fill| fill.has_color(palette::TAG_FILL))
        .count();
    assert_eq!(tags, 2);
}

#[test]
fn pdf_full_resume_links_every_target() {
    let test = "pdf_full_resume_links_every_target";
    let Some(rendered) = render_pdf_with_fonts(FULL, test) else {
        return;
    };
    let targets: Vec<String> = link_annotations(&rendered.bytes)
        .into_iter()
        .map(|link| link.target)
        .collect();
    for expected in [
        "mailto:jane@x.com",
        "tel:+15550100",
        "https://linkedin.com/in/jane",
        "https://www.janedoe.dev",
        "https://github.com/jane/ledger",
    ] {
        assert!(
            targets.iter().any(|target| target == expected),
            "missing link {expected} in {targets:?}"
        );
    }
}

#[test]
fn pdf_long_email_wraps_inside_the_sidebar() {
    let test = "pdf_long_email_wraps_inside_the_sidebar";
    let email = "jane.doe.with.a.really.long.mailbox.name@engineering.example-company.com";
    let json = format!(r#"{{"fullName":"Jane Doe","contactInfo":{{"email":"{email}"}}}}"#);
    let Some(rendered) = render_pdf_with_fonts(&json, test) else {
        return;
    };

    let sidebar_width_mm = layout::PAGE_WIDTH_MM * f64::from(layout::SIDEBAR_PERCENT) / 100.0;
    let placement = rendered
        .placements
        .iter()
        .find(|placement| placement.text == email)
        .expect("email placed");
    assert_eq!(placement.column, Column::Sidebar);
    assert!(placement.rect.x_mm + placement.rect.width_mm <= sidebar_width_mm);

    let target = format!("mailto:{email}");
    let lines: Vec<LinkAnnotation> = link_annotations(&rendered.bytes)
        .into_iter()
        .filter(|link| link.target == target)
        .collect();
    assert!(lines.len() > 1, "expected a wrapped link, got {lines:?}");
    for line in &lines {
        assert_eq!(line.page, 1);
        assert!(line.rect[2] <= sidebar_width_pt().ceil(), "{line:?} leaves the sidebar");
    }
}

#[test]
fn pdf_rendering_is_deterministic() {
    let test = "pdf_rendering_is_deterministic";
    let (Some(first), Some(second)) = (
        render_pdf_with_fonts(FULL, test),
        render_pdf_with_fonts(FULL, test),
    ) else {
        return;
    };

    assert_eq!(first.bytes.len(), second.bytes.len(), "PDF sizes should match");
    assert_eq!(
        normalized_hash(&first.bytes),
        normalized_hash(&second.bytes),
        "PDF renders must be deterministic after metadata normalization"
    );
    assert_eq!(first.placements, second.placements);
}

#[test]
fn pdf_overflowing_content_spills_to_more_pages() {
    let test = "pdf_overflowing_content_spills_to_more_pages";
    let bullets: Vec<String> = (1..=150)
        .map(|index| format!("\"Delivered milestone number {index} on schedule\""))
        .collect();
    let json = format!(
        r#"{{"fullName":"Jane Doe","experience":[{{"company":"Acme","role":"Engineer","date":"2020","description":[{}]}}]}}"#,
        bullets.join(",")
    );
    let Some(rendered) = render_pdf_with_fonts(&json, test) else {
        return;
    };

    let pages = Document::load_mem(&rendered.bytes)
        .expect("valid pdf")
        .get_pages()
        .len();
    assert!(pages > 1, "expected several pages, got {pages}");
    assert_eq!(rendered.pages, pages);

    for page in 1..=pages {
        let band = painted_fills(&rendered.bytes, page as u32)
            .into_iter()
            .filter(|fill| fill.has_color(palette::PRIMARY))
            .count();
        assert_eq!(band, 1, "page {page} should carry the sidebar band");
    }

    let last = rendered
        .placements
        .iter()
        .filter(|placement| placement.text.starts_with('▸'))
        .last()
        .expect("bullets placed");
    assert_eq!(last.text, "▸ Delivered milestone number 150 on schedule");
    assert_eq!(last.page, pages);
    assert!(rendered.placements_on(2).count() > 0);
}
