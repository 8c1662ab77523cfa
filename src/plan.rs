//! Format-neutral render plan shared by the PDF and DOCX renderers.
//!
//! [`ResumePlan::from_resume`] decides, once, what both formats show: which sections exist,
//! in which order, with which text, spans, link targets and spacing. Truncation, link
//! normalization and tech stack capping happen here, so the two renderers cannot disagree on
//! them. The renderers only map [`Block`]s onto their native layout primitives.

use crate::model::{non_blank, OptimizedResume};
use crate::richtext::{self, Span};
use crate::style::{budget, glyph, palette, size, Rgb};

/// The column a section is placed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Column {
    /// The narrow, shaded column.
    Sidebar,
    /// The wide column on the page background.
    Main,
}

/// Identifies the sections of a résumé in their rendering order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SectionKind {
    /// Name and subtitle at the top of the sidebar.
    Header,
    Contact,
    Skills,
    Education,
    Projects,
    Certifications,
    Languages,
    Summary,
    Experience,
    Achievements,
}

impl SectionKind {
    /// Returns the heading shown above the section, if it has one.
    pub fn title(self) -> Option<&'static str> {
        match self {
            SectionKind::Header => None,
            SectionKind::Contact => Some("CONTACT"),
            SectionKind::Skills => Some("SKILLS"),
            SectionKind::Education => Some("EDUCATION"),
            SectionKind::Projects => Some("PROJECTS"),
            SectionKind::Certifications => Some("CERTIFICATIONS"),
            SectionKind::Languages => Some("LANGUAGES"),
            SectionKind::Summary => Some("PROFESSIONAL SUMMARY"),
            SectionKind::Experience => Some("PROFESSIONAL EXPERIENCE"),
            SectionKind::Achievements => Some("KEY ACHIEVEMENTS"),
        }
    }

    /// Returns the column the section belongs to.
    pub fn column(self) -> Column {
        match self {
            SectionKind::Summary | SectionKind::Experience | SectionKind::Achievements => {
                Column::Main
            }
            _ => Column::Sidebar,
        }
    }
}

/// Horizontal alignment of a paragraph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Alignment {
    #[default]
    Left,
    /// Fully justified; the last line stays left aligned.
    Justified,
}

/// A section heading with a colored rule underneath.
///
/// Sidebar headings use the accent color, main headings the secondary color.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Heading {
    text: String,
    column: Column,
}

impl Heading {
    fn new(text: impl Into<String>, column: Column) -> Self {
        Self {
            text: text.into(),
            column,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn column(&self) -> Column {
        self.column
    }

    /// Color used for both the heading text and its rule.
    pub fn color(&self) -> Rgb {
        match self.column {
            Column::Sidebar => palette::ACCENT,
            Column::Main => palette::SECONDARY,
        }
    }

    /// Font size in points.
    pub fn size(&self) -> u8 {
        match self.column {
            Column::Sidebar => size::SIDEBAR_HEADING,
            Column::Main => size::MAIN_HEADING,
        }
    }

    /// Thickness of the rule in points.
    pub fn rule_weight(&self) -> f64 {
        match self.column {
            Column::Sidebar => 0.5,
            Column::Main => 1.0,
        }
    }

    /// Space above the heading in points.
    pub fn space_before(&self) -> f64 {
        match self.column {
            Column::Sidebar => 10.0,
            Column::Main => 8.0,
        }
    }

    /// Space below the rule in points.
    pub fn space_after(&self) -> f64 {
        match self.column {
            Column::Sidebar => 4.0,
            Column::Main => 6.0,
        }
    }

    /// Returns the heading as a bold span.
    pub fn span(&self) -> Span {
        Span::new(self.text.clone(), self.size(), self.color()).bold()
    }
}

/// Rich text paragraph with alignment, spacing and an optional link target.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Paragraph {
    spans: Vec<Span>,
    alignment: Alignment,
    indented: bool,
    space_before: f64,
    space_after: f64,
    link: Option<String>,
}

impl Paragraph {
    /// Creates a left-aligned paragraph from the provided spans.
    pub fn new(spans: impl Into<Vec<Span>>) -> Self {
        Self {
            spans: spans.into(),
            ..Self::default()
        }
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    /// Whether the paragraph is indented as a bullet line.
    pub fn is_indented(&self) -> bool {
        self.indented
    }

    /// Space above the paragraph in points.
    pub fn space_before(&self) -> f64 {
        self.space_before
    }

    /// Space below the paragraph in points.
    pub fn space_after(&self) -> f64 {
        self.space_after
    }

    /// Link target of the whole paragraph, if it is a hyperlink.
    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    /// Returns the concatenated text of all spans.
    pub fn text(&self) -> String {
        richtext::plain_text(&self.spans)
    }

    fn justified(mut self) -> Self {
        self.alignment = Alignment::Justified;
        self
    }

    fn indented(mut self) -> Self {
        self.indented = true;
        self
    }

    fn spacing(mut self, before: f64, after: f64) -> Self {
        self.space_before = before;
        self.space_after = after;
        self
    }

    fn linked(mut self, target: impl Into<String>) -> Self {
        self.link = Some(target.into());
        self
    }
}

/// Inline tags that wrap between tags but never inside one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagList {
    tags: Vec<Span>,
    fill: Rgb,
}

impl TagList {
    pub fn tags(&self) -> &[Span] {
        &self.tags
    }

    /// Background color of each tag.
    pub fn fill(&self) -> Rgb {
        self.fill
    }
}

/// Individual content blocks that make up a section.
#[derive(Clone, Debug, PartialEq)]
pub enum Block {
    Heading(Heading),
    Paragraph(Paragraph),
    Tags(TagList),
}

impl Block {
    /// Returns the visible text of the block, one line per tag.
    pub fn text(&self) -> String {
        match self {
            Block::Heading(heading) => heading.text().to_owned(),
            Block::Paragraph(paragraph) => paragraph.text(),
            Block::Tags(tags) => tags
                .tags()
                .iter()
                .map(Span::text)
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// One rendered section: its heading (if any) followed by its content blocks.
#[derive(Clone, Debug, PartialEq)]
pub struct Section {
    kind: SectionKind,
    blocks: Vec<Block>,
}

impl Section {
    fn new(kind: SectionKind) -> Self {
        let blocks = kind
            .title()
            .map(|title| Block::Heading(Heading::new(title, kind.column())))
            .into_iter()
            .collect();
        Self { kind, blocks }
    }

    fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    fn paragraph(&mut self, paragraph: Paragraph) {
        self.push(Block::Paragraph(paragraph));
    }

    pub fn kind(&self) -> SectionKind {
        self.kind
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Returns the paragraphs of the section in order.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Paragraph(paragraph) => Some(paragraph),
            _ => None,
        })
    }
}

/// One entry of the contact section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContactRow {
    pub label: &'static str,
    pub display: String,
    pub target: Option<String>,
}

/// The complete, ordered content of a résumé document.
#[derive(Clone, Debug, PartialEq)]
pub struct ResumePlan {
    title: String,
    sidebar: Vec<Section>,
    main: Vec<Section>,
}

impl ResumePlan {
    /// Builds the plan for the given résumé. Sections without content are left out.
    pub fn from_resume(resume: &OptimizedResume) -> Self {
        let mut sidebar = vec![header_section(resume)];
        sidebar.extend(contact_section(resume));
        sidebar.extend(skills_section(resume));
        sidebar.extend(education_section(resume));
        sidebar.extend(projects_section(resume));
        sidebar.extend(string_list_section(
            SectionKind::Certifications,
            &resume.certifications,
        ));
        sidebar.extend(string_list_section(
            SectionKind::Languages,
            &resume.languages,
        ));

        let mut main = Vec::new();
        main.extend(summary_section(resume));
        main.extend(experience_section(resume));
        main.extend(achievements_section(resume));

        let plan = Self {
            title: resume.display_name().to_owned(),
            sidebar,
            main,
        };
        log::debug!(
            "render plan: sidebar {:?}, main {:?}",
            plan.sidebar.iter().map(Section::kind).collect::<Vec<_>>(),
            plan.main.iter().map(Section::kind).collect::<Vec<_>>()
        );
        plan
    }

    /// Document title metadata; the display name as written in the model.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn sidebar(&self) -> &[Section] {
        &self.sidebar
    }

    pub fn main(&self) -> &[Section] {
        &self.main
    }

    /// Returns the section of the given kind, if it is part of the plan.
    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sidebar
            .iter()
            .chain(self.main.iter())
            .find(|section| section.kind == kind)
    }

    /// Visible text of the whole plan, one block per line, sidebar first.
    pub fn text(&self) -> String {
        self.sidebar
            .iter()
            .chain(self.main.iter())
            .flat_map(|section| section.blocks.iter().map(Block::text))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Truncates a project description to the shared character budget.
///
/// Text longer than the budget is cut, trailing whitespace removed and the ellipsis appended;
/// shorter text is returned unchanged.
pub fn truncate_description(description: &str) -> String {
    let description = description.trim();
    if description.chars().count() <= budget::PROJECT_DESCRIPTION_CHARS {
        return description.to_owned();
    }
    let cut: String = description
        .chars()
        .take(budget::PROJECT_DESCRIPTION_CHARS)
        .collect();
    format!("{}{}", cut.trim_end(), budget::ELLIPSIS)
}

/// Joins the first tech stack entries with the separator glyph.
pub fn tech_line(tech_stack: &[String]) -> Option<String> {
    let entries: Vec<&str> = tech_stack
        .iter()
        .map(|entry| entry.trim())
        .filter(|entry| !entry.is_empty())
        .take(budget::TECH_STACK_ENTRIES)
        .collect();
    if entries.is_empty() {
        None
    } else {
        Some(entries.join(format!(" {} ", glyph::SEPARATOR).as_str()))
    }
}

/// Returns the link target for a stored URL, adding `https://` when it has no scheme.
pub fn normalize_link(url: &str) -> String {
    let url = url.trim();
    if url.starts_with("https://") || url.starts_with("http://") {
        url.to_owned()
    } else {
        format!("https://{url}")
    }
}

/// Returns the display text for a stored URL: scheme and `www.` dropped, cut to the budget.
pub fn link_display_text(url: &str) -> String {
    let url = url.trim();
    let without_scheme = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    let bare = without_scheme
        .strip_prefix("www.")
        .unwrap_or(without_scheme);
    bare.chars().take(budget::LINK_DISPLAY_CHARS).collect()
}

/// Builds the contact rows in display order, skipping absent fields.
pub fn contact_rows(resume: &OptimizedResume) -> Vec<ContactRow> {
    let contact = &resume.contact_info;
    let mut rows = Vec::new();

    if let Some(email) = non_blank(contact.email.as_deref()) {
        rows.push(ContactRow {
            label: "EMAIL",
            display: email.to_owned(),
            target: Some(format!("mailto:{email}")),
        });
    }
    if let Some(phone) = non_blank(contact.phone.as_deref()) {
        let dialable: String = phone.chars().filter(|ch| !ch.is_whitespace()).collect();
        rows.push(ContactRow {
            label: "PHONE",
            display: phone.to_owned(),
            target: Some(format!("tel:{dialable}")),
        });
    }
    if let Some(linkedin) = non_blank(contact.linkedin.as_deref()) {
        rows.push(ContactRow {
            label: "LINKEDIN",
            display: link_display_text(linkedin),
            target: Some(normalize_link(linkedin)),
        });
    }
    if let Some(website) = non_blank(contact.website.as_deref()) {
        rows.push(ContactRow {
            label: "PORTFOLIO",
            display: link_display_text(website),
            target: Some(normalize_link(website)),
        });
    }
    if let Some(location) = non_blank(contact.location.as_deref()) {
        rows.push(ContactRow {
            label: "LOCATION",
            display: location.to_owned(),
            target: None,
        });
    }

    rows
}

fn header_section(resume: &OptimizedResume) -> Section {
    let mut section = Section::new(SectionKind::Header);
    section.paragraph(
        Paragraph::new(vec![Span::new(
            resume.display_name().to_uppercase(),
            size::NAME,
            palette::WHITE,
        )
        .bold()])
        .spacing(0.0, 2.0),
    );

    let subtitle = resume
        .experience
        .first()
        .and_then(|entry| non_blank(Some(entry.role.as_str())));
    if let Some(role) = subtitle {
        section.paragraph(
            Paragraph::new(vec![
                Span::new(role, size::SUBTITLE, palette::ACCENT).bold()
            ])
            .spacing(0.0, 8.0),
        );
    }
    section
}

fn contact_section(resume: &OptimizedResume) -> Option<Section> {
    let rows = contact_rows(resume);
    if rows.is_empty() {
        return None;
    }

    let mut section = Section::new(SectionKind::Contact);
    for row in rows {
        section.paragraph(Paragraph::new(vec![Span::new(
            row.label,
            size::CONTACT_LABEL,
            palette::MUTED,
        )]));
        let value = match row.target {
            Some(target) => {
                let mut span = Span::new(row.display, size::CONTACT_VALUE, palette::ACCENT);
                if row.label == "LINKEDIN" || row.label == "PORTFOLIO" {
                    span = span.underline();
                }
                Paragraph::new(vec![span]).linked(target)
            }
            None => Paragraph::new(vec![Span::new(
                row.display,
                size::CONTACT_VALUE,
                palette::WHITE,
            )]),
        };
        section.paragraph(value.spacing(0.0, 3.0));
    }
    Some(section)
}

fn skills_section(resume: &OptimizedResume) -> Option<Section> {
    let tags: Vec<Span> = resume
        .skills
        .iter()
        .filter_map(|skill| non_blank(Some(skill.as_str())))
        .map(|skill| Span::new(skill, size::SKILL_TAG, palette::WHITE))
        .collect();
    if tags.is_empty() {
        return None;
    }

    let mut section = Section::new(SectionKind::Skills);
    section.push(Block::Tags(TagList {
        tags,
        fill: palette::TAG_FILL,
    }));
    Some(section)
}

fn education_section(resume: &OptimizedResume) -> Option<Section> {
    if resume.education.is_empty() {
        return None;
    }

    let mut section = Section::new(SectionKind::Education);
    for entry in &resume.education {
        if let Some(degree) = non_blank(Some(entry.degree.as_str())) {
            section.paragraph(Paragraph::new(vec![
                Span::new(degree, size::DEGREE, palette::WHITE).bold()
            ]));
        }
        if let Some(institution) = non_blank(Some(entry.institution.as_str())) {
            section.paragraph(Paragraph::new(vec![Span::new(
                institution,
                size::INSTITUTION,
                palette::ACCENT,
            )]));
        }
        let meta = joined_meta(
            &entry.date,
            non_blank(entry.gpa.as_deref())
                .map(|gpa| format!("GPA: {gpa}"))
                .as_deref(),
        );
        section.paragraph(
            Paragraph::new(vec![Span::new(meta, size::SIDEBAR_META, palette::MUTED)])
                .spacing(0.0, 5.0),
        );
    }
    Some(section)
}

fn projects_section(resume: &OptimizedResume) -> Option<Section> {
    if resume.projects.is_empty() {
        return None;
    }

    let mut section = Section::new(SectionKind::Projects);
    for project in &resume.projects {
        let name = Paragraph::new(vec![
            Span::new(project.name.trim(), size::PROJECT_NAME, palette::WHITE).bold()
        ]);
        section.paragraph(match non_blank(project.link.as_deref()) {
            Some(link) => name.linked(normalize_link(link)),
            None => name,
        });

        let description = truncate_description(&project.description);
        if !description.is_empty() {
            section.paragraph(Paragraph::new(vec![Span::new(
                description,
                size::PROJECT_DETAIL,
                palette::SOFT,
            )]));
        }

        let tech = project.tech_stack.as_deref().and_then(tech_line);
        if let Some(tech) = tech {
            section.paragraph(Paragraph::new(vec![Span::new(
                tech,
                size::PROJECT_DETAIL,
                palette::ACCENT,
            )]));
        }

        if let Some(Block::Paragraph(last)) = section.blocks.last_mut() {
            last.space_after = 4.0;
        }
    }
    Some(section)
}

fn string_list_section(kind: SectionKind, items: &[String]) -> Option<Section> {
    let items: Vec<&str> = items
        .iter()
        .filter_map(|item| non_blank(Some(item.as_str())))
        .collect();
    if items.is_empty() {
        return None;
    }

    let mut section = Section::new(kind);
    for item in items {
        section.paragraph(
            Paragraph::new(vec![Span::new(
                format!("{} {item}", glyph::LIST_BULLET),
                size::SIDEBAR_ITEM,
                palette::WHITE,
            )])
            .spacing(0.0, 2.0),
        );
    }
    Some(section)
}

fn summary_section(resume: &OptimizedResume) -> Option<Section> {
    let summary = non_blank(Some(resume.professional_summary.as_str()))?;
    let mut section = Section::new(SectionKind::Summary);
    section.paragraph(
        Paragraph::new(vec![Span::new(summary, size::BODY, palette::TEXT)])
            .justified()
            .spacing(0.0, 6.0),
    );
    Some(section)
}

fn experience_section(resume: &OptimizedResume) -> Option<Section> {
    if resume.experience.is_empty() {
        return None;
    }

    let mut section = Section::new(SectionKind::Experience);
    for entry in &resume.experience {
        if let Some(role) = non_blank(Some(entry.role.as_str())) {
            section.paragraph(Paragraph::new(vec![
                Span::new(role, size::ROLE, palette::PRIMARY).bold()
            ]));
        }
        if let Some(company) = non_blank(Some(entry.company.as_str())) {
            section.paragraph(
                Paragraph::new(vec![
                    Span::new(company, size::COMPANY, palette::SECONDARY).bold()
                ])
                .spacing(1.0, 0.0),
            );
        }
        let meta = joined_meta(&entry.date, non_blank(entry.location.as_deref()));
        if !meta.is_empty() {
            section.paragraph(
                Paragraph::new(vec![Span::new(
                    meta,
                    size::EXPERIENCE_META,
                    palette::TEXT_LIGHT,
                )])
                .spacing(1.0, 3.0),
            );
        }
        for bullet in entry
            .description
            .iter()
            .filter_map(|bullet| non_blank(Some(bullet.as_str())))
        {
            section.paragraph(
                marked_line(glyph::EXPERIENCE_BULLET, palette::ACCENT, bullet).spacing(0.0, 3.0),
            );
        }
        if let Some(Block::Paragraph(last)) = section.blocks.last_mut() {
            last.space_after = 8.0;
        }
    }
    Some(section)
}

fn achievements_section(resume: &OptimizedResume) -> Option<Section> {
    let items: Vec<&str> = resume
        .achievements
        .iter()
        .filter_map(|item| non_blank(Some(item.as_str())))
        .collect();
    if items.is_empty() {
        return None;
    }

    let mut section = Section::new(SectionKind::Achievements);
    for item in items {
        section.paragraph(
            marked_line(glyph::ACHIEVEMENT_STAR, palette::HIGHLIGHT, item).spacing(0.0, 4.0),
        );
    }
    Some(section)
}

fn marked_line(marker: &str, marker_color: Rgb, text: &str) -> Paragraph {
    Paragraph::new(vec![
        Span::new(format!("{marker} "), size::BODY, marker_color).bold(),
        Span::new(text, size::BODY, palette::TEXT),
    ])
    .indented()
}

fn joined_meta(date: &str, extra: Option<&str>) -> String {
    let date = date.trim();
    match extra {
        Some(extra) if date.is_empty() => extra.to_owned(),
        Some(extra) => format!("{date} {} {extra}", glyph::SEPARATOR),
        None => date.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContactInfo, Education, Experience, Project};

    fn minimal() -> OptimizedResume {
        OptimizedResume {
            full_name: Some("Jane Doe".into()),
            contact_info: ContactInfo {
                email: Some("jane@x.com".into()),
                ..ContactInfo::default()
            },
            skills: vec!["SQL".into()],
            ..OptimizedResume::default()
        }
    }

    fn kinds(sections: &[Section]) -> Vec<SectionKind> {
        sections.iter().map(Section::kind).collect()
    }

    #[test]
    fn minimal_model_keeps_only_present_sections() {
        let plan = ResumePlan::from_resume(&minimal());
        assert_eq!(
            kinds(plan.sidebar()),
            vec![
                SectionKind::Header,
                SectionKind::Contact,
                SectionKind::Skills
            ]
        );
        assert!(plan.main().is_empty());
        assert_eq!(plan.title(), "Jane Doe");

        let text = plan.text();
        assert!(text.contains("JANE DOE"));
        assert!(text.contains("SQL"));
        assert!(!text.contains("PROJECTS"));
        assert!(!text.contains("EXPERIENCE"));
    }

    #[test]
    fn email_row_links_to_mailto() {
        let plan = ResumePlan::from_resume(&minimal());
        let contact = plan.section(SectionKind::Contact).expect("contact section");
        let links: Vec<&str> = contact.paragraphs().filter_map(Paragraph::link).collect();
        assert_eq!(links, vec!["mailto:jane@x.com"]);
        assert!(!plan.text().contains("PHONE"));
        assert!(!plan.text().contains("PORTFOLIO"));
    }

    #[test]
    fn linkedin_without_scheme_gets_https_target() {
        let mut resume = minimal();
        resume.contact_info.linkedin = Some("linkedin.com/in/jane".into());
        let rows = contact_rows(&resume);
        let row = rows.iter().find(|row| row.label == "LINKEDIN").expect("row");
        assert_eq!(row.target.as_deref(), Some("https://linkedin.com/in/jane"));
        assert_eq!(row.display, "linkedin.com/in/jane");
    }

    #[test]
    fn link_display_drops_scheme_and_www_and_is_capped() {
        assert_eq!(
            link_display_text("https://www.example.com/portfolio"),
            "example.com/portfolio"
        );
        let long = format!("https://www.{}", "a".repeat(60));
        assert_eq!(link_display_text(&long).chars().count(), 30);
        assert_eq!(normalize_link("http://x.dev"), "http://x.dev");
    }

    #[test]
    fn phone_target_drops_whitespace() {
        let mut resume = minimal();
        resume.contact_info.phone = Some("+1 555 0100".into());
        let rows = contact_rows(&resume);
        assert_eq!(rows[1].target.as_deref(), Some("tel:+15550100"));
        assert_eq!(rows[1].display, "+1 555 0100");
    }

    #[test]
    fn descriptions_are_truncated_with_ellipsis() {
        let long = "x".repeat(200);
        let cut = truncate_description(&long);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 93);
        assert_eq!(truncate_description("short"), "short");

        let multibyte = "é".repeat(120);
        assert_eq!(truncate_description(&multibyte).chars().count(), 93);
    }

    #[test]
    fn tech_stack_is_capped_at_five() {
        let stack: Vec<String> = ["a", "b", "c", "d", "e", "f", "g"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(tech_line(&stack).as_deref(), Some("a • b • c • d • e"));
        assert_eq!(tech_line(&[]), None);
    }

    #[test]
    fn experience_bullets_keep_order_and_glyph() {
        let mut resume = minimal();
        resume.experience = vec![Experience {
            company: "Acme".into(),
            role: "Engineer".into(),
            date: "2020 - 2024".into(),
            location: Some("Berlin".into()),
            description: (1..=6).map(|n| format!("bullet {n}")).collect(),
        }];
        let plan = ResumePlan::from_resume(&resume);

        let experience = plan.section(SectionKind::Experience).expect("experience");
        let bullets: Vec<String> = experience
            .paragraphs()
            .filter(|p| p.is_indented())
            .map(Paragraph::text)
            .collect();
        let expected: Vec<String> = (1..=6).map(|n| format!("▸ bullet {n}")).collect();
        assert_eq!(bullets, expected);
        assert!(plan.text().contains("2020 - 2024 • Berlin"));

        let header = plan.section(SectionKind::Header).expect("header");
        assert_eq!(header.paragraphs().nth(1).map(Paragraph::text).as_deref(), Some("Engineer"));
    }

    #[test]
    fn blank_experience_bullets_are_skipped() {
        let mut resume = minimal();
        resume.experience = vec![Experience {
            company: "Acme".into(),
            role: "Engineer".into(),
            date: "2020".into(),
            location: None,
            description: vec!["Shipped".into(), "".into(), "   ".into(), " Scaled ".into()],
        }];
        let plan = ResumePlan::from_resume(&resume);
        let experience = plan.section(SectionKind::Experience).expect("experience");
        let bullets: Vec<String> = experience
            .paragraphs()
            .filter(|p| p.is_indented())
            .map(Paragraph::text)
            .collect();
        assert_eq!(bullets, vec!["▸ Shipped", "▸ Scaled"]);
        assert!(!plan.text().lines().any(|line| line.trim() == "▸"));
    }

    #[test]
    fn empty_lists_drop_their_sections() {
        let mut resume = minimal();
        resume.certifications = vec!["  ".into()];
        resume.languages = Vec::new();
        resume.achievements = Vec::new();
        resume.projects = Vec::new();
        let plan = ResumePlan::from_resume(&resume);
        for kind in [
            SectionKind::Certifications,
            SectionKind::Languages,
            SectionKind::Achievements,
            SectionKind::Projects,
            SectionKind::Education,
        ] {
            assert!(plan.section(kind).is_none(), "{kind:?} should be absent");
        }
    }

    #[test]
    fn education_meta_appends_gpa_only_when_present() {
        let mut resume = minimal();
        resume.education = vec![
            Education {
                institution: "MIT".into(),
                degree: "BSc".into(),
                date: "2019".into(),
                gpa: Some("3.9".into()),
            },
            Education {
                institution: "ETH".into(),
                degree: "MSc".into(),
                date: "2021".into(),
                gpa: None,
            },
        ];
        let text = ResumePlan::from_resume(&resume).text();
        assert!(text.contains("2019 • GPA: 3.9"));
        assert!(text.lines().any(|line| line == "2021"));
    }

    #[test]
    fn projects_use_shared_policies() {
        let mut resume = minimal();
        resume.projects = vec![Project {
            name: "Indexer".into(),
            description: "y".repeat(150),
            tech_stack: Some((1..=8).map(|n| format!("t{n}")).collect()),
            link: Some("github.com/jane/indexer".into()),
        }];
        let plan = ResumePlan::from_resume(&resume);
        let projects = plan.section(SectionKind::Projects).expect("projects");
        let paragraphs: Vec<&Paragraph> = projects.paragraphs().collect();
        assert_eq!(paragraphs[0].link(), Some("https://github.com/jane/indexer"));
        assert_eq!(paragraphs[1].text(), truncate_description(&"y".repeat(150)));
        assert_eq!(paragraphs[2].text(), "t1 • t2 • t3 • t4 • t5");
    }

    #[test]
    fn headings_use_column_colors() {
        let mut resume = minimal();
        resume.professional_summary = "Summary".into();
        let plan = ResumePlan::from_resume(&resume);
        let heading_color = |section: &Section| match &section.blocks()[0] {
            Block::Heading(heading) => heading.color(),
            other => panic!("expected heading, found {other:?}"),
        };
        assert_eq!(heading_color(&plan.sidebar()[1]), palette::ACCENT);
        assert_eq!(heading_color(&plan.main()[0]), palette::SECONDARY);
    }
}
