//! CLI output formatting for every query command.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. The primary display
//! for every document is its semantic identity (positional index and title),
//! with slug, locale and section details shown as indented context lines.
//!
//! # Output Format
//!
//! ## Pages
//!
//! ```text
//! Pages (tr)
//! 001 Hakkımızda
//!     Slug: hakkimizda
//!     Sections: heroSimple, prose, statsGrid, quote
//! 002 KVKK Aydınlatma Metni
//!     Slug: kvkk
//!     Sections: prose
//! ```
//!
//! ## News
//!
//! ```text
//! News (tr)
//! 001 Ankara'da yeni şube (1 Haziran 2024)
//!     Çankaya şubemiz açıldı.
//! 002 Basın bülteni (undated)
//! ```
//!
//! ## Single page
//!
//! ```text
//! KVKK Aydınlatma Metni
//!     Slug: kvkk
//!     Locale: tr (fallback for en)
//!     001 prose
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::date::format_publish_date;
use crate::markdown::render_markdown;
use crate::types::{PageDocument, Section};
use chrono_tz::Tz;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format an entity header: positional index + title, with optional detail.
///
/// ```text
/// 001 Ayşe Kaya (Operasyon Direktörü)
/// 001 Hakkımızda
/// ```
fn entity_header(index: usize, title: &str, detail: Option<&str>) -> String {
    match detail {
        Some(d) => format!("{} {} ({})", format_index(index), title, d),
        None => format!("{} {}", format_index(index), title),
    }
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn section_kinds(doc: &PageDocument) -> String {
    doc.sections
        .iter()
        .map(Section::kind)
        .collect::<Vec<_>>()
        .join(", ")
}

fn locale_line(doc: &PageDocument, requested_locale: &str) -> String {
    if doc.is_fallback_for(requested_locale) {
        format!("Locale: {} (fallback for {})", doc.locale, requested_locale)
    } else {
        format!("Locale: {}", doc.locale)
    }
}

// ============================================================================
// Listings
// ============================================================================

/// Format every page of a locale.
pub fn format_pages(pages: &[PageDocument], locale: &str) -> Vec<String> {
    let mut lines = vec![format!("Pages ({locale})")];
    for (i, doc) in pages.iter().enumerate() {
        lines.push(entity_header(i + 1, &doc.frontmatter.title, None));
        lines.push(format!("{}Slug: {}", indent(1), doc.slug));
        lines.push(format!("{}Sections: {}", indent(1), section_kinds(doc)));
    }
    if pages.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }
    lines
}

pub fn print_pages(pages: &[PageDocument], locale: &str) {
    print_lines(format_pages(pages, locale));
}

/// Format the news listing with display dates in `zone`.
pub fn format_news(news: &[PageDocument], locale: &str, zone: Tz) -> Vec<String> {
    let mut lines = vec![format!("News ({locale})")];
    for (i, doc) in news.iter().enumerate() {
        let date = doc
            .frontmatter
            .date
            .as_deref()
            .and_then(|d| format_publish_date(d, locale, zone))
            .unwrap_or_else(|| "undated".to_string());
        lines.push(entity_header(i + 1, &doc.frontmatter.title, Some(&date)));
        if let Some(excerpt) = doc.frontmatter.excerpt.as_deref() {
            let truncated = truncate_desc(excerpt.trim(), 60);
            if !truncated.is_empty() {
                lines.push(format!("{}{}", indent(1), truncated));
            }
        }
    }
    if news.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }
    lines
}

pub fn print_news(news: &[PageDocument], locale: &str, zone: Tz) {
    print_lines(format_news(news, locale, zone));
}

/// Format management profiles in the order given.
pub fn format_management(people: &[PageDocument], locale: &str) -> Vec<String> {
    let mut lines = vec![format!("Management ({locale})")];
    for (i, doc) in people.iter().enumerate() {
        lines.push(entity_header(
            i + 1,
            &doc.frontmatter.title,
            doc.frontmatter.role.as_deref(),
        ));
        lines.push(format!("{}Slug: {}", indent(1), doc.slug));
    }
    if people.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }
    lines
}

pub fn print_management(people: &[PageDocument], locale: &str) {
    print_lines(format_management(people, locale));
}

// ============================================================================
// Single page
// ============================================================================

/// Format one document with its section outline.
pub fn format_page(doc: &PageDocument, requested_locale: &str) -> Vec<String> {
    let mut lines = vec![doc.frontmatter.title.clone()];
    lines.push(format!("{}Slug: {}", indent(1), doc.slug));
    lines.push(format!("{}{}", indent(1), locale_line(doc, requested_locale)));
    if let Some(desc) = doc.frontmatter.description.as_deref() {
        lines.push(format!("{}Description: {}", indent(1), truncate_desc(desc, 60)));
    }
    for (i, section) in doc.sections.iter().enumerate() {
        lines.push(format!("{}{} {}", indent(1), format_index(i + 1), section.kind()));
    }
    lines
}

pub fn print_page(doc: &PageDocument, requested_locale: &str) {
    print_lines(format_page(doc, requested_locale));
}

/// Render every Markdown field of a document to HTML, one block per
/// section, each preceded by a comment naming the section kind.
pub fn format_page_html(doc: &PageDocument) -> Vec<String> {
    let mut lines = Vec::new();
    for section in &doc.sections {
        lines.push(format!("<!-- {} -->", section.kind()));
        for field in section.markdown_fields() {
            lines.push(render_markdown(field).trim_end().to_string());
        }
    }
    lines
}

// ============================================================================
// Check
// ============================================================================

/// One summary line per validated locale.
pub fn format_check_summary(locale: &str, pages: &[PageDocument]) -> String {
    let sections: usize = pages.iter().map(|p| p.sections.len()).sum();
    format!(
        "{locale}: {} documents, {} sections OK",
        pages.len(),
        sections
    )
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}
