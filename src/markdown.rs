//! Markdown to HTML for section fields.
//!
//! Documents hold raw Markdown; templates need HTML. Rendering here is
//! deterministic and safe to inline:
//!
//! - tables and `~~strikethrough~~` are enabled
//! - raw HTML in the source is escaped, never passed through
//! - link and image destinations must be relative or use one of
//!   [`ALLOWED_SCHEMES`]; anything else (`javascript:`, `data:`) becomes `#`
//! - every heading gets an `id` built from its text with
//!   [`normalize_slug`], numbered `-1`, `-2`, … on repeats

use crate::slug::normalize_slug;
use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd, html as md_html};
use std::collections::HashMap;

/// Render one Markdown field to sanitized HTML.
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let events: Vec<Event> = Parser::new_ext(markdown, options)
        .map(sanitize)
        .collect();

    let mut html = String::with_capacity(markdown.len() * 3 / 2);
    md_html::push_html(&mut html, anchor_headings(events).into_iter());
    html
}

/// URL schemes a link or image may point at.
pub const ALLOWED_SCHEMES: [&str; 4] = ["http", "https", "mailto", "tel"];

fn sanitize(event: Event<'_>) -> Event<'_> {
    match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Link {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Image {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        }),
        other => other,
    }
}

fn safe_url(url: CowStr<'_>) -> CowStr<'_> {
    if is_allowed_url(&url) {
        url
    } else {
        CowStr::Borrowed("#")
    }
}

/// Relative URLs pass; absolute ones only with an allowed scheme.
fn is_allowed_url(url: &str) -> bool {
    let url = url.trim_start();
    // A scheme ends at the first ':' that comes before any '/', '?' or '#'
    match url.find([':', '/', '?', '#']) {
        Some(end) if url[end..].starts_with(':') => {
            let scheme = url[..end].to_ascii_lowercase();
            ALLOWED_SCHEMES.contains(&scheme.as_str())
        }
        _ => true,
    }
}

fn anchor_headings(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::with_capacity(events.len());
    let mut events = events.into_iter();

    while let Some(event) = events.next() {
        match event {
            Event::Start(Tag::Heading {
                level,
                classes,
                attrs,
                ..
            }) => {
                let mut inner = Vec::new();
                for e in events.by_ref() {
                    let end = matches!(e, Event::End(TagEnd::Heading(_)));
                    inner.push(e);
                    if end {
                        break;
                    }
                }
                let id = unique_anchor(&heading_text(&inner), &mut seen);
                out.push(Event::Start(Tag::Heading {
                    level,
                    id: Some(CowStr::from(id)),
                    classes,
                    attrs,
                }));
                out.extend(inner);
            }
            other => out.push(other),
        }
    }
    out
}

fn heading_text(events: &[Event<'_>]) -> String {
    events
        .iter()
        .filter_map(|e| match e {
            Event::Text(t) | Event::Code(t) => Some(&**t),
            _ => None,
        })
        .collect()
}

fn unique_anchor(text: &str, seen: &mut HashMap<String, usize>) -> String {
    let mut base = normalize_slug(text);
    if base.is_empty() {
        base = "section".to_string();
    }
    let count = seen.entry(base.clone()).or_insert(0);
    let id = if *count == 0 {
        base
    } else {
        format!("{base}-{count}")
    };
    *count += 1;
    id
}
