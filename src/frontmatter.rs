//! Frontmatter splitting, schema validation, and document assembly.
//!
//! A content file is a YAML header between `---` lines followed by a
//! Markdown body:
//!
//! ```text
//! ---
//! title: Hakkımızda
//! sections:
//!   - type: heroSimple
//!     heading: Bir lezzet hikayesi
//!   - type: prose
//!     body: |
//!       **1987**'den beri...
//! ---
//! Body text (ignored when `sections` is present)
//! ```
//!
//! ## Validation
//!
//! Bad content must fail the build, not render half a page. Every schema
//! violation is reported as [`ParseError::Invalid`] naming the offending
//! field path (`title`, `seo.keywords[1]`, `sections[2].type`,
//! `sections[0].items[3].value`). Nothing in this module catches its own
//! errors.
//!
//! Known keys are strictly typed. `null` counts as absent for optional keys.
//! Unknown keys are ignored, both at the top level and inside sections.
//!
//! ## Default section
//!
//! A file without a `sections` array (or with an empty one) gets a single
//! `prose` section holding the trimmed Markdown body, so a document never has
//! zero sections.

use crate::slug::normalize_slug;
use crate::types::{PageDocument, PageFrontmatter, SECTION_KINDS, Section};
use serde_yaml::{Mapping, Value};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("{document}: no `---` frontmatter block")]
    MissingFrontmatter { document: String },
    #[error("{document}: malformed frontmatter YAML: {source}")]
    Yaml {
        document: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("{document}: `{path}` {message}")]
    Invalid {
        document: String,
        path: String,
        message: String,
    },
}

impl ParseError {
    /// Field path of a schema violation, if this is one.
    pub fn path(&self) -> Option<&str> {
        match self {
            ParseError::Invalid { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Split raw file text into `(yaml, body)`.
///
/// The file must open with a `---` line and contain a closing `---` line.
/// A leading byte-order mark and CRLF line endings are tolerated. Returns
/// `None` when there is no complete header.
pub fn split_frontmatter(raw: &str) -> Option<(&str, &str)> {
    let text = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let rest = text.strip_prefix("---")?;
    let (opening, after) = rest.split_once('\n')?;
    if !opening.trim().is_empty() {
        return None;
    }

    let mut offset = 0;
    for line in after.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some((&after[..offset], &after[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// Parse and validate one content file into a [`PageDocument`].
///
/// `slug` is normalized before it is stored; `locale` is recorded as given.
pub fn parse_document(raw: &str, slug: &str, locale: &str) -> Result<PageDocument, ParseError> {
    let slug = normalize_slug(slug);
    let document = format!("{locale}/{slug}");

    let (yaml, body) = split_frontmatter(raw).ok_or_else(|| ParseError::MissingFrontmatter {
        document: document.clone(),
    })?;

    let header: Value = if yaml.trim().is_empty() {
        Value::Null
    } else {
        serde_yaml::from_str(yaml).map_err(|source| ParseError::Yaml {
            document: document.clone(),
            source,
        })?
    };
    let mut header: Mapping = match header {
        // Explicit nulls read as absent keys
        Value::Mapping(map) => map.into_iter().filter(|(_, v)| !v.is_null()).collect(),
        Value::Null => Mapping::new(),
        other => {
            return Err(invalid(
                &document,
                HEADER_PATH,
                format!("must be a mapping, found {}", describe(&other)),
            ));
        }
    };

    let sections = header.remove("sections");
    check_frontmatter(&header).map_err(|v| v.into_error(&document))?;
    let frontmatter: PageFrontmatter = serde_yaml::from_value(Value::Mapping(header))
        .map_err(|e| invalid(&document, HEADER_PATH, e.to_string()))?;

    let sections = match sections {
        Some(Value::Sequence(items)) if !items.is_empty() => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                let path = format!("sections[{i}]");
                check_section(&item, &path).map_err(|v| v.into_error(&document))?;
                serde_yaml::from_value::<Section>(item)
                    .map_err(|e| invalid(&document, &path, e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?,
        Some(Value::Sequence(_)) | Some(Value::Null) | None => vec![Section::Prose {
            body: body.trim().to_string(),
        }],
        Some(other) => {
            return Err(invalid(
                &document,
                "sections",
                format!("must be a list, found {}", describe(&other)),
            ));
        }
    };

    Ok(PageDocument {
        frontmatter,
        sections,
        slug,
        locale: locale.to_string(),
    })
}

/// Error path for problems with the header block as a whole.
const HEADER_PATH: &str = "frontmatter";

fn invalid(document: &str, path: &str, message: String) -> ParseError {
    ParseError::Invalid {
        document: document.to_string(),
        path: path.to_string(),
        message,
    }
}

// =============================================================================
// Schema
// =============================================================================

/// Expected shape of one field.
#[derive(Debug, Clone, Copy)]
enum Shape {
    Text,
    Flag,
    TextList,
    AnyMap,
    Seo,
    Stats,
    Logos,
}

#[derive(Debug, Clone, Copy)]
struct Field {
    name: &'static str,
    shape: Shape,
    required: bool,
}

const fn req(name: &'static str, shape: Shape) -> Field {
    Field {
        name,
        shape,
        required: true,
    }
}

const fn opt(name: &'static str, shape: Shape) -> Field {
    Field {
        name,
        shape,
        required: false,
    }
}

const FRONTMATTER: &[Field] = &[
    req("title", Shape::Text),
    opt("description", Shape::Text),
    opt("role", Shape::Text),
    opt("date", Shape::Text),
    opt("image", Shape::Text),
    opt("excerpt", Shape::Text),
    opt("seo", Shape::Seo),
    opt("componentMapping", Shape::AnyMap),
    opt("archived", Shape::Flag),
    opt("draft", Shape::Flag),
];

const SEO: &[Field] = &[
    opt("title", Shape::Text),
    opt("description", Shape::Text),
    opt("keywords", Shape::TextList),
    opt("image", Shape::Text),
];

const STAT_ITEM: &[Field] = &[req("label", Shape::Text), req("value", Shape::Text)];

const LOGO: &[Field] = &[req("src", Shape::Text), opt("alt", Shape::Text)];

const PROSE: &[Field] = &[req("body", Shape::Text)];
const SPLIT: &[Field] = &[req("left", Shape::Text), opt("right", Shape::Text)];
const LIST: &[Field] = &[req("items", Shape::TextList)];
const IMAGE_PROSE: &[Field] = &[
    req("image", Shape::Text),
    opt("alt", Shape::Text),
    req("body", Shape::Text),
];
const HERO_SIMPLE: &[Field] = &[
    req("heading", Shape::Text),
    opt("intro", Shape::Text),
    opt("image", Shape::Text),
];
const BRAND_TEASER: &[Field] = &[
    opt("title", Shape::Text),
    opt("body", Shape::Text),
    opt("images", Shape::TextList),
];
const QUOTE: &[Field] = &[req("text", Shape::Text), opt("cite", Shape::Text)];
const STATS_GRID: &[Field] = &[req("items", Shape::Stats)];
const BRAND_DETAIL: &[Field] = &[
    req("name", Shape::Text),
    opt("description", Shape::Text),
    opt("image", Shape::Text),
];
const ABOUT_BRANDS: &[Field] = &[req("logos", Shape::Logos), req("body", Shape::Text)];

/// Field rules per section tag. Must stay in step with [`Section`].
fn section_fields(kind: &str) -> Option<&'static [Field]> {
    Some(match kind {
        "prose" => PROSE,
        "split" => SPLIT,
        "list" => LIST,
        "imageProse" => IMAGE_PROSE,
        "heroSimple" => HERO_SIMPLE,
        "brandTeaser" => BRAND_TEASER,
        "quote" => QUOTE,
        "statsGrid" => STATS_GRID,
        "brandDetail" => BRAND_DETAIL,
        "aboutBrands" => ABOUT_BRANDS,
        _ => return None,
    })
}

/// A schema violation before it is attached to a document name.
#[derive(Debug)]
struct Violation {
    path: String,
    message: String,
}

impl Violation {
    fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }

    fn into_error(self, document: &str) -> ParseError {
        invalid(document, &self.path, self.message)
    }
}

fn check_frontmatter(header: &Mapping) -> Result<(), Violation> {
    check_fields(header, FRONTMATTER, "")
}

fn check_section(item: &Value, path: &str) -> Result<(), Violation> {
    let Value::Mapping(map) = item else {
        return Err(Violation::new(
            path,
            format!("must be a mapping, found {}", describe(item)),
        ));
    };
    let type_path = join(path, "type");
    let kind = match map.get("type") {
        Some(Value::String(kind)) => kind.as_str(),
        Some(other) => {
            return Err(Violation::new(
                type_path,
                format!("must be a string, found {}", describe(other)),
            ));
        }
        None => return Err(Violation::new(type_path, "is required")),
    };
    let fields = section_fields(kind).ok_or_else(|| {
        Violation::new(
            &type_path,
            format!(
                "unknown section type `{kind}` (expected one of {})",
                SECTION_KINDS.join(", ")
            ),
        )
    })?;
    check_fields(map, fields, path)
}

fn check_fields(map: &Mapping, fields: &[Field], base: &str) -> Result<(), Violation> {
    for field in fields {
        let path = join(base, field.name);
        match map.get(field.name) {
            None | Some(Value::Null) if field.required => {
                return Err(Violation::new(path, "is required"));
            }
            None | Some(Value::Null) => {}
            Some(value) => check_shape(value, field.shape, &path)?,
        }
    }
    Ok(())
}

fn check_shape(value: &Value, shape: Shape, path: &str) -> Result<(), Violation> {
    let mismatch = |expected: &str| {
        Violation::new(
            path,
            format!("must be {expected}, found {}", describe(value)),
        )
    };
    match shape {
        Shape::Text => match value {
            Value::String(_) => Ok(()),
            _ => Err(mismatch("a string")),
        },
        Shape::Flag => match value {
            Value::Bool(_) => Ok(()),
            _ => Err(mismatch("a boolean")),
        },
        Shape::AnyMap => match value {
            Value::Mapping(_) => Ok(()),
            _ => Err(mismatch("a mapping")),
        },
        Shape::Seo => match value {
            Value::Mapping(map) => check_fields(map, SEO, path),
            _ => Err(mismatch("a mapping")),
        },
        Shape::TextList => check_list(value, path, |item, item_path| {
            check_shape(item, Shape::Text, item_path)
        })
        .map_err(|v| v.unwrap_or_else(|| mismatch("a list of strings"))),
        Shape::Stats => check_list(value, path, |item, item_path| {
            check_record(item, STAT_ITEM, item_path)
        })
        .map_err(|v| v.unwrap_or_else(|| mismatch("a list of {label, value} items"))),
        Shape::Logos => check_list(value, path, |item, item_path| {
            check_record(item, LOGO, item_path)
        })
        .map_err(|v| v.unwrap_or_else(|| mismatch("a list of {src, alt} items"))),
    }
}

/// Check every element of a sequence. `Err(None)` means the value was not a
/// sequence at all.
fn check_list(
    value: &Value,
    path: &str,
    check_item: impl Fn(&Value, &str) -> Result<(), Violation>,
) -> Result<(), Option<Violation>> {
    let Value::Sequence(items) = value else {
        return Err(None);
    };
    for (i, item) in items.iter().enumerate() {
        check_item(item, &format!("{path}[{i}]")).map_err(Some)?;
    }
    Ok(())
}

fn check_record(value: &Value, fields: &[Field], path: &str) -> Result<(), Violation> {
    match value {
        Value::Mapping(map) => check_fields(map, fields, path),
        other => Err(Violation::new(
            path,
            format!("must be a mapping, found {}", describe(other)),
        )),
    }
}

fn join(base: &str, field: &str) -> String {
    if base.is_empty() {
        field.to_string()
    } else {
        format!("{base}.{field}")
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
