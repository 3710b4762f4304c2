//! Shared content types handed to the rendering layer.
//!
//! A [`PageDocument`] is the whole contract toward templates: validated
//! frontmatter, a non-empty list of typed [`Section`]s, the normalized slug,
//! and the locale the file was actually read from. Documents are immutable
//! once built; the only way one changes is a file edit followed by a fresh
//! parse.

use serde::{Deserialize, Serialize};

/// Metadata block at the top of every content file.
///
/// `title` is the only required key. Unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageFrontmatter {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Job title on management profiles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Publish date as written, `YYYY-MM-DD`. See [`crate::date`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo: Option<Seo>,
    /// Opaque template hints, passed through untouched. Keys may be any
    /// YAML scalar.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_mapping: Option<serde_yaml::Mapping>,
    /// Archived news items stay addressable by slug but leave listings.
    #[serde(default, skip_serializing_if = "is_false")]
    pub archived: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub draft: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Per-page search metadata overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Seo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// One typed block of page content.
///
/// Every `body`, `left` and `right` field is raw Markdown. Conversion to
/// HTML happens downstream (see [`crate::markdown`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Section {
    Prose {
        body: String,
    },
    Split {
        left: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        right: Option<String>,
    },
    List {
        items: Vec<String>,
    },
    ImageProse {
        image: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alt: Option<String>,
        body: String,
    },
    HeroSimple {
        heading: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        intro: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        image: Option<String>,
    },
    BrandTeaser {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        body: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        images: Option<Vec<String>>,
    },
    Quote {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cite: Option<String>,
    },
    StatsGrid {
        items: Vec<StatItem>,
    },
    BrandDetail {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        image: Option<String>,
    },
    AboutBrands {
        logos: Vec<Logo>,
        body: String,
    },
}

/// Wire tags of every section variant, in declaration order.
pub const SECTION_KINDS: [&str; 10] = [
    "prose",
    "split",
    "list",
    "imageProse",
    "heroSimple",
    "brandTeaser",
    "quote",
    "statsGrid",
    "brandDetail",
    "aboutBrands",
];

impl Section {
    /// The `type` tag this section is written with in frontmatter.
    pub fn kind(&self) -> &'static str {
        match self {
            Section::Prose { .. } => "prose",
            Section::Split { .. } => "split",
            Section::List { .. } => "list",
            Section::ImageProse { .. } => "imageProse",
            Section::HeroSimple { .. } => "heroSimple",
            Section::BrandTeaser { .. } => "brandTeaser",
            Section::Quote { .. } => "quote",
            Section::StatsGrid { .. } => "statsGrid",
            Section::BrandDetail { .. } => "brandDetail",
            Section::AboutBrands { .. } => "aboutBrands",
        }
    }

    /// Every field of this section that holds raw Markdown.
    pub fn markdown_fields(&self) -> Vec<&str> {
        match self {
            Section::Prose { body } => vec![body.as_str()],
            Section::Split { left, right } => {
                std::iter::once(left.as_str()).chain(right.as_deref()).collect()
            }
            Section::ImageProse { body, .. } => vec![body.as_str()],
            Section::BrandTeaser { body, .. } => body.as_deref().into_iter().collect(),
            Section::AboutBrands { body, .. } => vec![body.as_str()],
            Section::List { .. }
            | Section::HeroSimple { .. }
            | Section::Quote { .. }
            | Section::StatsGrid { .. }
            | Section::BrandDetail { .. } => Vec::new(),
        }
    }
}

/// A labelled figure in a `statsGrid` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatItem {
    pub label: String,
    pub value: String,
}

/// A brand logo in an `aboutBrands` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Logo {
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

/// A fully validated content file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageDocument {
    pub frontmatter: PageFrontmatter,
    /// Never empty.
    pub sections: Vec<Section>,
    /// Normalized slug (see [`crate::slug::normalize_slug`]).
    pub slug: String,
    /// Locale directory the file was read from.
    pub locale: String,
}

impl PageDocument {
    /// True when this document was served from another locale's tree than
    /// the one requested. Fallback pages should not be indexed.
    pub fn is_fallback_for(&self, requested_locale: &str) -> bool {
        self.locale != requested_locale
    }
}
