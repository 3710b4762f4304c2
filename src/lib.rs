//! # Sofra
//!
//! A read-only content loader for a localized marketing site. Content lives
//! in the repository as Markdown files with a YAML header, one directory per
//! locale. The loader validates every file against a typed schema of page
//! sections and serves pages, staff profiles and news to the rendering layer.
//!
//! # Architecture
//!
//! ```text
//! content/<locale>/**.md
//!     │  repository   list + read, paths relative to the locale root
//!     ▼
//! frontmatter         split header/body, validate, default the sections
//!     │
//!     ▼
//! loader              queries, locale fallback, cache
//!     │
//!     ▼
//! PageDocument        handed to templates; Markdown fields via `markdown`
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`loader`] | Query surface: all pages, page by slug, management, news |
//! | [`frontmatter`] | Header splitting, schema validation, document assembly |
//! | [`repository`] | Filesystem listing and reading per locale |
//! | [`types`] | `PageDocument`, `PageFrontmatter` and the `Section` union |
//! | [`cache`] | Injected document cache and hit/miss counters |
//! | [`config`] | `config.toml` loading, validation, and merging |
//! | [`slug`] | Slug normalization with Turkish transliteration |
//! | [`date`] | Publish-date parsing and localized display |
//! | [`ordering`] | Priority-then-alphabetical ordering for management pages |
//! | [`markdown`] | Markdown to sanitized HTML with heading anchors |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Fail Loud
//!
//! A document that does not match the schema is an error all the way up to
//! the caller. Skipping it would publish a page with a hole in it; failing
//! the build points at the file and field that needs fixing.
//!
//! ## Locale Fallback Is Visible
//!
//! A page missing from `en/` is served from the default locale, but the
//! document keeps the locale it was read from. Templates compare it with the
//! requested locale to emit `noindex` on fallback content.
//!
//! ## Cache Policy Is Configuration
//!
//! Whether parsed documents are cached is a named setting
//! ([`config::CachePolicy`]) instead of a hard-coded environment check.

pub mod cache;
pub mod config;
pub mod date;
pub mod frontmatter;
pub mod loader;
pub mod markdown;
pub mod ordering;
pub mod output;
pub mod repository;
pub mod slug;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
