//! Shared test utilities for the sofra unit tests.
//!
//! Unit tests build small content trees in a `TempDir` with [`write_file`]
//! and look documents up with [`find_page`]. The integration suite in
//! `tests/` works against `fixtures/content` instead.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_file(tmp.path(), "tr/hakkimizda.md", "---\ntitle: Hakkımızda\n---\n");
//!
//! let pages = ContentLoader::new(tmp.path(), "tr").get_all_pages("tr").unwrap();
//! assert_eq!(find_page(&pages, "hakkimizda").locale, "tr");
//! ```

use std::path::Path;

use crate::types::PageDocument;

// =========================================================================
// Content tree setup
// =========================================================================

/// Write `content` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

// =========================================================================
// Document lookups — panics with a clear message on miss
// =========================================================================

/// Find a document by slug. Panics if not found.
pub fn find_page<'a>(pages: &'a [PageDocument], slug: &str) -> &'a PageDocument {
    pages.iter().find(|p| p.slug == slug).unwrap_or_else(|| {
        let slugs: Vec<&str> = pages.iter().map(|p| p.slug.as_str()).collect();
        panic!("page '{slug}' not found. Available: {slugs:?}")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "Available")]
    fn find_page_lists_available_slugs_on_miss() {
        find_page(&[], "nope");
    }
}
