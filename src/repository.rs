//! Filesystem access to the per-locale content tree.
//!
//! The repository knows where files are and nothing about what is in them:
//! no frontmatter parsing, no validation. Every path it hands out is
//! relative to a locale root and uses forward slashes on every platform:
//!
//! ```text
//! content/                 ← content root
//! ├── tr/                  ← locale root
//! │   ├── hakkimizda.md    → "hakkimizda.md"
//! │   ├── pages/kvkk.md    → "pages/kvkk.md"
//! │   ├── management/…     → "management/ayse-kaya.md"
//! │   └── news/…           → "news/yeni-sube.md"
//! └── en/
//! ```
//!
//! A locale directory that does not exist is not an error; it simply has no
//! files.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Read-only view of the content directory.
#[derive(Debug, Clone)]
pub struct MarkdownRepository {
    content_root: PathBuf,
}

impl MarkdownRepository {
    pub fn new(content_root: impl Into<PathBuf>) -> Self {
        Self {
            content_root: content_root.into(),
        }
    }

    pub fn content_root(&self) -> &Path {
        &self.content_root
    }

    /// Absolute directory for a locale, e.g. `content/tr`.
    pub fn locale_root(&self, locale: &str) -> PathBuf {
        self.content_root.join(locale)
    }

    /// Every `*.md` file under the locale root, at any depth.
    ///
    /// Directory entries are visited in file-name order so that listings are
    /// stable across platforms. Entries that cannot be read are skipped.
    pub fn list_markdown_files(&self, locale: &str) -> Vec<String> {
        let root = self.locale_root(locale);
        walk_markdown(&root, &root)
    }

    /// Markdown files under one sub-directory of the locale root.
    ///
    /// Returned paths are still relative to the locale root
    /// (`news/yeni-sube.md`, not `yeni-sube.md`).
    pub fn list_markdown_files_in(&self, locale: &str, subdir: &str) -> Vec<String> {
        let root = self.locale_root(locale);
        walk_markdown(&root, &root.join(subdir))
    }

    /// Raw text of a file relative to the locale root.
    ///
    /// Returns `None` when the file does not exist. Paths that try to leave
    /// the locale root (`../secrets.md`) are never read.
    pub fn read_markdown_file(&self, locale: &str, relative_path: &str) -> Option<String> {
        if !is_contained(relative_path) {
            tracing::warn!(locale, path = relative_path, "refusing to read path outside locale root");
            return None;
        }
        let path = self.locale_root(locale).join(relative_path);
        match fs::read_to_string(&path) {
            Ok(content) => Some(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not read content file");
                None
            }
        }
    }
}

fn walk_markdown(locale_root: &Path, start: &Path) -> Vec<String> {
    if !start.is_dir() {
        return Vec::new();
    }
    WalkDir::new(start)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable content entry");
                None
            }
        })
        .filter(|e| e.file_type().is_file() && is_markdown(e.path()))
        .filter_map(|e| {
            e.path()
                .strip_prefix(locale_root)
                .ok()
                .map(to_forward_slashes)
        })
        .collect()
}

fn is_markdown(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "md")
}

/// Join path components with `/` regardless of the host separator.
fn to_forward_slashes(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// A relative path made only of normal components.
fn is_contained(relative_path: &str) -> bool {
    Path::new(relative_path)
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::write_file;
    use tempfile::TempDir;

    #[test]
    fn lists_nested_markdown_relative_to_locale() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "tr/about.md", "x");
        write_file(tmp.path(), "tr/news/one.md", "x");
        write_file(tmp.path(), "tr/news/2024/deep.md", "x");
        write_file(tmp.path(), "tr/management/ceo.md", "x");

        let repo = MarkdownRepository::new(tmp.path());
        assert_eq!(
            repo.list_markdown_files("tr"),
            vec![
                "about.md",
                "management/ceo.md",
                "news/2024/deep.md",
                "news/one.md"
            ]
        );
    }

    #[test]
    fn ignores_non_markdown_files() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "tr/about.md", "x");
        write_file(tmp.path(), "tr/logo.png", "x");
        write_file(tmp.path(), "tr/notes.markdown", "x");
        write_file(tmp.path(), "tr/README", "x");

        let repo = MarkdownRepository::new(tmp.path());
        assert_eq!(repo.list_markdown_files("tr"), vec!["about.md"]);
    }

    #[test]
    fn missing_locale_lists_nothing() {
        let tmp = TempDir::new().unwrap();
        let repo = MarkdownRepository::new(tmp.path());
        assert!(repo.list_markdown_files("de").is_empty());
        assert!(repo.list_markdown_files_in("de", "news").is_empty());
    }

    #[test]
    fn subdir_listing_keeps_locale_relative_paths() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "en/about.md", "x");
        write_file(tmp.path(), "en/news/b.md", "x");
        write_file(tmp.path(), "en/news/a.md", "x");

        let repo = MarkdownRepository::new(tmp.path());
        assert_eq!(
            repo.list_markdown_files_in("en", "news"),
            vec!["news/a.md", "news/b.md"]
        );
    }

    #[test]
    fn read_returns_content_or_none() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "tr/pages/kvkk.md", "---\ntitle: KVKK\n---\n");

        let repo = MarkdownRepository::new(tmp.path());
        assert_eq!(
            repo.read_markdown_file("tr", "pages/kvkk.md").as_deref(),
            Some("---\ntitle: KVKK\n---\n")
        );
        assert_eq!(repo.read_markdown_file("tr", "pages/missing.md"), None);
        assert_eq!(repo.read_markdown_file("en", "pages/kvkk.md"), None);
    }

    #[test]
    fn read_refuses_to_escape_locale_root() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "secret.md", "x");
        write_file(tmp.path(), "tr/about.md", "x");

        let repo = MarkdownRepository::new(tmp.path());
        assert_eq!(repo.read_markdown_file("tr", "../secret.md"), None);
        assert_eq!(repo.read_markdown_file("tr", "/etc/passwd"), None);
    }
}
