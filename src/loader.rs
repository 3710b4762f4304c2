//! Document loader: the query surface over the content tree.
//!
//! Stage wiring, per call:
//!
//! ```text
//! cache? ──hit──▶ result
//!   │ miss/bypass
//!   ▼
//! repository (list/read) ──▶ frontmatter::parse_document ──▶ result ──▶ cache
//! ```
//!
//! ## Lookup by slug
//!
//! `get_page_by_slug` builds `{slug}.md` and searches, in order, the locale
//! root, `pages/`, `management/` and `news/`. The first file that exists
//! wins. When nothing matches and the requested locale is not the default,
//! the same search runs against the default locale. A document found that way
//! keeps its real `locale`, so callers can tell it is a fallback
//! (see [`PageDocument::is_fallback_for`]).
//!
//! ## Errors
//!
//! A file that cannot be read is treated as absent. A file that reads but
//! fails validation is an error and is returned to the caller, never
//! skipped: broken content must fail the build, not render half a page.
//!
//! ## Caching
//!
//! Only `get_all_pages` (`all:{locale}`) and `get_page_by_slug`
//! (`one:{locale}:{slug}`) go through the cache, and only while the
//! configured [`CachePolicy`] is active for the runtime [`Environment`].

use crate::cache::{CacheKey, CacheStats, Cached, DocumentCache, MemoryCache};
use crate::config::{CachePolicy, Environment, SiteConfig};
use crate::date::sort_timestamp;
use crate::frontmatter::{ParseError, parse_document};
use crate::repository::MarkdownRepository;
use crate::slug::slug_from_path;
use crate::types::PageDocument;
use std::cmp::Reverse;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Sub-directory holding staff profiles.
pub const MANAGEMENT_DIR: &str = "management";
/// Sub-directory holding news and press items.
pub const NEWS_DIR: &str = "news";

#[derive(Error, Debug)]
pub enum LoadError {
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// One place a slug's file may live, relative to a locale root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateDir {
    Root,
    Sub(&'static str),
}

impl CandidateDir {
    pub fn path_for(self, file_name: &str) -> String {
        match self {
            CandidateDir::Root => file_name.to_string(),
            CandidateDir::Sub(dir) => format!("{dir}/{file_name}"),
        }
    }
}

/// Search order for `get_page_by_slug`.
pub const CANDIDATE_DIRS: [CandidateDir; 4] = [
    CandidateDir::Root,
    CandidateDir::Sub("pages"),
    CandidateDir::Sub(MANAGEMENT_DIR),
    CandidateDir::Sub(NEWS_DIR),
];

pub struct ContentLoader {
    repository: MarkdownRepository,
    default_locale: String,
    cache: Arc<dyn DocumentCache>,
    cache_active: bool,
    stats: CacheStats,
}

impl ContentLoader {
    /// Loader over `content_root` with a fresh in-memory cache and the
    /// default policy for a development runtime.
    pub fn new(content_root: impl Into<PathBuf>, default_locale: &str) -> Self {
        Self {
            repository: MarkdownRepository::new(content_root),
            default_locale: default_locale.to_string(),
            cache: Arc::new(MemoryCache::new()),
            cache_active: CachePolicy::default().is_active(Environment::Development),
            stats: CacheStats::default(),
        }
    }

    /// Loader configured from a loaded [`SiteConfig`]. `SOFRA_ENV` is
    /// consulted for the runtime environment.
    pub fn from_config(content_root: impl Into<PathBuf>, config: &SiteConfig) -> Self {
        Self::new(content_root, &config.default_locale)
            .with_cache_policy(config.cache.policy, config.effective_environment())
    }

    /// Replace the cache backend.
    pub fn with_cache(mut self, cache: Arc<dyn DocumentCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_cache_policy(mut self, policy: CachePolicy, environment: Environment) -> Self {
        self.cache_active = policy.is_active(environment);
        self
    }

    pub fn repository(&self) -> &MarkdownRepository {
        &self.repository
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    pub fn cache_active(&self) -> bool {
        self.cache_active
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Every document under the locale root, in walk order.
    ///
    /// A missing locale directory yields an empty list.
    pub fn get_all_pages(&self, locale: &str) -> Result<Vec<PageDocument>, LoadError> {
        let key = CacheKey::all(locale);
        if let Some(Cached::Pages(pages)) = self.cached(&key) {
            return Ok(pages);
        }
        let files = self.repository.list_markdown_files(locale);
        let pages = self.load_files(locale, &files)?;
        self.store(&key, Cached::Pages(pages.clone()));
        Ok(pages)
    }

    /// A single document by slug, falling back to the default locale.
    ///
    /// `slug` is used as given to build the file name; the returned
    /// document carries the normalized form.
    pub fn get_page_by_slug(
        &self,
        locale: &str,
        slug: &str,
    ) -> Result<Option<PageDocument>, LoadError> {
        let key = CacheKey::one(locale, slug);
        if let Some(Cached::Page(page)) = self.cached(&key) {
            return Ok(page);
        }

        let mut page = self.find_in_locale(locale, slug)?;
        if page.is_none() && locale != self.default_locale {
            page = self.find_in_locale(&self.default_locale, slug)?;
            if page.is_some() {
                tracing::debug!(
                    locale,
                    slug,
                    fallback = %self.default_locale,
                    "serving page from default locale"
                );
            }
        }

        self.store(&key, Cached::Page(page.clone()));
        Ok(page)
    }

    /// Staff profiles under `management/`, in walk order. No locale
    /// fallback; ordering is left to [`crate::ordering::sort_management`].
    pub fn get_management_people(&self, locale: &str) -> Result<Vec<PageDocument>, LoadError> {
        let files = self.repository.list_markdown_files_in(locale, MANAGEMENT_DIR);
        self.load_files(locale, &files)
    }

    /// Published news under `news/`, newest first.
    ///
    /// Archived and draft items are left out. Items without a usable date
    /// sort as if dated at the epoch; equal dates keep walk order.
    pub fn get_all_news(&self, locale: &str) -> Result<Vec<PageDocument>, LoadError> {
        let files = self.repository.list_markdown_files_in(locale, NEWS_DIR);
        let mut news = self.load_files(locale, &files)?;
        news.retain(|doc| !doc.frontmatter.archived && !doc.frontmatter.draft);
        news.sort_by_key(|doc| Reverse(sort_timestamp(doc.frontmatter.date.as_deref())));
        Ok(news)
    }

    fn find_in_locale(&self, locale: &str, slug: &str) -> Result<Option<PageDocument>, LoadError> {
        let file_name = format!("{slug}.md");
        for dir in CANDIDATE_DIRS {
            let path = dir.path_for(&file_name);
            if let Some(raw) = self.repository.read_markdown_file(locale, &path) {
                tracing::trace!(locale, path, "candidate matched");
                return Ok(Some(parse_document(&raw, slug, locale)?));
            }
        }
        Ok(None)
    }

    fn load_files(&self, locale: &str, files: &[String]) -> Result<Vec<PageDocument>, LoadError> {
        let mut documents = Vec::with_capacity(files.len());
        for path in files {
            let Some(raw) = self.repository.read_markdown_file(locale, path) else {
                continue;
            };
            documents.push(parse_document(&raw, &slug_from_path(path), locale)?);
        }
        Ok(documents)
    }

    fn cached(&self, key: &CacheKey) -> Option<Cached> {
        if !self.cache_active {
            self.stats.bypass();
            return None;
        }
        let found = self.cache.get(key);
        if found.is_some() {
            self.stats.hit();
            tracing::trace!(%key, "cache hit");
        } else {
            self.stats.miss();
            tracing::trace!(%key, "cache miss");
        }
        found
    }

    fn store(&self, key: &CacheKey, value: Cached) {
        if self.cache_active {
            self.cache.set(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::NoCache;
    use crate::test_helpers::{find_page, write_file};
    use tempfile::TempDir;

    fn page(title: &str) -> String {
        format!("---\ntitle: {title}\n---\nBody of {title}\n")
    }

    fn news(title: &str, extra: &str) -> String {
        format!("---\ntitle: {title}\n{extra}---\n")
    }

    #[test]
    fn candidate_paths_in_search_order() {
        let paths: Vec<String> = CANDIDATE_DIRS.iter().map(|d| d.path_for("a.md")).collect();
        assert_eq!(paths, vec!["a.md", "pages/a.md", "management/a.md", "news/a.md"]);
    }

    #[test]
    fn flat_file_wins_over_pages_dir() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "tr/kvkk.md", &page("Flat"));
        write_file(tmp.path(), "tr/pages/kvkk.md", &page("Nested"));

        let loader = ContentLoader::new(tmp.path(), "tr");
        let doc = loader.get_page_by_slug("tr", "kvkk").unwrap().unwrap();
        assert_eq!(doc.frontmatter.title, "Flat");
    }

    #[test]
    fn searches_news_dir_last() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "tr/news/acilis.md", &page("News"));
        write_file(tmp.path(), "tr/management/acilis.md", &page("Person"));

        let loader = ContentLoader::new(tmp.path(), "tr");
        let doc = loader.get_page_by_slug("tr", "acilis").unwrap().unwrap();
        assert_eq!(doc.frontmatter.title, "Person");
    }

    #[test]
    fn falls_back_to_default_locale() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "tr/pages/kvkk.md", &page("KVKK"));

        let loader = ContentLoader::new(tmp.path(), "tr");
        let doc = loader.get_page_by_slug("en", "kvkk").unwrap().unwrap();
        assert_eq!(doc.locale, "tr");
        assert!(doc.is_fallback_for("en"));
    }

    #[test]
    fn requested_locale_preferred_over_fallback() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "tr/about.md", &page("Hakkımızda"));
        write_file(tmp.path(), "en/pages/about.md", &page("About"));

        let loader = ContentLoader::new(tmp.path(), "tr");
        let doc = loader.get_page_by_slug("en", "about").unwrap().unwrap();
        assert_eq!(doc.frontmatter.title, "About");
        assert_eq!(doc.locale, "en");
    }

    #[test]
    fn default_locale_has_no_fallback() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "en/only-en.md", &page("English"));

        let loader = ContentLoader::new(tmp.path(), "tr");
        assert_eq!(loader.get_page_by_slug("tr", "only-en").unwrap(), None);
        assert_eq!(loader.get_page_by_slug("en", "nowhere").unwrap(), None);
    }

    #[test]
    fn slug_on_document_is_normalized() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "tr/Şube Açılışı.md", &page("Şube"));

        let loader = ContentLoader::new(tmp.path(), "tr");
        let doc = loader
            .get_page_by_slug("tr", "Şube Açılışı")
            .unwrap()
            .unwrap();
        assert_eq!(doc.slug, "sube-acilisi");

        let all = loader.get_all_pages("tr").unwrap();
        assert_eq!(find_page(&all, "sube-acilisi").frontmatter.title, "Şube");
    }

    #[test]
    fn all_pages_walks_every_subdir() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "tr/b.md", &page("B"));
        write_file(tmp.path(), "tr/a.md", &page("A"));
        write_file(tmp.path(), "tr/news/n.md", &page("N"));

        let loader = ContentLoader::new(tmp.path(), "tr");
        let titles: Vec<String> = loader
            .get_all_pages("tr")
            .unwrap()
            .into_iter()
            .map(|d| d.frontmatter.title)
            .collect();
        assert_eq!(titles, vec!["A", "B", "N"]);
    }

    #[test]
    fn missing_locale_has_no_pages() {
        let tmp = TempDir::new().unwrap();
        let loader = ContentLoader::new(tmp.path(), "tr");
        assert!(loader.get_all_pages("de").unwrap().is_empty());
        assert!(loader.get_all_news("de").unwrap().is_empty());
        assert!(loader.get_management_people("de").unwrap().is_empty());
    }

    #[test]
    fn invalid_document_fails_loud() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "tr/good.md", &page("Good"));
        write_file(tmp.path(), "tr/bad.md", "---\ndescription: no title\n---\n");

        let loader = ContentLoader::new(tmp.path(), "tr");
        let err = loader.get_all_pages("tr").unwrap_err();
        let LoadError::Parse(parse) = err;
        assert_eq!(parse.path(), Some("title"));
        assert!(loader.get_page_by_slug("tr", "bad").is_err());
    }

    #[test]
    fn management_is_restricted_and_not_fallen_back() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "tr/management/ayse.md", &page("Ayşe"));
        write_file(tmp.path(), "tr/about.md", &page("About"));

        let loader = ContentLoader::new(tmp.path(), "tr");
        let people = loader.get_management_people("tr").unwrap();
        assert_eq!(people.len(), 1);
        assert_eq!(find_page(&people, "ayse").frontmatter.title, "Ayşe");
        assert!(loader.get_management_people("en").unwrap().is_empty());
    }

    #[test]
    fn news_filters_and_sorts_descending() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "tr/news/a.md", &news("Old", "date: 2023-01-01\n"));
        write_file(tmp.path(), "tr/news/b.md", &news("Undated", ""));
        write_file(tmp.path(), "tr/news/c.md", &news("New", "date: 2024-06-01\n"));
        write_file(
            tmp.path(),
            "tr/news/d.md",
            &news("Draft", "date: 2025-01-01\ndraft: true\n"),
        );
        write_file(
            tmp.path(),
            "tr/news/e.md",
            &news("Archived", "date: 2025-02-01\narchived: true\n"),
        );

        let loader = ContentLoader::new(tmp.path(), "tr");
        let titles: Vec<String> = loader
            .get_all_news("tr")
            .unwrap()
            .into_iter()
            .map(|d| d.frontmatter.title)
            .collect();
        assert_eq!(titles, vec!["New", "Old", "Undated"]);
    }

    #[test]
    fn unparsable_date_sinks_like_missing() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "tr/news/a.md", &news("Bad", "date: soon\n"));
        write_file(tmp.path(), "tr/news/b.md", &news("Dated", "date: 2020-05-05\n"));

        let loader = ContentLoader::new(tmp.path(), "tr");
        let news = loader.get_all_news("tr").unwrap();
        assert_eq!(news[0].frontmatter.title, "Dated");
        assert_eq!(news[1].frontmatter.title, "Bad");
    }

    #[test]
    fn cache_serves_stale_results_when_active() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "tr/about.md", &page("Before"));

        let loader = ContentLoader::new(tmp.path(), "tr")
            .with_cache_policy(CachePolicy::Always, Environment::Production);
        let first = loader.get_page_by_slug("tr", "about").unwrap().unwrap();
        write_file(tmp.path(), "tr/about.md", &page("After"));
        let second = loader.get_page_by_slug("tr", "about").unwrap().unwrap();

        assert_eq!(first, second);
        assert_eq!(second.frontmatter.title, "Before");
        assert_eq!(loader.stats().hits(), 1);
        assert_eq!(loader.stats().misses(), 1);
    }

    #[test]
    fn production_rereads_under_default_policy() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "tr/about.md", &page("Before"));

        let loader = ContentLoader::new(tmp.path(), "tr")
            .with_cache_policy(CachePolicy::NonProduction, Environment::Production);
        loader.get_page_by_slug("tr", "about").unwrap();
        write_file(tmp.path(), "tr/about.md", &page("After"));
        let doc = loader.get_page_by_slug("tr", "about").unwrap().unwrap();

        assert_eq!(doc.frontmatter.title, "After");
        assert_eq!(loader.stats().bypassed(), 2);
        assert_eq!(loader.stats().hits(), 0);
    }

    #[test]
    fn cache_remembers_not_found() {
        let tmp = TempDir::new().unwrap();
        let cache = Arc::new(MemoryCache::new());
        let loader = ContentLoader::new(tmp.path(), "tr").with_cache(cache.clone());

        assert_eq!(loader.get_page_by_slug("tr", "later").unwrap(), None);
        write_file(tmp.path(), "tr/later.md", &page("Later"));
        assert_eq!(loader.get_page_by_slug("tr", "later").unwrap(), None);
        assert_eq!(cache.get(&CacheKey::one("tr", "later")), Some(Cached::Page(None)));
    }

    #[test]
    fn all_pages_cached_under_locale_key() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "en/a.md", &page("A"));
        let cache = Arc::new(MemoryCache::new());
        let loader = ContentLoader::new(tmp.path(), "tr").with_cache(cache.clone());

        let pages = loader.get_all_pages("en").unwrap();
        assert_eq!(cache.get(&CacheKey::all("en")), Some(Cached::Pages(pages)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn no_cache_backend_always_rereads() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "tr/about.md", &page("Before"));

        let loader = ContentLoader::new(tmp.path(), "tr").with_cache(Arc::new(NoCache));
        loader.get_page_by_slug("tr", "about").unwrap();
        write_file(tmp.path(), "tr/about.md", &page("After"));
        let doc = loader.get_page_by_slug("tr", "about").unwrap().unwrap();

        assert_eq!(doc.frontmatter.title, "After");
        assert_eq!(loader.stats().misses(), 2);
    }

    #[test]
    fn listings_bypass_cache() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "tr/news/a.md", &news("A", "date: 2024-01-01\n"));
        let cache = Arc::new(MemoryCache::new());
        let loader = ContentLoader::new(tmp.path(), "tr").with_cache(cache.clone());

        loader.get_all_news("tr").unwrap();
        loader.get_management_people("tr").unwrap();
        assert!(cache.is_empty());
        assert_eq!(loader.stats().total(), 0);
    }
}
