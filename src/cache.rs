//! In-process document cache.
//!
//! Parsing a content file is cheap, but a page render may ask for the same
//! listing many times. The loader can keep results in a key→result map for
//! the lifetime of the process.
//!
//! # Design
//!
//! The cache is injected into [`ContentLoader`](crate::loader::ContentLoader)
//! as an `Arc<dyn DocumentCache>` rather than living in a global, so tests
//! can hand in a [`NoCache`] or a fresh [`MemoryCache`].
//!
//! ## Keys
//!
//! Only two operations are cached, under string keys:
//!
//! - `all:{locale}` → every page of a locale
//! - `one:{locale}:{slug}` → a single lookup, including "not found"
//!
//! ## Lifetime
//!
//! There is no invalidation, eviction, or TTL. An entry lives until the
//! process exits. Whether the cache is consulted at all is decided by the
//! configured [`CachePolicy`](crate::config::CachePolicy).
//!
//! ## Concurrency
//!
//! Writes are idempotent: re-parsing the same file yields an equal document.
//! Two racing writers for the same key at worst store the same value twice.

use crate::types::PageDocument;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{PoisonError, RwLock};

/// A cache slot for one loader operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    All { locale: String },
    One { locale: String, slug: String },
}

impl CacheKey {
    pub fn all(locale: &str) -> Self {
        CacheKey::All {
            locale: locale.to_string(),
        }
    }

    pub fn one(locale: &str, slug: &str) -> Self {
        CacheKey::One {
            locale: locale.to_string(),
            slug: slug.to_string(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::All { locale } => write!(f, "all:{locale}"),
            CacheKey::One { locale, slug } => write!(f, "one:{locale}:{slug}"),
        }
    }
}

/// A stored loader result.
#[derive(Debug, Clone, PartialEq)]
pub enum Cached {
    Pages(Vec<PageDocument>),
    Page(Option<PageDocument>),
}

/// Storage backend for loader results.
pub trait DocumentCache: Send + Sync {
    fn get(&self, key: &CacheKey) -> Option<Cached>;
    fn set(&self, key: &CacheKey, value: Cached);
}

/// Process-lifetime map keyed by the key's string form.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Cached>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DocumentCache for MemoryCache {
    fn get(&self, key: &CacheKey) -> Option<Cached> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key.to_string())
            .cloned()
    }

    fn set(&self, key: &CacheKey, value: Cached) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
    }
}

/// A cache that never remembers anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCache;

impl DocumentCache for NoCache {
    fn get(&self, _key: &CacheKey) -> Option<Cached> {
        None
    }

    fn set(&self, _key: &CacheKey, _value: Cached) {}
}

/// Counters for cache lookups over a loader's lifetime.
///
/// `bypassed` counts calls made while the cache policy was inactive.
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU32,
    misses: AtomicU32,
    bypassed: AtomicU32,
}

impl CacheStats {
    pub fn hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn bypass(&self) {
        self.bypassed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn hits(&self) -> u32 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u32 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn bypassed(&self) -> u32 {
        self.bypassed.load(Ordering::Relaxed)
    }

    pub fn total(&self) -> u32 {
        self.hits() + self.misses() + self.bypassed()
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bypassed() > 0 && self.hits() + self.misses() == 0 {
            write!(f, "disabled ({} uncached reads)", self.bypassed())
        } else {
            write!(
                f,
                "{} cached, {} parsed ({} total)",
                self.hits(),
                self.misses(),
                self.total()
            )
        }
    }
}
