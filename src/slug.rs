//! Route-key normalization for content files.
//!
//! Every document is addressed by a slug derived from its file base name.
//! Content editors name files in Turkish as often as in English, so the
//! normalizer transliterates the Turkish letters to their ASCII base before
//! collapsing everything else into hyphens:
//!
//! ```text
//! Hakkımızda        → hakkimizda
//! Şube Açılışları   → sube-acilislari
//! 2024--Yeni  Menü  → 2024-yeni-menu
//! ```
//!
//! Only the Turkish letters are transliterated. Any other non-ASCII character
//! (`é`, `日`) is treated like punctuation and becomes a separator, so two
//! different inputs can collide on the same slug. Lookups elsewhere resolve
//! collisions as first match wins.

/// Map a Turkish letter to its ASCII base, leaving everything else untouched.
fn transliterate(c: char) -> char {
    match c {
        'ç' | 'Ç' => 'c',
        'ğ' | 'Ğ' => 'g',
        'ı' | 'İ' => 'i',
        'ö' | 'Ö' => 'o',
        'ş' | 'Ş' => 's',
        'ü' | 'Ü' => 'u',
        other => other,
    }
}

/// Normalize an arbitrary file stem or user-supplied slug.
///
/// The result contains only `[a-z0-9-]`, never starts or ends with a hyphen,
/// and never contains two hyphens in a row. Applying it twice is the same as
/// applying it once.
pub fn normalize_slug(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut prev_dash = true;
    for c in input.chars().map(transliterate) {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            prev_dash = false;
        } else if !prev_dash {
            // Runs of anything outside [a-zA-Z0-9] (hyphens included) collapse
            slug.push('-');
            prev_dash = true;
        }
    }
    if slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Derive the slug for a repository-relative path like `news/Açılış.md`.
///
/// Only the base name counts; the directory the file lives in never becomes
/// part of the slug.
pub fn slug_from_path(relative_path: &str) -> String {
    let file_name = relative_path.rsplit('/').next().unwrap_or(relative_path);
    let stem = file_name.strip_suffix(".md").unwrap_or(file_name);
    normalize_slug(stem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn ascii_passthrough_is_lowercased() {
        assert_eq!(normalize_slug("hello-world"), "hello-world");
        assert_eq!(normalize_slug("Photo123"), "photo123");
    }

    #[test]
    fn turkish_letters_are_transliterated() {
        assert_eq!(normalize_slug("Hakkımızda"), "hakkimizda");
        assert_eq!(normalize_slug("Şube Açılışları"), "sube-acilislari");
        assert_eq!(normalize_slug("ÇĞİÖŞÜ"), "cgiosu");
        assert_eq!(normalize_slug("çğıöşü"), "cgiosu");
    }

    #[test]
    fn dotted_capital_i_and_plain_capital_i() {
        assert_eq!(normalize_slug("İstanbul"), "istanbul");
        assert_eq!(normalize_slug("IZMIR"), "izmir");
    }

    #[test]
    fn other_non_ascii_becomes_separator() {
        assert_eq!(normalize_slug("café"), "caf");
        assert_eq!(normalize_slug("Zürich"), "zurich");
        assert_eq!(normalize_slug("Crème brûlée"), "cr-me-br-l-e");
        assert_eq!(normalize_slug("日本語"), "");
    }

    #[test]
    fn separators_collapse_and_trim() {
        assert_eq!(normalize_slug("a---b"), "a-b");
        assert_eq!(normalize_slug("  Yeni   Menü  "), "yeni-menu");
        assert_eq!(normalize_slug("--hello--"), "hello");
        assert_eq!(normalize_slug("foo@bar#baz"), "foo-bar-baz");
        assert_eq!(normalize_slug("---"), "");
        assert_eq!(normalize_slug(""), "");
    }

    #[test]
    fn collisions_are_possible() {
        assert_eq!(normalize_slug("Şef"), normalize_slug("sef"));
    }

    #[test]
    fn slug_from_nested_path_uses_base_name() {
        assert_eq!(slug_from_path("news/Yeni Şube.md"), "yeni-sube");
        assert_eq!(slug_from_path("about.md"), "about");
        assert_eq!(slug_from_path("management/2023/Ayşe-Kaya.md"), "ayse-kaya");
    }

    proptest! {
        #[test]
        fn output_alphabet_is_restricted(input in "\\PC*") {
            let slug = normalize_slug(&input);
            prop_assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
            prop_assert!(!slug.starts_with('-'));
            prop_assert!(!slug.ends_with('-'));
            prop_assert!(!slug.contains("--"));
        }

        #[test]
        fn normalization_is_idempotent(input in "\\PC*") {
            let once = normalize_slug(&input);
            prop_assert_eq!(normalize_slug(&once), once.clone());
        }
    }
}
