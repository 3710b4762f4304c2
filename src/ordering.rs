//! Caller-side ordering for management listings.
//!
//! The loader returns profiles in walk order. Sites usually want a few
//! people pinned in a fixed order (founder, CEO, …) and everyone else
//! alphabetical by name. Alphabetical means the reader's alphabet: in
//! Turkish `Ç` follows `C`, `İ` follows `I`, and `Ş` follows `S`.

use crate::date::is_turkish_locale;
use crate::types::PageDocument;
use std::cmp::Ordering;

/// Turkish alphabet, extended with `q`, `w`, `x` in their Latin positions.
const TURKISH_ALPHABET: [char; 32] = [
    'a', 'b', 'c', 'ç', 'd', 'e', 'f', 'g', 'ğ', 'h', 'ı', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'ö',
    'p', 'q', 'r', 's', 'ş', 't', 'u', 'ü', 'v', 'w', 'x', 'y', 'z',
];

const LETTER_BASE: u32 = 0x11_0000;

/// Sort management profiles in place.
///
/// Slugs in `priority` come first, in list order. The rest follow by title
/// collated for `locale`, ties broken by slug.
pub fn sort_management(people: &mut [PageDocument], priority: &[String], locale: &str) {
    let turkish = is_turkish_locale(locale);
    people.sort_by(|a, b| {
        let rank_a = priority.iter().position(|s| *s == a.slug);
        let rank_b = priority.iter().position(|s| *s == b.slug);
        match (rank_a, rank_b) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => collate(&a.frontmatter.title, &b.frontmatter.title, turkish)
                .then_with(|| a.slug.cmp(&b.slug)),
        }
    });
}

/// Compare two strings by the locale's alphabet, ignoring case.
pub fn collate(a: &str, b: &str, turkish: bool) -> Ordering {
    collation_key(a, turkish).cmp(&collation_key(b, turkish))
}

fn collation_key(text: &str, turkish: bool) -> Vec<u32> {
    if !turkish {
        return text.chars().flat_map(char::to_lowercase).map(u32::from).collect();
    }
    text.chars()
        .map(turkish_lowercase)
        .map(|c| match TURKISH_ALPHABET.iter().position(|&l| l == c) {
            Some(pos) => LETTER_BASE + pos as u32,
            // Letters outside the alphabet sort after it, symbols before
            None if c.is_alphabetic() => LETTER_BASE + 0x100 + u32::from(c),
            None => u32::from(c),
        })
        .collect()
}

fn turkish_lowercase(c: char) -> char {
    match c {
        'I' => 'ı',
        'İ' => 'i',
        _ => c.to_lowercase().next().unwrap_or(c),
    }
}
