//! Locale-style string ordering.
//!
//! Orders the way a browser's default collator orders everyday strings:
//! base letters compare first, ignoring accents and case, so "Émile" sorts
//! between "Eddie" and "Eve". Ties fall back to unaccented before accented,
//! then lowercase before uppercase, then raw code points. Digits compare
//! as characters, so "10" sorts before "9".

use std::cmp::Ordering;
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Compare two strings in locale order.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| accented(a).cmp(accented(b)))
        .then_with(|| case_order(a, b))
        .then_with(|| a.cmp(b))
}

/// Lowercased letters with accents stripped.
fn base_letters(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

/// Lowercased and decomposed, accents kept as trailing marks.
fn accented(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd().flat_map(char::to_lowercase)
}

/// First position where case differs decides: lowercase wins.
fn case_order(a: &str, b: &str) -> Ordering {
    for (x, y) in a.chars().zip(b.chars()) {
        if x == y {
            continue;
        }
        if x.is_lowercase() && y.is_uppercase() {
            return Ordering::Less;
        }
        if x.is_uppercase() && y.is_lowercase() {
            return Ordering::Greater;
        }
    }
    Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_primary() {
        assert_eq!(locale_compare("apple", "Banana"), Ordering::Less);
        assert_eq!(locale_compare("Zed", "alpha"), Ordering::Greater);
    }

    #[test]
    fn test_lowercase_before_uppercase_on_tie() {
        assert_eq!(locale_compare("a", "A"), Ordering::Less);
        assert_eq!(locale_compare("Bob", "bob"), Ordering::Greater);
    }

    #[test]
    fn test_equal_strings() {
        assert_eq!(locale_compare("same", "same"), Ordering::Equal);
        assert_eq!(locale_compare("", ""), Ordering::Equal);
    }

    #[test]
    fn test_prefix_sorts_first() {
        assert_eq!(locale_compare("a@x.com", "a@x.com.au"), Ordering::Less);
        assert_eq!(locale_compare("", "a"), Ordering::Less);
    }

    #[test]
    fn test_accents_ignored_at_first_level() {
        assert_eq!(locale_compare("Émile", "Eve"), Ordering::Less);
        assert_eq!(locale_compare("Émile", "Zoe"), Ordering::Less);
        assert_eq!(locale_compare("Ålesund", "Bondi"), Ordering::Less);
        assert_eq!(locale_compare("naïve", "nave"), Ordering::Less);
    }

    #[test]
    fn test_unaccented_before_accented_on_tie() {
        assert_eq!(locale_compare("e", "é"), Ordering::Less);
        assert_eq!(locale_compare("resume", "résumé"), Ordering::Less);
        assert_eq!(locale_compare("é", "É"), Ordering::Less);
    }

    #[test]
    fn test_precomposed_and_decomposed_agree_first() {
        let decomposed = "e\u{301}mile";
        assert_eq!(base_letters("émile").collect::<String>(), "emile");
        assert_eq!(base_letters(decomposed).collect::<String>(), "emile");
    }

    #[test]
    fn test_digits_compare_as_text() {
        assert_eq!(locale_compare("10", "9"), Ordering::Less);
    }
}
