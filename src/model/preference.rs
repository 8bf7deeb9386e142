//! Default-entry selection shared by titles and authors.
//!
//! Policy: the first non-blank entry marked original, else the first non-blank
//! entry without a language, else the first non-blank entry. When every entry is
//! blank the first entry still wins.

/// An entry that can compete for "default" status.
pub trait Preferable {
    /// Display text; blank text is skipped during selection.
    fn text(&self) -> &str;

    /// Language tag, if the entry declares one.
    fn language(&self) -> Option<&str>;

    /// Whether the entry is marked as the authoritative original.
    fn is_original(&self) -> bool;
}

/// Pick the default entry from `items`, or `None` for an empty slice.
pub fn select_default<T: Preferable>(items: &[T]) -> Option<&T> {
    let mut first_non_blank = None;
    let mut first_unlabelled = None;
    for item in items.iter().filter(|item| !item.text().trim().is_empty()) {
        if item.is_original() {
            return Some(item);
        }
        first_non_blank.get_or_insert(item);
        if item.language().is_none_or(|lang| lang.trim().is_empty()) {
            first_unlabelled.get_or_insert(item);
        }
    }

    first_unlabelled.or(first_non_blank).or_else(|| items.first())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    struct Entry {
        text: &'static str,
        lang: Option<&'static str>,
        original: bool,
    }

    impl Preferable for Entry {
        fn text(&self) -> &str {
            self.text
        }

        fn language(&self) -> Option<&str> {
            self.lang
        }

        fn is_original(&self) -> bool {
            self.original
        }
    }

    const fn entry(text: &'static str, lang: Option<&'static str>, original: bool) -> Entry {
        Entry { text, lang, original }
    }

    #[test]
    fn original_beats_unlabelled() {
        let items = [
            entry("Großer Gott", Some("de"), false),
            entry("Holy God", None, false),
            entry("Grosser Gott, wir loben dich", Some("de"), true),
        ];
        assert_eq!(select_default(&items).unwrap().text, "Grosser Gott, wir loben dich");
    }

    #[test]
    fn unlabelled_beats_first() {
        let items = [entry("Amazing Grace", Some("en"), false), entry("Sublime Gracia", None, false)];
        assert_eq!(select_default(&items).unwrap().text, "Sublime Gracia");
    }

    #[test]
    fn falls_back_to_first_non_blank() {
        let items = [entry("  ", None, true), entry("Gracia", Some("es"), false), entry("Grâce", Some("fr"), false)];
        assert_eq!(select_default(&items).unwrap().text, "Gracia");
    }

    #[test]
    fn all_blank_returns_first() {
        let items = [entry("", Some("en"), false), entry(" ", None, false)];
        assert_eq!(select_default(&items).unwrap().lang, Some("en"));
    }

    #[test]
    fn empty_slice_has_no_default() {
        let items: [Entry; 0] = [];
        assert!(select_default(&items).is_none());
    }
}
