//! Line classification for ChordPro input.
//!
//! Each line is classified on its own, without looking at its neighbours.

use std::sync::LazyLock;

use regex::Regex;

use super::directives::canonical_name;

/// `{name[-selector]: value}`, `{name value}` or `{name}`.
#[allow(clippy::expect_used)]
static RE_DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\{\s*([A-Za-z][A-Za-z0-9_]*)(?:-([^\s:}]+))?\s*(?::\s*(.*?)|\s+(.*?))?\s*\}$")
        .expect("valid regex: RE_DIRECTIVE")
});

/// One `key=value` pair at the start of the input.
#[allow(clippy::expect_used)]
static RE_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^([A-Za-z_][A-Za-z0-9_-]*)=(?:"([^"]*)"|'([^']*)'|([^\s"']+))"#)
        .expect("valid regex: RE_ATTRIBUTE")
});

/// A line that is nothing but an `[*annotation]`.
#[allow(clippy::expect_used)]
static RE_ANNOTATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[\*[^\]]*\]$").expect("valid regex: RE_ANNOTATION")
});

/// Chord brackets and inline annotations.
#[allow(clippy::expect_used)]
static RE_CHORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[[^\]]*\]").expect("valid regex: RE_CHORD")
});

/// Inline markup such as `<b>` or `</span>`.
#[allow(clippy::expect_used)]
static RE_MARKUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"</?[A-Za-z][^<>]*>").expect("valid regex: RE_MARKUP")
});

/// A parsed directive line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    /// Canonical, lower-cased name with abbreviations expanded.
    pub name: String,
    /// Conditional selector after `-`, e.g. `guitar` in `{textsize-guitar: 12}`.
    pub selector: Option<String>,
    /// Raw value after the separator, trimmed.
    pub value: String,
    /// `key=value` pairs when the whole value is made of them.
    pub attributes: Vec<(String, String)>,
}

impl Directive {
    /// Value of the first attribute named `key`.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Classification of one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// Blank line.
    Empty,
    /// `#` comment.
    Remark(String),
    /// `{...}` directive.
    Directive(Directive),
    /// Stand-alone `[*...]` annotation.
    Annotation(String),
    /// Lyric text with chords and markup stripped; empty for chord-only lines.
    Content(String),
}

/// Classify one line.
pub fn classify(raw: &str) -> Line {
    let line = raw.trim();
    if line.is_empty() {
        return Line::Empty;
    }
    if let Some(remark) = line.strip_prefix('#') {
        return Line::Remark(remark.trim().to_string());
    }
    if let Some(directive) = parse_directive(line) {
        return Line::Directive(directive);
    }
    if RE_ANNOTATION.is_match(line) {
        return Line::Annotation(line[2..line.len() - 1].trim().to_string());
    }
    Line::Content(strip_markup(line))
}

/// Parse a trimmed `{...}` line.
pub fn parse_directive(line: &str) -> Option<Directive> {
    let caps = RE_DIRECTIVE.captures(line)?;
    let name = canonical_name(caps.get(1)?.as_str());
    let selector = caps.get(2).map(|m| m.as_str().to_string());
    let value = caps
        .get(3)
        .or_else(|| caps.get(4))
        .map_or("", |m| m.as_str())
        .trim()
        .to_string();

    let attributes = if name == "meta" {
        meta_attribute(&value).into_iter().collect()
    } else {
        parse_attributes(&value)
    };

    Some(Directive { name, selector, value, attributes })
}

/// `{meta: name value}` carries exactly one pair.
fn meta_attribute(value: &str) -> Option<(String, String)> {
    let (name, rest) = value.split_once(char::is_whitespace).unwrap_or((value, ""));
    let name = name.trim().to_lowercase();
    (!name.is_empty()).then(|| (name, rest.trim().to_string()))
}

/// Attribute pairs, or nothing when any part of `value` isn't a pair.
fn parse_attributes(value: &str) -> Vec<(String, String)> {
    let mut rest = value.trim();
    let mut attributes = Vec::new();
    while !rest.is_empty() {
        let Some(caps) = RE_ATTRIBUTE.captures(rest) else {
            return Vec::new();
        };
        let (Some(whole), Some(key)) = (caps.get(0), caps.get(1)) else {
            return Vec::new();
        };
        let val = caps
            .get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map_or("", |m| m.as_str());
        attributes.push((key.as_str().to_lowercase(), val.to_string()));
        rest = rest[whole.end()..].trim_start();
    }
    attributes
}

/// Remove chords and inline markup from a lyric line.
pub fn strip_markup(line: &str) -> String {
    let without_chords = RE_CHORD.replace_all(line, "");
    let without_markup = RE_MARKUP.replace_all(&without_chords, "");
    without_markup.trim().to_string()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    fn directive(line: &str) -> Directive {
        match classify(line) {
            Line::Directive(d) => d,
            other => panic!("Expected directive for {line:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_classify_kinds() {
        assert_eq!(classify("   "), Line::Empty);
        assert_eq!(classify("# arranged for choir"), Line::Remark("arranged for choir".to_string()));
        assert_eq!(classify("[*Intro riff]"), Line::Annotation("Intro riff".to_string()));
        assert_eq!(
            classify("[G]Amazing [G7]grace, how [C]sweet"),
            Line::Content("Amazing grace, how sweet".to_string())
        );
    }

    #[test]
    fn test_directive_with_colon() {
        let d = directive("{title: Amazing Grace}");
        assert_eq!(d.name, "title");
        assert_eq!(d.value, "Amazing Grace");
        assert!(d.attributes.is_empty());
    }

    #[test]
    fn test_directive_abbreviation_and_space_separator() {
        let d = directive("{t Amazing Grace}");
        assert_eq!(d.name, "title");
        assert_eq!(d.value, "Amazing Grace");
        assert_eq!(directive("{SOC}").name, "start_of_chorus");
    }

    #[test]
    fn test_directive_selector() {
        let d = directive("{textsize-guitar: 12}");
        assert_eq!(d.name, "textsize");
        assert_eq!(d.selector.as_deref(), Some("guitar"));
        assert_eq!(d.value, "12");
    }

    #[test]
    fn test_attributes_all_quote_styles() {
        let d = directive(r#"{start_of_verse: label="Verse 1" id='v1' part=a}"#);
        assert_eq!(d.attribute("label"), Some("Verse 1"));
        assert_eq!(d.attribute("id"), Some("v1"));
        assert_eq!(d.attribute("part"), Some("a"));
    }

    #[test]
    fn test_partial_attributes_are_plain_value() {
        let d = directive("{comment: repeat x=2 then end}");
        assert!(d.attributes.is_empty());
        assert_eq!(d.value, "repeat x=2 then end");
    }

    #[test]
    fn test_meta_is_one_pair() {
        let d = directive("{meta: key G major}");
        assert_eq!(d.attributes, vec![("key".to_string(), "G major".to_string())]);
    }

    #[test]
    fn test_value_may_contain_braces() {
        assert_eq!(directive("{comment: play {softly}}").value, "play {softly}");
    }

    #[test]
    fn test_markup_stripped() {
        assert_eq!(strip_markup("<b>Glory</b> to [D]God"), "Glory to God");
        assert_eq!(classify("[G] [C] [D]"), Line::Content(String::new()));
    }

    #[test]
    fn test_unclosed_brace_is_content() {
        assert_eq!(classify("{title: broken"), Line::Content("{title: broken".to_string()));
    }
}
