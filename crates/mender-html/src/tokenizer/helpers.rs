//! Helper functions for the tokenizer.
//!
//! This module contains the small pattern matchers used while cutting the
//! input into tokens and while classifying a tag's markup:
//! - Character classes (word characters, whitespace)
//! - Empty-tag detection
//! - Tag name, attribute, and end-tag extraction
//! - Case-insensitive search for raw-text terminators

use mender_dom::AttributesMap;

// =============================================================================
// Character Classes
// =============================================================================

/// Characters allowed in tag and attribute names: ASCII letters, digits,
/// `_`, `:` and `-`.
#[must_use]
pub const fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | ':' | '-')
}

/// Whitespace as the markup dialect understands it: space, tab, line feed,
/// vertical tab, form feed and carriage return.
#[must_use]
pub const fn is_markup_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r')
}

// =============================================================================
// Tag Markup
// =============================================================================

/// True for a tag with nothing in it: `<>`, `</>`, `< / >`.
#[must_use]
pub fn is_empty_tag(raw: &str) -> bool {
    let Some(inner) = raw
        .strip_prefix('<')
        .and_then(|rest| rest.strip_suffix('>'))
    else {
        return false;
    };
    let inner = inner.trim_start_matches(is_markup_whitespace);
    let inner = inner.strip_prefix('/').unwrap_or(inner);
    inner.chars().all(is_markup_whitespace)
}

/// The first run of word characters in `raw`, lower-cased.
#[must_use]
pub fn tag_name_of(raw: &str) -> Option<String> {
    let start = raw.find(is_word_char)?;
    let rest = &raw[start..];
    let end = rest.find(|c: char| !is_word_char(c)).unwrap_or(rest.len());
    Some(rest[..end].to_ascii_lowercase())
}

/// Whether the first `/` in `raw` comes before the first occurrence of
/// `name` (compared case-insensitively).
///
/// This is a positional test, not a grammar: `</b>` is an end tag, while
/// `<br/>` and `<a href="x/y">` are not, because their `/` follows the name.
#[must_use]
pub fn end_slash_precedes_name(raw: &str, name: &str) -> bool {
    let Some(slash) = raw.find('/') else {
        return false;
    };
    raw.to_ascii_lowercase()
        .find(name)
        .is_some_and(|name_pos| slash < name_pos)
}

/// Parse the `key=value` pairs of a start tag.
///
/// Only tags shaped `<name` + whitespace + ... + `>` carry attributes. Inside,
/// every position is tried in turn for `key = value`; anything that does not
/// fit (valueless attributes, unterminated quotes) is skipped over.
#[must_use]
pub fn scan_attributes(raw: &str) -> AttributesMap {
    let mut attributes = AttributesMap::new();
    let Some(section) = attribute_section(raw) else {
        return attributes;
    };

    let mut pos = 0;
    while pos < section.len() {
        if let Some((key, value, end)) = match_attribute(section, pos) {
            let _ = attributes.insert(key.to_ascii_lowercase(), value.to_string());
            pos = end;
        } else {
            pos += section[pos..].chars().next().map_or(1, char::len_utf8);
        }
    }
    attributes
}

/// The text between `<name` + whitespace and the closing `>`.
fn attribute_section(raw: &str) -> Option<&str> {
    let body = raw.strip_prefix('<')?.strip_suffix('>')?;
    let name_end = body.find(|c: char| !is_word_char(c))?;
    if name_end == 0 {
        return None;
    }
    let rest = &body[name_end..];
    let section = rest.trim_start_matches(is_markup_whitespace);
    // At least one whitespace character must separate the name from the rest.
    (section.len() < rest.len()).then_some(section)
}

/// Try to match one `key = value` pair starting exactly at `start`.
///
/// Returns the key, the unquoted value, and the byte offset just past the pair.
fn match_attribute(section: &str, start: usize) -> Option<(&str, &str, usize)> {
    let bytes = section.as_bytes();
    let skip_spaces = |mut at: usize| {
        while at < bytes.len() && is_markup_whitespace(char::from(bytes[at])) {
            at += 1;
        }
        at
    };

    let key_start = skip_spaces(start);
    let mut at = key_start;
    while at < bytes.len() && is_word_char(char::from(bytes[at])) {
        at += 1;
    }
    if at == key_start {
        return None;
    }
    let key = &section[key_start..at];

    at = skip_spaces(at);
    if bytes.get(at) != Some(&b'=') {
        return None;
    }
    at = skip_spaces(at + 1);

    match *bytes.get(at)? {
        quote @ (b'"' | b'\'') => {
            let close = section[at + 1..].find(char::from(quote))? + at + 1;
            Some((key, &section[at + 1..close], close + 1))
        }
        b'>' => None,
        _ => {
            let value_end = section[at..]
                .find(|c: char| is_markup_whitespace(c) || c == '>')
                .map_or(section.len(), |offset| at + offset);
            Some((key, &section[at..value_end], value_end))
        }
    }
}

// =============================================================================
// Raw Text
// =============================================================================

/// Byte offset of `needle` in `haystack`, ignoring ASCII case.
///
/// `needle` must already be lower-case.
#[must_use]
pub fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    haystack.to_ascii_lowercase().find(needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tags() {
        assert!(is_empty_tag("<>"));
        assert!(is_empty_tag("</>"));
        assert!(is_empty_tag("< / >"));
        assert!(is_empty_tag("<\n>"));
        assert!(!is_empty_tag("<//>"));
        assert!(!is_empty_tag("<b>"));
    }

    #[test]
    fn tag_names() {
        assert_eq!(tag_name_of("<A HREF=x>").as_deref(), Some("a"));
        assert_eq!(tag_name_of("</ Td >").as_deref(), Some("td"));
        assert_eq!(tag_name_of("<svg:rect>").as_deref(), Some("svg:rect"));
        assert_eq!(tag_name_of("<!DOCTYPE html>").as_deref(), Some("doctype"));
        assert_eq!(tag_name_of("<$%>"), None);
    }

    #[test]
    fn end_slash_position() {
        assert!(end_slash_precedes_name("</b>", "b"));
        assert!(end_slash_precedes_name("< / B>", "b"));
        assert!(!end_slash_precedes_name("<br/>", "br"));
        assert!(!end_slash_precedes_name("<a href=\"x/y\">", "a"));
        assert!(!end_slash_precedes_name("<p>", "p"));
    }

    #[test]
    fn quoted_and_bare_values() {
        let attrs = scan_attributes(r#"<img SRC="a b.png" alt='x "y"' width=20>"#);
        assert_eq!(attrs.get("src").map(String::as_str), Some("a b.png"));
        assert_eq!(attrs.get("alt").map(String::as_str), Some("x \"y\""));
        assert_eq!(attrs.get("width").map(String::as_str), Some("20"));
        assert_eq!(attrs.len(), 3);
    }

    #[test]
    fn spaces_around_equals() {
        let attrs = scan_attributes("<font size = 3\n color =red>");
        assert_eq!(attrs.get("size").map(String::as_str), Some("3"));
        assert_eq!(attrs.get("color").map(String::as_str), Some("red"));
    }

    #[test]
    fn repeated_key_keeps_last_value() {
        let attrs = scan_attributes("<p align=left ALIGN=right>");
        assert_eq!(attrs.get("align").map(String::as_str), Some("right"));
        assert_eq!(attrs.len(), 1);
    }

    #[test]
    fn valueless_and_unterminated_attributes_are_skipped() {
        let attrs = scan_attributes(r#"<input checked name="open id=5>"#);
        assert_eq!(attrs.get("checked"), None);
        assert_eq!(attrs.get("name"), None);
        assert_eq!(attrs.get("id").map(String::as_str), Some("5"));
    }

    #[test]
    fn quoted_value_may_contain_angle_bracket() {
        let attrs = scan_attributes(r#"<a title="a>b" href=x>"#);
        assert_eq!(attrs.get("title").map(String::as_str), Some("a>b"));
        assert_eq!(attrs.get("href").map(String::as_str), Some("x"));
    }

    #[test]
    fn no_attributes_without_whitespace_after_name() {
        assert!(scan_attributes("<a>").is_empty());
        assert!(scan_attributes("<br/>").is_empty());
        assert!(scan_attributes("</a href=x>").is_empty());
        assert!(scan_attributes("< a href=x>").is_empty());
    }

    #[test]
    fn case_insensitive_search() {
        assert_eq!(find_ignore_ascii_case("abc</TiTlE>", "</title>"), Some(3));
        assert_eq!(find_ignore_ascii_case("abc", "</title>"), None);
    }
}
