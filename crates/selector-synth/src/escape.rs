//! Escaping of identifiers and attribute values for selector expressions
//!
//! Both helpers return `None` when a value cannot be represented; callers
//! drop that single candidate.

use std::fmt::Write;

/// Escape an id or class token for use after `#` / `.`.
pub fn escape_ident(value: &str) -> Option<String> {
    if value.is_empty() {
        return None;
    }
    let chars: Vec<char> = value.chars().collect();
    let mut out = String::with_capacity(value.len() + 4);
    for (idx, &ch) in chars.iter().enumerate() {
        match ch {
            '\0' => return None,
            '\u{1}'..='\u{1f}' | '\u{7f}' => hex_escape(&mut out, ch),
            '0'..='9' if idx == 0 => hex_escape(&mut out, ch),
            '0'..='9' if idx == 1 && chars[0] == '-' => hex_escape(&mut out, ch),
            '-' if idx == 0 && chars.len() == 1 => out.push_str("\\-"),
            c if c.is_ascii_alphanumeric() || c == '-' || c == '_' || (c as u32) >= 0x80 => {
                out.push(c)
            }
            c => {
                out.push('\\');
                out.push(c);
            }
        }
    }
    Some(out)
}

/// Escape an attribute value for use inside double quotes.
pub fn escape_attr_value(value: &str) -> Option<String> {
    if value.is_empty() {
        return None;
    }
    let mut out = String::with_capacity(value.len() + 2);
    for ch in value.chars() {
        match ch {
            '\0' => return None,
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{1}'..='\u{1f}' | '\u{7f}' => hex_escape(&mut out, ch),
            c => out.push(c),
        }
    }
    Some(out)
}

/// Attribute name tokens are restricted to a safe subset; anything else is
/// left out of candidate construction.
pub fn is_plain_attr_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Tag names are written unescaped, so they must be a letter followed by
/// letters, digits, `-` or `_`.
pub fn is_plain_tag_name(tag: &str) -> bool {
    let mut chars = tag.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn hex_escape(out: &mut String, ch: char) {
    let _ = write!(out, "\\{:x} ", ch as u32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_identifiers_pass_through() {
        assert_eq!(escape_ident("checkout-button").as_deref(), Some("checkout-button"));
        assert_eq!(escape_ident("player__title").as_deref(), Some("player__title"));
    }

    #[test]
    fn special_characters_are_escaped() {
        assert_eq!(escape_ident("1col").as_deref(), Some("\\31 col"));
        assert_eq!(escape_ident("-2x").as_deref(), Some("-\\32 x"));
        assert_eq!(escape_ident("-").as_deref(), Some("\\-"));
        assert_eq!(escape_ident("md:flex").as_deref(), Some("md\\:flex"));
        assert_eq!(escape_ident("a b").as_deref(), Some("a\\ b"));
    }

    #[test]
    fn unescapable_values_are_refused() {
        assert!(escape_ident("").is_none());
        assert!(escape_ident("a\0b").is_none());
        assert!(escape_attr_value("").is_none());
        assert!(escape_attr_value("x\0").is_none());
    }

    #[test]
    fn tag_names() {
        assert!(is_plain_tag_name("li"));
        assert!(is_plain_tag_name("h2"));
        assert!(is_plain_tag_name("my-widget"));
        assert!(!is_plain_tag_name("svg:rect"));
        assert!(!is_plain_tag_name("2col"));
        assert!(!is_plain_tag_name(""));
    }

    #[test]
    fn attribute_values_escape_quotes() {
        assert_eq!(
            escape_attr_value(r#"say "hi"\"#).as_deref(),
            Some(r#"say \"hi\"\\"#)
        );
        assert_eq!(escape_attr_value("a\nb").as_deref(), Some("a\\a b"));
    }
}
