//! Root-tag attribute standardization.
//!
//! Works on the raw document text before parsing: the first `<html …>`
//! opening tag is rewritten so that it carries the XHTML namespace and a
//! language tag. Existing attributes pass through in order; duplicated
//! names collapse to their last value.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// Namespace injected when the root carries no `xmlns`.
pub const XHTML_NS: &str = "http://www.w3.org/1999/xhtml";

/// Language injected when the root carries no `xml:lang`.
pub const DEFAULT_LANG: &str = "zh-Hans";

static HTML_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<html\b([^>]*)>").unwrap());

/// Ensure the first `<html>` tag carries `xmlns` and `xml:lang`.
///
/// No-op when the document has no `<html>` tag. Pre-existing values for
/// either attribute are never overwritten.
pub fn standardize_root_tag(content: &str) -> Cow<'_, str> {
    let Some(caps) = HTML_TAG_RE.captures(content) else {
        return Cow::Borrowed(content);
    };
    let whole = caps.get(0).unwrap();

    let mut attrs: Vec<(String, String)> = Vec::new();
    for (key, value) in parse_attributes(&caps[1]) {
        let key = key.to_lowercase();
        match attrs.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => attrs.push((key, value)),
        }
    }

    if !attrs.iter().any(|(k, _)| k == "xmlns") {
        attrs.push(("xmlns".to_string(), XHTML_NS.to_string()));
    }
    if !attrs.iter().any(|(k, _)| k == "xml:lang") {
        attrs.push(("xml:lang".to_string(), DEFAULT_LANG.to_string()));
    }

    let rebuilt: Vec<String> = attrs
        .iter()
        .map(|(k, v)| format!("{k}=\"{v}\""))
        .collect();
    let tag = format!("<html {}>", rebuilt.join(" "));

    let mut out = String::with_capacity(content.len() + tag.len());
    out.push_str(&content[..whole.start()]);
    out.push_str(&tag);
    out.push_str(&content[whole.end()..]);
    Cow::Owned(out)
}

/// Parse an attribute string into (name, value) pairs.
///
/// Handles double-quoted, single-quoted, unquoted and bare (valueless)
/// attributes; names may contain `:` qualifiers.
fn parse_attributes(s: &str) -> Vec<(String, String)> {
    let mut attrs = Vec::new();
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c.is_whitespace() || c == '/' {
            continue;
        }

        // Read attribute name
        let mut name = String::new();
        name.push(c);
        while let Some(&next) = chars.peek() {
            if next == '=' || next.is_whitespace() {
                break;
            }
            name.push(chars.next().unwrap());
        }

        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }

        if chars.peek() == Some(&'=') {
            chars.next();

            while chars.peek().is_some_and(|c| c.is_whitespace()) {
                chars.next();
            }

            let value = if chars.peek() == Some(&'"') || chars.peek() == Some(&'\'') {
                let quote = chars.next().unwrap();
                let mut val = String::new();
                for c in chars.by_ref() {
                    if c == quote {
                        break;
                    }
                    val.push(c);
                }
                val
            } else {
                let mut val = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() {
                        break;
                    }
                    val.push(chars.next().unwrap());
                }
                val
            };

            attrs.push((name, value));
        } else {
            // Boolean attribute (no value)
            attrs.push((name, String::new()));
        }
    }

    attrs
}
