//! Declaration header handling.
//!
//! Whatever XML declaration and DOCTYPE the input carries (well-formed or
//! not, present or not) is discarded and replaced with the fixed standard
//! lines. When a declaration is found somewhere past the start of the file,
//! everything before it goes with it.

use std::sync::LazyLock;

use regex::Regex;

/// Standard declaration emitted for every output file.
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Standard XHTML 1.1 document type emitted for every output file.
pub const DOCTYPE: &str = r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.1//EN" "http://www.w3.org/TR/xhtml11/DTD/xhtml11.dtd">"#;

static XML_DECL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<\?xml[^>]*\?>").unwrap());

static DOCTYPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<!DOCTYPE[^>]+>").unwrap());

/// Strip any XML declaration and DOCTYPE, returning the document body.
///
/// The declaration search is not anchored: content preceding a found
/// declaration is dropped. The DOCTYPE is looked for after the declaration
/// (or from the start when there is none). Absence of either is not an
/// error.
pub fn strip_declarations(content: &str) -> &str {
    let mut body_start = 0;
    if let Some(m) = XML_DECL_RE.find(content) {
        body_start = m.end();
    }
    if let Some(m) = DOCTYPE_RE.find(&content[body_start..]) {
        body_start += m.end();
    }
    content[body_start..].trim_start()
}
