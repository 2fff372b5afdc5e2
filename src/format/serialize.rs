//! Re-indentation and serialization.
//!
//! `indent` rewrites inter-element whitespace so each nesting level sits
//! `width` spaces deeper; non-blank character data is never touched, so
//! mixed content survives. `write` linearizes the tree, honoring the
//! empty-element contract described in [`crate::format::selfclose`].

use std::borrow::Cow;

use crate::format::tree::{Element, Node};

/// Re-indent the tree in place.
///
/// Container elements get a newline plus padding before each child and
/// before their closing tag; childless elements and non-blank text are left
/// alone.
pub fn indent(root: &mut Element, width: usize) {
    indent_level(root, width, 0);
}

fn indent_level(el: &mut Element, width: usize, level: usize) {
    if el.children.is_empty() {
        return;
    }

    let child_pad = format!("\n{}", " ".repeat(width * (level + 1)));
    let close_pad = format!("\n{}", " ".repeat(width * level));

    if is_blank(&el.text) {
        el.text = Some(child_pad.clone());
    }

    let last = el.children.len() - 1;
    for (i, child) in el.children.iter_mut().enumerate() {
        if let Node::Element(c) = child {
            indent_level(c, width, level + 1);
        }
        let tail = child.tail_mut();
        if is_blank(tail) {
            *tail = Some(if i == last {
                close_pad.clone()
            } else {
                child_pad.clone()
            });
        }
    }
}

fn is_blank(text: &Option<String>) -> bool {
    text.as_deref().is_none_or(|t| t.trim().is_empty())
}

/// Serialize the tree. Character data is written verbatim (it is stored in
/// source-escaped form); attribute values are escaped here.
pub fn write(root: &Element, out: &mut String) {
    write_element(root, out);
}

fn write_element(el: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&el.tag);
    for (key, value) in &el.attrs {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&escape_attr(value));
        out.push('"');
    }

    if el.text.is_none() && el.children.is_empty() {
        out.push_str("/>");
        return;
    }

    out.push('>');
    if let Some(text) = &el.text {
        out.push_str(text);
    }
    for child in &el.children {
        match child {
            Node::Element(c) => write_element(c, out),
            Node::Comment(c) => {
                out.push_str("<!--");
                out.push_str(&c.text);
                out.push_str("-->");
            }
        }
        if let Some(tail) = child.tail() {
            out.push_str(tail);
        }
    }
    out.push_str("</");
    out.push_str(&el.tag);
    out.push('>');
}

/// Escape an attribute value for double-quoted output.
fn escape_attr(s: &str) -> Cow<'_, str> {
    if !s.contains(['<', '>', '&', '"']) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '&' => result.push_str("&amp;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::selfclose::restore_empty_elements;
    use crate::format::tree::parse;

    fn rendered(markup: &str, width: usize) -> String {
        let mut root = parse(markup).unwrap();
        restore_empty_elements(&mut root);
        indent(&mut root, width);
        let mut out = String::new();
        write(&root, &mut out);
        out
    }

    #[test]
    fn indents_nested_elements() {
        let out = rendered("<html><body><p>text</p></body></html>", 4);
        assert_eq!(
            out,
            "<html>\n    <body>\n        <p>text</p>\n    </body>\n</html>"
        );
    }

    #[test]
    fn indent_width_is_configurable() {
        let out = rendered("<html><body/></html>", 2);
        assert_eq!(out, "<html>\n  <body/>\n</html>");
    }

    #[test]
    fn empty_pair_stays_on_one_line() {
        let out = rendered("<html><p></p><p/></html>", 4);
        assert_eq!(out, "<html>\n    <p></p>\n    <p></p>\n</html>");
    }

    #[test]
    fn br_stays_self_closed() {
        let out = rendered("<html><div>a<br/>b</div></html>", 4);
        assert!(out.contains("a<br/>b"));
    }

    #[test]
    fn mixed_content_text_is_not_reindented() {
        let out = rendered("<html><p>one <span>two</span> three</p></html>", 4);
        assert!(out.contains("<p>one <span>two</span> three</p>"));
    }

    #[test]
    fn attribute_values_are_escaped() {
        let mut root = parse(r#"<html title="a &amp; &quot;b&quot;"/>"#).unwrap();
        root.text = Some(String::new());
        let mut out = String::new();
        write(&root, &mut out);
        assert_eq!(out, r#"<html title="a &amp; &quot;b&quot;"></html>"#);
    }

    #[test]
    fn comments_round_trip() {
        let out = rendered("<html><!-- keep --><p/></html>", 4);
        assert!(out.contains("<!-- keep -->"));
    }

    #[test]
    fn reindenting_indented_output_is_stable() {
        let first = rendered("<html><body><p>text</p><p></p></body></html>", 4);
        let second = rendered(&first, 4);
        assert_eq!(first, second);
    }
}
