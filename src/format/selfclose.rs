//! Empty-element policy.
//!
//! XHTML readers disagree on self-closed block elements, so the serializer
//! must keep `<p></p>` as an open/close pair while a genuinely void `<br/>`
//! stays collapsed. The contract between this pass and the serializer:
//!
//! - an element whose text is `Some("")` serializes as `<tag></tag>` on one
//!   line, never split by indentation;
//! - an element whose text is `None` (and has no children) serializes as
//!   `<tag/>`.
//!
//! This pass normalizes every childless element whose content is nothing or
//! only whitespace: to the empty-string form when its local name is in the
//! non-void roster, to the absent form otherwise. `br` is deliberately not
//! in the roster.

use crate::format::tree::{Element, Node, local_name};

/// Block/inline elements that must not be written self-closed.
pub const NON_VOID_TAGS: [&str; 9] = ["p", "div", "span", "a", "ul", "li", "h1", "h2", "h3"];

fn is_non_void(tag: &str) -> bool {
    NON_VOID_TAGS.contains(&tag)
}

/// Normalize effectively-empty elements so the serializer renders them on
/// one line, paired or collapsed per the roster.
pub fn restore_empty_elements(el: &mut Element) {
    let effectively_empty = el.children.is_empty()
        && el.text.as_deref().is_none_or(|t| t.trim().is_empty());
    if effectively_empty {
        el.text = if is_non_void(local_name(&el.tag)) {
            Some(String::new())
        } else {
            None
        };
    }
    for child in &mut el.children {
        if let Node::Element(c) = child {
            restore_empty_elements(c);
        }
    }
}
