//! Head curation and title derivation.

use crate::format::tree::{Element, Node, find_descendant, find_descendant_mut, local_name};

/// Reduce `<head>` to its title and stylesheet links.
///
/// Keeps the first `title` descendant (if any) and every `link` descendant
/// whose `rel` contains "stylesheet" (case-insensitive), in encounter order,
/// title first. Everything else (metas, scripts, other links) is dropped.
/// No-op when the document has no head.
pub fn curate(root: &mut Element) {
    let Some(head) = find_descendant_mut(root, "head") else {
        return;
    };

    let mut kept: Vec<Node> = Vec::new();
    if let Some(title) = find_descendant(head, "title") {
        kept.push(Node::Element(title.clone()));
    }
    collect_stylesheet_links(head, &mut kept);

    head.text = None;
    head.children = kept;
}

fn collect_stylesheet_links(el: &Element, out: &mut Vec<Node>) {
    for child in &el.children {
        if let Node::Element(c) = child {
            if local_name(&c.tag) == "link"
                && c.attr("rel")
                    .is_some_and(|rel| rel.to_lowercase().contains("stylesheet"))
            {
                out.push(Node::Element(c.clone()));
            }
            collect_stylesheet_links(c, out);
        }
    }
}

/// Copy the first heading's text into `<title>`.
///
/// Ensures a title exists under head (created as the first child when
/// missing), then sets its text from the first `h2` in the document: the
/// first nested `span`'s text when that span has any, the `h2`'s own direct
/// text otherwise. Without an `h2` the title is left untouched, possibly
/// freshly created and empty.
pub fn update_title_from_heading(root: &mut Element) {
    let heading = heading_text(root);

    let Some(head) = find_descendant_mut(root, "head") else {
        return;
    };

    if find_descendant(head, "title").is_none() {
        head.children.insert(0, Node::Element(Element::new("title")));
    }

    let Some(text) = heading else { return };
    if let Some(title) = find_descendant_mut(head, "title") {
        title.text = Some(text);
    }
}

fn heading_text(root: &Element) -> Option<String> {
    let h2 = find_descendant(root, "h2")?;

    if let Some(span) = find_descendant(h2, "span")
        && let Some(text) = &span.text
        && !text.is_empty()
    {
        return Some(text.trim().to_string());
    }

    match &h2.text {
        Some(text) if !text.is_empty() => Some(text.trim().to_string()),
        _ => None,
    }
}
