//! Element tree model and recovering parse.
//!
//! The model mirrors the classic text/tail shape: an element owns the
//! character data before its first child (`text`), each node owns the
//! character data following it (`tail`). Character data is stored in its
//! source-escaped form and written back verbatim, so entity references
//! survive the round trip untouched; attribute values are stored unescaped
//! and re-escaped on output.
//!
//! The parser tolerates the breakage common in EPUB exports: mismatched and
//! unmatched end tags are accepted, content before the root or after it is
//! dropped, and unclosed elements are folded up at end of input. Only inputs
//! quick-xml cannot tokenize at all fail.

use anyhow::{Context, Result, anyhow, bail};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// A child of an element: nested element or comment.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Comment(Comment),
}

impl Node {
    pub fn tail_mut(&mut self) -> &mut Option<String> {
        match self {
            Node::Element(el) => &mut el.tail,
            Node::Comment(c) => &mut c.tail,
        }
    }

    pub fn tail(&self) -> Option<&str> {
        match self {
            Node::Element(el) => el.tail.as_deref(),
            Node::Comment(c) => c.tail.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    /// Comment body without the `<!--`/`-->` delimiters.
    pub text: String,
    pub tail: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Tag name as written, prefix included (`svg:image`).
    pub tag: String,
    /// Attributes in document order, values unescaped, duplicate keys folded
    /// to the last occurrence.
    pub attrs: Vec<(String, String)>,
    /// Character data before the first child. `Some("")` and `None` are
    /// distinct: the serializer emits `<tag></tag>` for the former and
    /// `<tag/>` for the latter.
    pub text: Option<String>,
    /// Character data after this element's closing tag.
    pub tail: Option<String>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            text: None,
            tail: None,
            children: Vec::new(),
        }
    }

    /// Attribute value by exact name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Tag name without its namespace prefix.
pub fn local_name(tag: &str) -> &str {
    tag.rsplit(':').next().unwrap_or(tag)
}

/// First descendant (depth-first, self excluded) whose local name matches.
pub fn find_descendant<'a>(el: &'a Element, name: &str) -> Option<&'a Element> {
    for child in &el.children {
        if let Node::Element(c) = child {
            if local_name(&c.tag) == name {
                return Some(c);
            }
            if let Some(found) = find_descendant(c, name) {
                return Some(found);
            }
        }
    }
    None
}

/// Mutable variant of [`find_descendant`].
///
/// Resolved in two passes (locate a child-index path, then walk it) to keep
/// the borrow local to each step.
pub fn find_descendant_mut<'a>(el: &'a mut Element, name: &str) -> Option<&'a mut Element> {
    let mut path = Vec::new();
    if !find_path(el, name, &mut path) {
        return None;
    }
    let mut current = el;
    for index in path {
        current = match &mut current.children[index] {
            Node::Element(next) => next,
            Node::Comment(_) => return None,
        };
    }
    Some(current)
}

fn find_path(el: &Element, name: &str, path: &mut Vec<usize>) -> bool {
    for (i, child) in el.children.iter().enumerate() {
        if let Node::Element(c) = child {
            path.push(i);
            if local_name(&c.tag) == name || find_path(c, name, path) {
                return true;
            }
            path.pop();
        }
    }
    false
}

// =============================================================================
// Parsing
// =============================================================================

/// Parse markup into its root element.
pub fn parse(body: &str) -> Result<Element> {
    let mut reader = Reader::from_str(body);
    let config = reader.config_mut();
    config.expand_empty_elements = true;
    config.check_end_names = false;
    config.allow_unmatched_ends = true;

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                // Elements after the root has closed are dropped wholesale.
                if root.is_some() && stack.is_empty() {
                    continue;
                }
                stack.push(element_from_start(&start)?);
            }
            Ok(Event::End(_)) => close_element(&mut stack, &mut root),
            // Not emitted with expand_empty_elements, but kept equivalent.
            Ok(Event::Empty(start)) => {
                if root.is_some() && stack.is_empty() {
                    continue;
                }
                stack.push(element_from_start(&start)?);
                close_element(&mut stack, &mut root);
            }
            Ok(Event::Text(t)) => {
                append_text(&mut stack, &String::from_utf8_lossy(t.as_ref()));
            }
            Ok(Event::GeneralRef(r)) => {
                append_text(
                    &mut stack,
                    &format!("&{};", String::from_utf8_lossy(r.as_ref())),
                );
            }
            Ok(Event::CData(c)) => {
                append_text(
                    &mut stack,
                    &format!("<![CDATA[{}]]>", String::from_utf8_lossy(c.as_ref())),
                );
            }
            Ok(Event::Comment(c)) => {
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(Node::Comment(Comment {
                        text: String::from_utf8_lossy(c.as_ref()).into_owned(),
                        tail: None,
                    }));
                }
            }
            // Declarations were already stripped; stray ones are dropped.
            Ok(Event::Decl(_) | Event::DocType(_) | Event::PI(_)) => {}
            Ok(Event::Eof) => break,
            Err(e) => bail!("XML parse error at position {}: {e}", reader.error_position()),
        }
    }

    // Fold unclosed elements up to their parents.
    while !stack.is_empty() {
        close_element(&mut stack, &mut root);
    }

    root.context("document has no root element")
}

fn close_element(stack: &mut Vec<Element>, root: &mut Option<Element>) {
    // Unmatched end tags pop nothing and are ignored.
    let Some(el) = stack.pop() else { return };
    if let Some(parent) = stack.last_mut() {
        parent.children.push(Node::Element(el));
    } else if root.is_none() {
        *root = Some(el);
    }
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element> {
    let mut el = Element::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());

    for attr in start.attributes().with_checks(false) {
        let attr = attr.map_err(|e| anyhow!("malformed attribute in <{}>: {e}", el.tag))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let raw = String::from_utf8_lossy(attr.value.as_ref()).into_owned();
        let value = quick_xml::escape::unescape(&raw)
            .map(|v| v.into_owned())
            .unwrap_or(raw);

        match el.attrs.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => el.attrs.push((key, value)),
        }
    }

    Ok(el)
}

/// Attach character data to the open element: to its `text` before the first
/// child, to the last child's `tail` after. Data outside any element is
/// dropped.
fn append_text(stack: &mut [Element], chunk: &str) {
    let Some(top) = stack.last_mut() else { return };
    let slot = match top.children.last_mut() {
        Some(node) => node.tail_mut(),
        None => &mut top.text,
    };
    match slot {
        Some(existing) => existing.push_str(chunk),
        None => *slot = Some(chunk.to_string()),
    }
}
