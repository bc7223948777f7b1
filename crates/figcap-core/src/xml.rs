use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::FigcapError;

/// A child of an element.
///
/// CDATA sections are kept apart from ordinary character data so text
/// extraction can tell them apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    CData(String),
}

/// Deepest element nesting accepted by [`parse_document`].
///
/// Tree traversal and teardown recurse once per level, so this also bounds
/// their stack use.
pub const MAX_DEPTH: usize = 1024;

/// A parsed XML element.
///
/// Names are kept qualified (`xlink:href`, not `href`) so lookups match
/// the markup exactly as written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Direct element children, in document order.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    /// All descendant elements named `name`, in document order.
    ///
    /// The element itself is never included, only what lies beneath it.
    pub fn descendants(&self, name: &str) -> Vec<&Element> {
        let mut out = Vec::new();
        collect_descendants(self, name, &mut out);
        out
    }

    /// First descendant element named `name` in document order.
    pub fn first_descendant(&self, name: &str) -> Option<&Element> {
        for child in self.child_elements() {
            if child.name == name {
                return Some(child);
            }
            if let Some(found) = child.first_descendant(name) {
                return Some(found);
            }
        }
        None
    }

    fn push(&mut self, node: Node) {
        self.children.push(node);
    }
}

fn collect_descendants<'a>(element: &'a Element, name: &str, out: &mut Vec<&'a Element>) {
    for child in element.child_elements() {
        if child.name == name {
            out.push(child);
        }
        collect_descendants(child, name, out);
    }
}

/// A parsed document: the root element plus lookups that also consider the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
}

impl Document {
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// All elements named `name` anywhere in the document, root included.
    pub fn elements_by_name(&self, name: &str) -> Vec<&Element> {
        let mut out = Vec::new();
        if self.root.name == name {
            out.push(&self.root);
        }
        collect_descendants(&self.root, name, &mut out);
        out
    }

    pub fn first_element(&self, name: &str) -> Option<&Element> {
        if self.root.name == name {
            return Some(&self.root);
        }
        self.root.first_descendant(name)
    }
}

/// Parse XML markup into a [`Document`].
///
/// Character data is kept exactly as written (no trimming); entity
/// references are resolved. Comments, processing instructions and the
/// doctype are dropped.
pub fn parse_document(xml: &str) -> Result<Document, FigcapError> {
    let mut reader = Reader::from_str(xml);
    // Synthetic holder for the root element and any top-level text.
    let mut stack: Vec<Element> = vec![Element::new("")];

    loop {
        let event = reader.read_event().map_err(|e| {
            FigcapError::Xml(format!("at byte {}: {e}", reader.buffer_position()))
        })?;
        match event {
            Event::Start(ref e) => {
                // The stack holds the synthetic holder plus one entry per open element.
                if stack.len() > MAX_DEPTH {
                    return Err(FigcapError::Xml(format!(
                        "nesting too deep (more than {MAX_DEPTH} levels)"
                    )));
                }
                stack.push(element_from_start(e)?);
            }
            Event::Empty(ref e) => {
                let element = element_from_start(e)?;
                push_node(&mut stack, Node::Element(element));
            }
            Event::End(_) => {
                if stack.len() < 2 {
                    return Err(FigcapError::Xml("unexpected closing tag".into()));
                }
                if let Some(element) = stack.pop() {
                    push_node(&mut stack, Node::Element(element));
                }
            }
            Event::Text(ref e) => {
                let text = match e.unescape() {
                    Ok(t) => t.into_owned(),
                    Err(_) => unescape_lenient(&String::from_utf8_lossy(e)),
                };
                push_text(&mut stack, text);
            }
            Event::CData(ref e) => {
                let text = String::from_utf8_lossy(e).into_owned();
                if !text.is_empty() {
                    push_node(&mut stack, Node::CData(text));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if stack.len() != 1 {
        let open = stack.last().map(|e| e.name.clone()).unwrap_or_default();
        return Err(FigcapError::Xml(format!("unclosed element <{open}>")));
    }

    let holder = stack.pop().unwrap_or_default();
    let root = holder
        .children
        .into_iter()
        .find_map(|n| match n {
            Node::Element(e) => Some(e),
            _ => None,
        })
        .ok_or_else(|| FigcapError::Xml("no root element".into()))?;

    Ok(Document { root })
}

fn element_from_start(start: &BytesStart) -> Result<Element, FigcapError> {
    let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()));
    for attr in start.attributes() {
        let attr = attr.map_err(|e| FigcapError::Xml(format!("bad attribute: {e}")))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = match attr.unescape_value() {
            Ok(v) => v.into_owned(),
            Err(_) => unescape_lenient(&String::from_utf8_lossy(&attr.value)),
        };
        element.attributes.push((key, value));
    }
    Ok(element)
}

/// Resolve the predefined entities and character references, leaving any
/// other reference (e.g. declared in an external DTD) verbatim.
fn unescape_lenient(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let resolved = tail
            .find(';')
            .and_then(|end| resolve_entity(&tail[1..end]).map(|c| (c, end)));
        match resolved {
            Some((text, end)) => {
                out.push_str(&text);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn resolve_entity(name: &str) -> Option<String> {
    let predefined = match name {
        "amp" => Some("&"),
        "lt" => Some("<"),
        "gt" => Some(">"),
        "quot" => Some("\""),
        "apos" => Some("'"),
        _ => None,
    };
    if let Some(p) = predefined {
        return Some(p.to_string());
    }
    let code = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        name.strip_prefix('#')?.parse().ok()?
    };
    char::from_u32(code).map(String::from)
}

fn push_node(stack: &mut [Element], node: Node) {
    if let Some(parent) = stack.last_mut() {
        parent.push(node);
    }
}

fn push_text(stack: &mut [Element], text: String) {
    if text.is_empty() {
        return;
    }
    push_node(stack, Node::Text(text));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_elements_and_attributes() {
        let doc = parse_document(
            r#"<?xml version="1.0"?>
<!DOCTYPE article>
<article><fig id="F1"><graphic xlink:href="a.jpg"/></fig></article>"#,
        )
        .unwrap();

        assert_eq!(doc.root().name(), "article");
        let fig = doc.first_element("fig").unwrap();
        assert_eq!(fig.attribute("id"), Some("F1"));
        let graphic = fig.first_descendant("graphic").unwrap();
        assert_eq!(graphic.attribute("xlink:href"), Some("a.jpg"));
        assert_eq!(graphic.attribute("href"), None);
    }

    #[test]
    fn keeps_text_runs_around_inline_markup() {
        let doc = parse_document("<p>Hello <b>World</b> Goodbye</p>").unwrap();
        let children = doc.root().children();
        assert_eq!(children.len(), 3);
        assert_eq!(children[0], Node::Text("Hello ".into()));
        assert_eq!(children[2], Node::Text(" Goodbye".into()));
    }

    #[test]
    fn cdata_is_a_separate_node() {
        let doc = parse_document("<p>a &amp; b<![CDATA[ <c>]]></p>").unwrap();
        let children = doc.root().children();
        assert_eq!(children[0], Node::Text("a & b".into()));
        assert_eq!(children[1], Node::CData(" <c>".into()));
    }

    #[test]
    fn undeclared_entity_keeps_known_ones_resolved() {
        let doc = parse_document(
            r#"<p t="&nbsp;&amp;">x &nbsp; &amp; &#65;&#x42; &lt;y&gt; &bogus</p>"#,
        )
        .unwrap();
        assert_eq!(
            doc.root().children(),
            &[Node::Text("x &nbsp; & AB <y> &bogus".into())]
        );
        assert_eq!(doc.root().attribute("t"), Some("&nbsp;&"));
    }

    #[test]
    fn rejects_nesting_beyond_limit() {
        let depth = MAX_DEPTH + 1;
        let xml = format!("{}{}", "<a>".repeat(depth), "</a>".repeat(depth));
        let err = parse_document(&xml).unwrap_err();
        assert!(matches!(err, FigcapError::Xml(ref m) if m.contains("nesting too deep")));

        let ok = format!("{}{}", "<a>".repeat(MAX_DEPTH), "</a>".repeat(MAX_DEPTH));
        assert!(parse_document(&ok).is_ok());
    }

    #[test]
    fn descendants_are_in_document_order_and_exclude_self() {
        let doc = parse_document(
            "<sec id=\"outer\"><sec id=\"a\"><sec id=\"b\"/></sec><sec id=\"c\"/></sec>",
        )
        .unwrap();
        let ids: Vec<&str> = doc
            .root()
            .descendants("sec")
            .iter()
            .filter_map(|s| s.attribute("id"))
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(doc.elements_by_name("sec").len(), 4);
    }

    #[test]
    fn rejects_mismatched_and_unclosed_tags() {
        assert!(matches!(
            parse_document("<a><b></a>"),
            Err(FigcapError::Xml(_))
        ));
        assert!(matches!(parse_document("<a><b>"), Err(FigcapError::Xml(_))));
        assert!(matches!(parse_document("just text"), Err(FigcapError::Xml(_))));
    }
}
