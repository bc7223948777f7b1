use std::collections::BTreeSet;

use crate::xml::{Element, Node};

/// Concatenate the direct text children of `element`, in document order.
///
/// Text inside nested elements is skipped entirely, so
/// `<p>Hello <b>World</b> Goodbye</p>` yields `"Hello  Goodbye"`. CDATA
/// sections are not text nodes and are skipped as well.
pub fn extract_text(element: &Element) -> String {
    element
        .children()
        .iter()
        .filter_map(|n| match n {
            Node::Text(t) => Some(t.as_str()),
            Node::Element(_) | Node::CData(_) => None,
        })
        .collect()
}

/// Split on the single space character and collapse into a set.
///
/// Newlines, tabs and runs of spaces are not treated as separators: runs of
/// spaces yield an empty-string token and other whitespace stays inside
/// tokens.
pub fn tokenize(text: &str) -> BTreeSet<String> {
    text.split(' ').map(str::to_string).collect()
}

/// Text of every `<p>` that is a direct child of a `<sec>` anywhere under `body`.
///
/// Sections are visited in document order (nested sections after their
/// parent's opening tag) and paragraph texts are joined with no separator.
pub fn body_text(body: &Element) -> String {
    let mut out = String::new();
    for section in body.descendants("sec") {
        for p in section.child_elements().filter(|c| c.name() == "p") {
            out.push_str(&extract_text(p));
        }
    }
    out
}

/// The body token set: [`tokenize`] applied to [`body_text`].
pub fn body_tokens(body: &Element) -> BTreeSet<String> {
    tokenize(&body_text(body))
}
