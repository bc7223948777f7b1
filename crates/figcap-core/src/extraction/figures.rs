use std::collections::BTreeSet;

use crate::extraction::text::{extract_text, tokenize};
use crate::model::FigureRecord;
use crate::xml::Element;

/// Attribute holding a graphic's image reference.
pub const GRAPHIC_HREF: &str = "xlink:href";

/// What a figure without a caption paragraph or graphic gets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FigureDefaults {
    /// Empty caption token set and no graphic url.
    #[default]
    Reset,
    /// Reuse the caption tokens / graphic url of the previous figure in the
    /// same document. Reproduces the output of the legacy script.
    CarryOver,
}

/// Compute one [`FigureRecord`] per `<fig>` under `body`, in document order.
pub fn figure_records(
    document_id: &str,
    body: &Element,
    body_tokens: &BTreeSet<String>,
    defaults: FigureDefaults,
) -> Vec<FigureRecord> {
    let mut records = Vec::new();
    let mut caption_tokens: BTreeSet<String> = BTreeSet::new();
    let mut graphic_url: Option<String> = None;

    for fig in body.descendants("fig") {
        let figure_id = fig.attribute("id").unwrap_or_default();

        if defaults == FigureDefaults::Reset {
            caption_tokens.clear();
            graphic_url = None;
        }

        if let Some(tokens) = caption_paragraph(fig).map(|p| tokenize(&extract_text(p))) {
            caption_tokens = tokens;
        }
        if let Some(graphic) = fig.first_descendant("graphic") {
            // A graphic without the attribute reads as empty, not absent.
            graphic_url = Some(graphic.attribute(GRAPHIC_HREF).unwrap_or_default().to_string());
        }

        let words: BTreeSet<String> = caption_tokens.intersection(body_tokens).cloned().collect();
        records.push(FigureRecord::new(
            document_id,
            figure_id,
            words,
            graphic_url.clone(),
        ));
    }

    records
}

/// First `<p>` inside the first `<caption>` of a figure.
fn caption_paragraph(fig: &Element) -> Option<&Element> {
    fig.first_descendant("caption")?.first_descendant("p")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::text::body_tokens;
    use crate::xml::parse_document;

    fn set(ws: &[&str]) -> BTreeSet<String> {
        ws.iter().map(|s| s.to_string()).collect()
    }

    const BODY: &str = r#"<body>
<sec><p>the cell divides into two cells</p></sec>
<fig id="F1"><caption><title>Figure 1</title><p>the cell</p></caption><graphic xlink:href="f1.jpg"/></fig>
<fig id="F2"><label>2</label></fig>
<fig><caption><p>two <bold>cell</bold> nuclei</p></caption><graphic/></fig>
</body>"#;

    #[test]
    fn intersection_with_body_tokens() {
        let body = set(&["y", "z", "w"]);
        let doc = parse_document(r#"<body><fig id="F"><caption><p>x y z</p></caption></fig></body>"#)
            .unwrap();
        let records = figure_records("PMC1", doc.root(), &body, FigureDefaults::Reset);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].co_occurring_words(), &["y".to_string(), "z".to_string()]);
        assert_eq!(records[0].co_occurrence_count(), 2);
    }

    #[test]
    fn reset_gives_missing_parts_empty_defaults() {
        let doc = parse_document(BODY).unwrap();
        let tokens = body_tokens(doc.root());
        let records = figure_records("PMC1", doc.root(), &tokens, FigureDefaults::Reset);

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].figure_id(), "F1");
        assert_eq!(records[0].co_occurring_words(), &["cell".to_string(), "the".to_string()]);
        assert_eq!(records[0].graphic_url(), Some("f1.jpg"));

        assert_eq!(records[1].figure_id(), "F2");
        assert!(records[1].co_occurring_words().is_empty());
        assert_eq!(records[1].graphic_url(), None);

        // Missing id reads as empty; nested <bold> text is not caption text.
        assert_eq!(records[2].figure_id(), "");
        assert_eq!(records[2].co_occurring_words(), &["two".to_string()]);
        assert_eq!(records[2].graphic_url(), Some(""));
    }

    // The legacy script never reset caption/url between figures. CarryOver
    // keeps that output; Reset (the default) deliberately diverges from it.
    #[test]
    fn carry_over_reuses_previous_figure_state() {
        let doc = parse_document(BODY).unwrap();
        let tokens = body_tokens(doc.root());
        let legacy = figure_records("PMC1", doc.root(), &tokens, FigureDefaults::CarryOver);
        let reset = figure_records("PMC1", doc.root(), &tokens, FigureDefaults::Reset);

        assert_eq!(legacy[1].co_occurring_words(), legacy[0].co_occurring_words());
        assert_eq!(legacy[1].graphic_url(), Some("f1.jpg"));
        assert_ne!(legacy[1], reset[1]);
        assert_eq!(legacy[0], reset[0]);
        assert_eq!(legacy[2], reset[2]);
    }

    #[test]
    fn carry_over_starts_empty() {
        let doc = parse_document(r#"<body><fig id="F1"/></body>"#).unwrap();
        let records = figure_records("PMC1", doc.root(), &set(&["a"]), FigureDefaults::CarryOver);
        assert!(records[0].co_occurring_words().is_empty());
        assert_eq!(records[0].graphic_url(), None);
    }

    #[test]
    fn words_are_always_subset_of_body_tokens() {
        let doc = parse_document(BODY).unwrap();
        let tokens = body_tokens(doc.root());
        for defaults in [FigureDefaults::Reset, FigureDefaults::CarryOver] {
            for r in figure_records("PMC1", doc.root(), &tokens, defaults) {
                assert_eq!(r.co_occurrence_count(), r.co_occurring_words().len());
                assert!(r.co_occurring_words().iter().all(|w| tokens.contains(w)));
            }
        }
    }

    #[test]
    fn duplicate_figure_ids_are_kept() {
        let doc = parse_document(r#"<body><fig id="F1"/><fig id="F1"/></body>"#).unwrap();
        let records = figure_records("PMC1", doc.root(), &BTreeSet::new(), FigureDefaults::Reset);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].key(), records[1].key());
    }
}
