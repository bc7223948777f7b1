pub mod figures;
pub mod text;

use crate::error::FigcapError;
use crate::model::FigureRecord;
use crate::xml::Document;

pub use figures::FigureDefaults;

/// Run the extractor over an already parsed document.
///
/// The first `<body>` element is the scope for both the body tokens and the
/// figure lookup; figures in front or back matter are not seen.
pub fn extract_figures(
    document_id: &str,
    document: &Document,
    defaults: FigureDefaults,
) -> Result<Vec<FigureRecord>, FigcapError> {
    let body = document
        .first_element("body")
        .ok_or_else(|| FigcapError::MissingBody(document_id.to_string()))?;
    let tokens = text::body_tokens(body);
    Ok(figures::figure_records(document_id, body, &tokens, defaults))
}
