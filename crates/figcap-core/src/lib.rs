pub mod error;
pub mod export;
pub mod extraction;
pub mod fetch;
pub mod model;
pub mod store;
pub mod xml;

use std::path::Path;

use tracing::{debug, info, warn};

use error::FigcapError;
use extraction::FigureDefaults;
use fetch::DocumentFetcher;
use model::{FigureRecord, ResultTable};

/// Options for the figure extraction step.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions {
    /// How figures missing a caption paragraph or graphic are filled in.
    pub figure_defaults: FigureDefaults,
}

/// Parse one document's markup and compute its figure records.
pub fn extract_document(
    document_id: &str,
    xml: &str,
    options: &ExtractOptions,
) -> Result<Vec<FigureRecord>, FigcapError> {
    let document = xml::parse_document(xml)?;
    extraction::extract_figures(document_id, &document, options.figure_defaults)
}

/// Fetch and extract every document, in order, into one table.
///
/// A document that fails to fetch, parse or extract contributes no rows;
/// the failure is logged and the run continues.
pub fn build_table(
    document_ids: &[String],
    fetcher: &dyn DocumentFetcher,
    options: &ExtractOptions,
) -> ResultTable {
    let mut table = ResultTable::new();
    let mut failed = 0usize;

    for id in document_ids {
        let records = fetcher
            .fetch(id)
            .and_then(|xml| extract_document(id, &xml, options));
        match records {
            Ok(records) => {
                debug!(document_id = %id, figures = records.len(), "extracted");
                table.extend(records);
            }
            Err(e) => {
                failed += 1;
                warn!(document_id = %id, backend = fetcher.backend_name(), "skipping document: {e}");
            }
        }
    }

    for key in table.duplicate_keys() {
        warn!("duplicate figure key {key}; rows kept in document order");
    }
    info!(
        documents = document_ids.len(),
        failed,
        rows = table.len(),
        "result table built"
    );

    table
}

/// Parse an id list: one id per line, the first line is a header and is dropped.
///
/// Lines are trimmed and blank lines skipped.
pub fn read_id_list(text: &str) -> Vec<String> {
    text.lines()
        .skip(1)
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read an id list file. See [`read_id_list`].
pub fn load_id_list(path: &Path) -> Result<Vec<String>, FigcapError> {
    let text = std::fs::read_to_string(path)?;
    Ok(read_id_list(&text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_line_is_skipped() {
        assert_eq!(read_id_list("pmcid\nPMC001\nPMC002\n"), vec!["PMC001", "PMC002"]);
    }

    #[test]
    fn header_dropped_even_if_it_looks_like_an_id() {
        assert_eq!(read_id_list("PMC000\r\n  PMC001 \n\nPMC002"), vec!["PMC001", "PMC002"]);
        assert!(read_id_list("pmcid").is_empty());
        assert!(read_id_list("").is_empty());
    }

    #[test]
    fn extract_document_without_body_fails() {
        let err = extract_document("PMC1", "<article><front/></article>", &ExtractOptions::default())
            .unwrap_err();
        assert!(matches!(err, FigcapError::MissingBody(id) if id == "PMC1"));
    }

    #[test]
    fn extract_document_reports_malformed_xml() {
        let err = extract_document("PMC1", "<article><body>", &ExtractOptions::default())
            .unwrap_err();
        assert!(matches!(err, FigcapError::Xml(_)));
    }
}
