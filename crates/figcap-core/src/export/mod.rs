pub mod csv;
pub mod html;
pub mod json;

/// Column names of the exported table, index columns first.
pub const COLUMNS: [&str; 5] = [
    "pmcid",
    "fig_id",
    "co_occurance",
    "url_ref",
    "co_occurance_count",
];

/// The word list as a single cell value (a JSON array of strings).
pub(crate) fn words_cell(words: &[String]) -> String {
    serde_json::to_string(words).unwrap_or_else(|_| "[]".into())
}
