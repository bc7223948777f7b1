use std::path::PathBuf;

use figcap_core::error::FigcapError;
use figcap_core::model::ResultTable;

use crate::commands::extract_options;
use crate::output;

pub fn run(
    input_file: PathBuf,
    id: Option<String>,
    output_format: &str,
    legacy_carry_over: bool,
) -> Result<(), FigcapError> {
    let xml = std::fs::read_to_string(&input_file)?;
    let document_id = id.unwrap_or_else(|| {
        input_file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unknown".into())
    });

    let records =
        figcap_core::extract_document(&document_id, &xml, &extract_options(legacy_carry_over))?;
    let table: ResultTable = records.into_iter().collect();

    match output_format {
        "json" => output::json::print(&table)?,
        _ => output::table::print(&table),
    }

    Ok(())
}
