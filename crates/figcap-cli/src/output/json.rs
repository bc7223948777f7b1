use figcap_core::error::FigcapError;
use figcap_core::model::ResultTable;

pub fn print(table: &ResultTable) -> Result<(), FigcapError> {
    let json = serde_json::to_string_pretty(table)?;
    println!("{json}");
    Ok(())
}
