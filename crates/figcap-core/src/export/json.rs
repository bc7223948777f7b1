use serde::Serialize;

use crate::error::FigcapError;
use crate::model::ResultTable;

/// A record as written to `data.json`: index columns are not part of it.
#[derive(Serialize)]
struct JsonRow<'a> {
    co_occurance: &'a [String],
    url_ref: Option<&'a str>,
    co_occurance_count: usize,
}

/// The table as a JSON array of row objects.
pub fn to_records_json(table: &ResultTable) -> Result<String, FigcapError> {
    let rows: Vec<JsonRow<'_>> = table
        .records()
        .iter()
        .map(|r| JsonRow {
            co_occurance: r.co_occurring_words(),
            url_ref: r.graphic_url(),
            co_occurance_count: r.co_occurrence_count(),
        })
        .collect();
    Ok(serde_json::to_string(&rows)?)
}

/// Contents of `data.json`: the records JSON, encoded once more as a JSON string.
pub fn write_json(table: &ResultTable) -> Result<String, FigcapError> {
    let records = to_records_json(table)?;
    Ok(serde_json::to_string(&records)?)
}

/// Decode a [`write_json`] document back into its inner records JSON.
pub fn unwrap_json(document: &str) -> Result<serde_json::Value, FigcapError> {
    let inner: String = serde_json::from_str(document)?;
    Ok(serde_json::from_str(&inner)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FigureRecord;

    #[test]
    fn empty_table() {
        let table = ResultTable::new();
        assert_eq!(to_records_json(&table).unwrap(), "[]");
        assert_eq!(write_json(&table).unwrap(), "\"[]\"");
    }

    #[test]
    fn double_encoded_rows() {
        let table: ResultTable = vec![FigureRecord::new(
            "PMC1",
            "F1",
            ["cell".to_string()].into_iter().collect(),
            None,
        )]
        .into_iter()
        .collect();

        let doc = write_json(&table).unwrap();
        assert_eq!(
            doc,
            r#""[{\"co_occurance\":[\"cell\"],\"url_ref\":null,\"co_occurance_count\":1}]""#
        );

        let rows = unwrap_json(&doc).unwrap();
        assert_eq!(rows[0]["co_occurance_count"], 1);
        assert!(rows[0].get("pmcid").is_none());
    }
}
