use std::collections::BTreeSet;

use crate::error::FigcapError;
use crate::export::{words_cell, COLUMNS};
use crate::model::{FigureRecord, ResultTable};

/// Render the table as RFC 4180 CSV with a header row.
///
/// The word list is written as a JSON array and a missing graphic url as an
/// empty field. An empty table yields only the header.
pub fn write_csv(table: &ResultTable) -> String {
    let mut out = String::new();
    push_row(&mut out, COLUMNS.iter().map(|c| c.to_string()));
    for r in table.records() {
        push_row(
            &mut out,
            [
                r.document_id().to_string(),
                r.figure_id().to_string(),
                words_cell(r.co_occurring_words()),
                r.graphic_url().unwrap_or_default().to_string(),
                r.co_occurrence_count().to_string(),
            ],
        );
    }
    out
}

/// Parse CSV produced by [`write_csv`] back into a table.
pub fn read_csv(input: &str) -> Result<ResultTable, FigcapError> {
    let mut rows = parse_rows(input)?.into_iter();

    let header = rows
        .next()
        .ok_or_else(|| FigcapError::Csv("missing header row".into()))?;
    if header != COLUMNS {
        return Err(FigcapError::Csv(format!(
            "unexpected header: {}",
            header.join(",")
        )));
    }

    let mut table = ResultTable::new();
    for (i, row) in rows.enumerate() {
        let line = i + 2;
        let [document_id, figure_id, words, url, count]: [String; 5] =
            row.try_into().map_err(|r: Vec<String>| {
                FigcapError::Csv(format!("row {line}: expected 5 fields, got {}", r.len()))
            })?;

        let words: BTreeSet<String> = serde_json::from_str(&words)
            .map_err(|e| FigcapError::Csv(format!("row {line}: bad word list: {e}")))?;
        let count: usize = count
            .parse()
            .map_err(|_| FigcapError::Csv(format!("row {line}: bad count '{count}'")))?;
        if count != words.len() {
            return Err(FigcapError::Csv(format!(
                "row {line}: count {count} does not match {} words",
                words.len()
            )));
        }

        let url = if url.is_empty() { None } else { Some(url) };
        table.push(FigureRecord::new(document_id, figure_id, words, url));
    }

    Ok(table)
}

fn push_row(out: &mut String, fields: impl IntoIterator<Item = String>) {
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        if field.contains([',', '"', '\n', '\r']) {
            out.push('"');
            out.push_str(&field.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(&field);
        }
    }
    out.push('\n');
}

/// Split CSV text into rows of fields. Quoted fields may span lines.
fn parse_rows(input: &str) -> Result<Vec<Vec<String>>, FigcapError> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' if field.is_empty() => in_quotes = true,
            ',' => row.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(FigcapError::Csv("unterminated quoted field".into()));
    }
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    Ok(rows)
}
