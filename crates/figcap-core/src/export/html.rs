use crate::export::{words_cell, COLUMNS};
use crate::model::ResultTable;

/// Render the table as an HTML `<table>` fragment.
///
/// Index columns (`pmcid`, `fig_id`) are header cells of each row. A missing
/// graphic url renders as `None`.
pub fn write_html(table: &ResultTable) -> String {
    let mut out = String::from("<table border=\"1\" class=\"dataframe\">\n  <thead>\n");
    out.push_str("    <tr style=\"text-align: right;\">\n");
    for col in COLUMNS {
        out.push_str(&format!("      <th>{}</th>\n", escape(col)));
    }
    out.push_str("    </tr>\n  </thead>\n  <tbody>\n");

    for r in table.records() {
        out.push_str("    <tr>\n");
        out.push_str(&format!("      <th>{}</th>\n", escape(r.document_id())));
        out.push_str(&format!("      <th>{}</th>\n", escape(r.figure_id())));
        out.push_str(&format!(
            "      <td>{}</td>\n",
            escape(&words_cell(r.co_occurring_words()))
        ));
        out.push_str(&format!(
            "      <td>{}</td>\n",
            escape(r.graphic_url().unwrap_or("None"))
        ));
        out.push_str(&format!("      <td>{}</td>\n", r.co_occurrence_count()));
        out.push_str("    </tr>\n");
    }

    out.push_str("  </tbody>\n</table>\n");
    out
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
