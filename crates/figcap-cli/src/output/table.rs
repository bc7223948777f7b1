use figcap_core::model::ResultTable;

pub fn print(table: &ResultTable) {
    print!("{}", format_table(table));
}

/// Plain-text rendering, one figure per line with its shared words beneath.
pub fn format_table(table: &ResultTable) -> String {
    if table.is_empty() {
        return "No figures found.\n".into();
    }

    let id_width = table
        .records()
        .iter()
        .map(|r| r.key().to_string().len())
        .max()
        .unwrap_or(10);

    let mut out = String::new();
    for r in table.records() {
        let url = r.graphic_url().unwrap_or("-");
        out.push_str(&format!(
            "{:<width$}  {:>4}  {}\n",
            r.key().to_string(),
            r.co_occurrence_count(),
            url,
            width = id_width
        ));
        if !r.co_occurring_words().is_empty() {
            out.push_str(&format!("    {}\n", r.co_occurring_words().join(" ")));
        }
    }
    out
}
