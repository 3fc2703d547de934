use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => render_table(value),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

fn table_options() -> table::TableOptions {
    let prefs = ui::prefs();
    table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    }
}

fn render_table<T: Serialize>(value: &T) -> anyhow::Result<String> {
    let value = serde_json::to_value(value)?;
    match value {
        Value::Array(items) => render_list_table(&items),
        Value::Object(map) => {
            let headers = ["field", "value"];
            let mut entries = map.into_iter().collect::<Vec<_>>();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let rows = entries
                .into_iter()
                .map(|(key, value)| vec![key, cell_text(&value)])
                .collect::<Vec<_>>();
            Ok(table::render_entity_table(&headers, &rows, table_options()))
        }
        scalar => {
            let headers = ["value"];
            let rows = vec![vec![cell_text(&scalar)]];
            Ok(table::render_entity_table(&headers, &rows, table_options()))
        }
    }
}

fn render_list_table(items: &[Value]) -> anyhow::Result<String> {
    if items.is_empty() {
        return Ok(String::from("(no rows)"));
    }

    if !items.iter().all(Value::is_object) {
        let headers = ["value"];
        let rows = items.iter().map(|item| vec![cell_text(item)]).collect::<Vec<_>>();
        return Ok(table::render_entity_table(&headers, &rows, table_options()));
    }

    // Column set is the union of keys across every row; rows missing a key
    // render a dash.
    let mut headers = Vec::<String>::new();
    for item in items {
        if let Some(map) = item.as_object() {
            for key in map.keys() {
                if !headers.contains(key) {
                    headers.push(key.clone());
                }
            }
        }
    }
    if headers.is_empty() {
        return Ok(String::from("(no columns)"));
    }
    headers.sort();

    let header_refs = headers.iter().map(String::as_str).collect::<Vec<_>>();
    let rows = items
        .iter()
        .filter_map(Value::as_object)
        .map(|map| {
            headers
                .iter()
                .map(|header| map.get(header).map_or_else(|| String::from("-"), cell_text))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    Ok(table::render_entity_table(&header_refs, &rows, table_options()))
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => v.to_string(),
        Value::String(v) => v.clone(),
        other => serde_json::to_string(other).unwrap_or_else(|_| String::from("<invalid-json>")),
    }
}

#[cfg(test)]
mod tests {
    use serde::Serialize;

    use super::{render, table::render_entity_table};
    use crate::cli::OutputFormat;

    #[derive(Serialize)]
    struct Row {
        id: &'static str,
        status: &'static str,
        book_title: &'static str,
    }

    fn sample() -> Row {
        Row {
            id: "brw-1",
            status: "pending",
            book_title: "The Name of the Rose",
        }
    }

    #[test]
    fn json_render_is_valid_json() {
        let out = render(&sample(), OutputFormat::Json).expect("json render should work");
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json should parse");
        assert_eq!(parsed["id"], "brw-1");
        assert_eq!(parsed["status"], "pending");
    }

    #[test]
    fn raw_render_is_single_line_json() {
        let out = render(&sample(), OutputFormat::Raw).expect("raw render should work");
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json should parse");
        assert_eq!(parsed["book_title"], "The Name of the Rose");
        assert!(!out.contains('\n'));
    }

    #[test]
    fn table_render_for_object_lists_fields() {
        let out = render(&sample(), OutputFormat::Table).expect("table render should work");
        assert!(out.lines().next().is_some_and(|line| line.contains("field")));
        assert!(out.contains("book_title"));
        assert!(out.contains("pending"));
    }

    #[test]
    fn table_render_for_list_unions_columns() {
        let items = vec![
            serde_json::json!({"id": "brw-1", "status": "pending"}),
            serde_json::json!({"id": "brw-2", "due_date": "2026-09-01"}),
        ];
        let out = render(&items, OutputFormat::Table).expect("table render should work");
        let header = out.lines().next().expect("table should have a header");
        assert!(header.contains("id"));
        assert!(header.contains("status"));
        assert!(header.contains("due_date"));
        assert!(out.contains('-'), "missing cells render a dash");
    }

    #[test]
    fn empty_list_renders_placeholder() {
        let items: Vec<serde_json::Value> = Vec::new();
        let out = render(&items, OutputFormat::Table).expect("table render should work");
        assert_eq!(out, "(no rows)");
    }

    #[test]
    fn table_alignment_handles_mixed_widths() {
        let headers = ["id", "status", "book_title"];
        let rows = vec![
            vec![
                "brw-1".to_string(),
                "pending".to_string(),
                "Dune".to_string(),
            ],
            vec![
                "brw-200".to_string(),
                "return_requested".to_string(),
                "A Canticle for Leibowitz".to_string(),
            ],
        ];

        let table = render_entity_table(
            &headers,
            &rows,
            super::table::TableOptions {
                max_width: None,
                color: false,
            },
        );
        let lines: Vec<&str> = table.lines().collect();

        assert!(lines.len() >= 4);
        assert!(lines[0].contains("id"));
        assert!(lines[0].contains("status"));
        assert!(lines[0].contains("book_title"));
        assert!(lines[1].chars().all(|c| c == '-'));
    }
}
