//! Output for result tables

use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use kindview_core::ResultTable;
use serde::Serialize;

use crate::args::OutputFormat;
use crate::controller::Refreshed;

pub fn render(refreshed: &Refreshed, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Text => render_text(refreshed),
        OutputFormat::Html => render_html(refreshed),
        OutputFormat::Json => render_json(refreshed)?,
    })
}

/// Caption, terminal table, then the count line
pub fn render_text(refreshed: &Refreshed) -> String {
    format!(
        "{}\n{}\n{} entities\n",
        strip_control(refreshed.title.trim()),
        text_table(&refreshed.table),
        refreshed.count
    )
}

fn text_table(result: &ResultTable) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(result.columns().iter().map(|c| strip_control(c)));

    for row in result.rows() {
        table.add_row(row.iter().map(|cell| {
            cell.as_ref()
                .map(|cell| strip_control(&cell.value))
                .unwrap_or_default()
        }));
    }
    table
}

pub fn render_html(refreshed: &Refreshed) -> String {
    format!(
        "<h1>{}</h1>\n{}<p>{} entities</p>\n",
        kindview_core::escape_html(refreshed.title.trim()),
        refreshed.table.to_html(),
        refreshed.count
    )
}

#[derive(Serialize)]
struct JsonTable<'a> {
    title: &'a str,
    columns: &'a [String],
    rows: Vec<Vec<Option<&'a str>>>,
    count: &'a str,
}

pub fn render_json(refreshed: &Refreshed) -> anyhow::Result<String> {
    let doc = JsonTable {
        title: refreshed.title.trim(),
        columns: refreshed.table.columns(),
        rows: refreshed
            .table
            .rows()
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.as_ref().map(|c| c.value.as_str()))
                    .collect()
            })
            .collect(),
        count: &refreshed.count,
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

/// Terminal-safe text: control characters are dropped, tabs and newlines become spaces
pub fn strip_control(raw: &str) -> String {
    raw.chars()
        .filter_map(|ch| match ch {
            '\t' | '\n' | '\r' => Some(' '),
            ch if ch.is_control() => None,
            ch => Some(ch),
        })
        .collect()
}
