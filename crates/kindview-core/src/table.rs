//! Result table construction
//!
//! Records have no shared schema, so columns are discovered while walking the
//! result: each attribute name gets the next column index the first time it
//! is seen, in record order and then attribute order. Rows are sparse and
//! index-aligned to the discovered columns.

use indexmap::IndexSet;
use std::fmt::Write as _;

use crate::{Cell, Limit, Record};

/// Header shown when a result yields no columns at all
pub const NO_RECORDS_COLUMN: &str = "no entities";

/// Rectangular view of a heterogeneous result. Rebuilt on every refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultTable {
    columns: Vec<String>,
    rows: Vec<Vec<Option<Cell>>>,
    record_count: usize,
    placeholder: bool,
}

impl ResultTable {
    /// Column names in first-seen order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows, each exactly `columns().len()` long; `None` marks a missing attribute
    pub fn rows(&self) -> &[Vec<Option<Cell>>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of records the table was built from
    pub fn record_count(&self) -> usize {
        self.record_count
    }

    /// True when only the "no entities" column is shown
    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    /// Record count, suffixed with `+` when it hits the requested limit
    pub fn count_label(&self, limit: &Limit) -> String {
        count_label(self.record_count as u64, limit)
    }

    /// Render as an HTML table. Headers, values and type titles are escaped.
    pub fn to_html(&self) -> String {
        let mut html = String::from("<table>\n<thead>\n<tr>");
        for column in &self.columns {
            let _ = write!(html, "<th>{}</th>", escape_html(column));
        }
        html.push_str("</tr>\n</thead>\n<tbody>\n");
        for row in &self.rows {
            html.push_str("<tr>");
            for cell in row {
                match cell {
                    Some(Cell {
                        value,
                        value_type: Some(value_type),
                    }) => {
                        let _ = write!(
                            html,
                            "<td title=\"{}\">{}</td>",
                            escape_html(value_type),
                            escape_html(value)
                        );
                    }
                    Some(Cell {
                        value,
                        value_type: None,
                    }) => {
                        let _ = write!(html, "<td>{}</td>", escape_html(value));
                    }
                    None => html.push_str("<td></td>"),
                }
            }
            html.push_str("</tr>\n");
        }
        html.push_str("</tbody>\n</table>\n");
        html
    }
}

/// Incremental column discovery over a stream of records
#[derive(Debug, Default)]
pub struct ResultTableBuilder {
    columns: IndexSet<String>,
    rows: Vec<Vec<Option<Cell>>>,
}

impl ResultTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_record(&mut self, record: &Record) {
        let mut row: Vec<Option<Cell>> = Vec::with_capacity(self.columns.len().max(record.len()));
        for (name, cell) in record {
            let index = match self.columns.get_index_of(name.as_str()) {
                Some(index) => index,
                None => self.columns.insert_full(name.clone()).0,
            };
            if row.len() <= index {
                row.resize(index + 1, None);
            }
            row[index] = Some(cell.clone());
        }
        self.rows.push(row);
    }

    pub fn build(self) -> ResultTable {
        let record_count = self.rows.len();
        if self.columns.is_empty() {
            return ResultTable {
                columns: vec![NO_RECORDS_COLUMN.to_string()],
                rows: Vec::new(),
                record_count,
                placeholder: true,
            };
        }

        let width = self.columns.len();
        let rows = self
            .rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, None);
                row
            })
            .collect();

        ResultTable {
            columns: self.columns.into_iter().collect(),
            rows,
            record_count,
            placeholder: false,
        }
    }
}

/// Build a table from an ordered sequence of records
pub fn build_table(records: &[Record]) -> ResultTable {
    let mut builder = ResultTableBuilder::new();
    for record in records {
        builder.push_record(record);
    }
    let table = builder.build();
    tracing::debug!(
        records = table.record_count(),
        columns = table.columns().len(),
        "built result table"
    );
    table
}

/// `count`, with a trailing `+` when it equals the requested limit
pub fn count_label(count: u64, limit: &Limit) -> String {
    if limit.is_reached_by(count) {
        format!("{}+", count)
    } else {
        count.to_string()
    }
}

/// Escape `&`, `<`, `>` and `"` for HTML text and attribute values
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
