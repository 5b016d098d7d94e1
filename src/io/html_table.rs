//! HTML table output.
//!
//! Write-only. The table opens with a header row of column names and closes
//! with `</table>`; every record becomes one `<tr>` whose cells escape `&`,
//! `<` and `>` as entities. A null or empty cell is written as `&nbsp;` so
//! browsers still render its borders. An optional indentation string is
//! prepended to every structural line.

use crate::error::Result;
use crate::io::consumer::{LineRecordConsumer, RecordFormatter};
use crate::io::LineSeparator;
use crate::record::Record;
use std::io::Write;

pub const TABLE_BEGIN: &str = "<table>";
pub const TABLE_END: &str = "</table>";
pub const TABLE_ROW_BEGIN: &str = "<tr>";
pub const TABLE_ROW_END: &str = "</tr>";
pub const TABLE_HEADER_BEGIN: &str = "<th>";
pub const TABLE_HEADER_END: &str = "</th>";
pub const TABLE_DATA_BEGIN: &str = "<td>";
pub const TABLE_DATA_END: &str = "</td>";
pub const NON_BREAKING_SPACE: &str = "&nbsp;";

/// One column of an HTML table.
#[derive(Debug, Clone)]
pub struct HtmlTableFieldSpec {
    pub name: String,
}

impl HtmlTableFieldSpec {
    pub fn new(name: impl Into<String>) -> HtmlTableFieldSpec {
        HtmlTableFieldSpec { name: name.into() }
    }
}

/// Configuration for writing HTML tables.
#[derive(Debug, Clone)]
pub struct HtmlTableFileSpec {
    line_separator: LineSeparator,
    text_before: Option<String>,
    text_after: Option<String>,
    field_specs: Vec<HtmlTableFieldSpec>,
    indentation: Option<String>,
}

impl HtmlTableFileSpec {
    pub fn write(
        line_separator: LineSeparator,
        text_before: Option<String>,
        text_after: Option<String>,
        field_specs: Vec<HtmlTableFieldSpec>,
        indentation: Option<String>,
    ) -> HtmlTableFileSpec {
        HtmlTableFileSpec {
            line_separator,
            text_before,
            text_after,
            field_specs,
            indentation,
        }
    }

    pub fn consumer(
        &self,
        writer: impl Write + 'static,
    ) -> LineRecordConsumer<HtmlTableFormatter> {
        LineRecordConsumer::new(
            writer,
            HtmlTableFormatter { spec: self.clone() },
            self.line_separator,
        )
    }
}

/// Escapes text for an HTML cell; null and empty map to `&nbsp;`.
fn convert_html(value: Option<&str>) -> String {
    match value {
        None | Some("") => NON_BREAKING_SPACE.to_string(),
        Some(value) => value
            .replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;"),
    }
}

pub struct HtmlTableFormatter {
    spec: HtmlTableFileSpec,
}

impl HtmlTableFormatter {
    fn indented(&self, row: String) -> String {
        match &self.spec.indentation {
            Some(indentation) => format!("{indentation}{row}"),
            None => row,
        }
    }

    fn header_row(&self) -> String {
        let mut row = String::new();
        for field_spec in &self.spec.field_specs {
            row.push_str(TABLE_HEADER_BEGIN);
            row.push_str(&convert_html(Some(&field_spec.name)));
            row.push_str(TABLE_HEADER_END);
        }
        row
    }
}

impl RecordFormatter for HtmlTableFormatter {
    fn before_lines(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(text) = &self.spec.text_before {
            lines.push(text.clone());
        }
        lines.push(self.indented(TABLE_BEGIN.to_string()));
        lines.push(self.indented(TABLE_ROW_BEGIN.to_string()));
        lines.push(self.indented(self.header_row()));
        lines.push(self.indented(TABLE_ROW_END.to_string()));
        lines
    }

    fn record_lines(&mut self, record: &Record) -> Result<Vec<String>> {
        let mut row = String::new();
        for index in 0..self.spec.field_specs.len() {
            let text = record.fields().get(index).and_then(|f| f.text());
            row.push_str(TABLE_DATA_BEGIN);
            row.push_str(&convert_html(text));
            row.push_str(TABLE_DATA_END);
        }
        Ok(vec![
            self.indented(TABLE_ROW_BEGIN.to_string()),
            self.indented(row),
            self.indented(TABLE_ROW_END.to_string()),
        ])
    }

    fn after_lines(&mut self) -> Vec<String> {
        let mut lines = vec![self.indented(TABLE_END.to_string())];
        if let Some(text) = &self.spec.text_after {
            lines.push(text.clone());
        }
        lines
    }
}
