//! Markdown table and list output.
//!
//! Both formats are write-only: parsing markdown back into records is out
//! of scope. A table writes a header row and an alignment sub-header before
//! the records, padding every cell to its column's minimum width with one
//! extra space inside each `|` delimiter; embedded pipes are escaped as
//! `\|`. A list writes one bullet line per record value, with star, dash or
//! `1.`-style numbered markers.

use crate::error::Result;
use crate::io::consumer::{LineRecordConsumer, RecordFormatter};
use crate::io::{Alignment, LineSeparator};
use crate::record::Record;
use std::io::Write;

pub const TABLE_FIELD_DELIMITER: &str = "|";
pub const TABLE_ESCAPE_TARGET: &str = "|";
pub const TABLE_ESCAPE_REPLACEMENT: &str = "\\|";
pub const TABLE_HEADER_DELIMITER: &str = "-";
pub const TABLE_ALIGNMENT_INDICATOR: &str = ":";
pub const TABLE_FILL_CHARACTER: char = ' ';
pub const COLUMN_MIN_WIDTH: usize = 5;
pub const LIST_START_NUMBER: u64 = 1;

/// One column of a markdown table.
#[derive(Debug, Clone)]
pub struct MarkdownTableFieldSpec {
    pub name: String,
    pub min_width: usize,
    /// Overrides the file-level alignment when set.
    pub alignment: Option<Alignment>,
}

impl MarkdownTableFieldSpec {
    pub fn new(name: impl Into<String>) -> MarkdownTableFieldSpec {
        MarkdownTableFieldSpec {
            name: name.into(),
            min_width: COLUMN_MIN_WIDTH,
            alignment: None,
        }
    }

    pub fn with_min_width(mut self, min_width: usize) -> Self {
        self.min_width = min_width;
        self
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }
}

/// Configuration for writing markdown tables.
#[derive(Debug, Clone)]
pub struct MarkdownTableFileSpec {
    line_separator: LineSeparator,
    text_before: Option<String>,
    text_after: Option<String>,
    field_specs: Vec<MarkdownTableFieldSpec>,
    alignment: Alignment,
}

impl MarkdownTableFileSpec {
    pub fn write(
        line_separator: LineSeparator,
        text_before: Option<String>,
        text_after: Option<String>,
        field_specs: Vec<MarkdownTableFieldSpec>,
        alignment: Alignment,
    ) -> MarkdownTableFileSpec {
        MarkdownTableFileSpec {
            line_separator,
            text_before,
            text_after,
            field_specs,
            alignment,
        }
    }

    pub fn consumer(
        &self,
        writer: impl Write + 'static,
    ) -> LineRecordConsumer<MarkdownTableFormatter> {
        LineRecordConsumer::new(
            writer,
            MarkdownTableFormatter { spec: self.clone() },
            self.line_separator,
        )
    }
}

pub struct MarkdownTableFormatter {
    spec: MarkdownTableFileSpec,
}

impl MarkdownTableFormatter {
    fn cell(&self, field_spec: &MarkdownTableFieldSpec, text: Option<&str>) -> String {
        let text = text
            .unwrap_or("")
            .replace(TABLE_ESCAPE_TARGET, TABLE_ESCAPE_REPLACEMENT);
        let difference = field_spec.min_width.saturating_sub(text.chars().count());
        let (mut fill_before, mut fill_after) = match field_spec.alignment.unwrap_or(self.spec.alignment) {
            Alignment::Start => (0, difference),
            Alignment::Center => (difference / 2, difference.div_ceil(2)),
            Alignment::End => (difference, 0),
        };
        // One extra fill character on each side of the delimiters.
        fill_before += 1;
        fill_after += 1;
        let mut cell = String::new();
        for _ in 0..fill_before {
            cell.push(TABLE_FILL_CHARACTER);
        }
        cell.push_str(&text);
        for _ in 0..fill_after {
            cell.push(TABLE_FILL_CHARACTER);
        }
        cell
    }

    fn header_row(&self) -> String {
        let mut row = String::new();
        for field_spec in &self.spec.field_specs {
            row.push_str(TABLE_FIELD_DELIMITER);
            row.push_str(&self.cell(field_spec, Some(&field_spec.name)));
        }
        row.push_str(TABLE_FIELD_DELIMITER);
        row
    }

    fn sub_header_row(&self) -> String {
        let mut row = String::new();
        for field_spec in &self.spec.field_specs {
            row.push_str(TABLE_FIELD_DELIMITER);
            let alignment = field_spec.alignment.unwrap_or(self.spec.alignment);
            if alignment != Alignment::End {
                row.push_str(TABLE_ALIGNMENT_INDICATOR);
            }
            let additional = if alignment == Alignment::Center { 0 } else { 1 };
            row.push_str(&TABLE_HEADER_DELIMITER.repeat(field_spec.min_width + additional));
            if alignment != Alignment::Start {
                row.push_str(TABLE_ALIGNMENT_INDICATOR);
            }
        }
        row.push_str(TABLE_FIELD_DELIMITER);
        row
    }
}

impl RecordFormatter for MarkdownTableFormatter {
    fn before_lines(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(text) = &self.spec.text_before {
            lines.push(text.clone());
        }
        if !self.spec.field_specs.is_empty() {
            lines.push(self.header_row());
            lines.push(self.sub_header_row());
        }
        lines
    }

    fn record_lines(&mut self, record: &Record) -> Result<Vec<String>> {
        if self.spec.field_specs.is_empty() {
            return Ok(Vec::new());
        }
        let mut row = String::new();
        for (index, field_spec) in self.spec.field_specs.iter().enumerate() {
            row.push_str(TABLE_FIELD_DELIMITER);
            let text = record.fields().get(index).and_then(|f| f.text());
            row.push_str(&self.cell(field_spec, text));
        }
        row.push_str(TABLE_FIELD_DELIMITER);
        Ok(vec![row])
    }

    fn after_lines(&mut self) -> Vec<String> {
        self.spec.text_after.iter().cloned().collect()
    }
}

/// Marker written in front of each markdown list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BulletPoint {
    #[default]
    Star,
    Dash,
    /// `1.`-style markers, numbered from [`LIST_START_NUMBER`].
    Number,
}

/// Configuration for writing markdown lists.
#[derive(Debug, Clone)]
pub struct MarkdownListFileSpec {
    line_separator: LineSeparator,
    text_before: Option<String>,
    text_after: Option<String>,
    bullet_point: BulletPoint,
    skip_null_value: bool,
}

impl MarkdownListFileSpec {
    pub fn write(
        line_separator: LineSeparator,
        text_before: Option<String>,
        text_after: Option<String>,
        bullet_point: BulletPoint,
        skip_null_value: bool,
    ) -> MarkdownListFileSpec {
        MarkdownListFileSpec {
            line_separator,
            text_before,
            text_after,
            bullet_point,
            skip_null_value,
        }
    }

    pub fn consumer(
        &self,
        writer: impl Write + 'static,
    ) -> LineRecordConsumer<MarkdownListFormatter> {
        LineRecordConsumer::new(
            writer,
            MarkdownListFormatter {
                spec: self.clone(),
                current_number: LIST_START_NUMBER,
            },
            self.line_separator,
        )
    }
}

pub struct MarkdownListFormatter {
    spec: MarkdownListFileSpec,
    current_number: u64,
}

impl RecordFormatter for MarkdownListFormatter {
    fn before_lines(&mut self) -> Vec<String> {
        self.current_number = LIST_START_NUMBER;
        self.spec.text_before.iter().cloned().collect()
    }

    fn record_lines(&mut self, record: &Record) -> Result<Vec<String>> {
        let value = record.value();
        if value.is_none() && self.spec.skip_null_value {
            return Ok(Vec::new());
        }
        let mut line = match self.spec.bullet_point {
            BulletPoint::Star => "*".to_string(),
            BulletPoint::Dash => "-".to_string(),
            BulletPoint::Number => {
                let marker = format!("{}.", self.current_number);
                self.current_number += 1;
                marker
            }
        };
        line.push(' ');
        if let Some(value) = value {
            line.push_str(value);
        }
        Ok(vec![line])
    }

    fn after_lines(&mut self) -> Vec<String> {
        self.spec.text_after.iter().cloned().collect()
    }
}
