//! Simple delimited format: values split on a literal delimiter string.
//!
//! This is deliberately simpler than CSV — no quoting and no escaping. A
//! line is cut at every delimiter occurrence into a fixed number of fields;
//! positions past the end of the line read as null, and a field consisting
//! of nothing between two delimiters reads as null too.

use crate::error::{Error, Result};
use crate::io::consumer::{LineRecordConsumer, RecordFormatter};
use crate::io::producer::{LineRecordProducer, RawData, RawDataParser, read_line};
use crate::io::LineSeparator;
use crate::record::Record;
use std::io::{BufRead, Write};

pub const FIELD_DELIMITER_TAB: &str = "\t";
pub const FIELD_DELIMITER_COMMA: &str = ",";
pub const FIELD_DELIMITER_SEMICOLON: &str = ";";
pub const FIELD_DELIMITER_VERTICAL_LINE: &str = "|";

/// Configuration for reading and writing simple delimited files.
#[derive(Debug, Clone)]
pub struct SimpleDelimitedFileSpec {
    field_delimiter: String,
    field_count: usize,
    line_separator: LineSeparator,
    ignore_first: usize,
    ignore_last: usize,
    skip_empty_lines: bool,
    skip_all_null: bool,
}

impl SimpleDelimitedFileSpec {
    /// Validates the configuration: the delimiter must be non-empty and the
    /// field count positive.
    pub fn new(
        field_delimiter: impl Into<String>,
        field_count: usize,
        line_separator: LineSeparator,
        ignore_first: usize,
        ignore_last: usize,
        skip_empty_lines: bool,
        skip_all_null: bool,
    ) -> Result<SimpleDelimitedFileSpec> {
        let field_delimiter = field_delimiter.into();
        if field_delimiter.is_empty() {
            return Err(Error::Config("field delimiter must not be empty".into()));
        }
        if field_count == 0 {
            return Err(Error::Config("field count must be positive".into()));
        }
        Ok(SimpleDelimitedFileSpec {
            field_delimiter,
            field_count,
            line_separator,
            ignore_first,
            ignore_last,
            skip_empty_lines,
            skip_all_null,
        })
    }

    pub fn producer(
        &self,
        reader: impl BufRead + 'static,
    ) -> LineRecordProducer<SimpleDelimitedParser> {
        LineRecordProducer::new(
            reader,
            SimpleDelimitedParser { spec: self.clone() },
            self.ignore_first,
            self.ignore_last,
        )
    }

    pub fn consumer(
        &self,
        writer: impl Write + 'static,
    ) -> LineRecordConsumer<SimpleDelimitedFormatter> {
        LineRecordConsumer::new(
            writer,
            SimpleDelimitedFormatter { spec: self.clone() },
            self.line_separator,
        )
    }
}

pub struct SimpleDelimitedParser {
    spec: SimpleDelimitedFileSpec,
}

impl RawDataParser for SimpleDelimitedParser {
    fn read_next(
        &mut self,
        reader: &mut dyn BufRead,
        record_index: u64,
    ) -> Result<Option<RawData>> {
        Ok(read_line(reader)?.map(|line| RawData::new(None, Some(record_index), line)))
    }

    fn into_record(&self, raw: RawData) -> Result<Option<Record>> {
        if self.spec.skip_empty_lines && raw.text.is_empty() {
            return Ok(None);
        }
        let mut texts = Vec::with_capacity(self.spec.field_count);
        let mut non_empty_found = false;
        let mut begin = 0usize;
        for _ in 0..self.spec.field_count {
            let mut text = None;
            if begin <= raw.text.len() {
                let end = raw.text[begin..]
                    .find(&self.spec.field_delimiter)
                    .map_or(raw.text.len(), |at| begin + at);
                if begin < end {
                    let value = &raw.text[begin..end];
                    non_empty_found = true;
                    text = Some(value.to_owned());
                }
                begin = end + self.spec.field_delimiter.len();
            }
            texts.push(text);
        }
        if self.spec.skip_all_null && !non_empty_found {
            return Ok(None);
        }
        Ok(Some(Record::from_texts(raw.category, raw.record_id, texts)))
    }
}

pub struct SimpleDelimitedFormatter {
    spec: SimpleDelimitedFileSpec,
}

impl RecordFormatter for SimpleDelimitedFormatter {
    fn record_lines(&mut self, record: &Record) -> Result<Vec<String>> {
        let texts: Vec<&str> = (0..self.spec.field_count)
            .map(|i| record.text_at_or(i, ""))
            .collect();
        Ok(vec![texts.join(&self.spec.field_delimiter)])
    }
}
