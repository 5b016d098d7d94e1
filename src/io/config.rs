//! Config format: `key=value` lines grouped under `[category]` headers.
//!
//! A category header line applies to every following record until the next
//! header; the header itself yields no record. Reading splits each line at
//! the first delimiter occurrence — a line without a delimiter becomes a
//! key with a null value. Writing emits a category header only when the
//! category changes from the previous record, then `key`, the delimiter and
//! the value (null markers are empty strings).
//!
//! The normalizing modifier for this format is
//! [`crate::modifier::ConfigNormalizer`].

use crate::error::Result;
use crate::io::consumer::{LineRecordConsumer, RecordFormatter};
use crate::io::producer::{LineRecordProducer, RawData, RawDataParser, read_line};
use crate::io::LineSeparator;
use crate::record::Record;
use std::io::{BufRead, Write};

pub const DEFAULT_VALUE_DELIMITER: &str = "=";
pub const CATEGORY_BEGIN_MARKER: &str = "[";
pub const CATEGORY_END_MARKER: &str = "]";
/// Written in place of a null category, key or value.
pub const NULL_CATEGORY: &str = "";
pub const NULL_KEY: &str = "";
pub const NULL_VALUE: &str = "";

/// Configuration for reading and writing config files.
#[derive(Debug, Clone)]
pub struct ConfigFileSpec {
    value_delimiter: String,
    line_separator: LineSeparator,
}

impl ConfigFileSpec {
    pub fn new(value_delimiter: impl Into<String>, line_separator: LineSeparator) -> ConfigFileSpec {
        ConfigFileSpec {
            value_delimiter: value_delimiter.into(),
            line_separator,
        }
    }

    pub fn producer(&self, reader: impl BufRead + 'static) -> LineRecordProducer<ConfigParser> {
        LineRecordProducer::new(
            reader,
            ConfigParser {
                value_delimiter: self.value_delimiter.clone(),
                current_category: None,
            },
            0,
            0,
        )
    }

    pub fn consumer(&self, writer: impl Write + 'static) -> LineRecordConsumer<ConfigFormatter> {
        LineRecordConsumer::new(
            writer,
            ConfigFormatter {
                value_delimiter: self.value_delimiter.clone(),
                current_category: None,
            },
            self.line_separator,
        )
    }
}

impl Default for ConfigFileSpec {
    fn default() -> Self {
        ConfigFileSpec::new(DEFAULT_VALUE_DELIMITER, LineSeparator::Lf)
    }
}

pub struct ConfigParser {
    value_delimiter: String,
    /// Category of the most recent header line, carried across records.
    current_category: Option<String>,
}

impl RawDataParser for ConfigParser {
    fn read_next(
        &mut self,
        reader: &mut dyn BufRead,
        record_index: u64,
    ) -> Result<Option<RawData>> {
        loop {
            let Some(line) = read_line(reader)? else {
                return Ok(None);
            };
            if line.starts_with(CATEGORY_BEGIN_MARKER) && line.ends_with(CATEGORY_END_MARKER) {
                self.current_category = Some(line[1..line.len() - 1].to_owned());
                continue;
            }
            return Ok(Some(RawData::new(
                self.current_category.clone(),
                Some(record_index),
                line,
            )));
        }
    }

    fn into_record(&self, raw: RawData) -> Result<Option<Record>> {
        let (key, value) = match raw.text.find(&self.value_delimiter) {
            Some(at) => (
                raw.text[..at].to_owned(),
                Some(raw.text[at + self.value_delimiter.len()..].to_owned()),
            ),
            None => (raw.text.clone(), None),
        };
        Ok(Some(Record::key_value(
            raw.category,
            raw.record_id,
            key,
            value,
        )))
    }
}

pub struct ConfigFormatter {
    value_delimiter: String,
    current_category: Option<String>,
}

impl RecordFormatter for ConfigFormatter {
    fn record_lines(&mut self, record: &Record) -> Result<Vec<String>> {
        let mut lines = Vec::with_capacity(2);
        if self.current_category.as_deref() != record.category() {
            self.current_category = record.category().map(str::to_owned);
            lines.push(format!(
                "{CATEGORY_BEGIN_MARKER}{}{CATEGORY_END_MARKER}",
                record.category().unwrap_or(NULL_CATEGORY)
            ));
        }
        lines.push(format!(
            "{}{}{}",
            record.key().unwrap_or(NULL_KEY),
            self.value_delimiter,
            record.value_of_value_field().unwrap_or(NULL_VALUE)
        ));
        Ok(lines)
    }
}
