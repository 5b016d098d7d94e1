//! Single-value format: one value per line.
//!
//! Reading turns every line into a one-value record; empty lines can be
//! skipped and a number of leading/trailing records ignored. Writing emits
//! one line per record value, with optional text before and after the body
//! and optional skipping of null values.

use crate::error::{Error, Result};
use crate::io::consumer::{LineRecordConsumer, RecordFormatter};
use crate::io::producer::{LineRecordProducer, RawData, RawDataParser, read_line};
use crate::io::LineSeparator;
use crate::record::Record;
use std::io::{BufRead, Write};

/// Configuration for reading and writing single-value files.
#[derive(Debug, Clone)]
pub struct SingleValueFileSpec {
    line_separator: LineSeparator,
    text_before: Option<String>,
    text_after: Option<String>,
    skip_empty_lines: bool,
    ignore_first: usize,
    ignore_last: usize,
    skip_null_value: bool,
}

impl SingleValueFileSpec {
    /// A read-oriented spec.
    pub fn read(skip_empty_lines: bool, ignore_first: usize, ignore_last: usize) -> SingleValueFileSpec {
        SingleValueFileSpec {
            line_separator: LineSeparator::Lf,
            text_before: None,
            text_after: None,
            skip_empty_lines,
            ignore_first,
            ignore_last,
            skip_null_value: false,
        }
    }

    /// A write-oriented spec.
    pub fn write(
        line_separator: LineSeparator,
        text_before: Option<String>,
        text_after: Option<String>,
        skip_null_value: bool,
    ) -> SingleValueFileSpec {
        SingleValueFileSpec {
            line_separator,
            text_before,
            text_after,
            skip_empty_lines: false,
            ignore_first: 0,
            ignore_last: 0,
            skip_null_value,
        }
    }

    pub fn producer(&self, reader: impl BufRead + 'static) -> LineRecordProducer<SingleValueParser> {
        LineRecordProducer::new(
            reader,
            SingleValueParser {
                skip_empty_lines: self.skip_empty_lines,
            },
            self.ignore_first,
            self.ignore_last,
        )
    }

    pub fn consumer(&self, writer: impl Write + 'static) -> LineRecordConsumer<SingleValueFormatter> {
        LineRecordConsumer::new(
            writer,
            SingleValueFormatter {
                text_before: self.text_before.clone(),
                text_after: self.text_after.clone(),
                skip_null_value: self.skip_null_value,
            },
            self.line_separator,
        )
    }
}

pub struct SingleValueParser {
    skip_empty_lines: bool,
}

impl RawDataParser for SingleValueParser {
    fn read_next(
        &mut self,
        reader: &mut dyn BufRead,
        record_index: u64,
    ) -> Result<Option<RawData>> {
        Ok(read_line(reader)?.map(|line| RawData::new(None, Some(record_index), line)))
    }

    fn into_record(&self, raw: RawData) -> Result<Option<Record>> {
        if self.skip_empty_lines && raw.text.is_empty() {
            return Ok(None);
        }
        Ok(Some(Record::of_value(
            raw.category,
            raw.record_id,
            Some(raw.text),
        )))
    }
}

pub struct SingleValueFormatter {
    text_before: Option<String>,
    text_after: Option<String>,
    skip_null_value: bool,
}

impl RecordFormatter for SingleValueFormatter {
    fn before_lines(&mut self) -> Vec<String> {
        self.text_before.clone().into_iter().collect()
    }

    fn record_lines(&mut self, record: &Record) -> Result<Vec<String>> {
        match record.value() {
            Some(value) => Ok(vec![value.to_owned()]),
            None if self.skip_null_value => Ok(Vec::new()),
            None => Err(Error::Config(
                "record has a null value and skip_null_value is disabled".into(),
            )),
        }
    }

    fn after_lines(&mut self) -> Vec<String> {
        self.text_after.clone().into_iter().collect()
    }
}
