//! Fixed-width format: fields live at fixed character positions.
//!
//! Records are framed either one per line or as consecutive runs of exactly
//! `record_width` characters with no separator at all. Each field spec names
//! a start position and width; alignment and fill character default to the
//! file-level settings and can be overridden per field. Reading strips fill
//! characters from the side(s) the alignment implies; a region consisting
//! only of fill characters reads as an empty text, a region entirely past
//! the end of the data reads as null.

use crate::error::{Error, Result};
use crate::io::consumer::{LineRecordConsumer, RecordFormatter};
use crate::io::producer::{LineRecordProducer, RawData, RawDataParser, read_line};
use crate::io::{Alignment, LineSeparator};
use crate::record::Record;
use std::io::{BufRead, Write};

/// One field region of a fixed-width record.
#[derive(Debug, Clone)]
pub struct FixedWidthFieldSpec {
    pub start: usize,
    pub width: usize,
    /// Overrides the file-level alignment when set.
    pub alignment: Option<Alignment>,
    /// Overrides the file-level fill character when set.
    pub fill_char: Option<char>,
}

impl FixedWidthFieldSpec {
    pub fn new(start: usize, width: usize) -> FixedWidthFieldSpec {
        FixedWidthFieldSpec {
            start,
            width,
            alignment: None,
            fill_char: None,
        }
    }
}

/// Configuration for reading and writing fixed-width files.
#[derive(Debug, Clone)]
pub struct FixedWidthFileSpec {
    record_width: usize,
    separate_records_by_line_separator: bool,
    alignment: Alignment,
    fill_char: char,
    field_specs: Vec<FixedWidthFieldSpec>,
    line_separator: LineSeparator,
    ignore_first: usize,
    ignore_last: usize,
    skip_empty_lines: bool,
    skip_all_null_or_empty: bool,
}

impl FixedWidthFileSpec {
    /// Validates the configuration: every field region must have a positive
    /// width and lie inside the record width.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        record_width: usize,
        separate_records_by_line_separator: bool,
        alignment: Alignment,
        fill_char: char,
        field_specs: Vec<FixedWidthFieldSpec>,
        line_separator: LineSeparator,
        ignore_first: usize,
        ignore_last: usize,
        skip_empty_lines: bool,
        skip_all_null_or_empty: bool,
    ) -> Result<FixedWidthFileSpec> {
        if record_width == 0 {
            return Err(Error::Config("record width must be positive".into()));
        }
        for (i, fs) in field_specs.iter().enumerate() {
            if fs.width == 0 {
                return Err(Error::Config(format!("field spec {i}: width must be positive")));
            }
            if fs.start + fs.width > record_width {
                return Err(Error::Config(format!(
                    "field spec {i}: region {}..{} exceeds record width {record_width}",
                    fs.start,
                    fs.start + fs.width
                )));
            }
        }
        Ok(FixedWidthFileSpec {
            record_width,
            separate_records_by_line_separator,
            alignment,
            fill_char,
            field_specs,
            line_separator,
            ignore_first,
            ignore_last,
            skip_empty_lines,
            skip_all_null_or_empty,
        })
    }

    pub fn producer(&self, reader: impl BufRead + 'static) -> LineRecordProducer<FixedWidthParser> {
        LineRecordProducer::new(
            reader,
            FixedWidthParser { spec: self.clone() },
            self.ignore_first,
            self.ignore_last,
        )
    }

    pub fn consumer(&self, writer: impl Write + 'static) -> LineRecordConsumer<FixedWidthFormatter> {
        LineRecordConsumer::new(
            writer,
            FixedWidthFormatter { spec: self.clone() },
            self.line_separator,
        )
    }
}

/// Strips fill characters from the side(s) the alignment implies.
fn strip_fill(chars: &[char], fill: char, alignment: Alignment) -> String {
    let mut begin = 0;
    let mut end = chars.len();
    if alignment != Alignment::Start {
        while begin < end && chars[begin] == fill {
            begin += 1;
        }
    }
    if alignment != Alignment::End {
        while begin < end && chars[end - 1] == fill {
            end -= 1;
        }
    }
    chars[begin..end].iter().collect()
}

fn invalid_utf8() -> Error {
    Error::Config("fixed-width data is not valid UTF-8".into())
}

/// Reads a single UTF-8 encoded character, or `None` at end of input.
fn read_char(reader: &mut dyn BufRead) -> Result<Option<char>> {
    let mut bytes = [0u8; 4];
    if reader.read(&mut bytes[..1])? == 0 {
        return Ok(None);
    }
    let len = match bytes[0] {
        0x00..=0x7f => 1,
        0xc0..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf7 => 4,
        _ => return Err(invalid_utf8()),
    };
    let mut filled = 1;
    while filled < len {
        let n = reader.read(&mut bytes[filled..len])?;
        if n == 0 {
            return Err(invalid_utf8());
        }
        filled += n;
    }
    let text = std::str::from_utf8(&bytes[..len]).map_err(|_| invalid_utf8())?;
    Ok(text.chars().next())
}

pub struct FixedWidthParser {
    spec: FixedWidthFileSpec,
}

impl RawDataParser for FixedWidthParser {
    fn read_next(
        &mut self,
        reader: &mut dyn BufRead,
        record_index: u64,
    ) -> Result<Option<RawData>> {
        if self.spec.separate_records_by_line_separator {
            return Ok(read_line(reader)?.map(|line| RawData::new(None, Some(record_index), line)));
        }
        // Width framing: one record is exactly record_width characters.
        let mut text = String::with_capacity(self.spec.record_width);
        for _ in 0..self.spec.record_width {
            match read_char(reader)? {
                Some(c) => text.push(c),
                None => break,
            }
        }
        if text.is_empty() {
            return Ok(None);
        }
        Ok(Some(RawData::new(None, Some(record_index), text)))
    }

    fn into_record(&self, raw: RawData) -> Result<Option<Record>> {
        if self.spec.skip_empty_lines && raw.text.is_empty() {
            return Ok(None);
        }
        let chars: Vec<char> = raw.text.chars().collect();
        let data_len = chars.len().min(self.spec.record_width);
        let mut non_empty_found = false;
        let mut texts = Vec::with_capacity(self.spec.field_specs.len());
        for fs in &self.spec.field_specs {
            let fill = fs.fill_char.unwrap_or(self.spec.fill_char);
            let alignment = fs.alignment.unwrap_or(self.spec.alignment);
            let begin = fs.start;
            let end = (fs.start + fs.width).min(data_len);
            let text = if begin < end {
                let value = strip_fill(&chars[begin..end], fill, alignment);
                non_empty_found = non_empty_found || !value.is_empty();
                Some(value)
            } else {
                None
            };
            texts.push(text);
        }
        if self.spec.skip_all_null_or_empty && !non_empty_found {
            return Ok(None);
        }
        Ok(Some(Record::from_texts(raw.category, raw.record_id, texts)))
    }
}

pub struct FixedWidthFormatter {
    spec: FixedWidthFileSpec,
}

impl RecordFormatter for FixedWidthFormatter {
    fn record_lines(&mut self, record: &Record) -> Result<Vec<String>> {
        let mut line: Vec<char> = vec![self.spec.fill_char; self.spec.record_width];
        for (index, fs) in self.spec.field_specs.iter().enumerate() {
            let fill = fs.fill_char.unwrap_or(self.spec.fill_char);
            let alignment = fs.alignment.unwrap_or(self.spec.alignment);
            for slot in &mut line[fs.start..fs.start + fs.width] {
                *slot = fill;
            }
            let text: Vec<char> = record
                .text_at_or(index, "")
                .chars()
                .take(fs.width)
                .collect();
            let offset = match alignment {
                Alignment::Start => 0,
                Alignment::Center => (fs.width - text.len()) / 2,
                Alignment::End => fs.width - text.len(),
            };
            for (i, c) in text.into_iter().enumerate() {
                line[fs.start + offset + i] = c;
            }
        }
        Ok(vec![line.into_iter().collect()])
    }

    fn writes_line_separator(&self) -> bool {
        self.spec.separate_records_by_line_separator
    }
}
