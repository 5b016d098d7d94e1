//! Java-style properties format for key/value records.
//!
//! The reader follows the classic grammar: lines are split at the first
//! unescaped `=`, `:` or whitespace run, blank lines and comment lines
//! (`#` or `!`) are skipped, a line ending in an odd number of backslashes
//! continues onto the next line, and the escape sequences `\t \n \r \f \\
//! \= \: \# \!` and `\uXXXX` are decoded in both key and value. The writer
//! escapes keys fully and
//! values minimally (a leading space is escaped, embedded ones are not),
//! and can emit non-ASCII characters as `\uXXXX`.

use crate::error::{Error, Result};
use crate::io::consumer::{LineRecordConsumer, RecordFormatter};
use crate::io::producer::{LineRecordProducer, RawData, RawDataParser, read_line};
use crate::io::LineSeparator;
use crate::record::Record;
use std::io::{BufRead, Write};

pub const DELIMITER: &str = "=";
pub const COMMENT_PREFIX: char = '#';
pub const ALTERNATIVE_COMMENT_PREFIX: char = '!';
pub const CATEGORY_KEY_DELIMITER: &str = ".";

/// Configuration for reading and writing properties files.
#[derive(Debug, Clone)]
pub struct PropertiesFileSpec {
    line_separator: LineSeparator,
    /// Reader: take the text of each comment line as the category of the
    /// records that follow it.
    comment_as_category: bool,
    /// Writer: replacement text for records without a value.
    null_value: String,
    /// Writer: escape characters outside printable ASCII as `\uXXXX`.
    escape_unicode: bool,
    /// Writer: prepend the record category and `.` to the key.
    category_as_key_prefix: bool,
}

impl PropertiesFileSpec {
    pub fn new(
        line_separator: LineSeparator,
        comment_as_category: bool,
        null_value: String,
        escape_unicode: bool,
        category_as_key_prefix: bool,
    ) -> PropertiesFileSpec {
        PropertiesFileSpec {
            line_separator,
            comment_as_category,
            null_value,
            escape_unicode,
            category_as_key_prefix,
        }
    }

    pub fn producer(&self, reader: impl BufRead + 'static) -> LineRecordProducer<PropertiesParser> {
        LineRecordProducer::new(
            reader,
            PropertiesParser {
                spec: self.clone(),
                current_category: None,
            },
            0,
            0,
        )
    }

    pub fn consumer(&self, writer: impl Write + 'static) -> LineRecordConsumer<PropertiesFormatter> {
        LineRecordConsumer::new(
            writer,
            PropertiesFormatter { spec: self.clone() },
            self.line_separator,
        )
    }
}

impl Default for PropertiesFileSpec {
    fn default() -> PropertiesFileSpec {
        PropertiesFileSpec::new(LineSeparator::Lf, false, String::new(), false, false)
    }
}

fn is_terminator_whitespace(c: char) -> bool {
    c == ' ' || c == '\t' || c == '\u{c}'
}

/// An odd number of trailing backslashes continues the logical line.
fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

/// Splits a logical line into raw (still escaped) key and value parts.
fn split_key_value(line: &str) -> (String, String) {
    let chars: Vec<char> = line.chars().collect();
    let limit = chars.len();
    let mut key_end = limit;
    let mut value_begin = limit;
    let mut has_separator = false;
    let mut preceding_backslash = false;
    let mut i = 0;
    while i < limit {
        let c = chars[i];
        if (c == '=' || c == ':') && !preceding_backslash {
            key_end = i;
            value_begin = i + 1;
            has_separator = true;
            break;
        }
        if is_terminator_whitespace(c) && !preceding_backslash {
            key_end = i;
            value_begin = i + 1;
            break;
        }
        preceding_backslash = c == '\\' && !preceding_backslash;
        i += 1;
    }
    // Skip whitespace after the key and at most one `=` or `:`.
    while value_begin < limit {
        let c = chars[value_begin];
        if !is_terminator_whitespace(c) {
            if !has_separator && (c == '=' || c == ':') {
                has_separator = true;
            } else {
                break;
            }
        }
        value_begin += 1;
    }
    (
        chars[..key_end].iter().collect(),
        chars[value_begin..].iter().collect(),
    )
}

/// Decodes the properties escape sequences. An invalid `\uXXXX` sequence is
/// a parse error.
fn unescape(text: &str) -> Result<String> {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            None => return Err(Error::Config("dangling escape at end of line".into())),
            Some('t') => result.push('\t'),
            Some('n') => result.push('\n'),
            Some('r') => result.push('\r'),
            Some('f') => result.push('\u{c}'),
            Some('u') => {
                let mut code = 0u32;
                for _ in 0..4 {
                    let digit = chars
                        .next()
                        .and_then(|d| d.to_digit(16))
                        .ok_or_else(|| Error::Config("malformed \\uXXXX escape".into()))?;
                    code = code * 16 + digit;
                }
                let decoded = char::from_u32(code)
                    .ok_or_else(|| Error::Config("malformed \\uXXXX escape".into()))?;
                result.push(decoded);
            }
            Some(other) => result.push(other),
        }
    }
    Ok(result)
}

/// Encodes one character for output. `escape_space` controls whether a
/// space is escaped, which is required in keys but only for the first
/// value character.
fn escape_into(result: &mut String, c: char, escape_space: bool, escape_unicode: bool) {
    match c {
        '\\' => result.push_str("\\\\"),
        '\t' => result.push_str("\\t"),
        '\n' => result.push_str("\\n"),
        '\r' => result.push_str("\\r"),
        '\u{c}' => result.push_str("\\f"),
        ' ' if escape_space => result.push_str("\\ "),
        '=' | ':' | '#' | '!' => {
            result.push('\\');
            result.push(c);
        }
        c if escape_unicode && !(' '..='\u{7e}').contains(&c) => {
            for unit in c.encode_utf16(&mut [0u16; 2]) {
                result.push_str(&format!("\\u{unit:04x}"));
            }
        }
        c => result.push(c),
    }
}

fn escape_key(key: &str, escape_unicode: bool) -> String {
    let mut result = String::with_capacity(key.len());
    for c in key.chars() {
        escape_into(&mut result, c, true, escape_unicode);
    }
    result
}

fn escape_value(value: &str, escape_unicode: bool) -> String {
    let mut result = String::with_capacity(value.len());
    for (i, c) in value.chars().enumerate() {
        escape_into(&mut result, c, i == 0, escape_unicode);
    }
    result
}

pub struct PropertiesParser {
    spec: PropertiesFileSpec,
    current_category: Option<String>,
}

impl RawDataParser for PropertiesParser {
    fn read_next(
        &mut self,
        reader: &mut dyn BufRead,
        record_index: u64,
    ) -> Result<Option<RawData>> {
        loop {
            let Some(line) = read_line(reader)? else {
                return Ok(None);
            };
            let trimmed = line.trim_start();
            if trimmed.is_empty() {
                continue;
            }
            if let Some(comment) = trimmed
                .strip_prefix(COMMENT_PREFIX)
                .or_else(|| trimmed.strip_prefix(ALTERNATIVE_COMMENT_PREFIX))
            {
                if self.spec.comment_as_category {
                    self.current_category = Some(comment.trim().to_string());
                }
                continue;
            }
            // Join backslash-continued lines into one logical line. The
            // continuation backslash is dropped and leading whitespace of
            // the next line is skipped; comment lines are never continued.
            let mut logical = trimmed.to_string();
            while ends_with_continuation(&logical) {
                logical.pop();
                match read_line(reader)? {
                    Some(next) => logical.push_str(next.trim_start()),
                    None => break,
                }
            }
            return Ok(Some(RawData::new(
                self.current_category.clone(),
                Some(record_index),
                logical,
            )));
        }
    }

    fn into_record(&self, raw: RawData) -> Result<Option<Record>> {
        let (raw_key, raw_value) = split_key_value(&raw.text);
        let key = unescape(&raw_key)?;
        let value = unescape(&raw_value)?;
        Ok(Some(Record::key_value(
            raw.category,
            raw.record_id,
            key,
            Some(value),
        )))
    }
}

pub struct PropertiesFormatter {
    spec: PropertiesFileSpec,
}

impl RecordFormatter for PropertiesFormatter {
    fn record_lines(&mut self, record: &Record) -> Result<Vec<String>> {
        let key = record
            .key()
            .ok_or_else(|| Error::Config("properties record has no key text".into()))?;
        let mut escaped_key = escape_key(key, self.spec.escape_unicode);
        if self.spec.category_as_key_prefix
            && let Some(category) = record.category()
        {
            let mut prefixed = escape_key(category, self.spec.escape_unicode);
            prefixed.push_str(CATEGORY_KEY_DELIMITER);
            prefixed.push_str(&escaped_key);
            escaped_key = prefixed;
        }
        let value = record.value_of_value_field().unwrap_or(self.spec.null_value.as_str());
        let mut line = escaped_key;
        line.push_str(DELIMITER);
        line.push_str(&escape_value(value, self.spec.escape_unicode));
        Ok(vec![line])
    }
}
