//! File-backed record I/O.
//!
//! Producers and consumers here follow explicit lifecycle state machines
//! (`open → before → records → after → close`) and own their underlying
//! character source or sink exclusively. The [`read_all`], [`write_all`] and
//! [`transfer`] drivers run a full lifecycle with scoped-resource
//! discipline: `close` is always invoked, even when an earlier stage failed,
//! and a close failure following a primary failure is attached to it as
//! suppressed instead of replacing it.

pub mod consumer;
pub mod producer;

pub mod config;
pub mod single_value;

#[cfg_attr(docsrs, doc(cfg(feature = "format-delimited")))]
#[cfg(feature = "format-delimited")]
pub mod delimited;

#[cfg_attr(docsrs, doc(cfg(feature = "format-fixed-width")))]
#[cfg(feature = "format-fixed-width")]
pub mod fixed_width;

#[cfg_attr(docsrs, doc(cfg(feature = "format-properties")))]
#[cfg(feature = "format-properties")]
pub mod properties;

#[cfg_attr(docsrs, doc(cfg(feature = "format-markdown")))]
#[cfg(feature = "format-markdown")]
pub mod markdown;

#[cfg_attr(docsrs, doc(cfg(feature = "format-html")))]
#[cfg(feature = "format-html")]
pub mod html_table;

pub mod combined;

use crate::error::{Error, Result};
use crate::modifier::RecordStreamModifier;
use crate::record::Record;
use consumer::WritableRecordConsumer;
use producer::ReadableRecordProducer;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufWriter, Cursor, Read, Write};
use std::path::Path;

/// Placement of a text within a fixed-width region or table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alignment {
    Start,
    Center,
    End,
}

/// Common line separators for text files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineSeparator {
    /// Line feed: `'\n'` (0x0A)
    Lf,
    /// Carriage return: `'\r'` (0x0D)
    Cr,
    /// CR and LF: `"\r\n"` (0x0D 0x0A)
    CrLf,
}

impl LineSeparator {
    pub fn as_str(self) -> &'static str {
        match self {
            LineSeparator::Lf => "\n",
            LineSeparator::Cr => "\r",
            LineSeparator::CrLf => "\r\n",
        }
    }
}

/// UTF-8 decode policy for file sources.
///
/// Input and output are always UTF-8; this policy only decides what happens
/// to malformed input bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CharsetCoding {
    /// Malformed input is an error.
    Strict,
    /// Malformed input is replaced with U+FFFD.
    ReplaceMalformed,
}

impl CharsetCoding {
    /// Decodes raw bytes according to this policy.
    pub fn decode(self, bytes: Vec<u8>) -> Result<String> {
        match self {
            CharsetCoding::Strict => String::from_utf8(bytes).map_err(|e| {
                Error::Config(format!(
                    "malformed UTF-8 input at byte {}",
                    e.utf8_error().valid_up_to()
                ))
            }),
            CharsetCoding::ReplaceMalformed => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        }
    }

    /// Opens a file and decodes its entire content according to this policy.
    pub fn open_reader(self, path: impl AsRef<Path>) -> Result<Box<dyn BufRead>> {
        let mut bytes = Vec::new();
        File::open(path)?.read_to_end(&mut bytes)?;
        let text = self.decode(bytes)?;
        Ok(Box::new(Cursor::new(text)))
    }
}

/// Creates a buffered writer for `path`.
pub fn create_writer(path: impl AsRef<Path>) -> Result<Box<dyn Write>> {
    Ok(Box::new(BufWriter::new(File::create(path)?)))
}

/// Runs a producer's full lifecycle and collects every record.
///
/// `close` is invoked even when reading failed; a close failure after a read
/// failure is attached as suppressed.
pub fn read_all<P>(producer: &mut P) -> Result<Vec<Record>>
where
    P: ReadableRecordProducer + ?Sized,
{
    let result = (|| {
        producer.read_before()?;
        let mut records = Vec::new();
        for item in producer.read_records()? {
            records.push(item?);
        }
        producer.read_after()?;
        Ok(records)
    })();
    finish(result, producer.close())
}

/// Runs a consumer's full lifecycle over `records`.
///
/// `close` is invoked even when writing failed; a close failure after a
/// write failure is attached as suppressed.
pub fn write_all<C, I>(consumer: &mut C, records: I) -> Result<()>
where
    C: WritableRecordConsumer + ?Sized,
    I: IntoIterator<Item = Record>,
{
    let result = (|| {
        consumer.write_before()?;
        for record in records {
            consumer.write_record(&record)?;
        }
        consumer.write_after()?;
        Ok(())
    })();
    finish(result, consumer.close())
}

/// Drives a full producer lifecycle into a full consumer lifecycle.
pub fn transfer<P, C>(producer: &mut P, consumer: &mut C) -> Result<()>
where
    P: ReadableRecordProducer + ?Sized,
    C: WritableRecordConsumer + ?Sized,
{
    let result = (|| {
        producer.read_before()?;
        consumer.write_before()?;
        for item in producer.read_records()? {
            consumer.write_record(&item?)?;
        }
        producer.read_after()?;
        consumer.write_after()?;
        Ok(())
    })();
    let closed = finish(producer.close(), consumer.close());
    finish(result, closed)
}

/// Like [`transfer`], passing the record stream through `modifier`.
pub fn transfer_modified<P, M, C>(producer: &mut P, modifier: &M, consumer: &mut C) -> Result<()>
where
    P: ReadableRecordProducer + ?Sized,
    M: RecordStreamModifier + ?Sized,
    C: WritableRecordConsumer + ?Sized,
{
    let result = (|| {
        producer.read_before()?;
        consumer.write_before()?;
        for item in modifier.modify(producer.read_records()?) {
            consumer.write_record(&item?)?;
        }
        producer.read_after()?;
        consumer.write_after()?;
        Ok(())
    })();
    let closed = finish(producer.close(), consumer.close());
    finish(result, closed)
}

/// Combines a primary result with a cleanup result, keeping the primary
/// failure and attaching the cleanup failure as suppressed.
fn finish<T>(result: Result<T>, cleanup: Result<()>) -> Result<T> {
    match (result, cleanup) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(e)) => Err(e),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(c)) => Err(e.with_suppressed(c)),
    }
}
