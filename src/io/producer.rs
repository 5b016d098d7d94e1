//! The readable-producer lifecycle and the generic line producer.
//!
//! A [`ReadableRecordProducer`] advances through the states
//! `Open → ReadBefore → ReadRecords → ReadAfter → Close` in strict order.
//! `close` is reachable from every state and idempotent; any other
//! out-of-order call fails with [`Error::IllegalState`]. This is a
//! programmer-error contract, not a recoverable I/O condition.
//!
//! [`LineRecordProducer`] implements the lifecycle generically over a
//! per-format [`RawDataParser`]: the parser frames raw lines into
//! [`RawData`] (carrying any parser state such as the current category) and
//! converts each one into zero or one [`Record`]. End of input is signaled
//! by the line source running dry; a sentinel record is never emitted.

use crate::error::{Error, Result};
use crate::modifier::RecordStream;
use crate::record::Record;
use std::collections::VecDeque;
use std::io::BufRead;

/// Lifecycle states of a readable producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProducerState {
    Open,
    ReadBefore,
    ReadRecords,
    ReadAfter,
    Close,
}

impl ProducerState {
    pub fn name(self) -> &'static str {
        match self {
            ProducerState::Open => "Open",
            ProducerState::ReadBefore => "ReadBefore",
            ProducerState::ReadRecords => "ReadRecords",
            ProducerState::ReadAfter => "ReadAfter",
            ProducerState::Close => "Close",
        }
    }

    /// Validates the transition from `current` into `self` and returns the
    /// new state. The transition table is linear with `Close` reachable
    /// from any state.
    pub fn validate(self, current: ProducerState, operation: &'static str) -> Result<ProducerState> {
        let legal = match self {
            ProducerState::Open => false,
            ProducerState::ReadBefore => current == ProducerState::Open,
            ProducerState::ReadRecords => current == ProducerState::ReadBefore,
            ProducerState::ReadAfter => current == ProducerState::ReadRecords,
            ProducerState::Close => true,
        };
        if legal {
            Ok(self)
        } else {
            Err(Error::IllegalState {
                operation,
                state: current.name(),
            })
        }
    }
}

/// A producer of records from an external character source, following the
/// `read_before → read_records → read_after → close` lifecycle.
///
/// Callers are responsible for invoking `close` even when an error escapes
/// `read_records`; the [`crate::io::read_all`] and [`crate::io::transfer`]
/// drivers do this automatically.
pub trait ReadableRecordProducer {
    fn read_before(&mut self) -> Result<()>;

    /// Returns the lazy, forward-only, single-pass record sequence. Failures
    /// inside the sequence are wrapped as [`Error::Producer`], preserving
    /// the original cause.
    fn read_records(&mut self) -> Result<RecordStream<'_>>;

    fn read_after(&mut self) -> Result<()>;

    /// Releases the underlying source. Legal in any state; calling it again
    /// after it has been reached is a no-op.
    fn close(&mut self) -> Result<()>;
}

/// One unparsed input line plus its inferred category and record id,
/// produced before format-specific conversion into a typed record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawData {
    pub category: Option<String>,
    pub record_id: Option<u64>,
    pub text: String,
}

impl RawData {
    pub fn new(category: Option<String>, record_id: Option<u64>, text: String) -> RawData {
        RawData {
            category,
            record_id,
            text,
        }
    }
}

/// Per-format framing and conversion strategy for [`LineRecordProducer`].
pub trait RawDataParser {
    /// Reads the next raw record from the source, or `None` at end of
    /// input. Pseudo-lines (category headers, comments) are consumed here
    /// and folded into parser state rather than returned.
    fn read_next(&mut self, reader: &mut dyn BufRead, record_index: u64)
    -> Result<Option<RawData>>;

    /// Converts one raw record into a typed record. `Ok(None)` drops the
    /// raw record from the stream (configured skipping), it is never an
    /// error.
    fn into_record(&self, raw: RawData) -> Result<Option<Record>>;
}

/// Reads one line, stripping a trailing `\n` or `\r\n`. `None` at end of
/// input.
pub fn read_line(reader: &mut dyn BufRead) -> Result<Option<String>> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    Ok(Some(line))
}

/// Generic lifecycle producer over a [`RawDataParser`].
///
/// Supports skipping a number of leading and trailing logical records; the
/// skipped raw records are retained and can be inspected once the lifecycle
/// has reached `ReadAfter`. Record ids are the monotonic raw-record index,
/// counted across skipped records.
pub struct LineRecordProducer<P: RawDataParser> {
    state: ProducerState,
    reader: Option<Box<dyn BufRead>>,
    parser: P,
    ignore_first: usize,
    ignore_last: usize,
    inspect: Option<Box<dyn Fn(&RawData)>>,
    window: Window,
}

/// Look-ahead bookkeeping for ignore-first/ignore-last windowing.
struct Window {
    queue: VecDeque<RawData>,
    first: Vec<RawData>,
    last: Vec<RawData>,
    record_index: u64,
    end_reached: bool,
}

impl<P: RawDataParser> LineRecordProducer<P> {
    pub fn new(
        reader: impl BufRead + 'static,
        parser: P,
        ignore_first: usize,
        ignore_last: usize,
    ) -> LineRecordProducer<P> {
        LineRecordProducer {
            state: ProducerState::Open,
            reader: Some(Box::new(reader)),
            parser,
            ignore_first,
            ignore_last,
            inspect: None,
            window: Window {
                queue: VecDeque::new(),
                first: Vec::new(),
                last: Vec::new(),
                record_index: 0,
                end_reached: false,
            },
        }
    }

    /// Installs a hook invoked with every raw record before conversion.
    pub fn with_inspector(mut self, inspect: impl Fn(&RawData) + 'static) -> Self {
        self.inspect = Some(Box::new(inspect));
        self
    }

    /// Raw records skipped at the start. Legal once `read_after` has run.
    pub fn ignored_first(&self) -> Result<&[RawData]> {
        self.require_done("ignored_first")?;
        Ok(&self.window.first)
    }

    /// Raw records skipped at the end. Legal once `read_after` has run.
    pub fn ignored_last(&self) -> Result<&[RawData]> {
        self.require_done("ignored_last")?;
        Ok(&self.window.last)
    }

    /// Number of raw records read, including skipped ones. Legal once
    /// `read_after` has run.
    pub fn record_count(&self) -> Result<u64> {
        self.require_done("record_count")?;
        Ok(self.window.record_index)
    }

    fn require_done(&self, operation: &'static str) -> Result<()> {
        if self.state == ProducerState::ReadAfter || self.state == ProducerState::Close {
            Ok(())
        } else {
            Err(Error::IllegalState {
                operation,
                state: self.state.name(),
            })
        }
    }
}

impl<P: RawDataParser> ReadableRecordProducer for LineRecordProducer<P> {
    fn read_before(&mut self) -> Result<()> {
        self.state = ProducerState::ReadBefore.validate(self.state, "read_before")?;
        let reader = self.reader.as_mut().ok_or(Error::IllegalState {
            operation: "read_before",
            state: "Close",
        })?;
        // Skip the leading records now so that read_records starts at the
        // first live one.
        while !self.window.end_reached && self.window.first.len() < self.ignore_first {
            match self
                .parser
                .read_next(reader.as_mut(), self.window.record_index)?
            {
                Some(raw) => {
                    self.window.record_index += 1;
                    self.window.first.push(raw);
                }
                None => self.window.end_reached = true,
            }
        }
        Ok(())
    }

    fn read_records(&mut self) -> Result<RecordStream<'_>> {
        self.state = ProducerState::ReadRecords.validate(self.state, "read_records")?;
        let reader = self.reader.as_mut().ok_or(Error::IllegalState {
            operation: "read_records",
            state: "Close",
        })?;
        Ok(Box::new(RecordIter {
            reader: reader.as_mut(),
            parser: &mut self.parser,
            window: &mut self.window,
            ignore_last: self.ignore_last,
            inspect: self.inspect.as_deref(),
        }))
    }

    fn read_after(&mut self) -> Result<()> {
        self.state = ProducerState::ReadAfter.validate(self.state, "read_after")?;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.state = ProducerState::Close.validate(self.state, "close")?;
        self.reader = None;
        Ok(())
    }
}

struct RecordIter<'a, P: RawDataParser> {
    reader: &'a mut dyn BufRead,
    parser: &'a mut P,
    window: &'a mut Window,
    ignore_last: usize,
    inspect: Option<&'a dyn Fn(&RawData)>,
}

impl<P: RawDataParser> RecordIter<'_, P> {
    /// Yields the next live raw record, keeping `ignore_last` records of
    /// look-ahead so the trailing ones are withheld from the stream.
    fn next_raw(&mut self) -> Result<Option<RawData>> {
        while !self.window.end_reached && self.window.queue.len() <= self.ignore_last {
            match self.parser.read_next(self.reader, self.window.record_index)? {
                Some(raw) => {
                    self.window.record_index += 1;
                    self.window.queue.push_back(raw);
                }
                None => self.window.end_reached = true,
            }
        }
        if self.window.queue.len() > self.ignore_last {
            Ok(self.window.queue.pop_front())
        } else {
            while let Some(raw) = self.window.queue.pop_front() {
                self.window.last.push(raw);
            }
            Ok(None)
        }
    }
}

impl<P: RawDataParser> Iterator for RecordIter<'_, P> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Result<Record>> {
        loop {
            match self.next_raw() {
                Err(e) => {
                    self.window.end_reached = true;
                    return Some(Err(e.into_producer("reading raw data from line source")));
                }
                Ok(None) => return None,
                Ok(Some(raw)) => {
                    if let Some(inspect) = self.inspect {
                        inspect(&raw);
                    }
                    match self.parser.into_record(raw) {
                        Err(e) => return Some(Err(e.into_producer("converting raw data"))),
                        Ok(None) => continue,
                        Ok(Some(record)) => return Some(Ok(record)),
                    }
                }
            }
        }
    }
}
