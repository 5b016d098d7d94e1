//! The writable-consumer lifecycle and the generic line consumer.
//!
//! A [`WritableRecordConsumer`] mirrors the producer lifecycle:
//! `Open → WriteBefore → WriteRecords → WriteAfter → Close`, with a
//! `WriteRecords → WriteRecords` self-loop (many records in sequence) and a
//! direct `WriteBefore → WriteAfter` edge (zero records written). `flush` is
//! legal in every state except `Close`; `close` is reachable from any state
//! and idempotent.
//!
//! A consumer instance is **not** safe to share across threads: the state
//! field is unsynchronized. Confine each instance to one thread or
//! serialize access externally; independent instances per thread are fine.

use crate::error::{Error, Result};
use crate::io::LineSeparator;
use crate::record::Record;
use std::io::Write;

/// Lifecycle states of a writable consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumerState {
    Open,
    WriteBefore,
    WriteRecords,
    WriteAfter,
    Close,
}

impl ConsumerState {
    pub fn name(self) -> &'static str {
        match self {
            ConsumerState::Open => "Open",
            ConsumerState::WriteBefore => "WriteBefore",
            ConsumerState::WriteRecords => "WriteRecords",
            ConsumerState::WriteAfter => "WriteAfter",
            ConsumerState::Close => "Close",
        }
    }

    /// Validates the transition from `current` into `self` and returns the
    /// new state.
    pub fn validate(self, current: ConsumerState, operation: &'static str) -> Result<ConsumerState> {
        let legal = match self {
            ConsumerState::Open => false,
            ConsumerState::WriteBefore => current == ConsumerState::Open,
            ConsumerState::WriteRecords => {
                current == ConsumerState::WriteBefore || current == ConsumerState::WriteRecords
            }
            ConsumerState::WriteAfter => {
                current == ConsumerState::WriteBefore || current == ConsumerState::WriteRecords
            }
            ConsumerState::Close => true,
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

    /// Fails when the consumer has already been closed.
    pub fn require_not_closed(self, operation: &'static str) -> Result<()> {
        if self == ConsumerState::Close {
            Err(Error::IllegalState {
                operation,
                state: self.name(),
            })
        } else {
            Ok(())
        }
    }
}

/// A consumer of records into an external character sink, following the
/// `write_before → write_record* → write_after → close` lifecycle.
pub trait WritableRecordConsumer {
    fn write_before(&mut self) -> Result<()>;

    /// Serializes one record according to the format's textual grammar. A
    /// record that cannot be serialized fails with [`Error::Consumer`],
    /// retaining the offending record.
    fn write_record(&mut self, record: &Record) -> Result<()>;

    fn write_after(&mut self) -> Result<()>;

    /// Forces buffered output to the underlying sink.
    fn flush(&mut self) -> Result<()>;

    /// Releases the underlying sink. Legal in any state; calling it again
    /// after it has been reached is a no-op.
    fn close(&mut self) -> Result<()>;
}

/// Per-format serialization strategy for [`LineRecordConsumer`].
pub trait RecordFormatter {
    /// Lines written before the first record (headers, leading text).
    fn before_lines(&mut self) -> Vec<String> {
        Vec::new()
    }

    /// Lines for one record. May legitimately be empty (configured
    /// skipping) or more than one line (category headers).
    fn record_lines(&mut self, record: &Record) -> Result<Vec<String>>;

    /// Lines written after the last record (footers, trailing text).
    fn after_lines(&mut self) -> Vec<String> {
        Vec::new()
    }

    /// Whether a line separator follows each line. Width-framed formats
    /// turn this off.
    fn writes_line_separator(&self) -> bool {
        true
    }
}

/// Generic lifecycle consumer over a [`RecordFormatter`].
pub struct LineRecordConsumer<F: RecordFormatter> {
    state: ConsumerState,
    writer: Option<Box<dyn Write>>,
    formatter: F,
    line_separator: LineSeparator,
}

impl<F: RecordFormatter> LineRecordConsumer<F> {
    pub fn new(
        writer: impl Write + 'static,
        formatter: F,
        line_separator: LineSeparator,
    ) -> LineRecordConsumer<F> {
        LineRecordConsumer {
            state: ConsumerState::Open,
            writer: Some(Box::new(writer)),
            formatter,
            line_separator,
        }
    }

    fn write_lines(&mut self, lines: &[String]) -> Result<()> {
        let writer = self.writer.as_mut().ok_or(Error::IllegalState {
            operation: "write",
            state: "Close",
        })?;
        let separator = self.formatter.writes_line_separator();
        for line in lines {
            writer.write_all(line.as_bytes())?;
            if separator {
                writer.write_all(self.line_separator.as_str().as_bytes())?;
            }
        }
        Ok(())
    }
}

impl<F: RecordFormatter> WritableRecordConsumer for LineRecordConsumer<F> {
    fn write_before(&mut self) -> Result<()> {
        self.state = ConsumerState::WriteBefore.validate(self.state, "write_before")?;
        let lines = self.formatter.before_lines();
        self.write_lines(&lines)
    }

    fn write_record(&mut self, record: &Record) -> Result<()> {
        self.state = ConsumerState::WriteRecords.validate(self.state, "write_record")?;
        let lines = self
            .formatter
            .record_lines(record)
            .map_err(|e| e.into_consumer("serializing record", record))?;
        self.write_lines(&lines)
    }

    fn write_after(&mut self) -> Result<()> {
        self.state = ConsumerState::WriteAfter.validate(self.state, "write_after")?;
        let lines = self.formatter.after_lines();
        self.write_lines(&lines)
    }

    fn flush(&mut self) -> Result<()> {
        self.state.require_not_closed("flush")?;
        if let Some(writer) = self.writer.as_mut() {
            writer.flush()?;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.state = ConsumerState::Close.validate(self.state, "close")?;
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
        }
        Ok(())
    }
}
