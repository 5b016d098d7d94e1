//! Pairing of two producers or two consumers behind one lifecycle.
//!
//! [`CombinedReadableRecordProducer`] reads the first source to exhaustion,
//! then the second. [`CombinedWritableRecordConsumer`] forwards every
//! lifecycle call and every record to both sinks in order. Closing a pair
//! always closes both halves; when both closes fail, the first failure is
//! the primary error and the second is attached to it as suppressed.

use crate::error::Result;
use crate::io::consumer::WritableRecordConsumer;
use crate::io::producer::ReadableRecordProducer;
use crate::modifier::RecordStream;
use crate::record::Record;

/// Combines close results from two halves: first failure wins, the second
/// is attached as suppressed.
fn close_both(first: Result<()>, second: Result<()>) -> Result<()> {
    match (first, second) {
        (Ok(()), Ok(())) => Ok(()),
        (Err(e), Ok(())) | (Ok(()), Err(e)) => Err(e),
        (Err(first), Err(second)) => Err(first.with_suppressed(second)),
    }
}

/// Concatenates two producers: all records of the first, then all records
/// of the second.
pub struct CombinedReadableRecordProducer {
    first: Box<dyn ReadableRecordProducer>,
    second: Box<dyn ReadableRecordProducer>,
}

impl CombinedReadableRecordProducer {
    pub fn new(
        first: impl ReadableRecordProducer + 'static,
        second: impl ReadableRecordProducer + 'static,
    ) -> CombinedReadableRecordProducer {
        CombinedReadableRecordProducer {
            first: Box::new(first),
            second: Box::new(second),
        }
    }
}

impl ReadableRecordProducer for CombinedReadableRecordProducer {
    fn read_before(&mut self) -> Result<()> {
        self.first.read_before()?;
        self.second.read_before()
    }

    fn read_records(&mut self) -> Result<RecordStream<'_>> {
        let first = self.first.read_records()?;
        let second = self.second.read_records()?;
        Ok(Box::new(first.chain(second)))
    }

    fn read_after(&mut self) -> Result<()> {
        self.first.read_after()?;
        self.second.read_after()
    }

    fn close(&mut self) -> Result<()> {
        close_both(self.first.close(), self.second.close())
    }
}

/// Duplicates one record stream into two consumers.
pub struct CombinedWritableRecordConsumer {
    first: Box<dyn WritableRecordConsumer>,
    second: Box<dyn WritableRecordConsumer>,
}

impl CombinedWritableRecordConsumer {
    pub fn new(
        first: impl WritableRecordConsumer + 'static,
        second: impl WritableRecordConsumer + 'static,
    ) -> CombinedWritableRecordConsumer {
        CombinedWritableRecordConsumer {
            first: Box::new(first),
            second: Box::new(second),
        }
    }
}

impl WritableRecordConsumer for CombinedWritableRecordConsumer {
    fn write_before(&mut self) -> Result<()> {
        self.first.write_before()?;
        self.second.write_before()
    }

    fn write_record(&mut self, record: &Record) -> Result<()> {
        self.first.write_record(record)?;
        self.second.write_record(record)
    }

    fn write_after(&mut self) -> Result<()> {
        self.first.write_after()?;
        self.second.write_after()
    }

    fn flush(&mut self) -> Result<()> {
        self.first.flush()?;
        self.second.flush()
    }

    fn close(&mut self) -> Result<()> {
        close_both(self.first.close(), self.second.close())
    }
}
