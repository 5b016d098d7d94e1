//! In-memory record producers.
//!
//! A [`RecordProducer`] yields a lazy sequence of records from data already
//! in memory; it has no lifecycle and owns no external resource. File-backed
//! producers with the full open/read/close lifecycle live in
//! [`crate::io::producer`].

use crate::modifier::RecordStream;
use crate::record::Record;

/// A source of records without external resources.
pub trait RecordProducer {
    fn produce(&self) -> RecordStream<'static>;
}

/// Yields exactly `count` clones of one record, then terminates.
pub struct ConstantProducer {
    count: usize,
    record: Record,
}

impl ConstantProducer {
    pub fn new(count: usize, record: Record) -> ConstantProducer {
        ConstantProducer { count, record }
    }
}

impl RecordProducer for ConstantProducer {
    fn produce(&self) -> RecordStream<'static> {
        let record = self.record.clone();
        Box::new(std::iter::repeat_n(record, self.count).map(Ok))
    }
}

/// Yields the records of a vector in order.
pub struct VecProducer {
    records: Vec<Record>,
}

impl VecProducer {
    pub fn new(records: Vec<Record>) -> VecProducer {
        VecProducer { records }
    }
}

impl RecordProducer for VecProducer {
    fn produce(&self) -> RecordStream<'static> {
        Box::new(self.records.clone().into_iter().map(Ok))
    }
}
