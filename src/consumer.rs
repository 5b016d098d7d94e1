//! In-memory record consumers.
//!
//! A [`RecordConsumer`] accepts records into a shared in-memory target. The
//! sinks here synchronize internally around their single mutation point, so
//! one consumer instance may safely receive records from multiple threads.
//! This is deliberately unlike the file-backed consumers in
//! [`crate::io::consumer`], whose lifecycle state is unsynchronized.

use crate::error::Result;
use crate::record::Record;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// A sink for records without external resources.
pub trait RecordConsumer {
    fn consume(&self, record: &Record) -> Result<()>;
}

/// Collects records into a shared vector.
pub struct VecConsumer {
    records: Arc<Mutex<Vec<Record>>>,
}

impl VecConsumer {
    pub fn new() -> VecConsumer {
        VecConsumer {
            records: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A handle to the shared target, e.g. for another thread.
    pub fn target(&self) -> Arc<Mutex<Vec<Record>>> {
        Arc::clone(&self.records)
    }

    /// The collected records so far.
    pub fn records(&self) -> Vec<Record> {
        self.records.lock().expect("records lock").clone()
    }
}

impl Default for VecConsumer {
    fn default() -> Self {
        VecConsumer::new()
    }
}

impl RecordConsumer for VecConsumer {
    fn consume(&self, record: &Record) -> Result<()> {
        self.records.lock().expect("records lock").push(record.clone());
        Ok(())
    }
}

/// Appends a text projection of every record to a shared string.
pub struct StringConsumer {
    buffer: Arc<Mutex<String>>,
    message: Box<dyn Fn(&Record) -> String + Send + Sync>,
    separator: String,
}

impl StringConsumer {
    pub fn new(
        message: impl Fn(&Record) -> String + Send + Sync + 'static,
        separator: impl Into<String>,
    ) -> StringConsumer {
        StringConsumer {
            buffer: Arc::new(Mutex::new(String::new())),
            message: Box::new(message),
            separator: separator.into(),
        }
    }

    pub fn text(&self) -> String {
        self.buffer.lock().expect("buffer lock").clone()
    }
}

impl RecordConsumer for StringConsumer {
    fn consume(&self, record: &Record) -> Result<()> {
        let mut buffer = self.buffer.lock().expect("buffer lock");
        buffer.push_str(&(self.message)(record));
        buffer.push_str(&self.separator);
        Ok(())
    }
}

/// Inserts a key/value projection of every record into a shared map. A later
/// record with an already-present key overwrites the earlier entry.
pub struct MapConsumer {
    entries: Arc<Mutex<HashMap<String, Option<String>>>>,
    key_of: Box<dyn Fn(&Record) -> String + Send + Sync>,
    value_of: Box<dyn Fn(&Record) -> Option<String> + Send + Sync>,
}

impl MapConsumer {
    pub fn new(
        key_of: impl Fn(&Record) -> String + Send + Sync + 'static,
        value_of: impl Fn(&Record) -> Option<String> + Send + Sync + 'static,
    ) -> MapConsumer {
        MapConsumer {
            entries: Arc::new(Mutex::new(HashMap::new())),
            key_of: Box::new(key_of),
            value_of: Box::new(value_of),
        }
    }

    pub fn entries(&self) -> HashMap<String, Option<String>> {
        self.entries.lock().expect("entries lock").clone()
    }
}

impl RecordConsumer for MapConsumer {
    fn consume(&self, record: &Record) -> Result<()> {
        self.entries
            .lock()
            .expect("entries lock")
            .insert((self.key_of)(record), (self.value_of)(record));
        Ok(())
    }
}
