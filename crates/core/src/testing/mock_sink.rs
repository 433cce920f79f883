//! Mock output sink for testing.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::pipeline::{OutputRecord, OutputSink, SinkError, Ticket};

/// Records every emitted record in emission order.
///
/// Clones share the same record list.
#[derive(Debug, Clone, Default)]
pub struct MockSink {
    records: Arc<Mutex<Vec<OutputRecord>>>,
    fail: Arc<AtomicBool>,
}

impl MockSink {
    /// Create a new mock sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent writes fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// All records in emission order.
    pub fn records(&self) -> Vec<OutputRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Rendered lines in emission order.
    pub fn lines(&self) -> Vec<String> {
        self.records().iter().map(OutputRecord::render).collect()
    }

    /// Tickets in emission order; `None` for rejected stream lines.
    pub fn tickets(&self) -> Vec<Option<Ticket>> {
        self.records().iter().map(OutputRecord::ticket).collect()
    }
}

#[async_trait]
impl OutputSink for MockSink {
    async fn emit(&self, record: &OutputRecord) -> Result<(), SinkError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(SinkError::Closed);
        }
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
        Ok(())
    }
}
