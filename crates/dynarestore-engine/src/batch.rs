//! Fixed-ceiling batch accumulation for one dispatch worker.

use dynarestore_types::{Record, MAX_BATCH_ITEMS};

/// Records awaiting one write-batch call.
///
/// Owned by exactly one worker. A full buffer is handed out only when the
/// next record arrives, so a batch is never flushed early.
#[derive(Debug)]
pub struct BatchBuffer {
    items: Vec<Record>,
}

impl Default for BatchBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Vec::with_capacity(MAX_BATCH_ITEMS),
        }
    }

    /// Accept `record`. If the buffer already held [`MAX_BATCH_ITEMS`]
    /// records, that batch is returned for flushing and the new record
    /// starts the next batch.
    pub fn push(&mut self, record: Record) -> Option<Vec<Record>> {
        let full = (self.items.len() >= MAX_BATCH_ITEMS).then(|| self.take());
        self.items.push(record);
        full
    }

    /// Remaining records at end of input, if any.
    pub fn drain(&mut self) -> Option<Vec<Record>> {
        (!self.items.is_empty()).then(|| self.take())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn take(&mut self) -> Vec<Record> {
        std::mem::replace(&mut self.items, Vec::with_capacity(MAX_BATCH_ITEMS))
    }
}
