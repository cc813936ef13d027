use bmd_types::ObjectType;

use crate::error::StoreResult;
use crate::traits::{CounterBatch, ObjectStore};

/// Pages through the objects of one type in counter order.
///
/// Each step asks the store for at most `batch_size` objects starting at the
/// next unseen counter, then resumes from `last_counter + 1`. No lock is held
/// between batches: objects removed meanwhile are skipped, and objects
/// inserted meanwhile are picked up only while full batches keep coming. The
/// cursor ends after the first short or empty batch; start a new one from
/// [`position`](Self::position) to catch up later.
pub struct BacklogCursor<'a, S: ObjectStore + ?Sized> {
    store: &'a S,
    object_type: ObjectType,
    next_counter: u64,
    batch_size: usize,
    done: bool,
}

impl<'a, S: ObjectStore + ?Sized> BacklogCursor<'a, S> {
    /// Start at `from_counter` (inclusive). A `batch_size` of zero is treated
    /// as one.
    pub fn new(store: &'a S, object_type: ObjectType, from_counter: u64, batch_size: usize) -> Self {
        Self {
            store,
            object_type,
            next_counter: from_counter,
            batch_size: batch_size.max(1),
            done: false,
        }
    }

    /// Counter the next batch will start from.
    pub fn position(&self) -> u64 {
        self.next_counter
    }

    /// Drain the cursor into `(counter, bytes)` pairs.
    pub fn collect_all(self) -> StoreResult<Vec<(u64, Vec<u8>)>> {
        let mut entries = Vec::new();
        for batch in self {
            entries.extend(batch?.entries);
        }
        Ok(entries)
    }
}

impl<S: ObjectStore + ?Sized> Iterator for BacklogCursor<'_, S> {
    type Item = StoreResult<CounterBatch>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let batch = match self
            .store
            .fetch_objects_from_counter(self.object_type, self.next_counter, self.batch_size)
        {
            Ok(batch) => batch,
            Err(e) => {
                self.done = true;
                return Some(Err(e));
            }
        };
        match batch.next_counter() {
            Some(next) => self.next_counter = next,
            None => {
                self.done = true;
                return None;
            }
        }
        if batch.len() < self.batch_size {
            self.done = true;
        }
        Some(Ok(batch))
    }
}
