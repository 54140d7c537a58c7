use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};

use ulid::Ulid;

/// Source of primary keys for new themes and questions.
pub trait IdGenerator: Debug + Send + Sync {
    fn next_id(&self) -> String;
}

/// Default generator: lexicographically sortable ULIDs.
#[derive(Debug, Default, Clone, Copy)]
pub struct UlidGenerator;

impl IdGenerator for UlidGenerator {
    fn next_id(&self) -> String {
        Ulid::new().to_string()
    }
}

/// Hands out `{prefix}-1`, `{prefix}-2`, ... in call order.
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::SeqCst);
        format!("{}-{n}", self.prefix)
    }
}
