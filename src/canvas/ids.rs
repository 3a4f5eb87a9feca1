//! Node id generation
//!
//! Importing a manifest creates fresh canvas nodes; their ids come from a
//! caller-supplied generator so uniqueness is the caller's explicit choice.

use uuid::Uuid;

/// Source of canvas node ids
pub trait IdGenerator {
    fn next_id(&mut self) -> String;
}

/// `node-0`, `node-1`, ... continuing across calls
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    next: usize,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting at `next`, e.g. past the ids already on the canvas
    pub fn starting_at(next: usize) -> Self {
        Self { next }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("node-{}", self.next);
        self.next += 1;
        id
    }
}

/// `node-<uuid v4>`
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self) -> String {
        format!("node-{}", Uuid::new_v4())
    }
}

impl<F: FnMut() -> String> IdGenerator for F {
    fn next_id(&mut self) -> String {
        self()
    }
}
