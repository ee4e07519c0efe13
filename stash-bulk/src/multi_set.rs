//! Edit buffer for a relation list in a bulk edit form
//!
//! Mode switching rules:
//! - switching to `Set` fills the buffer with the ids every record shares,
//!   so the user edits from the current state rather than from nothing
//! - switching away from `Set` empties the buffer
//! - switching between `Add` and `Remove` keeps the buffer

use crate::aggregate::Aggregate;
use crate::update::{resolve_id_set_update, BulkUpdateMode, IdSetUpdate, UpdateValue};

/// One relation list control (tags, performers, ...) of a bulk edit form
#[derive(Debug, Clone, PartialEq)]
pub struct MultiSetField<I> {
    mode: BulkUpdateMode,
    ids: Vec<I>,
    existing: Aggregate<Vec<I>>,
}

impl<I: Clone + PartialEq> MultiSetField<I> {
    /// New control in `Add` mode with an empty buffer
    pub fn new(existing: Aggregate<Vec<I>>) -> Self {
        Self {
            mode: BulkUpdateMode::default(),
            ids: Vec::new(),
            existing,
        }
    }

    pub fn mode(&self) -> BulkUpdateMode {
        self.mode
    }

    pub fn ids(&self) -> &[I] {
        &self.ids
    }

    /// Aggregate the control was seeded with
    pub fn existing(&self) -> &Aggregate<Vec<I>> {
        &self.existing
    }

    pub fn set_mode(&mut self, mode: BulkUpdateMode) {
        if mode == self.mode {
            return;
        }

        if mode == BulkUpdateMode::Set {
            self.ids = self.existing.concrete().cloned().unwrap_or_default();
        } else if self.mode == BulkUpdateMode::Set {
            self.ids.clear();
        }
        self.mode = mode;
    }

    /// Replace the whole buffer
    pub fn set_ids(&mut self, ids: Vec<I>) {
        self.ids = ids;
    }

    /// Add one id to the buffer, ignoring duplicates
    pub fn push(&mut self, id: I) {
        if !self.ids.contains(&id) {
            self.ids.push(id);
        }
    }

    pub fn remove(&mut self, id: &I) {
        self.ids.retain(|i| i != id);
    }

    /// Instruction to send for this control
    pub fn to_update(&self) -> UpdateValue<IdSetUpdate<I>> {
        resolve_id_set_update(self.mode, &self.ids, &self.existing)
    }
}
