//! Turning form edits into update instructions
//!
//! A bulk edit must never collapse a field the user did not touch: if the
//! selection disagreed on a field and the form still shows it unset, the
//! field is left out of the payload so every record keeps its own value.

use crate::aggregate::Aggregate;
use crate::entity::GroupDescription;
use serde::{Deserialize, Serialize};

/// Whether to write a field, and with what
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateValue<T> {
    /// Omit the field; each record keeps its current value
    Leave,
    /// Write this value to every record
    Set(T),
}

impl<T> UpdateValue<T> {
    pub fn is_leave(&self) -> bool {
        matches!(self, UpdateValue::Leave)
    }
}

/// How a relation list is changed on every selected record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BulkUpdateMode {
    /// Replace the list with exactly the given ids
    Set,
    /// Union the given ids into each record's list
    #[default]
    Add,
    /// Remove the given ids from each record's list
    Remove,
}

/// Relation update instruction sent to the server
///
/// The server performs the union/subtraction; this only carries the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdSetUpdate<I> {
    pub mode: BulkUpdateMode,
    pub ids: Vec<I>,
}

/// Containing group update: `{mode, groups: [{group_id, description}]}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDescriptionsUpdate {
    pub mode: BulkUpdateMode,
    pub groups: Vec<GroupDescription>,
}

impl From<IdSetUpdate<GroupDescription>> for GroupDescriptionsUpdate {
    fn from(update: IdSetUpdate<GroupDescription>) -> Self {
        Self {
            mode: update.mode,
            groups: update.ids,
        }
    }
}

/// Form value a scalar field starts with
///
/// A shared value seeds the control; a mixed field starts unset (`None`).
pub fn seed_value<T: Clone>(aggregate: &Aggregate<T>) -> Option<T> {
    aggregate.concrete().cloned()
}

/// Decide what to send for a scalar field
///
/// `edited` is the current form value, `None` meaning the control is unset.
/// - Unchanged from the seed and mixed: [`UpdateValue::Leave`]
/// - Unchanged from the seed and shared: re-send the shared value
/// - Changed: send the edit verbatim; `Set(None)` clears the field
pub fn resolve_update_value<T>(edited: Option<&T>, aggregate: &Aggregate<T>) -> UpdateValue<Option<T>>
where
    T: PartialEq + Clone,
{
    match aggregate {
        Aggregate::Mixed => match edited {
            None => UpdateValue::Leave,
            Some(v) => UpdateValue::Set(Some(v.clone())),
        },
        // Re-sending an unchanged shared value is a no-op overwrite
        Aggregate::Concrete(_) => UpdateValue::Set(edited.cloned()),
    }
}

/// Decide what to send for a relation list
///
/// - `Set` with no ids clears the relation only when every record shared a
///   non-empty list; otherwise nothing is sent.
/// - `Add`/`Remove` with no ids send nothing.
/// - Anything else is sent as-is.
pub fn resolve_id_set_update<I: Clone>(
    mode: BulkUpdateMode,
    edited: &[I],
    aggregate: &Aggregate<Vec<I>>,
) -> UpdateValue<IdSetUpdate<I>> {
    if edited.is_empty() {
        let shared_non_empty = aggregate.concrete().is_some_and(|ids| !ids.is_empty());
        return if mode == BulkUpdateMode::Set && shared_non_empty {
            UpdateValue::Set(IdSetUpdate { mode, ids: Vec::new() })
        } else {
            UpdateValue::Leave
        };
    }

    UpdateValue::Set(IdSetUpdate {
        mode,
        ids: edited.to_vec(),
    })
}
