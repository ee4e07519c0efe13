//! # Stash Bulk Edit
//!
//! Seeds bulk-edit forms from a multi-selection and turns the user's edits
//! back into an update payload.
//!
//! - [`aggregate`]: per-field agreement across the selected entities
//! - [`update`]: edited value + aggregate -> value to send (or leave alone)
//! - [`multi_set`]: edit buffer for relation lists with Set/Add/Remove modes
//! - [`entity`]: bulk-editable fields of each entity kind
//! - [`payload`]: a whole bulk edit session producing a [`BulkUpdateInput`]
//!
//! Everything here is pure: no I/O, no shared state, and no operation fails.

pub mod aggregate;
pub mod entity;
pub mod multi_set;
pub mod payload;
pub mod update;

pub use aggregate::{
    aggregate, aggregate_by, aggregate_id_set, aggregate_relation_by_key, Aggregate,
    AggregateResult, AggregateState, Entity,
};
pub use entity::{DescribedRelationSpec, EntityKind, FieldSpec, GroupDescription, RelationSpec};
pub use multi_set::MultiSetField;
pub use payload::{BulkEdit, BulkUpdateInput};
pub use update::{
    resolve_id_set_update, resolve_update_value, BulkUpdateMode, GroupDescriptionsUpdate, IdSetUpdate,
    UpdateValue,
};
