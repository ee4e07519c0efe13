//! Aggregate field reducer
//!
//! Given the entities selected for a bulk edit, decide for each field whether
//! they all share one value. A shared value seeds the edit form; anything
//! else is [`Aggregate::Mixed`] and the form starts unset.
//!
//! `null` is an ordinary value here: "every scene has no rating" is
//! `Concrete(Some(Value::Null))`, distinct from `Mixed`. A field missing from
//! every entity is `Concrete(None)`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// An entity snapshot as handed over by the API layer
pub type Entity = serde_json::Map<String, Value>;

/// Value of one field of one entity; `None` when the field is absent
pub type FieldValue = Option<Value>;

/// Field name -> aggregate of that field across the selection
pub type AggregateResult = BTreeMap<String, Aggregate<FieldValue>>;

/// Outcome of reducing one field across a selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregate<T> {
    /// Every entity holds this value
    Concrete(T),
    /// Entities disagree, or there were no entities
    Mixed,
}

impl<T> Aggregate<T> {
    pub fn is_mixed(&self) -> bool {
        matches!(self, Aggregate::Mixed)
    }

    /// Shared value, if there is one
    pub fn concrete(&self) -> Option<&T> {
        match self {
            Aggregate::Concrete(v) => Some(v),
            Aggregate::Mixed => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Aggregate<U> {
        match self {
            Aggregate::Concrete(v) => Aggregate::Concrete(f(v)),
            Aggregate::Mixed => Aggregate::Mixed,
        }
    }
}

#[derive(Debug, Clone)]
enum StateInner<T> {
    Empty,
    Concrete(T),
    Mixed,
}

/// Incremental reducer for callers that see entities one at a time
///
/// Pushing after the state went mixed is a no-op, and finishing without any
/// pushes yields [`Aggregate::Mixed`], so a fold over `push` gives the same
/// answer as [`aggregate_by`].
#[derive(Debug, Clone)]
pub struct AggregateState<T> {
    inner: StateInner<T>,
}

impl<T: PartialEq> AggregateState<T> {
    pub fn new() -> Self {
        Self {
            inner: StateInner::Empty,
        }
    }

    /// Fold in the next entity's value
    pub fn push(&mut self, value: T) {
        match &self.inner {
            StateInner::Empty => self.inner = StateInner::Concrete(value),
            StateInner::Concrete(current) => {
                if *current != value {
                    self.inner = StateInner::Mixed;
                }
            }
            StateInner::Mixed => {}
        }
    }

    /// True once two pushed values have disagreed
    pub fn is_mixed(&self) -> bool {
        matches!(self.inner, StateInner::Mixed)
    }

    pub fn finish(self) -> Aggregate<T> {
        match self.inner {
            StateInner::Concrete(v) => Aggregate::Concrete(v),
            StateInner::Empty | StateInner::Mixed => Aggregate::Mixed,
        }
    }
}

impl<T: PartialEq> Default for AggregateState<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Reduce one accessor across all entities
///
/// Stops calling `accessor` at the first disagreement.
pub fn aggregate_by<E, T, F>(entities: &[E], accessor: F) -> Aggregate<T>
where
    T: PartialEq,
    F: Fn(&E) -> T,
{
    let mut state = AggregateState::new();
    for entity in entities {
        state.push(accessor(entity));
        if state.is_mixed() {
            break;
        }
    }
    state.finish()
}

/// Reduce several scalar fields of JSON entities
///
/// Field names may be dotted paths into nested objects (`studio.id`).
pub fn aggregate<S: AsRef<str>>(entities: &[Entity], fields: &[S]) -> AggregateResult {
    let result: AggregateResult = fields
        .iter()
        .map(|field| {
            let field = field.as_ref();
            let agg = aggregate_by(entities, |e| lookup(e, field).cloned());
            (field.to_string(), agg)
        })
        .collect();

    debug!(
        entities = entities.len(),
        fields = fields.len(),
        mixed = result.values().filter(|a| a.is_mixed()).count(),
        "Aggregated scalar fields"
    );

    result
}

/// Reduce a relation list, ignoring the order the backend returned it in
///
/// Each entity's list is sorted ascending before comparison, so two lists
/// agree when they hold the same elements.
pub fn aggregate_id_set<E, I, F>(entities: &[E], accessor: F) -> Aggregate<Vec<I>>
where
    I: Ord,
    F: Fn(&E) -> Vec<I>,
{
    aggregate_by(entities, |e| {
        let mut ids = accessor(e);
        ids.sort();
        ids
    })
}

/// Reduce a relation whose elements are records rather than bare ids
///
/// Elements are ordered by `key` before comparison and then compared whole,
/// so a containing group with a different description still counts as a
/// difference.
pub fn aggregate_relation_by_key<E, R, K, F, G>(entities: &[E], accessor: F, key: G) -> Aggregate<Vec<R>>
where
    R: PartialEq,
    K: Ord,
    F: Fn(&E) -> Vec<R>,
    G: Fn(&R) -> K,
{
    aggregate_by(entities, |e| {
        let mut items = accessor(e);
        items.sort_by_key(|item| key(item));
        items
    })
}

/// Resolve a dotted path inside an entity
pub fn lookup<'a>(entity: &'a Entity, path: &str) -> Option<&'a Value> {
    let mut parts = path.split('.');
    let first = parts.next()?;
    let mut current = entity.get(first)?;
    for part in parts {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entity(value: Value) -> Entity {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_shared_value_is_concrete() {
        let entities = vec![
            entity(json!({"rating100": 80, "organized": true})),
            entity(json!({"rating100": 80, "organized": true})),
            entity(json!({"rating100": 80, "organized": true})),
        ];

        let result = aggregate(&entities, &["rating100", "organized"]);
        assert_eq!(result["rating100"], Aggregate::Concrete(Some(json!(80))));
        assert_eq!(result["organized"], Aggregate::Concrete(Some(json!(true))));
    }

    #[test]
    fn test_any_difference_is_mixed() {
        let entities = vec![
            entity(json!({"rating100": 80})),
            entity(json!({"rating100": 80})),
            entity(json!({"rating100": 60})),
        ];

        let result = aggregate(&entities, &["rating100"]);
        assert!(result["rating100"].is_mixed());
    }

    #[test]
    fn test_empty_selection_is_mixed_everywhere() {
        let result = aggregate(&[], &["rating100", "studio.id", "anything"]);
        assert_eq!(result.len(), 3);
        assert!(result.values().all(|a| a.is_mixed()));
    }

    #[test]
    fn test_null_is_a_shared_value() {
        let entities = vec![
            entity(json!({"rating100": null})),
            entity(json!({"rating100": null})),
        ];

        let result = aggregate(&entities, &["rating100"]);
        assert_eq!(result["rating100"], Aggregate::Concrete(Some(Value::Null)));
    }

    #[test]
    fn test_null_differs_from_missing() {
        let entities = vec![entity(json!({"rating100": null})), entity(json!({}))];

        let result = aggregate(&entities, &["rating100"]);
        assert!(result["rating100"].is_mixed());
    }

    #[test]
    fn test_unknown_field_is_consistently_undefined() {
        let entities = vec![entity(json!({"a": 1})), entity(json!({"a": 2}))];

        let result = aggregate(&entities, &["no_such_field"]);
        assert_eq!(result["no_such_field"], Aggregate::Concrete(None));
    }

    #[test]
    fn test_dotted_path() {
        let entities = vec![
            entity(json!({"studio": {"id": "7", "name": "A"}})),
            entity(json!({"studio": {"id": "7", "name": "A (renamed)"}})),
        ];

        let result = aggregate(&entities, &["studio.id", "studio.name"]);
        assert_eq!(result["studio.id"], Aggregate::Concrete(Some(json!("7"))));
        assert!(result["studio.name"].is_mixed());
    }

    #[test]
    fn test_aggregate_by_short_circuits() {
        use std::cell::Cell;

        let calls = Cell::new(0);
        let values = [1, 2, 3, 4, 5];
        let result = aggregate_by(&values, |v| {
            calls.set(calls.get() + 1);
            *v
        });

        assert!(result.is_mixed());
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_id_set_ignores_order() {
        let lists = vec![
            vec!["3", "1", "2"],
            vec!["1", "2", "3"],
            vec!["2", "3", "1"],
        ];

        let result = aggregate_id_set(&lists, |l| l.clone());
        assert_eq!(result, Aggregate::Concrete(vec!["1", "2", "3"]));
    }

    #[test]
    fn test_id_set_subset_is_mixed() {
        let lists = vec![vec!["1", "2"], vec!["1"]];
        assert!(aggregate_id_set(&lists, |l| l.clone()).is_mixed());
    }

    #[test]
    fn test_id_set_all_empty_is_concrete_empty() {
        let lists: Vec<Vec<&str>> = vec![vec![], vec![]];
        assert_eq!(aggregate_id_set(&lists, |l| l.clone()), Aggregate::Concrete(vec![]));
    }

    #[test]
    fn test_relation_by_key_compares_whole_records() {
        let a = vec![("2", "second"), ("1", "first")];
        let b = vec![("1", "first"), ("2", "second")];
        let c = vec![("1", "first"), ("2", "other")];

        let same = aggregate_relation_by_key(&[a.clone(), b], |l| l.clone(), |r| r.0);
        assert_eq!(same, Aggregate::Concrete(vec![("1", "first"), ("2", "second")]));

        let differ = aggregate_relation_by_key(&[a, c], |l| l.clone(), |r| r.0);
        assert!(differ.is_mixed());
    }

    #[test]
    fn test_state_fold_matches_batch() {
        let values = vec![Some(1), Some(1), None];
        let mut state = AggregateState::new();
        for v in &values {
            state.push(*v);
        }
        assert_eq!(state.finish(), aggregate_by(&values, |v| *v));
    }

    #[test]
    fn test_state_stays_mixed() {
        let mut state = AggregateState::new();
        state.push(1);
        state.push(2);
        state.push(1);
        assert!(state.finish().is_mixed());
    }
}
