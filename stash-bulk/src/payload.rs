//! Bulk edit session
//!
//! Seeds every bulk-editable field of an entity kind from the selection,
//! takes the user's edits, and builds the update payload. Fields resolved to
//! [`UpdateValue::Leave`] do not appear in the payload at all.

use crate::aggregate::{aggregate_by, aggregate_id_set, aggregate_relation_by_key, lookup, Aggregate, Entity};
use crate::entity::{entity_id, EntityKind, GroupDescription};
use crate::multi_set::MultiSetField;
use crate::update::{resolve_update_value, seed_value, GroupDescriptionsUpdate, IdSetUpdate, UpdateValue};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Payload of a bulk update mutation
///
/// Serializes flat: `{"ids": [...], "rating100": 80, "tag_ids": {"mode": "ADD", "ids": [...]}}`.
/// Containing groups use `{"mode": ..., "groups": [{"group_id", "description"}]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BulkUpdateInput {
    pub ids: Vec<String>,

    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,

    #[serde(flatten)]
    pub relations: BTreeMap<String, IdSetUpdate<String>>,

    #[serde(flatten)]
    pub described: BTreeMap<String, GroupDescriptionsUpdate>,
}

impl BulkUpdateInput {
    /// True when the payload would change nothing
    pub fn is_noop(&self) -> bool {
        self.fields.is_empty() && self.relations.is_empty() && self.described.is_empty()
    }
}

#[derive(Debug, Clone)]
struct ScalarField {
    aggregate: Aggregate<Value>,
    edited: Option<Value>,
}

/// Form state of one bulk edit over a selection of entities
#[derive(Debug, Clone)]
pub struct BulkEdit {
    kind: EntityKind,
    ids: Vec<String>,
    scalars: BTreeMap<&'static str, ScalarField>,
    relations: BTreeMap<&'static str, MultiSetField<String>>,
    described: BTreeMap<&'static str, MultiSetField<GroupDescription>>,
}

impl BulkEdit {
    /// Aggregate the selection and seed the form
    pub fn new(kind: EntityKind, entities: &[Entity]) -> Self {
        let ids: Vec<String> = entities.iter().filter_map(entity_id).collect();
        if ids.len() != entities.len() {
            warn!(
                kind = kind.as_str(),
                missing = entities.len() - ids.len(),
                "Selected entities without an id"
            );
        }

        let scalars = kind
            .scalar_fields()
            .iter()
            .map(|spec| {
                // A field absent from the snapshots tells us nothing about the
                // records, so it is treated like a disagreement.
                let aggregate = match aggregate_by(entities, |e| lookup(e, spec.path).cloned()) {
                    Aggregate::Concrete(Some(v)) => Aggregate::Concrete(v),
                    Aggregate::Concrete(None) | Aggregate::Mixed => Aggregate::Mixed,
                };
                let edited = seed_value(&aggregate);
                (spec.name, ScalarField { aggregate, edited })
            })
            .collect();

        let relations = kind
            .relations()
            .iter()
            .map(|spec| {
                let existing = aggregate_id_set(entities, |e| spec.ids(e));
                (spec.name, MultiSetField::new(existing))
            })
            .collect();

        let described = kind
            .described_relations()
            .iter()
            .map(|spec| {
                let existing =
                    aggregate_relation_by_key(entities, |e| spec.entries(e), |r: &GroupDescription| {
                        r.group_id.clone()
                    });
                (spec.name, MultiSetField::new(existing))
            })
            .collect();

        debug!(kind = kind.as_str(), selected = ids.len(), "Seeded bulk edit");

        Self {
            kind,
            ids,
            scalars,
            relations,
            described,
        }
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Aggregate a scalar field was seeded from
    pub fn aggregate(&self, field: &str) -> Option<&Aggregate<Value>> {
        self.scalars.get(field).map(|f| &f.aggregate)
    }

    /// Current form value of a scalar field; `None` when unset
    pub fn value(&self, field: &str) -> Option<&Value> {
        self.scalars.get(field).and_then(|f| f.edited.as_ref())
    }

    /// Edit a scalar field
    ///
    /// `Some(Value::Null)` clears the field on every record. `None` puts the
    /// control back to unset, which clears a shared value but leaves a mixed
    /// field alone. Returns false for a field this entity kind does not bulk
    /// edit.
    pub fn set_field(&mut self, field: &str, value: Option<Value>) -> bool {
        match self.scalars.get_mut(field) {
            Some(f) => {
                f.edited = value;
                true
            }
            None => {
                warn!(kind = self.kind.as_str(), field, "Ignoring edit of unknown field");
                false
            }
        }
    }

    pub fn relation(&self, name: &str) -> Option<&MultiSetField<String>> {
        self.relations.get(name)
    }

    pub fn relation_mut(&mut self, name: &str) -> Option<&mut MultiSetField<String>> {
        self.relations.get_mut(name)
    }

    pub fn described_relation(&self, name: &str) -> Option<&MultiSetField<GroupDescription>> {
        self.described.get(name)
    }

    pub fn described_relation_mut(&mut self, name: &str) -> Option<&mut MultiSetField<GroupDescription>> {
        self.described.get_mut(name)
    }

    /// Build the payload from the current form state
    pub fn build(&self) -> BulkUpdateInput {
        let mut input = BulkUpdateInput {
            ids: self.ids.clone(),
            ..Default::default()
        };

        for (name, field) in &self.scalars {
            if let UpdateValue::Set(value) = resolve_update_value(field.edited.as_ref(), &field.aggregate) {
                input
                    .fields
                    .insert(name.to_string(), value.unwrap_or(Value::Null));
            }
        }

        for (name, field) in &self.relations {
            if let UpdateValue::Set(update) = field.to_update() {
                input.relations.insert(name.to_string(), update);
            }
        }

        for (name, field) in &self.described {
            if let UpdateValue::Set(update) = field.to_update() {
                input.described.insert(name.to_string(), update.into());
            }
        }

        debug!(
            kind = self.kind.as_str(),
            fields = input.fields.len(),
            relations = input.relations.len() + input.described.len(),
            "Built bulk update payload"
        );

        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::update::BulkUpdateMode;
    use serde_json::json;

    fn entities(values: Value) -> Vec<Entity> {
        values
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_object().cloned().unwrap())
            .collect()
    }

    fn scenes() -> Vec<Entity> {
        entities(json!([
            {
                "id": "1",
                "rating100": 80,
                "organized": false,
                "studio": {"id": "s1"},
                "tags": [{"id": "t2"}, {"id": "t1"}],
                "performers": [{"id": "p1"}],
            },
            {
                "id": "2",
                "rating100": 60,
                "organized": false,
                "studio": {"id": "s1"},
                "tags": [{"id": "t1"}, {"id": "t2"}],
                "performers": [],
            },
        ]))
    }

    #[test]
    fn test_seeding() {
        let edit = BulkEdit::new(EntityKind::Scene, &scenes());

        assert_eq!(edit.ids(), &["1".to_string(), "2".to_string()]);
        assert!(edit.aggregate("rating100").unwrap().is_mixed());
        assert_eq!(edit.value("rating100"), None);
        assert_eq!(edit.value("studio_id"), Some(&json!("s1")));

        let tags = edit.relation("tag_ids").unwrap();
        assert_eq!(tags.existing(), &Aggregate::Concrete(vec!["t1".to_string(), "t2".to_string()]));
        assert!(edit.relation("performer_ids").unwrap().existing().is_mixed());
    }

    #[test]
    fn test_untouched_form_only_resends_shared_values() {
        let input = BulkEdit::new(EntityKind::Scene, &scenes()).build();

        assert!(!input.fields.contains_key("rating100"));
        assert_eq!(input.fields.get("studio_id"), Some(&json!("s1")));
        assert_eq!(input.fields.get("organized"), Some(&json!(false)));
        assert!(input.relations.is_empty());
    }

    #[test]
    fn test_edits_flow_into_payload() {
        let mut edit = BulkEdit::new(EntityKind::Scene, &scenes());
        assert!(edit.set_field("rating100", Some(json!(100))));
        assert!(edit.set_field("studio_id", None));
        assert!(!edit.set_field("title", Some(json!("nope"))));

        let tags = edit.relation_mut("tag_ids").unwrap();
        tags.set_mode(BulkUpdateMode::Set);
        tags.remove(&"t2".to_string());

        let input = edit.build();
        assert_eq!(input.fields.get("rating100"), Some(&json!(100)));
        assert_eq!(input.fields.get("studio_id"), Some(&Value::Null));
        assert_eq!(
            input.relations.get("tag_ids"),
            Some(&IdSetUpdate {
                mode: BulkUpdateMode::Set,
                ids: vec!["t1".to_string()]
            })
        );
    }

    #[test]
    fn test_field_missing_from_snapshots_is_left_alone() {
        let studios = entities(json!([{"id": "1"}, {"id": "2"}]));
        let input = BulkEdit::new(EntityKind::Studio, &studios).build();
        assert!(input.is_noop());
    }

    #[test]
    fn test_payload_serializes_flat() {
        let mut edit = BulkEdit::new(EntityKind::Scene, &scenes());
        edit.relation_mut("performer_ids").unwrap().push("p9".to_string());

        let json = serde_json::to_value(edit.build()).unwrap();
        assert_eq!(json["ids"], json!(["1", "2"]));
        assert_eq!(json["performer_ids"], json!({"mode": "ADD", "ids": ["p9"]}));
        assert!(json.get("rating100").is_none());
    }
}
