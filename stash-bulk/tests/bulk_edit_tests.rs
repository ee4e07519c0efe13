//! Integration tests for the aggregate reducer and update resolution

use serde_json::{json, Value};
use stash_bulk::update::seed_value;
use stash_bulk::{
    aggregate, aggregate_id_set, resolve_id_set_update, resolve_update_value, Aggregate,
    BulkEdit, BulkUpdateMode, Entity, EntityKind, GroupDescription, UpdateValue,
};

fn entities(values: Value) -> Vec<Entity> {
    values
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_object().cloned().unwrap())
        .collect()
}

/// All rotations of a list, enough to shuffle small relation lists
fn rotations<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
    (0..items.len().max(1))
        .map(|n| {
            let mut v = items.to_vec();
            v.rotate_left(n.min(items.len()));
            v
        })
        .collect()
}

#[test]
fn test_identical_values_aggregate_to_that_value() {
    for value in [json!(null), json!(0), json!("x"), json!(true), json!({"a": [1, 2]})] {
        let selection: Vec<Entity> = (0..4)
            .map(|_| json!({ "f": value.clone() }).as_object().cloned().unwrap())
            .collect();

        let result = aggregate(&selection, &["f"]);
        assert_eq!(result["f"], Aggregate::Concrete(Some(value)));
    }
}

#[test]
fn test_two_differing_entities_make_field_mixed() {
    let selection = entities(json!([
        {"f": 1}, {"f": 1}, {"f": 1}, {"f": 2}, {"f": 1},
    ]));
    assert!(aggregate(&selection, &["f"])["f"].is_mixed());

    let selection = entities(json!([{"f": 2}, {"f": 1}]));
    assert!(aggregate(&selection, &["f"])["f"].is_mixed());
}

#[test]
fn test_id_set_invariant_under_permutation() {
    let ids = vec!["10", "2", "33", "4"];
    let baseline = aggregate_id_set(&[ids.clone(), ids.clone()], |l| l.clone());

    for a in rotations(&ids) {
        for b in rotations(&ids) {
            let mut reversed = b.clone();
            reversed.reverse();
            let result = aggregate_id_set(&[a.clone(), b.clone(), reversed], |l| l.clone());
            assert_eq!(result, baseline);
        }
    }
}

#[test]
fn test_id_set_sorts_ascending() {
    let result = aggregate_id_set(&[vec!["b", "c", "a"]], |l| l.clone());
    assert_eq!(result, Aggregate::Concrete(vec!["a", "b", "c"]));
}

#[test]
fn test_untouched_mixed_field_never_emitted() {
    let selection = entities(json!([{"rating100": 20}, {"rating100": 40}]));
    let result = aggregate(&selection, &["rating100"]);
    let agg = &result["rating100"];

    let seeded = seed_value(agg);
    assert_eq!(resolve_update_value(seeded.as_ref(), agg), UpdateValue::Leave);
}

#[test]
fn test_set_empty_rules() {
    let mixed: Aggregate<Vec<String>> = Aggregate::Mixed;
    let empty: Aggregate<Vec<String>> = Aggregate::Concrete(vec![]);
    let shared = Aggregate::Concrete(vec!["1".to_string()]);

    assert!(resolve_id_set_update(BulkUpdateMode::Set, &[], &mixed).is_leave());
    assert!(resolve_id_set_update(BulkUpdateMode::Set, &[], &empty).is_leave());

    let UpdateValue::Set(clear) = resolve_id_set_update::<String>(BulkUpdateMode::Set, &[], &shared) else {
        panic!("shared non-empty list should be cleared");
    };
    assert_eq!(clear.mode, BulkUpdateMode::Set);
    assert!(clear.ids.is_empty());
}

#[test]
fn test_group_child_relation_tracked_separately_from_tags() {
    // Same tags, different containing groups: only the group relation is mixed
    let groups = entities(json!([
        {
            "id": "g1",
            "tags": [{"id": "t1"}],
            "containing_groups": [{"group": {"id": "p1"}, "description": ""}],
        },
        {
            "id": "g2",
            "tags": [{"id": "t1"}],
            "containing_groups": [{"group": {"id": "p2"}, "description": ""}],
        },
    ]));

    let edit = BulkEdit::new(EntityKind::Group, &groups);
    assert_eq!(
        edit.relation("tag_ids").unwrap().existing(),
        &Aggregate::Concrete(vec!["t1".to_string()])
    );
    assert!(edit.described_relation("containing_groups").unwrap().existing().is_mixed());
}

#[test]
fn test_containing_group_descriptions_are_compared() {
    // Same parent, different descriptions: mixed, never collapsed to the id
    let groups = entities(json!([
        {"id": "g1", "containing_groups": [{"group": {"id": "p1"}, "description": "part 1"}]},
        {"id": "g2", "containing_groups": [{"group": {"id": "p1"}, "description": "part 2"}]},
    ]));

    let mut edit = BulkEdit::new(EntityKind::Group, &groups);
    let field = edit.described_relation_mut("containing_groups").unwrap();
    assert!(field.existing().is_mixed());

    field.set_mode(BulkUpdateMode::Set);
    assert!(field.ids().is_empty());

    let input = edit.build();
    assert!(input.is_noop());
    let json = serde_json::to_value(&input).unwrap();
    assert!(json.get("containing_groups").is_none());
    assert!(json.get("containing_group_ids").is_none());
}

#[test]
fn test_shared_containing_groups_keep_descriptions() {
    let groups = entities(json!([
        {"id": "g1", "containing_groups": [
            {"group": {"id": "p2"}, "description": "b"},
            {"group": {"id": "p1"}, "description": "a"},
        ]},
        {"id": "g2", "containing_groups": [
            {"group": {"id": "p1"}, "description": "a"},
            {"group": {"id": "p2"}, "description": "b"},
        ]},
    ]));

    let mut edit = BulkEdit::new(EntityKind::Group, &groups);
    let field = edit.described_relation_mut("containing_groups").unwrap();
    field.set_mode(BulkUpdateMode::Set);
    field.push(GroupDescription {
        group_id: "p3".to_string(),
        description: None,
    });

    let json = serde_json::to_value(edit.build()).unwrap();
    assert_eq!(
        json["containing_groups"],
        json!({
            "mode": "SET",
            "groups": [
                {"group_id": "p1", "description": "a"},
                {"group_id": "p2", "description": "b"},
                {"group_id": "p3"},
            ],
        })
    );
}

#[test]
fn test_performer_alias_list_is_order_independent() {
    let performers = entities(json!([
        {"id": "1", "alias_list": ["B", "A"]},
        {"id": "2", "alias_list": ["A", "B"]},
    ]));

    let mut edit = BulkEdit::new(EntityKind::Performer, &performers);
    let aliases = edit.relation_mut("alias_list").unwrap();
    aliases.set_mode(BulkUpdateMode::Set);
    assert_eq!(aliases.ids(), &["A".to_string(), "B".to_string()]);

    // Unchanged Set buffer re-sends the shared list
    let input = edit.build();
    let update = input.relations.get("alias_list").unwrap();
    assert_eq!(update.ids, vec!["A".to_string(), "B".to_string()]);
}

#[test]
fn test_empty_selection_produces_noop_payload() {
    for kind in EntityKind::ALL {
        let input = BulkEdit::new(kind, &[]).build();
        assert!(input.ids.is_empty());
        assert!(input.is_noop(), "{:?} produced {:?}", kind, input);
    }
}
