//! Bulk-editable fields per entity kind
//!
//! Each kind lists the scalar fields a bulk edit dialog seeds from the
//! selection, and the relation lists it edits with Set/Add/Remove.
//! Field specs map the name used in the update payload to where the value
//! lives in the entity snapshot (`studio_id` comes from `studio.id`).
//! Containing groups carry a description per link and are edited as whole
//! records rather than bare ids.

use crate::aggregate::{lookup, Entity};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A scalar field: payload name and dotted source path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub path: &'static str,
}

/// A relation list field
///
/// `source` is the list inside the entity, `id_path` the dotted path of the
/// id inside each element. An empty `id_path` means the elements are the
/// values themselves (alias lists).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationSpec {
    pub name: &'static str,
    pub source: &'static str,
    pub id_path: &'static str,
}

/// A relation whose elements carry a description next to the id
///
/// Elements are read as `{<id_path>, description}` and compared whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescribedRelationSpec {
    pub name: &'static str,
    pub source: &'static str,
    pub id_path: &'static str,
}

/// One containing group link, as sent in a bulk update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDescription {
    pub group_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

const fn field(name: &'static str) -> FieldSpec {
    FieldSpec { name, path: name }
}

const fn nested(name: &'static str, path: &'static str) -> FieldSpec {
    FieldSpec { name, path }
}

const fn relation(name: &'static str, source: &'static str, id_path: &'static str) -> RelationSpec {
    RelationSpec { name, source, id_path }
}

const SCENE_FIELDS: &[FieldSpec] = &[
    field("rating100"),
    nested("studio_id", "studio.id"),
    field("organized"),
];

const SCENE_RELATIONS: &[RelationSpec] = &[
    relation("performer_ids", "performers", "id"),
    relation("tag_ids", "tags", "id"),
    relation("movie_ids", "movies", "movie.id"),
    relation("gallery_ids", "galleries", "id"),
];

const IMAGE_FIELDS: &[FieldSpec] = &[
    field("rating100"),
    nested("studio_id", "studio.id"),
    field("organized"),
];

const IMAGE_RELATIONS: &[RelationSpec] = &[
    relation("performer_ids", "performers", "id"),
    relation("tag_ids", "tags", "id"),
    relation("gallery_ids", "galleries", "id"),
];

const GALLERY_FIELDS: &[FieldSpec] = &[
    field("rating100"),
    nested("studio_id", "studio.id"),
    field("organized"),
];

const GALLERY_RELATIONS: &[RelationSpec] = &[
    relation("performer_ids", "performers", "id"),
    relation("tag_ids", "tags", "id"),
];

const PERFORMER_FIELDS: &[FieldSpec] = &[
    field("favorite"),
    field("disambiguation"),
    field("url"),
    field("instagram"),
    field("twitter"),
    field("rating100"),
    field("gender"),
    field("birthdate"),
    field("death_date"),
    field("career_length"),
    field("country"),
    field("ethnicity"),
    field("eye_color"),
    field("height_cm"),
    field("weight"),
    field("measurements"),
    field("fake_tits"),
    field("penis_length"),
    field("circumcised"),
    field("hair_color"),
    field("tattoos"),
    field("piercings"),
    field("ignore_auto_tag"),
];

const PERFORMER_RELATIONS: &[RelationSpec] = &[
    relation("tag_ids", "tags", "id"),
    relation("alias_list", "alias_list", ""),
];

const STUDIO_FIELDS: &[FieldSpec] = &[
    field("favorite"),
    field("rating100"),
    field("details"),
    field("ignore_auto_tag"),
    nested("parent_id", "parent_studio.id"),
];

const STUDIO_RELATIONS: &[RelationSpec] = &[relation("tag_ids", "tags", "id")];

const GROUP_FIELDS: &[FieldSpec] = &[
    field("rating100"),
    nested("studio_id", "studio.id"),
    field("director"),
];

const GROUP_RELATIONS: &[RelationSpec] = &[relation("tag_ids", "tags", "id")];

const GROUP_DESCRIBED_RELATIONS: &[DescribedRelationSpec] = &[DescribedRelationSpec {
    name: "containing_groups",
    source: "containing_groups",
    id_path: "group.id",
}];

const TAG_FIELDS: &[FieldSpec] = &[field("favorite"), field("ignore_auto_tag")];

const TAG_RELATIONS: &[RelationSpec] = &[
    relation("parent_ids", "parents", "id"),
    relation("child_ids", "children", "id"),
];

/// Library entity kinds that support bulk editing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Scene,
    Image,
    Gallery,
    Performer,
    Studio,
    Group,
    Tag,
}

impl EntityKind {
    pub const ALL: [EntityKind; 7] = [
        EntityKind::Scene,
        EntityKind::Image,
        EntityKind::Gallery,
        EntityKind::Performer,
        EntityKind::Studio,
        EntityKind::Group,
        EntityKind::Tag,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Scene => "scene",
            EntityKind::Image => "image",
            EntityKind::Gallery => "gallery",
            EntityKind::Performer => "performer",
            EntityKind::Studio => "studio",
            EntityKind::Group => "group",
            EntityKind::Tag => "tag",
        }
    }

    /// Scalar fields seeded from the selection
    pub fn scalar_fields(&self) -> &'static [FieldSpec] {
        match self {
            EntityKind::Scene => SCENE_FIELDS,
            EntityKind::Image => IMAGE_FIELDS,
            EntityKind::Gallery => GALLERY_FIELDS,
            EntityKind::Performer => PERFORMER_FIELDS,
            EntityKind::Studio => STUDIO_FIELDS,
            EntityKind::Group => GROUP_FIELDS,
            EntityKind::Tag => TAG_FIELDS,
        }
    }

    /// Relation lists edited with Set/Add/Remove
    pub fn relations(&self) -> &'static [RelationSpec] {
        match self {
            EntityKind::Scene => SCENE_RELATIONS,
            EntityKind::Image => IMAGE_RELATIONS,
            EntityKind::Gallery => GALLERY_RELATIONS,
            EntityKind::Performer => PERFORMER_RELATIONS,
            EntityKind::Studio => STUDIO_RELATIONS,
            EntityKind::Group => GROUP_RELATIONS,
            EntityKind::Tag => TAG_RELATIONS,
        }
    }

    pub fn relation(&self, name: &str) -> Option<&'static RelationSpec> {
        self.relations().iter().find(|r| r.name == name)
    }

    /// Relations edited as `{id, description}` records
    pub fn described_relations(&self) -> &'static [DescribedRelationSpec] {
        match self {
            EntityKind::Group => GROUP_DESCRIBED_RELATIONS,
            _ => &[],
        }
    }

    pub fn described_relation(&self, name: &str) -> Option<&'static DescribedRelationSpec> {
        self.described_relations().iter().find(|r| r.name == name)
    }
}

impl std::str::FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::ALL
            .iter()
            .copied()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown entity kind: {}", s))
    }
}

impl RelationSpec {
    /// Ids of this relation on one entity, in backend order
    ///
    /// A missing list, a non-list value, or elements without an id all
    /// contribute nothing.
    pub fn ids(&self, entity: &Entity) -> Vec<String> {
        let Some(Value::Array(items)) = lookup(entity, self.source) else {
            return Vec::new();
        };

        items
            .iter()
            .filter_map(|item| {
                if self.id_path.is_empty() {
                    value_as_id(item)
                } else {
                    item.as_object()
                        .and_then(|obj| lookup(obj, self.id_path))
                        .and_then(value_as_id)
                }
            })
            .collect()
    }
}

impl DescribedRelationSpec {
    /// Records of this relation on one entity, in backend order
    ///
    /// Elements without an id are skipped; a missing or non-string
    /// description is `None`.
    pub fn entries(&self, entity: &Entity) -> Vec<GroupDescription> {
        let Some(Value::Array(items)) = lookup(entity, self.source) else {
            return Vec::new();
        };

        items
            .iter()
            .filter_map(Value::as_object)
            .filter_map(|obj| {
                let group_id = lookup(obj, self.id_path).and_then(value_as_id)?;
                let description = obj
                    .get("description")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                Some(GroupDescription { group_id, description })
            })
            .collect()
    }
}

/// Entity id as a string; GraphQL ids arrive as strings but numbers are tolerated
pub fn entity_id(entity: &Entity) -> Option<String> {
    entity.get("id").and_then(value_as_id)
}

fn value_as_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
