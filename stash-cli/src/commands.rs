//! Command implementations
//!
//! Each command takes already-parsed input and returns the value to print,
//! so they can be exercised without touching stdin/stdout.

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use stash_bulk::{
    aggregate, Aggregate, BulkEdit, BulkUpdateInput, BulkUpdateMode, Entity, EntityKind, GroupDescription,
};
use stash_common::{MatchThresholds, ParseMode, TomlConfig};
use stash_tagger::{
    duration_status, phash_matches, prepare_query_string, rank, Blacklist, Candidate,
    DurationStatus, LocalScene, PhashMatch, RankedCandidate,
};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Read JSON from a file, or from stdin when `path` is `-`
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?
    };

    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}

#[derive(Debug, Deserialize)]
pub struct RankRequest {
    pub scene: LocalScene,
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// One line of `rank` output
#[derive(Debug, Serialize)]
pub struct RankedEntry {
    #[serde(flatten)]
    pub ranked: RankedCandidate,
    pub phash_matches: Vec<PhashMatch>,
    pub duration_status: DurationStatus,
}

pub fn rank_command(request: &RankRequest, thresholds: &MatchThresholds) -> Vec<RankedEntry> {
    let local_duration = request.scene.duration();

    rank(&request.scene, &request.candidates, thresholds)
        .into_iter()
        .map(|ranked| RankedEntry {
            phash_matches: phash_matches(&request.scene, &ranked.candidate, thresholds),
            duration_status: duration_status(&ranked.candidate, local_duration, thresholds),
            ranked,
        })
        .collect()
}

fn aggregate_to_json(aggregate: Aggregate<Value>) -> Value {
    match aggregate {
        Aggregate::Concrete(v) => json!({ "value": v }),
        Aggregate::Mixed => json!({ "mixed": true }),
    }
}

/// Aggregate a selection
///
/// With explicit `fields`, each (dotted) field is reduced as-is and a field
/// missing from every entity reports `{"absent": true}`. Otherwise the
/// kind's bulk-editable scalar fields and relations are reported the way a
/// bulk edit form would be seeded.
pub fn aggregate_command(kind: EntityKind, entities: &[Entity], fields: &[String]) -> Map<String, Value> {
    if !fields.is_empty() {
        return aggregate(entities, fields)
            .into_iter()
            .map(|(name, agg)| {
                let value = match agg {
                    Aggregate::Concrete(None) => json!({ "absent": true }),
                    Aggregate::Concrete(Some(v)) => aggregate_to_json(Aggregate::Concrete(v)),
                    Aggregate::Mixed => aggregate_to_json(Aggregate::Mixed),
                };
                (name, value)
            })
            .collect();
    }

    let edit = BulkEdit::new(kind, entities);
    let mut out = Map::new();

    for spec in kind.scalar_fields() {
        if let Some(agg) = edit.aggregate(spec.name) {
            out.insert(spec.name.to_string(), aggregate_to_json(agg.clone()));
        }
    }
    for spec in kind.relations() {
        if let Some(field) = edit.relation(spec.name) {
            let ids = field.existing().clone().map(|ids| json!(ids));
            out.insert(spec.name.to_string(), aggregate_to_json(ids));
        }
    }
    for spec in kind.described_relations() {
        if let Some(field) = edit.described_relation(spec.name) {
            let groups = field.existing().clone().map(|groups| json!(groups));
            out.insert(spec.name.to_string(), aggregate_to_json(groups));
        }
    }

    out
}

/// Requested change to one relation list
#[derive(Debug, Deserialize)]
pub struct RelationEdit {
    #[serde(default)]
    pub mode: BulkUpdateMode,
    /// Omitted: keep what the control was seeded with for `mode`
    pub ids: Option<Vec<String>>,
    /// Containing group records, in place of `ids`
    pub groups: Option<Vec<GroupDescription>>,
}

#[derive(Debug, Deserialize)]
pub struct BulkUpdateRequest {
    pub kind: EntityKind,
    pub entities: Vec<Entity>,
    /// Scalar edits; `null` clears the field on every record
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
    #[serde(default)]
    pub relations: BTreeMap<String, RelationEdit>,
}

/// Apply the requested edits to a fresh bulk edit and build its payload
pub fn bulk_update_command(request: BulkUpdateRequest) -> Result<BulkUpdateInput> {
    let mut edit = BulkEdit::new(request.kind, &request.entities);

    for (name, value) in request.fields {
        if !edit.set_field(&name, Some(value)) {
            bail!("{} has no bulk-editable field {:?}", request.kind.as_str(), name);
        }
    }

    for (name, change) in request.relations {
        if let Some(field) = edit.relation_mut(&name) {
            if change.groups.is_some() {
                bail!("{:?} takes ids, not groups", name);
            }
            field.set_mode(change.mode);
            if let Some(ids) = change.ids {
                field.set_ids(ids);
            }
        } else if let Some(field) = edit.described_relation_mut(&name) {
            if change.ids.is_some() {
                bail!("{:?} takes groups, not ids", name);
            }
            field.set_mode(change.mode);
            if let Some(groups) = change.groups {
                field.set_ids(groups);
            }
        } else {
            bail!("{} has no bulk-editable relation {:?}", request.kind.as_str(), name);
        }
    }

    let input = edit.build();
    if input.is_noop() {
        info!("Bulk edit changes nothing");
    }
    Ok(input)
}

pub fn query_command(scene: &LocalScene, mode: ParseMode, blacklist: &Blacklist) -> String {
    if blacklist.is_empty() {
        debug!("No blacklist patterns configured");
    }
    let query = prepare_query_string(scene, mode, blacklist);
    debug!(
        mode = mode.as_str(),
        patterns = blacklist.len(),
        query = %query,
        "Prepared query"
    );
    query
}

/// Effective configuration rendered as TOML
pub fn show_config(config: &TomlConfig) -> Result<String> {
    Ok(config.to_toml_string()?)
}

/// Write a default config file to `path`
pub fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    stash_common::config::write_toml_config(&TomlConfig::default(), path)?;
    Ok(())
}
