//! swx-config
//!
//! Layered YAML configuration for StageWatch: audit thresholds plus the
//! static pre-schedule table. Documents merge in order (later overrides
//! earlier) and the effective config is hashed over canonical JSON so a
//! report's provenance can be pinned to an exact configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

use swx_engine::{Schedule, ScheduleSlot, Thresholds};

/// One venue's schedule declaration as written in YAML.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntryConfig {
    pub venue: String,
    #[serde(default)]
    pub slots: Vec<SlotConfig>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SlotConfig {
    pub item: String,
    pub time: String,
    #[serde(default)]
    pub code: Option<String>,
}

/// Effective typed configuration after layering.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub schedule: Vec<ScheduleEntryConfig>,
}

impl AppConfig {
    /// Build the engine's schedule map. Duplicate venue entries merge by
    /// appending slots in declaration order.
    pub fn build_schedule(&self) -> Schedule {
        let mut schedule = Schedule::new();
        for entry in &self.schedule {
            for slot in &entry.slots {
                let mut s = ScheduleSlot::new(slot.item.clone(), slot.time.clone());
                s.code = slot.code.clone();
                schedule.add_slot(entry.venue.clone(), s);
            }
        }
        schedule
    }
}

/// Layered config plus its provenance hash.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config_hash: String,
    pub canonical_json: String,
    pub config: AppConfig,
}

/// Read and merge YAML documents from disk, in merge order.
pub fn load_layered_yaml(paths: &[impl AsRef<Path>]) -> Result<LoadedConfig> {
    let mut docs: Vec<String> = Vec::new();
    for p in paths {
        let p = p.as_ref();
        let raw =
            fs::read_to_string(p).with_context(|| format!("failed to read yaml path: {p:?}"))?;
        docs.push(raw);
    }
    let doc_refs: Vec<&str> = docs.iter().map(|s| s.as_str()).collect();
    load_layered_yaml_from_strings(&doc_refs)
}

/// Merge YAML documents in order: earlier docs are base, later docs override.
pub fn load_layered_yaml_from_strings(yaml_docs: &[&str]) -> Result<LoadedConfig> {
    let mut merged = serde_json::json!({});
    for raw in yaml_docs {
        let v_yaml: serde_yaml::Value = serde_yaml::from_str(raw).context("invalid yaml")?;
        let v_json = serde_json::to_value(v_yaml).context("yaml->json conversion failed")?;
        merged = deep_merge(merged, v_json);
    }

    let canonical_json = canonicalize_json(&merged)?;
    let config_hash = sha256_hex(canonical_json.as_bytes());
    let config: AppConfig =
        serde_json::from_value(merged).context("effective config has unexpected shape")?;

    tracing::debug!(
        config_hash = %config_hash,
        venues = config.schedule.len(),
        "layered config loaded"
    );

    Ok(LoadedConfig {
        config_hash,
        canonical_json,
        config,
    })
}

fn deep_merge(a: Value, b: Value) -> Value {
    match (a, b) {
        (Value::Object(mut a_map), Value::Object(b_map)) => {
            for (k, b_val) in b_map {
                let a_val = a_map.remove(&k).unwrap_or(Value::Null);
                a_map.insert(k, deep_merge(a_val, b_val));
            }
            Value::Object(a_map)
        }
        (_, b_other) => b_other,
    }
}

/// Canonicalize by sorting object keys recursively and emitting compact
/// JSON, so the hash is independent of YAML key ordering.
fn canonicalize_json(v: &Value) -> Result<String> {
    let sorted = sort_keys(v);
    serde_json::to_string(&sorted).context("canonical json serialize failed")
}

fn sort_keys(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut keys: Vec<_> = map.keys().cloned().collect();
            keys.sort();
            let mut new = serde_json::Map::new();
            for k in keys {
                new.insert(k.clone(), sort_keys(&map[&k]));
            }
            Value::Object(new)
        }
        Value::Array(arr) => Value::Array(arr.iter().map(sort_keys).collect()),
        _ => v.clone(),
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
