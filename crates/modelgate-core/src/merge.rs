// Structural config merging
//
// Three operations, all order-preserving and free of IO:
// - deep_merge: recursive object merge, override wins at leaves
// - resolve_extends: $extend inheritance between provider blocks
// - resolve_base_refs: $base splicing inside fallback target lists

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::document::FallbackRule;

const EXTEND_KEY: &str = "$extend";
const BASE_TOKEN: &str = "$base";

/// Recursively merge `overlay` into `base`. Keys present on both sides
/// recurse when both values are objects; otherwise the overlay value
/// replaces the base value wholesale, arrays included, with no element-wise
/// merging.
pub fn deep_merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                if let Some(slot) = base_map.get_mut(&key) {
                    if slot.is_object() && value.is_object() {
                        deep_merge(slot, value);
                        continue;
                    }
                }
                base_map.insert(key, value);
            }
        }
        (slot, value) => *slot = value,
    }
}

/// Resolve `$extend` inheritance between provider blocks.
///
/// Providers without the directive are copied as-is. A provider with
/// `$extend: "<name>"` is the named resolved provider deep-merged with its
/// own fields as overrides. Resolution iterates to a fixpoint: each round
/// resolves every provider whose parent is already resolved, so multi-hop
/// chains work regardless of declaration order. Providers left over when a
/// round makes no progress reference an unknown parent or sit on a cycle;
/// they are skipped with a logged error and the rest proceed.
///
/// `$extend: null` explicitly suppresses inheritance (the local-override
/// escape hatch); the directive key is stripped from every resolved block.
pub fn resolve_extends(providers: &Map<String, Value>) -> Map<String, Value> {
    let mut resolved = Map::new();
    let mut pending = Vec::new();

    for (name, config) in providers {
        match extend_parent(config) {
            Some(_) => pending.push((name, config)),
            None => {
                resolved.insert(name.clone(), strip_extend(config.clone()));
            }
        }
    }

    while !pending.is_empty() {
        let mut remaining = Vec::new();
        let mut progressed = false;

        for (name, config) in pending {
            let parent = extend_parent(config).unwrap_or_default();
            match resolved.get(parent) {
                Some(parent_config) => {
                    let mut merged = parent_config.clone();
                    deep_merge(&mut merged, config.clone());
                    resolved.insert(name.clone(), strip_extend(merged));
                    progressed = true;
                }
                None => remaining.push((name, config)),
            }
        }

        if !progressed {
            for (name, config) in &remaining {
                let parent = extend_parent(config).unwrap_or_default();
                tracing::error!(
                    provider = %name,
                    parent = %parent,
                    "provider extends an unknown or cyclic parent; skipping"
                );
            }
            break;
        }
        pending = remaining;
    }

    resolved
}

fn extend_parent(config: &Value) -> Option<&str> {
    match config.get(EXTEND_KEY)? {
        Value::String(name) if !name.is_empty() => Some(name),
        _ => None,
    }
}

fn strip_extend(mut config: Value) -> Value {
    if let Some(map) = config.as_object_mut() {
        map.remove(EXTEND_KEY);
    }
    config
}

/// Splice `"$base"` placeholder tokens in fallback target lists with the
/// base document's targets for the same source key (empty if the base has
/// none). Other entries pass through in place; nothing is deduplicated.
pub fn resolve_base_refs(
    fallbacks: &[FallbackRule],
    base_fallbacks: &[FallbackRule],
) -> Vec<FallbackRule> {
    let mut base_lookup: BTreeMap<&str, &[String]> = BTreeMap::new();
    for rule in base_fallbacks {
        for (key, targets) in rule.entries() {
            base_lookup.insert(key.as_str(), targets.as_slice());
        }
    }

    fallbacks
        .iter()
        .map(|rule| {
            let spliced = rule
                .entries()
                .map(|(key, targets)| {
                    let base_targets = base_lookup.get(key.as_str()).copied().unwrap_or(&[]);
                    let resolved = targets
                        .iter()
                        .flat_map(|target| {
                            if target == BASE_TOKEN {
                                base_targets.to_vec()
                            } else {
                                vec![target.clone()]
                            }
                        })
                        .collect();
                    (key.clone(), resolved)
                })
                .collect();
            FallbackRule(spliced)
        })
        .collect()
}
