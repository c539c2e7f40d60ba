//! Deep merge for configuration layers.

use serde_json::{Map, Value};

/// Merge `layer` into `base` in place.
///
/// Nested objects merge recursively; scalars and arrays at any depth are
/// replaced wholesale by the higher-priority layer, never concatenated.
pub fn deep_merge(base: &mut Value, layer: &Value) {
    match (base, layer) {
        (Value::Object(base_map), Value::Object(layer_map)) => {
            for (key, layer_val) in layer_map {
                match base_map.get_mut(key) {
                    Some(base_val) if base_val.is_object() && layer_val.is_object() => {
                        deep_merge(base_val, layer_val);
                    }
                    _ => {
                        base_map.insert(key.clone(), layer_val.clone());
                    }
                }
            }
        }
        (base_slot, layer_val) => {
            *base_slot = layer_val.clone();
        }
    }
}

/// Insert a value at a nested path, creating intermediate objects.
/// Non-object intermediates are replaced by objects.
pub fn insert_path(tree: &mut Value, path: &[String], value: Value) {
    let Some((leaf, parents)) = path.split_last() else {
        return;
    };
    let mut cur = tree;
    for key in parents {
        if !cur.is_object() {
            *cur = Value::Object(Map::new());
        }
        let Value::Object(map) = cur else { return };
        cur = map
            .entry(key.clone())
            .or_insert_with(|| Value::Object(Map::new()));
    }
    if !cur.is_object() {
        *cur = Value::Object(Map::new());
    }
    if let Value::Object(map) = cur {
        map.insert(leaf.clone(), value);
    }
}
