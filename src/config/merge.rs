//! Value-level merge policy for configurations and model overrides.
//!
//! One policy is used everywhere a partial document overlays a base
//! document: stage resolution, plugin-config collapse, model override
//! layering, and artifact reconciliation. Objects merge recursively,
//! scalars overwrite (overlay wins), and arrays concatenate base-then-
//! overlay. Array concatenation is what lets a stage *add* locales or
//! plugins without repeating the base list.
//!
//! The merge is depth-first and not commutative: `merge(a, b)` and
//! `merge(b, a)` differ whenever both sides set the same scalar. Only one
//! overlay is ever applied per invocation, so the asymmetry is not
//! observable in normal operation.

use serde_json::Value;

/// Merge `overlay` onto `base`, returning the combined value.
///
/// - object + object: keys merge recursively
/// - array + array: `base` elements followed by `overlay` elements
/// - anything else: `overlay` replaces `base`
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                match base_map.remove(&key) {
                    Some(base_value) => {
                        base_map.insert(key, deep_merge(base_value, overlay_value));
                    }
                    None => {
                        base_map.insert(key, overlay_value);
                    }
                }
            }
            Value::Object(base_map)
        }
        (Value::Array(mut base_items), Value::Array(overlay_items)) => {
            base_items.extend(overlay_items);
            Value::Array(base_items)
        }
        (_, overlay) => overlay,
    }
}

/// Merge `overlay` onto `base` in place.
pub fn deep_merge_into(base: &mut Value, overlay: Value) {
    let current = std::mem::replace(base, Value::Null);
    *base = deep_merge(current, overlay);
}
