//! Configuration layering
//!
//! Layers are merged in order (built-in defaults, then each config file,
//! then inline overrides):
//! - Objects: deep-merge by key
//! - Arrays: REPLACE (a rule list is never concatenated)
//! - Scalars: override (last wins)

use serde_json::Value;

/// Deep merge two raw configuration values.
///
/// `null` in the overlay replaces the base value, so it reaches the
/// validator instead of silently falling back to a default.
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            // Merge in place so existing keys keep their declaration position.
            for (key, overlay_value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(slot) => {
                        let base_value = slot.take();
                        *slot = deep_merge(base_value, overlay_value);
                    }
                    None => {
                        base_map.insert(key, overlay_value);
                    }
                }
            }
            Value::Object(base_map)
        }

        (_, overlay) => overlay,
    }
}

/// Merge layers in order (first is base, last has highest precedence)
pub fn merge_layers(layers: impl IntoIterator<Item = Value>) -> Value {
    layers.into_iter().fold(Value::Null, deep_merge)
}
