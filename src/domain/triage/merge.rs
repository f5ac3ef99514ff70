//! Deep-merge for confirmed conversation facts.
//!
//! A classifier turn produces a partial object of newly confirmed values.
//! Merging is key-by-key and recursive for nested objects, so a later
//! partial update never drops sibling facts confirmed on earlier turns.

use serde_json::{Map, Value};

/// Merges `patch` into `base`, recursing into nested objects.
///
/// Rules:
/// - object-into-object merges recursively
/// - any other patch value overwrites the existing value
/// - `null` patch entries are ignored, so no previously confirmed key
///   can be deleted through a merge
pub fn deep_merge(base: &mut Map<String, Value>, patch: &Map<String, Value>) {
    for (key, patch_value) in patch {
        match patch_value {
            Value::Null => continue,
            Value::Object(patch_obj) => match base.get_mut(key) {
                Some(Value::Object(base_obj)) => deep_merge(base_obj, patch_obj),
                _ => {
                    base.insert(key.clone(), Value::Object(patch_obj.clone()));
                }
            },
            other => {
                base.insert(key.clone(), other.clone());
            }
        }
    }
}
