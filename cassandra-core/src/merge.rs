//! Deep merge of nested configuration documents.
//!
//! Precedence is always "overlay wins":
//!
//! - mapping + mapping: merged key by key, recursively;
//! - anything else (scalars, sequences, `null`, or a type mismatch): the overlay value replaces
//!   the base value wholesale. Sequences are never concatenated.

use serde_yaml::Value;

/// Merge `overlay` into `base` in place.
pub fn deep_merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Mapping(base), Value::Mapping(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

/// Merge the given documents in order of increasing precedence.
///
/// Empty (`null`) documents are skipped, so an empty overrides file never erases its base.
pub fn deep_merge_all<I>(documents: I) -> Value
where
    I: IntoIterator<Item = Value>,
{
    documents
        .into_iter()
        .filter(|doc| !doc.is_null())
        .fold(Value::Mapping(Default::default()), |mut acc, doc| {
            deep_merge(&mut acc, doc);
            acc
        })
}
