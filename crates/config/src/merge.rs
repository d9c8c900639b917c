use super::*;

/// Top-level key whose value is handed to [`BundlerMerge`] instead of the generic merge.
pub const BUNDLER_KEY: &str = "vite";

/// Merge `overrides` on top of `base`, producing a new mapping.
///
/// For every key in `overrides`:
/// - null never erases what `base` already holds
/// - two sequences concatenate, `base` elements first
/// - two mappings merge recursively, except the root-level [`BUNDLER_KEY`] which goes through
///   `bundler`
/// - anything else replaces the `base` value
///
/// Keys only present in `base` are kept as-is.
pub fn merge_config(
    base: &Mapping,
    overrides: &Mapping,
    is_root: bool,
    bundler: &dyn BundlerMerge,
) -> Mapping {
    let mut merged = base.clone();
    for (key, value) in overrides {
        if value.is_null() {
            continue;
        }

        let value = match (merged.get(key), value) {
            (Some(Value::Sequence(existing)), Value::Sequence(value)) => {
                let mut joined = existing.clone();
                joined.extend(value.iter().cloned());
                Value::Sequence(joined)
            }
            (Some(Value::Mapping(existing)), Value::Mapping(value)) => {
                if is_root && key.as_str() == Some(BUNDLER_KEY) {
                    log::trace!("Merging `{BUNDLER_KEY}` with the bundler merge");
                    Value::Mapping(bundler.merge_bundler(existing, value))
                } else {
                    Value::Mapping(merge_config(existing, value, false, bundler))
                }
            }
            _ => value.clone(),
        };
        merged.insert(key.clone(), value);
    }
    merged
}
