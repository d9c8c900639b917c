use super::*;

/// Merges the bundler configuration held under [`BUNDLER_KEY`].
///
/// Only consulted for the root-level key; nested keys of the same name merge generically.
pub trait BundlerMerge: Send + Sync {
    fn merge_bundler(&self, base: &Mapping, overrides: &Mapping) -> Mapping;
}

/// Vite's `mergeConfig` rules.
///
/// Differs from [`merge_config`] in that a sequence on *either* side concatenates (scalars are
/// wrapped), aliases can be given as a table or a list, and `ssr.noExternal: true` is sticky.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ViteMerge;

impl BundlerMerge for ViteMerge {
    fn merge_bundler(&self, base: &Mapping, overrides: &Mapping) -> Mapping {
        merge_recursively(base, overrides, "")
    }
}

fn merge_recursively(base: &Mapping, overrides: &Mapping, root_path: &str) -> Mapping {
    let mut merged = base.clone();
    for (key, value) in overrides {
        if value.is_null() {
            continue;
        }
        let Some(existing) = merged.get(key).filter(|e| !e.is_null()).cloned() else {
            merged.insert(key.clone(), value.clone());
            continue;
        };

        let name = key.as_str().unwrap_or_default();
        let value = if name == "alias" && (root_path == "resolve" || root_path.is_empty()) {
            merge_alias(&existing, value)
        } else if name == "assetsInclude" && root_path.is_empty() {
            concat(&existing, value)
        } else if name == "noExternal"
            && root_path == "ssr"
            && (is_true(&existing) || is_true(value))
        {
            Value::Bool(true)
        } else if existing.is_sequence() || value.is_sequence() {
            concat(&existing, value)
        } else if let (Value::Mapping(existing), Value::Mapping(value)) = (&existing, value) {
            let path = if root_path.is_empty() {
                name.to_owned()
            } else {
                format!("{root_path}.{name}")
            };
            Value::Mapping(merge_recursively(existing, value, &path))
        } else {
            value.clone()
        };
        merged.insert(key.clone(), value);
    }
    merged
}

/// Table-over-table is a plain override; any list form puts the overriding entries first so
/// they win the bundler's first-match lookup.
fn merge_alias(existing: &Value, value: &Value) -> Value {
    if let (Value::Mapping(existing), Value::Mapping(value)) = (existing, value) {
        let mut merged = existing.clone();
        for (find, replacement) in value {
            merged.insert(find.clone(), replacement.clone());
        }
        return Value::Mapping(merged);
    }

    let mut merged = normalize_alias(value);
    merged.extend(normalize_alias(existing));
    Value::Sequence(merged)
}

fn normalize_alias(alias: &Value) -> Vec<Value> {
    match alias {
        Value::Sequence(entries) => entries.clone(),
        Value::Mapping(table) => table
            .iter()
            .map(|(find, replacement)| {
                let mut entry = Mapping::new();
                entry.insert("find".into(), find.clone());
                entry.insert("replacement".into(), replacement.clone());
                Value::Mapping(entry)
            })
            .collect(),
        other => vec![other.clone()],
    }
}

fn concat(existing: &Value, value: &Value) -> Value {
    let mut joined = arraify(existing);
    joined.extend(arraify(value));
    Value::Sequence(joined)
}

fn arraify(value: &Value) -> Vec<Value> {
    match value {
        Value::Sequence(items) => items.clone(),
        other => vec![other.clone()],
    }
}

fn is_true(value: &Value) -> bool {
    value.as_bool() == Some(true)
}
