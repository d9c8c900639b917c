use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

/// Lexically drop `.` and fold `..` into the preceding component, without touching the
/// filesystem.
///
/// Leading `..` of a relative path are kept.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir
                if matches!(normalized.components().next_back(), Some(Component::Normal(_))) =>
            {
                normalized.pop();
            }
            // `/..` is `/`
            Component::ParentDir if normalized.has_root() => {}
            component => normalized.push(component),
        }
    }
    normalized
}
