use relative_path::RelativePathBuf;

use crate::Result;
use crate::Source;

/// Filesystem lookups needed to resolve a site.
#[async_trait::async_trait]
pub trait Filesystem: Send + Sync {
    async fn exists(&self, path: &std::path::Path) -> bool;

    /// Files under `cwd` matching `patterns` and none of the `ignore` globs, relative to `cwd`
    /// and sorted by path.
    ///
    /// Both are globs relative to `cwd`. Hidden files and directories never match.
    async fn glob_files(
        &self,
        patterns: &[&str],
        cwd: &std::path::Path,
        ignore: &[&str],
    ) -> Result<Vec<RelativePathBuf>>;
}

/// [`Filesystem`] backed by the local disk.
#[derive(Copy, Clone, Debug, Default)]
pub struct DiskFs;

#[async_trait::async_trait]
impl Filesystem for DiskFs {
    async fn exists(&self, path: &std::path::Path) -> bool {
        path.exists()
    }

    async fn glob_files(
        &self,
        patterns: &[&str],
        cwd: &std::path::Path,
        ignore: &[&str],
    ) -> Result<Vec<RelativePathBuf>> {
        let ignore: Vec<_> = ignore.iter().map(|glob| anchored(glob)).collect();
        let ignore = std::iter::once(HIDDEN).chain(ignore.iter().map(|glob| &**glob));
        let source = Source::new(cwd, patterns.iter().copied(), ignore)?;
        let mut files: Vec<_> = source.iter().collect();
        files.sort();
        log::trace!("Found {} files under {}", files.len(), cwd.display());
        Ok(files)
    }
}

const HIDDEN: &str = ".*";

/// Pin `glob` to the walk root; a gitignore line without an inner `/` matches at any depth.
fn anchored(glob: &str) -> std::borrow::Cow<'_, str> {
    let glob = glob.strip_prefix("./").unwrap_or(glob);
    if glob.starts_with('/') || glob.trim_end_matches('/').contains('/') {
        std::borrow::Cow::Borrowed(glob)
    } else {
        std::borrow::Cow::Owned(format!("/{glob}"))
    }
}
