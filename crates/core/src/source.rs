use relative_path::RelativePathBuf;

use crate::Result;
use crate::Status;

/// Files under `root` matching the `include` globs and not matching any `ignore` line.
///
/// `include` uses glob syntax; `ignore` uses gitignore syntax relative to `root`.
#[derive(Debug, Clone)]
pub struct Source {
    root: std::path::PathBuf,
    include: ignore::overrides::Override,
    ignore: ignore::gitignore::Gitignore,
}

impl Source {
    pub fn new<'i, 'g>(
        root: &std::path::Path,
        include: impl IntoIterator<Item = &'g str>,
        ignores: impl IntoIterator<Item = &'i str>,
    ) -> Result<Self> {
        let mut overrides = ignore::overrides::OverrideBuilder::new(root);
        for glob in include.into_iter() {
            overrides.add(glob).map_err(|e| {
                Status::new("Invalid include pattern")
                    .with_source(e)
                    .context_with(|c| c.insert("Pattern", glob.to_owned()))
            })?;
        }
        let include = overrides
            .build()
            .map_err(|e| Status::new("Invalid include pattern").with_source(e))?;

        let mut ignore = ignore::gitignore::GitignoreBuilder::new(root);
        for line in ignores.into_iter() {
            ignore.add_line(None, line).map_err(|e| {
                Status::new("Invalid ignore entry")
                    .with_source(e)
                    .context_with(|c| c.insert("Pattern", line.to_owned()))
            })?;
        }
        let ignore = ignore
            .build()
            .map_err(|e| Status::new("Invalid ignore entry").with_source(e))?;

        let source = Self {
            root: root.to_owned(),
            include,
            ignore,
        };
        Ok(source)
    }

    pub fn includes_file(&self, file: &std::path::Path) -> bool {
        let is_dir = false;
        self.includes_path(file, is_dir) && self.matches_include(file)
    }

    pub fn includes_dir(&self, dir: &std::path::Path) -> bool {
        let is_dir = true;
        self.includes_path(dir, is_dir)
    }

    /// Matching files, relative to `root`, in file-name order.
    pub fn iter(&self) -> impl Iterator<Item = RelativePathBuf> + '_ {
        walkdir::WalkDir::new(&self.root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |e| self.includes_entry(e))
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(move |e| self.matches_include(e.path()))
            .filter_map(move |e| {
                let rel_path = e.path().strip_prefix(&self.root).ok()?;
                RelativePathBuf::from_path(rel_path).ok()
            })
    }

    fn matches_include(&self, file: &std::path::Path) -> bool {
        match self.include.matched(file, false) {
            ignore::Match::Whitelist(_) => true,
            ignore::Match::None | ignore::Match::Ignore(_) => {
                log::trace!("{file:?}: not a page");
                false
            }
        }
    }

    fn includes_path(&self, path: &std::path::Path, is_dir: bool) -> bool {
        if path == self.root {
            return true;
        }

        let parent = path.parent();
        if let Some(parent) = parent {
            if parent.starts_with(&self.root) && !self.includes_path(parent, true) {
                return false;
            }
        }

        self.includes_path_leaf(path, is_dir)
    }

    fn includes_path_leaf(&self, path: &std::path::Path, is_dir: bool) -> bool {
        match self.ignore.matched(path, is_dir) {
            ignore::Match::None => true,
            ignore::Match::Ignore(glob) => {
                log::trace!("{:?}: ignored {:?}", path, glob.original());
                false
            }
            ignore::Match::Whitelist(glob) => {
                log::trace!("{:?}: allowed {:?}", path, glob.original());
                true
            }
        }
    }

    fn includes_entry(&self, entry: &walkdir::DirEntry) -> bool {
        let file = entry.path();

        // Assumption: The parent paths will have been checked before we even get to this point.
        let is_dir = entry.file_type().is_dir();
        self.includes_path_leaf(file, is_dir)
    }
}
