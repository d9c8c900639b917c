use std::path;

use futures::FutureExt as _;
use futures::future::BoxFuture;

use super::*;

/// Key naming the configuration a source is based on.
pub const EXTENDS_KEY: &str = "extends";

/// `extends` is not checked for cycles; a chain this long is assumed to be one.
const MAX_EXTENDS_DEPTH: usize = 64;

/// Collapses a configuration and everything it `extends` into one [`UserConfig`].
///
/// `extends` may be
/// - a path, resolved relative to the directory of the source declaring it and fetched through
///   the [`ModuleLoader`]
/// - an inline mapping
///
/// Each level is merged over its base with [`merge_config`] at the root level.
pub struct ExtendsResolver<'a> {
    loader: &'a dyn ModuleLoader,
    bundler: &'a dyn BundlerMerge,
}

impl<'a> ExtendsResolver<'a> {
    pub fn new(loader: &'a dyn ModuleLoader, bundler: &'a dyn BundlerMerge) -> Self {
        Self { loader, bundler }
    }

    /// `origin` is the directory relative `extends` paths in `raw` are resolved against.
    pub async fn resolve(&self, raw: RawConfigExport, origin: &path::Path) -> Result<UserConfig> {
        let merged = self.resolve_mapping(raw, origin.to_owned(), 0).await?;
        UserConfig::from_mapping(merged)
    }

    fn resolve_mapping(
        &self,
        raw: RawConfigExport,
        origin: path::PathBuf,
        depth: usize,
    ) -> BoxFuture<'_, Result<Mapping>> {
        async move {
            let resolved = raw.resolve().await?;
            let extends = match resolved.get(EXTENDS_KEY) {
                None | Some(Value::Null) => return Ok(resolved),
                Some(extends) => extends.clone(),
            };

            if MAX_EXTENDS_DEPTH <= depth {
                return Err(Status::new("`extends` chain is too deep, is it cyclic?")
                    .context_with(|c| c.insert("Origin", origin.display().to_string())));
            }

            let (base, base_origin) = match extends {
                Value::String(base_path) => {
                    let base_path = normalize_path(&origin.join(base_path));
                    log::debug!("Extending config at {}", base_path.display());
                    self.loader.invalidate(&base_path);
                    let base = self.loader.load(&base_path).await?;
                    let base_origin = base_path
                        .parent()
                        .map(path::Path::to_path_buf)
                        .unwrap_or_else(|| origin.clone());
                    (base, base_origin)
                }
                Value::Mapping(base) => {
                    log::trace!("Extending inline config");
                    (RawConfigExport::from(base), origin)
                }
                other => {
                    return Err(Status::new("Invalid `extends`, expected a path or a mapping")
                        .context_with(|c| c.insert("Found", crate::export::kind_of(&other))));
                }
            };

            let base = self.resolve_mapping(base, base_origin, depth + 1).await?;
            Ok(merge_config(&base, &resolved, true, self.bundler))
        }
        .boxed()
    }
}
