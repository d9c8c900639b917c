use std::path;

use anyhow::Context as _;
use vitepress_config::BundlerMerge;
use vitepress_config::ExtendsResolver;
use vitepress_config::FileLoader;
use vitepress_config::ModuleLoader;
use vitepress_config::RawConfigExport;
use vitepress_config::UserConfig;
use vitepress_config::ViteMerge;
use vitepress_core::DiskFs;
use vitepress_core::Filesystem;

use crate::alias::AppPaths;
use crate::alias::resolve_aliases;
use crate::error::Result;
use crate::site_config;
use crate::site_config::SiteConfig;
use crate::site_data::SiteData;
use crate::warning::LogWarnings;
use crate::warning::WarningSink;

pub const PAGE_PATTERN: &str = "**/*.md";
pub const DEFAULT_SRC_EXCLUDE: &str = "**/node_modules";

/// Resolves a site root into its [`UserConfig`], [`SiteData`] and [`SiteConfig`].
///
/// Defaults to reading from disk; each collaborator can be swapped out with the `with_*`
/// methods.
pub struct Resolver {
    app: AppPaths,
    loader: Box<dyn ModuleLoader>,
    fs: Box<dyn Filesystem>,
    bundler: Box<dyn BundlerMerge>,
    warnings: Box<dyn WarningSink>,
}

impl Resolver {
    pub fn new(app: AppPaths) -> Self {
        Self {
            app,
            loader: Box::new(FileLoader::new()),
            fs: Box::new(DiskFs),
            bundler: Box::new(ViteMerge),
            warnings: Box::new(LogWarnings),
        }
    }

    pub fn with_loader(mut self, loader: impl ModuleLoader + 'static) -> Self {
        self.loader = Box::new(loader);
        self
    }

    pub fn with_fs(mut self, fs: impl Filesystem + 'static) -> Self {
        self.fs = Box::new(fs);
        self
    }

    pub fn with_bundler(mut self, bundler: impl BundlerMerge + 'static) -> Self {
        self.bundler = Box::new(bundler);
        self
    }

    pub fn with_warnings(mut self, warnings: impl WarningSink + 'static) -> Self {
        self.warnings = Box::new(warnings);
        self
    }

    /// Load `<root>/.vitepress/config.yml` with its `extends` chain collapsed.
    ///
    /// A missing file is an empty configuration.
    pub async fn load_user_config(&self, root: &path::Path) -> Result<UserConfig> {
        let config_path = site_config::config_dir_path(root, site_config::CONFIG_FILE);
        let raw = if self.fs.exists(&config_path).await {
            self.loader.invalidate(&config_path);
            let raw = self.loader.load(&config_path).await?;
            log::debug!("loaded config at {}", config_path.display());
            raw
        } else {
            log::debug!("no config file found");
            RawConfigExport::empty()
        };

        let origin = root.join(site_config::CONFIG_DIR);
        let config = ExtendsResolver::new(self.loader.as_ref(), self.bundler.as_ref())
            .resolve(raw, &origin)
            .await
            .with_context(|| format!("Failed to load config at {}", config_path.display()))?;
        Ok(config)
    }

    /// Site metadata for `root`, loading the user config unless it's already at hand.
    pub async fn resolve_site_data(
        &self,
        root: &path::Path,
        user_config: Option<UserConfig>,
    ) -> Result<SiteData> {
        let user_config = match user_config {
            Some(user_config) => user_config,
            None => self.load_user_config(root).await?,
        };
        Ok(SiteData::from_user_config(&user_config))
    }

    pub async fn resolve_config(&self, root: &path::Path) -> Result<SiteConfig> {
        let root = path::absolute(root)
            .with_context(|| format!("Invalid site root {}", root.display()))?;

        let user_config = self.load_user_config(&root).await?;
        for renamed in user_config.renamed_fields() {
            self.warnings.warn(&renamed.to_string());
        }

        let site = self
            .resolve_site_data(&root, Some(user_config.clone()))
            .await?;

        let src_dir = match user_config.src_dir.as_deref() {
            Some(src_dir) if !src_dir.is_empty() => {
                vitepress_config::normalize_path(&root.join(src_dir))
            }
            _ => root.clone(),
        };

        let user_theme_dir = site_config::config_dir_path(&root, site_config::THEME_DIR);
        let theme_dir = if self.fs.exists(&user_theme_dir).await {
            user_theme_dir
        } else {
            log::debug!("no theme found, using the default theme");
            self.app.default_theme_dir()
        };

        let mut ignore = vec![DEFAULT_SRC_EXCLUDE];
        ignore.extend(
            user_config
                .src_exclude
                .iter()
                .flatten()
                .map(String::as_str),
        );
        let pages = self
            .fs
            .glob_files(&[PAGE_PATTERN], &src_dir, &ignore)
            .await
            .with_context(|| format!("Failed to find pages in {}", src_dir.display()))?;
        log::debug!("found {} pages in {}", pages.len(), src_dir.display());

        let config_path = site_config::config_dir_path(&root, site_config::CONFIG_FILE);
        let out_dir = site_config::config_dir_path(&root, site_config::OUT_DIR);
        let alias = resolve_aliases(&self.app, &theme_dir);
        let UserConfig {
            markdown,
            vue,
            vite,
            ..
        } = user_config;

        let config = SiteConfig {
            root,
            src_dir,
            site,
            config_path,
            theme_dir,
            out_dir,
            temp_dir: self.app.temp_dir(),
            alias,
            pages,
            markdown,
            vue,
            vite,
        };
        Ok(config)
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("app", &self.app)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;
    use std::sync::Mutex;

    use futures::executor::block_on;
    use vitepress_config::Mapping;
    use vitepress_config::Value;

    use super::*;

    fn app() -> AppPaths {
        AppPaths::new("/opt/vitepress")
    }

    fn write(root: &path::Path, file: &str, content: &str) {
        let path = root.join(file);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn yaml(content: &str) -> Value {
        serde_yaml::from_str(content).unwrap()
    }

    #[derive(Clone, Default)]
    struct RecordWarnings(Arc<Mutex<Vec<String>>>);

    impl WarningSink for RecordWarnings {
        fn warn(&self, message: &str) {
            self.0.lock().unwrap().push(message.to_owned());
        }
    }

    struct NoLoader;

    #[async_trait::async_trait]
    impl ModuleLoader for NoLoader {
        async fn load(&self, _path: &path::Path) -> vitepress_config::Result<RawConfigExport> {
            Err(vitepress_config::Status::new("nothing to load"))
        }
    }

    #[test]
    fn no_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let warnings = RecordWarnings::default();
        let resolver = Resolver::new(app()).with_warnings(warnings.clone());

        let config = block_on(resolver.resolve_config(root)).unwrap();
        assert_eq!(config.root, root);
        assert_eq!(config.src_dir, root);
        assert_eq!(config.site.lang, "en-US");
        assert_eq!(config.site.title, "VitePress");
        assert_eq!(config.site.description, "A VitePress site");
        assert_eq!(config.site.base, "/");
        assert!(config.site.head.is_empty());
        assert_eq!(config.site.theme_config, Value::Mapping(Mapping::new()));
        assert!(config.site.locales.is_empty());
        assert!(config.site.langs.is_empty());
        assert_eq!(config.config_path, root.join(".vitepress/config.yml"));
        assert_eq!(config.out_dir, root.join(".vitepress/dist"));
        assert_eq!(
            config.temp_dir,
            path::Path::new("/opt/vitepress/client/app/temp")
        );
        assert_eq!(
            config.theme_dir,
            path::Path::new("/opt/vitepress/client/theme-default")
        );
        assert_eq!(config.alias, resolve_aliases(&app(), &config.theme_dir));
        assert!(config.pages.is_empty());
        assert_eq!(config.markdown, None);
        assert_eq!(config.vue, None);
        assert_eq!(config.vite, None);
        assert!(warnings.0.lock().unwrap().is_empty());
    }

    #[test]
    fn extends_merges_child_over_base() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, ".vitepress/base.yml", "title: A\nthemeConfig: {x: 1}\n");
        write(
            root,
            ".vitepress/config.yml",
            "extends: ./base.yml\nthemeConfig: {y: 2}\n",
        );

        let resolver = Resolver::new(app());
        let config = block_on(resolver.resolve_config(root)).unwrap();
        assert_eq!(config.site.title, "A");
        assert_eq!(config.site.theme_config, yaml("{x: 1, y: 2}"));
    }

    #[test]
    fn extends_merges_vite_with_bundler_rules() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(
            root,
            ".vitepress/base.yml",
            "vite: {resolve: {alias: {a: /a}}, ssr: {noExternal: true}}\n",
        );
        write(
            root,
            ".vitepress/config.yml",
            "extends: base.yml\nvite: {resolve: {alias: {b: /b}}, ssr: {noExternal: [dep]}}\n",
        );

        let resolver = Resolver::new(app());
        let config = block_on(resolver.resolve_config(root)).unwrap();
        let vite = Value::Mapping(config.vite.unwrap());
        assert_eq!(
            vite,
            yaml("{resolve: {alias: {a: /a, b: /b}}, ssr: {noExternal: true}}")
        );
    }

    #[test]
    fn deprecated_fields_warn_and_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(
            root,
            ".vitepress/config.yml",
            "vueOptions: {reactivityTransform: true}\nexclude: [skip.md]\n",
        );
        write(root, "index.md", "# Home\n");
        write(root, "skip.md", "# Skip\n");

        let warnings = RecordWarnings::default();
        let resolver = Resolver::new(app()).with_warnings(warnings.clone());
        let config = block_on(resolver.resolve_config(root)).unwrap();

        assert_eq!(
            *warnings.0.lock().unwrap(),
            [
                "\"vueOptions\" option has been renamed to \"vue\"",
                "\"exclude\" option has been renamed to \"srcExclude\"",
            ]
        );
        assert_eq!(config.vue, None);
        let pages: Vec<_> = config.pages.iter().map(|p| p.as_str()).collect();
        assert_eq!(pages, ["index.md", "skip.md"]);
    }

    #[test]
    fn base_is_normalized() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, ".vitepress/config.yml", "base: /docs\n");

        let resolver = Resolver::new(app());
        let site = block_on(resolver.resolve_site_data(root, None)).unwrap();
        assert_eq!(site.base, "/docs/");
    }

    #[test]
    fn langs_from_locales() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(
            root,
            ".vitepress/config.yml",
            "locales:\n  fr: {lang: fr-FR}\n  en: {lang: en-US}\n",
        );

        let resolver = Resolver::new(app());
        let site = block_on(resolver.resolve_site_data(root, None)).unwrap();
        let keys: Vec<_> = site.langs.keys().map(String::as_str).collect();
        assert_eq!(keys, ["fr", "en"]);
    }

    #[test]
    fn site_data_reuses_given_config() {
        let resolver = Resolver::new(app()).with_loader(NoLoader);
        let user_config = UserConfig {
            title: Some("Given".to_owned()),
            ..Default::default()
        };
        let site = block_on(resolver.resolve_site_data(
            path::Path::new("/does/not/exist"),
            Some(user_config),
        ))
        .unwrap();
        assert_eq!(site.title, "Given");
    }

    #[test]
    fn pages_under_src_dir() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(
            root,
            ".vitepress/config.yml",
            "srcDir: ./docs\nsrcExclude: ['drafts/**']\n",
        );
        for file in [
            "README.md",
            "docs/index.md",
            "docs/guide/b.md",
            "docs/guide/a.md",
            "docs/guide/logo.png",
            "docs/drafts/wip.md",
            "docs/node_modules/dep/README.md",
        ] {
            write(root, file, "");
        }

        let resolver = Resolver::new(app());
        let config = block_on(resolver.resolve_config(root)).unwrap();
        assert_eq!(config.src_dir, root.join("docs"));
        let pages: Vec<_> = config.pages.iter().map(|p| p.as_str()).collect();
        assert_eq!(pages, ["guide/a.md", "guide/b.md", "index.md"]);
    }

    #[test]
    fn hidden_files_are_not_pages() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        for file in [
            "index.md",
            ".vitepress/theme/README.md",
            ".github/CONTRIBUTING.md",
        ] {
            write(root, file, "");
        }

        let resolver = Resolver::new(app());
        let config = block_on(resolver.resolve_config(root)).unwrap();
        let pages: Vec<_> = config.pages.iter().map(|p| p.as_str()).collect();
        assert_eq!(pages, ["index.md"]);
    }

    #[test]
    fn src_exclude_is_relative_to_src_dir() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, ".vitepress/config.yml", "srcExclude: [index.md]\n");
        write(root, "index.md", "");
        write(root, "guide/index.md", "");

        let resolver = Resolver::new(app());
        let config = block_on(resolver.resolve_config(root)).unwrap();
        let pages: Vec<_> = config.pages.iter().map(|p| p.as_str()).collect();
        assert_eq!(pages, ["guide/index.md"]);
    }

    #[test]
    fn src_dir_outside_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("site");
        write(&root, ".vitepress/config.yml", "srcDir: ../docs\n");
        write(dir.path(), "docs/index.md", "");

        let resolver = Resolver::new(app());
        let config = block_on(resolver.resolve_config(&root)).unwrap();
        assert_eq!(config.src_dir, dir.path().join("docs"));
        let pages: Vec<_> = config.pages.iter().map(|p| p.as_str()).collect();
        assert_eq!(pages, ["index.md"]);
    }

    #[test]
    fn user_theme_dir() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, ".vitepress/theme/index.js", "");

        let resolver = Resolver::new(app());
        let config = block_on(resolver.resolve_config(root)).unwrap();
        assert_eq!(config.theme_dir, root.join(".vitepress/theme"));
        assert_eq!(config.alias[0].replacement, root.join(".vitepress/theme"));
    }

    #[test]
    fn config_is_reloaded() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let resolver = Resolver::new(app());

        write(root, ".vitepress/config.yml", "title: A\n");
        let first = block_on(resolver.load_user_config(root)).unwrap();
        assert_eq!(first.title.as_deref(), Some("A"));

        write(root, ".vitepress/config.yml", "title: B\n");
        let second = block_on(resolver.load_user_config(root)).unwrap();
        assert_eq!(second.title.as_deref(), Some("B"));
    }

    #[test]
    fn invalid_config_fails() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, ".vitepress/config.yml", "- not\n- a mapping\n");

        let resolver = Resolver::new(app());
        assert!(block_on(resolver.resolve_config(root)).is_err());
    }
}
