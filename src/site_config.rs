use std::fmt;
use std::path;

use relative_path::RelativePathBuf;
use vitepress_config::Mapping;

use crate::Alias;
use crate::SiteData;

pub const CONFIG_DIR: &str = ".vitepress";
pub const CONFIG_FILE: &str = "config.yml";
pub const THEME_DIR: &str = "theme";
pub const OUT_DIR: &str = "dist";

/// Everything the build pipeline needs to know about a site.
///
/// All paths are absolute.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(not(feature = "unstable"), non_exhaustive)]
pub struct SiteConfig {
    pub root: path::PathBuf,
    pub src_dir: path::PathBuf,
    pub site: SiteData,
    pub config_path: path::PathBuf,
    pub theme_dir: path::PathBuf,
    pub out_dir: path::PathBuf,
    pub temp_dir: path::PathBuf,
    pub alias: Vec<Alias>,
    /// Markdown sources, relative to `src_dir`
    pub pages: Vec<RelativePathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown: Option<Mapping>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vue: Option<Mapping>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vite: Option<Mapping>,
}

impl fmt::Display for SiteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let converted = serde_yaml::to_string(self).map_err(|_| fmt::Error)?;
        write!(f, "{}", converted.trim_end())
    }
}

/// `<root>/.vitepress/<name>`
pub fn config_dir_path(root: &path::Path, name: &str) -> path::PathBuf {
    root.join(CONFIG_DIR).join(name)
}
