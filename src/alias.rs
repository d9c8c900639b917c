use std::fmt;
use std::path;

/// Module id the site data is served under.
pub const SITE_DATA_ID: &str = "@siteData";
pub const SITE_DATA_REQUEST_PATH: &str = "/@siteData";

/// Layout of the application install the built-in theme and client live in.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppPaths {
    root: path::PathBuf,
}

impl AppPaths {
    pub fn new(root: impl Into<path::PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn app_dir(&self) -> path::PathBuf {
        self.root.join("client").join("app")
    }

    pub fn shared_dir(&self) -> path::PathBuf {
        self.root.join("client").join("shared")
    }

    pub fn default_theme_dir(&self) -> path::PathBuf {
        self.root.join("client").join("theme-default")
    }

    /// Entry point of the client library
    pub fn client_index(&self) -> path::PathBuf {
        self.root.join("client").join("index")
    }

    pub fn temp_dir(&self) -> path::PathBuf {
        self.app_dir().join("temp")
    }
}

/// How an [`Alias`] matches a module id.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AliasFind {
    /// The id itself or any id nested under it (`find/...`)
    Prefix(String),
    /// Only the id itself
    Exact(String),
}

impl AliasFind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Prefix(find) | Self::Exact(find) => find,
        }
    }
}

impl fmt::Display for AliasFind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prefix(find) => write!(f, "{find}"),
            Self::Exact(find) => write!(f, "^{find}$"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Alias {
    pub find: AliasFind,
    pub replacement: path::PathBuf,
}

impl Alias {
    pub fn prefix(find: impl Into<String>, replacement: impl Into<path::PathBuf>) -> Self {
        Self {
            find: AliasFind::Prefix(find.into()),
            replacement: replacement.into(),
        }
    }

    pub fn exact(find: impl Into<String>, replacement: impl Into<path::PathBuf>) -> Self {
        Self {
            find: AliasFind::Exact(find.into()),
            replacement: replacement.into(),
        }
    }
}

/// Aliases every page and theme module is resolved with, in match order.
pub fn resolve_aliases(app: &AppPaths, theme_dir: &path::Path) -> Vec<Alias> {
    vec![
        Alias::prefix("/@theme", theme_dir),
        Alias::prefix("/@shared", app.shared_dir()),
        Alias::prefix("/@default-theme", app.default_theme_dir()),
        Alias::prefix(SITE_DATA_ID, SITE_DATA_REQUEST_PATH),
        Alias::exact("vitepress", app.client_index()),
    ]
}
