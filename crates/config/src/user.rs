use std::fmt;

use indexmap::IndexMap;

use super::*;

/// Site configuration as written by the user, after the `extends` chain is collapsed.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(not(feature = "unstable"), non_exhaustive)]
pub struct UserConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<Vec<HeadConfig>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_config: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locales: Option<IndexMap<String, LocaleConfig>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown: Option<Mapping>,
    /// Options for the Vue plugin
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vue: Option<Mapping>,
    /// Bundler configuration, see [`BUNDLER_KEY`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vite: Option<Mapping>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src_exclude: Option<Vec<String>>,
    /// Path to, or inline table of, the configuration this one is based on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extends: Option<Value>,
    /// Renamed to `srcExclude`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<String>>,
    /// Renamed to `vue`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vue_options: Option<Mapping>,
}

impl UserConfig {
    pub fn from_mapping(mapping: Mapping) -> Result<Self> {
        serde_yaml::from_value(Value::Mapping(mapping))
            .map_err(|e| Status::new("Failed to parse config").with_source(e))
    }

    /// Deprecated fields present in this configuration.
    pub fn renamed_fields(&self) -> impl Iterator<Item = RenamedField> + '_ {
        let vue_options = self.vue_options.as_ref().map(|_| RenamedField {
            old: "vueOptions",
            new: "vue",
        });
        let exclude = self.exclude.as_ref().map(|_| RenamedField {
            old: "exclude",
            new: "srcExclude",
        });
        vue_options.into_iter().chain(exclude)
    }
}

impl fmt::Display for UserConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let converted = serde_yaml::to_string(self).map_err(|_| fmt::Error)?;
        write!(f, "{}", converted.trim_end())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RenamedField {
    pub old: &'static str,
    pub new: &'static str,
}

impl fmt::Display for RenamedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" option has been renamed to \"{}\"", self.old, self.new)
    }
}

/// An element injected into every page's `<head>`: `[tag, attributes]` or
/// `[tag, attributes, innerHTML]`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum HeadConfig {
    Element(String, Mapping),
    ElementWithContent(String, Mapping, String),
}

impl HeadConfig {
    pub fn tag(&self) -> &str {
        match self {
            Self::Element(tag, _) | Self::ElementWithContent(tag, _, _) => tag,
        }
    }

    pub fn attributes(&self) -> &Mapping {
        match self {
            Self::Element(_, attrs) | Self::ElementWithContent(_, attrs, _) => attrs,
        }
    }

    pub fn content(&self) -> Option<&str> {
        match self {
            Self::Element(..) => None,
            Self::ElementWithContent(_, _, content) => Some(content),
        }
    }
}

/// Per-locale overrides of the site metadata.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(not(feature = "unstable"), non_exhaustive)]
pub struct LocaleConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<Vec<HeadConfig>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub select_text: Option<String>,
}
