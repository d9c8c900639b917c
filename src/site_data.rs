use std::fmt;

use indexmap::IndexMap;
use vitepress_config::HeadConfig;
use vitepress_config::LocaleConfig;
use vitepress_config::Mapping;
use vitepress_config::UserConfig;
use vitepress_config::Value;

pub const DEFAULT_LANG: &str = "en-US";
pub const DEFAULT_TITLE: &str = "VitePress";
pub const DEFAULT_DESCRIPTION: &str = "A VitePress site";
pub const DEFAULT_BASE: &str = "/";

/// Site metadata shared with every page.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(not(feature = "unstable"), non_exhaustive)]
pub struct SiteData {
    pub lang: String,
    pub title: String,
    pub description: String,
    /// Always ends with `/`
    pub base: String,
    pub head: Vec<HeadConfig>,
    pub theme_config: Value,
    pub locales: IndexMap<String, LocaleConfig>,
    pub langs: IndexMap<String, LangEntry>,
}

/// Entry of the language switcher, keyed by locale.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(not(feature = "unstable"), non_exhaustive)]
pub struct LangEntry {
    pub lang: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl SiteData {
    /// Fill in everything `config` leaves unset.
    pub fn from_user_config(config: &UserConfig) -> Self {
        let lang = non_empty(config.lang.as_deref()).unwrap_or(DEFAULT_LANG);
        let title = non_empty(config.title.as_deref()).unwrap_or(DEFAULT_TITLE);
        let description =
            non_empty(config.description.as_deref()).unwrap_or(DEFAULT_DESCRIPTION);
        let base = normalize_base(config.base.as_deref());
        let theme_config = config
            .theme_config
            .clone()
            .filter(|v| !v.is_null())
            .unwrap_or_else(|| Value::Mapping(Mapping::new()));
        let locales = config.locales.clone().unwrap_or_default();
        let langs = lang_dictionary(lang, &locales, &theme_config);

        Self {
            lang: lang.to_owned(),
            title: title.to_owned(),
            description: description.to_owned(),
            base,
            head: config.head.clone().unwrap_or_default(),
            theme_config,
            locales,
            langs,
        }
    }

    /// Site data as seen from `route`, with the most specific matching locale applied.
    ///
    /// `locales` (here and in `themeConfig`) is cleared; `langs` is kept for the language
    /// switcher.
    pub fn for_route(&self, route: &str) -> Self {
        let route = strip_base(&self.base, route);

        let mut data = self.clone();
        let locales = self.locales.iter().map(|(k, v)| (k.as_str(), v));
        if let Some(locale) = find_locale(route, locales) {
            if let Some(lang) = non_empty(locale.lang.as_deref()) {
                data.lang = lang.to_owned();
            }
            if let Some(title) = non_empty(locale.title.as_deref()) {
                data.title = title.to_owned();
            }
            if let Some(description) = non_empty(locale.description.as_deref()) {
                data.description = description.to_owned();
            }
            if let Some(head) = &locale.head {
                data.head = head.clone();
            }
        }
        data.locales = IndexMap::new();

        if let Value::Mapping(theme_config) = &mut data.theme_config {
            let theme_locales = theme_config.remove(LOCALES_KEY);
            let theme_locale = theme_locales
                .as_ref()
                .and_then(Value::as_mapping)
                .and_then(|locales| {
                    find_locale(
                        route,
                        locales.iter().filter_map(|(k, v)| Some((k.as_str()?, v))),
                    )
                })
                .and_then(Value::as_mapping);
            if let Some(theme_locale) = theme_locale {
                for (key, value) in theme_locale {
                    theme_config.insert(key.clone(), value.clone());
                }
            }
            theme_config.insert(LOCALES_KEY.into(), Value::Mapping(Mapping::new()));
        }

        data
    }
}

impl fmt::Display for SiteData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let converted = serde_yaml::to_string(self).map_err(|_| fmt::Error)?;
        write!(f, "{}", converted.trim_end())
    }
}

const LOCALES_KEY: &str = "locales";

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Append the missing trailing `/`; unset becomes `/`.
pub fn normalize_base(base: Option<&str>) -> String {
    match non_empty(base) {
        Some(base) if base.ends_with('/') => base.to_owned(),
        Some(base) => format!("{base}/"),
        None => DEFAULT_BASE.to_owned(),
    }
}

fn lang_dictionary(
    site_lang: &str,
    locales: &IndexMap<String, LocaleConfig>,
    theme_config: &Value,
) -> IndexMap<String, LangEntry> {
    locales
        .iter()
        .map(|(key, locale)| {
            let lang = non_empty(locale.lang.as_deref()).unwrap_or(site_lang);
            let label = locale.label.clone().or_else(|| {
                theme_config
                    .get(LOCALES_KEY)
                    .and_then(|locales| locales.get(key.as_str()))
                    .and_then(|locale| locale.get("label"))
                    .and_then(Value::as_str)
                    .map(ToOwned::to_owned)
            });
            let entry = LangEntry {
                lang: lang.to_owned(),
                label,
            };
            (key.clone(), entry)
        })
        .collect()
}

fn strip_base<'r>(base: &str, route: &'r str) -> &'r str {
    let base = base.strip_suffix('/').unwrap_or(base);
    match route.strip_prefix(base) {
        Some(stripped) if stripped.is_empty() || stripped.starts_with('/') => stripped,
        _ => route,
    }
}

/// The locale whose key, as a path (`fr` and `/fr/` are both `/fr/`), prefixes `route`.
///
/// The deepest key wins; ties go to the first declared.
fn find_locale<'l, L: 'l>(
    route: &str,
    locales: impl Iterator<Item = (&'l str, &'l L)>,
) -> Option<&'l L> {
    let route = if route.starts_with('/') {
        route.to_owned()
    } else {
        format!("/{route}")
    };
    locales
        .filter_map(|(key, locale)| {
            let key = key.trim_matches('/');
            if key.is_empty() {
                return Some((0, locale));
            }
            let prefix = format!("/{key}/");
            let matched = route.starts_with(&prefix) || route == prefix[..prefix.len() - 1];
            matched.then_some((key.split('/').count(), locale))
        })
        .fold(None, |best: Option<(usize, &'l L)>, (depth, locale)| match best {
            Some((best_depth, _)) if depth <= best_depth => best,
            _ => Some((depth, locale)),
        })
        .map(|(_, locale)| locale)
}
