//! Run configuration and config-file loading.
//!
//! Values are layered: built-in defaults, then the TOML config file, then
//! CLI flags (applied by the binary). [`HarvestConfig::validate`] runs last.

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use crate::download::{DEFAULT_CONCURRENCY, DOWNLOAD_TIMEOUT_SECS, EXPECTED_CONTENT_TYPE};

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://www.thermofisher.com";

/// Default page size requested from the search API.
pub const DEFAULT_RESULTS_PER_PAGE: u32 = 60;

/// Default first page to crawl (inclusive).
pub const DEFAULT_START_PAGE: u32 = 5_600;

/// Default last page to crawl (inclusive).
pub const DEFAULT_END_PAGE: u32 = 15_084;

/// Default output directory.
pub const DEFAULT_OUTPUT_DIR: &str = "PDFs";

/// Default timeout for API and redirect requests.
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 30;

/// Default browser navigation timeout.
pub const DEFAULT_NAVIGATION_TIMEOUT_SECS: u64 = 60;

/// Vendor landing pages that look like files but never serve one.
const DEFAULT_SKIP_PREFIX: &str = "https://assets.thermofisher.com/TFS-Assets/";
const DEFAULT_SKIP_SUFFIX: &str = "/SDS";

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file '{path}': {source}")]
    Read {
        /// Config file path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for the expected schema.
    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        /// Config file path.
        path: PathBuf,
        /// The underlying TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// A value is out of range.
    #[error("invalid config value for `{field}`: {value}. Expected {expected}")]
    Invalid {
        /// Offending field.
        field: &'static str,
        /// The rejected value.
        value: String,
        /// Accepted range or format.
        expected: String,
    },
}

impl ConfigError {
    fn invalid(field: &'static str, value: impl fmt::Display, expected: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            value: value.to_string(),
            expected: expected.into(),
        }
    }
}

/// Which redirect resolver to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolverKind {
    /// Headless Chromium per URL.
    #[default]
    Browser,
    /// Follow HTTP redirects only.
    Http,
    /// Use URLs as-is.
    None,
}

impl ResolverKind {
    /// Returns the stable string label.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Browser => "browser",
            Self::Http => "http",
            Self::None => "none",
        }
    }
}

impl fmt::Display for ResolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResolverKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "browser" => Ok(Self::Browser),
            "http" => Ok(Self::Http),
            "none" => Ok(Self::None),
            other => Err(format!(
                "unknown resolver '{other}' (expected browser, http or none)"
            )),
        }
    }
}

/// Which identifiers the orchestrator walks on each page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageScope {
    /// Only identifiers first seen on the current page.
    #[default]
    NewOnly,
    /// Every identifier seen so far, re-walked on each page.
    Cumulative,
}

/// URL rule that rejects a file reference before resolution.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SkipRule {
    /// Required URL prefix (empty matches anything).
    #[serde(default)]
    pub prefix: String,
    /// Required URL suffix (empty matches anything).
    #[serde(default)]
    pub suffix: String,
}

impl SkipRule {
    /// Creates a rule.
    #[must_use]
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    /// Returns true if `url` has both the prefix and the suffix.
    #[must_use]
    pub fn matches(&self, url: &str) -> bool {
        url.starts_with(&self.prefix) && url.ends_with(&self.suffix)
    }
}

/// Settings for the headless browser resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserSettings {
    /// Explicit Chrome/Chromium binary; auto-detected when `None`.
    pub chrome_executable: Option<PathBuf>,
    /// Run without a visible window.
    pub headless: bool,
    /// Upper bound for one navigation.
    pub navigation_timeout_secs: u64,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            chrome_executable: None,
            headless: true,
            navigation_timeout_secs: DEFAULT_NAVIGATION_TIMEOUT_SECS,
        }
    }
}

/// Fully resolved settings for one harvest run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestConfig {
    /// API root, e.g. `https://www.thermofisher.com`.
    pub base_url: String,
    /// First search page (inclusive).
    pub start_page: u32,
    /// Last search page (inclusive).
    pub end_page: u32,
    /// Page size requested from the search API.
    pub results_per_page: u32,
    /// Where downloaded files are written.
    pub output_dir: PathBuf,
    /// Maximum concurrent downloads.
    pub concurrency: usize,
    /// Total timeout for one file download.
    pub download_timeout_secs: u64,
    /// Timeout for API and HTTP redirect requests.
    pub api_timeout_secs: u64,
    /// MIME type a download must carry.
    pub expected_content_type: String,
    /// Redirect resolver selection.
    pub resolver: ResolverKind,
    /// Which identifiers are walked per page.
    pub page_scope: PageScope,
    /// Browser resolver settings.
    pub browser: BrowserSettings,
    /// File URLs rejected before resolution.
    pub skip_rules: Vec<SkipRule>,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            start_page: DEFAULT_START_PAGE,
            end_page: DEFAULT_END_PAGE,
            results_per_page: DEFAULT_RESULTS_PER_PAGE,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            concurrency: DEFAULT_CONCURRENCY,
            download_timeout_secs: DOWNLOAD_TIMEOUT_SECS,
            api_timeout_secs: DEFAULT_API_TIMEOUT_SECS,
            expected_content_type: EXPECTED_CONTENT_TYPE.to_string(),
            resolver: ResolverKind::default(),
            page_scope: PageScope::default(),
            browser: BrowserSettings::default(),
            skip_rules: vec![SkipRule::new(DEFAULT_SKIP_PREFIX, DEFAULT_SKIP_SUFFIX)],
        }
    }
}

impl HarvestConfig {
    /// Checks ranges and cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start_page > self.end_page {
            return Err(ConfigError::invalid(
                "start_page",
                self.start_page,
                format!("a value <= end_page ({})", self.end_page),
            ));
        }
        if !(1..=500).contains(&self.results_per_page) {
            return Err(ConfigError::invalid(
                "results_per_page",
                self.results_per_page,
                "range 1..=500",
            ));
        }
        if !(1..=100).contains(&self.concurrency) {
            return Err(ConfigError::invalid(
                "concurrency",
                self.concurrency,
                "range 1..=100",
            ));
        }
        validate_timeout_secs("download_timeout_secs", self.download_timeout_secs)?;
        validate_timeout_secs("api_timeout_secs", self.api_timeout_secs)?;
        validate_timeout_secs(
            "navigation_timeout_secs",
            self.browser.navigation_timeout_secs,
        )?;
        if url::Url::parse(&self.base_url).is_err() {
            return Err(ConfigError::invalid(
                "base_url",
                &self.base_url,
                "an absolute http(s) URL",
            ));
        }
        if self.expected_content_type.trim().is_empty() {
            return Err(ConfigError::invalid(
                "expected_content_type",
                "\"\"",
                "a MIME type such as application/pdf",
            ));
        }
        Ok(())
    }
}

fn validate_timeout_secs(field: &'static str, value: u64) -> Result<(), ConfigError> {
    if (1..=3600).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, value, "range 1..=3600"))
    }
}

/// TOML-backed file configuration. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// API root.
    pub base_url: Option<String>,
    /// First search page.
    pub start_page: Option<u32>,
    /// Last search page.
    pub end_page: Option<u32>,
    /// Search page size.
    pub results_per_page: Option<u32>,
    /// Output directory.
    pub output_dir: Option<PathBuf>,
    /// Maximum concurrent downloads.
    pub concurrency: Option<usize>,
    /// Download timeout in seconds.
    pub download_timeout_secs: Option<u64>,
    /// API timeout in seconds.
    pub api_timeout_secs: Option<u64>,
    /// Required MIME type.
    pub expected_content_type: Option<String>,
    /// Resolver selection.
    pub resolver: Option<ResolverKind>,
    /// Re-walk every seen identifier on each page.
    pub reprocess_seen: Option<bool>,
    /// Chrome/Chromium binary.
    pub chrome_executable: Option<PathBuf>,
    /// Show the browser window.
    pub headless: Option<bool>,
    /// Browser navigation timeout in seconds.
    pub navigation_timeout_secs: Option<u64>,
    /// Replaces the default skip rules when present.
    pub skip_rules: Option<Vec<SkipRule>>,
}

impl FileConfig {
    /// Parses TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for syntax errors, unknown keys or wrong types.
    pub fn from_toml_str(raw: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reads and parses a config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] or [`ConfigError::Parse`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw, path)
    }

    /// Overlays every value present in the file onto `config`.
    pub fn apply_to(&self, config: &mut HarvestConfig) {
        if let Some(ref base_url) = self.base_url {
            config.base_url.clone_from(base_url);
        }
        if let Some(start_page) = self.start_page {
            config.start_page = start_page;
        }
        if let Some(end_page) = self.end_page {
            config.end_page = end_page;
        }
        if let Some(results_per_page) = self.results_per_page {
            config.results_per_page = results_per_page;
        }
        if let Some(ref output_dir) = self.output_dir {
            config.output_dir.clone_from(output_dir);
        }
        if let Some(concurrency) = self.concurrency {
            config.concurrency = concurrency;
        }
        if let Some(secs) = self.download_timeout_secs {
            config.download_timeout_secs = secs;
        }
        if let Some(secs) = self.api_timeout_secs {
            config.api_timeout_secs = secs;
        }
        if let Some(ref content_type) = self.expected_content_type {
            config.expected_content_type.clone_from(content_type);
        }
        if let Some(resolver) = self.resolver {
            config.resolver = resolver;
        }
        if let Some(reprocess) = self.reprocess_seen {
            config.page_scope = if reprocess {
                PageScope::Cumulative
            } else {
                PageScope::NewOnly
            };
        }
        if let Some(ref chrome) = self.chrome_executable {
            config.browser.chrome_executable = Some(chrome.clone());
        }
        if let Some(headless) = self.headless {
            config.browser.headless = headless;
        }
        if let Some(secs) = self.navigation_timeout_secs {
            config.browser.navigation_timeout_secs = secs;
        }
        if let Some(ref rules) = self.skip_rules {
            config.skip_rules.clone_from(rules);
        }
    }
}

/// Resolves the default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/harvester/config.toml`
/// 2. `$HOME/.config/harvester/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("harvester")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("harvester")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads the config file.
///
/// An explicit path must exist. Without one, the default path is used when
/// present and silently skipped otherwise.
///
/// # Errors
///
/// Returns [`ConfigError`] when a file exists but cannot be read or parsed,
/// or when an explicit path is missing.
pub fn load_file_config(explicit: Option<&Path>) -> Result<Option<FileConfig>, ConfigError> {
    if let Some(path) = explicit {
        return FileConfig::load(path).map(Some);
    }

    match resolve_default_config_path() {
        Some(path) if path.exists() => FileConfig::load(&path).map(Some),
        _ => Ok(None),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = HarvestConfig::default();
        config.validate().unwrap();
        assert_eq!(config.start_page, 5600);
        assert_eq!(config.end_page, 15_084);
        assert_eq!(config.results_per_page, 60);
        assert_eq!(config.download_timeout_secs, 30);
        assert_eq!(config.output_dir, PathBuf::from("PDFs"));
        assert_eq!(config.resolver, ResolverKind::Browser);
        assert_eq!(config.skip_rules.len(), 1);
    }

    #[test]
    fn test_validate_rejects_inverted_page_range() {
        let config = HarvestConfig {
            start_page: 10,
            end_page: 9,
            ..HarvestConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "start_page", .. }));
    }

    #[test]
    fn test_validate_single_page_range_ok() {
        let config = HarvestConfig {
            start_page: 7,
            end_page: 7,
            ..HarvestConfig::default()
        };
        config.validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_out_of_range_values() {
        let bad = [
            HarvestConfig {
                concurrency: 0,
                ..HarvestConfig::default()
            },
            HarvestConfig {
                results_per_page: 0,
                ..HarvestConfig::default()
            },
            HarvestConfig {
                download_timeout_secs: 0,
                ..HarvestConfig::default()
            },
            HarvestConfig {
                base_url: "not a url".to_string(),
                ..HarvestConfig::default()
            },
        ];
        for config in bad {
            assert!(config.validate().is_err(), "expected invalid: {config:?}");
        }
    }

    #[test]
    fn test_skip_rule_matches_prefix_and_suffix() {
        let rule = SkipRule::new(DEFAULT_SKIP_PREFIX, DEFAULT_SKIP_SUFFIX);
        assert!(rule.matches("https://assets.thermofisher.com/TFS-Assets/LSG/SDS"));
        assert!(!rule.matches("https://assets.thermofisher.com/TFS-Assets/LSG/SDS/a.pdf"));
        assert!(!rule.matches("https://example.com/SDS"));
    }

    #[test]
    fn test_resolver_kind_from_str() {
        assert_eq!("browser".parse::<ResolverKind>().unwrap(), ResolverKind::Browser);
        assert_eq!("HTTP".parse::<ResolverKind>().unwrap(), ResolverKind::Http);
        assert_eq!("none".parse::<ResolverKind>().unwrap(), ResolverKind::None);
        assert!("chrome".parse::<ResolverKind>().is_err());
    }

    #[test]
    fn test_file_config_parses_and_applies() {
        let raw = r#"
            start_page = 5600
            end_page = 5610
            output_dir = "out"
            concurrency = 4
            resolver = "http"
            reprocess_seen = true
            navigation_timeout_secs = 15

            [[skip_rules]]
            prefix = "https://cdn.example/"
            suffix = "/landing"
        "#;
        let file = FileConfig::from_toml_str(raw, Path::new("config.toml")).unwrap();
        let mut config = HarvestConfig::default();
        file.apply_to(&mut config);

        assert_eq!(config.start_page, 5600);
        assert_eq!(config.end_page, 5610);
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.resolver, ResolverKind::Http);
        assert_eq!(config.page_scope, PageScope::Cumulative);
        assert_eq!(config.browser.navigation_timeout_secs, 15);
        assert_eq!(
            config.skip_rules,
            vec![SkipRule::new("https://cdn.example/", "/landing")]
        );
        // Untouched keys keep defaults
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_file_config_rejects_unknown_key() {
        let err = FileConfig::from_toml_str("rate_limit = 5", Path::new("c.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_file_config_rejects_unknown_resolver() {
        let err =
            FileConfig::from_toml_str("resolver = \"chrome\"", Path::new("c.toml")).unwrap_err();
        assert!(err.to_string().contains("c.toml"));
    }

    #[test]
    fn test_load_file_config_explicit_missing_is_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.toml");
        let err = load_file_config(Some(&missing)).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_load_file_config_explicit_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("harvester.toml");
        std::fs::write(&path, "concurrency = 3\n").unwrap();
        let file = load_file_config(Some(&path)).unwrap().unwrap();
        assert_eq!(file.concurrency, Some(3));
    }
}
