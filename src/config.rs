//! Category rules and scan-filter configuration.
//!
//! Configuration is a JSON document mapping category names to the filename
//! suffixes they claim, plus the unknown-folder policy and optional
//! scan-exclusion rules:
//!
//! ```json
//! {
//!     "categories": {
//!         "Images": [".jpg", ".jpeg", ".png", ".gif"],
//!         "Documents": [".pdf", ".docx", ".txt"]
//!     },
//!     "enable_unknown_folder": true,
//!     "unknown_folder_name": "Others",
//!     "enable_hidden_files": false,
//!     "exclude": {
//!         "filenames": ["Thumbs.db"],
//!         "patterns": ["*.tmp"],
//!         "regex": []
//!     }
//! }
//! ```
//!
//! The order of the `categories` object is the rule-match priority: the first
//! rule whose suffix matches wins, so a rule claiming `.tar.gz` must be
//! declared before one claiming `.gz`. The loader captures that order into an
//! explicit rule list; everything is validated here, at the load boundary,
//! so classification never sees a malformed rule.

use glob::Pattern;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration file looked for in the working directory.
pub const LOCAL_CONFIG_FILE_NAME: &str = ".sortbox.json";

/// Built-in configuration, materialized on first use when no file exists.
const DEFAULT_CONFIG: &str = r#"{
    "categories": {
        "Images": [".jpg", ".jpeg", ".png", ".gif"],
        "Documents": [".pdf", ".docx", ".txt"],
        "Videos": [".mp4", ".mkv"],
        "Music": [".mp3", ".wav"],
        "Archives": [".zip", ".rar"]
    },
    "enable_unknown_folder": true,
    "unknown_folder_name": "Others"
}
"#;

/// Errors that can occur while loading and validating configuration.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// An explicitly requested configuration file does not exist.
    Missing(PathBuf),
    /// The document does not have the expected shape.
    Invalid(String),
    /// Invalid glob pattern in the exclusion rules.
    InvalidGlobPattern(String),
    /// Invalid regex pattern in the exclusion rules.
    InvalidRegexPattern {
        /// The regex pattern that failed to compile.
        pattern: String,
        /// The reason why the pattern is invalid.
        reason: String,
    },
    /// IO error while reading configuration.
    Io(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Missing(path) => {
                write!(f, "configuration file not found: {}", path.display())
            }
            ConfigError::Invalid(msg) => write!(f, "invalid configuration: {}", msg),
            ConfigError::InvalidGlobPattern(pattern) => {
                write!(f, "invalid glob pattern '{}' in exclude rules", pattern)
            }
            ConfigError::InvalidRegexPattern { pattern, reason } => {
                write!(f, "invalid regex pattern '{}': {}", pattern, reason)
            }
            ConfigError::Io(msg) => write!(f, "IO error reading configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Raw document shape; validated into [`Config`] after parsing.
///
/// `categories` keeps the JSON object's insertion order (`serde_json` with
/// `preserve_order`), which is what gives rules their match priority.
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    categories: serde_json::Map<String, serde_json::Value>,

    #[serde(default = "default_enable_unknown_folder")]
    enable_unknown_folder: bool,

    #[serde(default = "default_unknown_folder_name")]
    unknown_folder_name: String,

    /// Whether files starting with "." are organized. Defaults to false.
    #[serde(default)]
    enable_hidden_files: bool,

    #[serde(default)]
    exclude: ExcludeRules,
}

fn default_enable_unknown_folder() -> bool {
    true
}

fn default_unknown_folder_name() -> String {
    "Others".to_string()
}

/// Rules for excluding files from organization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExcludeRules {
    /// Exact filenames to exclude (e.g., "Thumbs.db").
    #[serde(default)]
    pub filenames: Vec<String>,

    /// Glob patterns to exclude (e.g., "*.tmp").
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Regex patterns to exclude (for advanced users).
    #[serde(default)]
    pub regex: Vec<String>,
}

/// One category: a destination folder name and the suffixes it claims.
///
/// Suffixes are stored lower-cased; matching happens against the lower-cased
/// filename, so `photo.JPG` matches a rule declaring `.jpg`.
#[derive(Debug, Clone)]
pub struct CategoryRule {
    pub name: String,
    pub suffixes: Vec<String>,
}

/// Validated, immutable configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Category rules in declaration order; first match wins.
    pub rules: Vec<CategoryRule>,
    /// Whether unclassified files are moved into the unknown folder.
    pub unknown_enabled: bool,
    /// Name of the unknown folder.
    pub unknown_name: String,
    /// Compiled scan-exclusion filters.
    pub filters: CompiledFilters,
}

impl Config {
    /// Loads configuration, falling back to the built-in default.
    ///
    /// Lookup order:
    /// 1. `config_path`, when given — the file must exist
    /// 2. `.sortbox.json` in the working directory
    /// 3. `$HOME/.config/sortbox/config.json`
    /// 4. The built-in default, which is also written to the home location
    ///    so subsequent runs are reproducible
    ///
    /// Seeding the default is best-effort and never overwrites an existing
    /// file; the in-memory default is used either way.
    ///
    /// # Errors
    ///
    /// `ConfigError::Missing` when an explicit path does not exist;
    /// `ConfigError::Invalid` and friends when parsing or validation fails.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE_NAME);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = Self::home_config_path(&home);
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
            Self::seed_default(&home_config);
        }

        Self::from_json(DEFAULT_CONFIG)
    }

    /// Loads and validates configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::Missing(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_json(&content)
    }

    /// Parses and validates a JSON configuration document.
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig =
            serde_json::from_str(content).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Self::validate(raw)
    }

    fn home_config_path(home: &str) -> PathBuf {
        PathBuf::from(home)
            .join(".config")
            .join("sortbox")
            .join("config.json")
    }

    /// Writes the default document to `path` unless something already exists there.
    fn seed_default(path: &Path) {
        if path.exists() {
            return;
        }
        if let Some(parent) = path.parent()
            && fs::create_dir_all(parent).is_err()
        {
            return;
        }
        let _ = fs::write(path, DEFAULT_CONFIG);
    }

    fn validate(raw: RawConfig) -> Result<Self, ConfigError> {
        let mut rules = Vec::with_capacity(raw.categories.len());

        for (name, value) in &raw.categories {
            validate_folder_name(name, "category name")?;

            let entries = value.as_array().ok_or_else(|| {
                ConfigError::Invalid(format!("category '{}' must be a list of suffixes", name))
            })?;
            if entries.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "category '{}' has no suffixes",
                    name
                )));
            }

            let mut suffixes = Vec::with_capacity(entries.len());
            for entry in entries {
                let suffix = entry.as_str().ok_or_else(|| {
                    ConfigError::Invalid(format!(
                        "category '{}' contains a non-string suffix",
                        name
                    ))
                })?;
                if !suffix.starts_with('.') || suffix.len() < 2 {
                    return Err(ConfigError::Invalid(format!(
                        "suffix '{}' in category '{}' must start with '.'",
                        suffix, name
                    )));
                }
                suffixes.push(suffix.to_lowercase());
            }

            rules.push(CategoryRule {
                name: name.clone(),
                suffixes,
            });
        }

        validate_folder_name(&raw.unknown_folder_name, "unknown folder name")?;

        Ok(Self {
            rules,
            unknown_enabled: raw.enable_unknown_folder,
            unknown_name: raw.unknown_folder_name,
            filters: CompiledFilters::compile(raw.enable_hidden_files, raw.exclude)?,
        })
    }
}

/// Category and unknown-folder names become subdirectory names; they must be
/// single path components.
fn validate_folder_name(name: &str, what: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::Invalid(format!("{} must not be empty", what)));
    }
    if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
        return Err(ConfigError::Invalid(format!(
            "{} '{}' must be a plain folder name",
            what, name
        )));
    }
    Ok(())
}

/// Pre-compiled exclusion rules applied to each scanned filename.
#[derive(Debug, Clone, Default)]
pub struct CompiledFilters {
    include_hidden: bool,
    exclude_filenames: HashSet<String>,
    exclude_patterns: Vec<Pattern>,
    exclude_regexes: Vec<Regex>,
}

impl CompiledFilters {
    fn compile(include_hidden: bool, rules: ExcludeRules) -> Result<Self, ConfigError> {
        let exclude_patterns = rules
            .patterns
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let exclude_regexes = rules
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidRegexPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            include_hidden,
            exclude_filenames: rules.filenames.into_iter().collect(),
            exclude_patterns,
            exclude_regexes,
        })
    }

    /// Whether a file with this name takes part in organization.
    ///
    /// Checks, with early termination:
    /// 1. Hidden-file policy
    /// 2. Exact filename match
    /// 3. Glob pattern match
    /// 4. Regex pattern match
    pub fn should_include(&self, file_name: &str) -> bool {
        if !self.include_hidden && file_name.starts_with('.') {
            return false;
        }
        if self.exclude_filenames.contains(file_name) {
            return false;
        }
        if self.exclude_patterns.iter().any(|p| p.matches(file_name)) {
            return false;
        }
        if self.exclude_regexes.iter().any(|r| r.is_match(file_name)) {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_minimal_document_gets_defaults() {
        let config = Config::from_json(r#"{"categories": {"Docs": [".pdf"]}}"#)
            .expect("minimal config should parse");
        assert!(config.unknown_enabled);
        assert_eq!(config.unknown_name, "Others");
        assert_eq!(config.rules.len(), 1);
        assert_eq!(config.rules[0].name, "Docs");
    }

    #[test]
    fn test_rule_order_follows_declaration_order() {
        let config = Config::from_json(
            r#"{"categories": {"Tarballs": [".tar.gz"], "Archives": [".gz"], "Docs": [".pdf"]}}"#,
        )
        .expect("config should parse");

        let names: Vec<_> = config.rules.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Tarballs", "Archives", "Docs"]);
    }

    #[test]
    fn test_suffixes_are_lowercased() {
        let config = Config::from_json(r#"{"categories": {"Images": [".JPG", ".Png"]}}"#)
            .expect("config should parse");
        assert_eq!(config.rules[0].suffixes, vec![".jpg", ".png"]);
    }

    #[test]
    fn test_categories_must_be_object() {
        let result = Config::from_json(r#"{"categories": "not an object"}"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_category_value_must_be_string_list() {
        let result = Config::from_json(r#"{"categories": {"Docs": ".pdf"}}"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        let result = Config::from_json(r#"{"categories": {"Docs": [1, 2]}}"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_suffix_must_start_with_dot() {
        let result = Config::from_json(r#"{"categories": {"Docs": ["pdf"]}}"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        let result = Config::from_json(r#"{"categories": {"Docs": ["."]}}"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_empty_suffix_list_rejected() {
        let result = Config::from_json(r#"{"categories": {"Docs": []}}"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_category_name_must_be_plain_folder_name() {
        let result = Config::from_json(r#"{"categories": {"a/b": [".pdf"]}}"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        let result =
            Config::from_json(r#"{"categories": {"Docs": [".pdf"]}, "unknown_folder_name": ".."}"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let result = Config::from_json("{not json");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_explicit_missing_path_is_missing_error() {
        let result = Config::load_from_file(Path::new("/no/such/config.json"));
        assert!(matches!(result, Err(ConfigError::Missing(_))));
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"categories": {"Audio": [".mp3"]}, "enable_unknown_folder": false}"#,
        )
        .expect("Failed to write config");

        let config = Config::load_from_file(&path).expect("config should load");
        assert!(!config.unknown_enabled);
        assert_eq!(config.rules[0].name, "Audio");
    }

    #[test]
    fn test_seed_default_does_not_overwrite() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("config.json");
        fs::write(&path, r#"{"categories": {"Mine": [".x"]}}"#).expect("Failed to write config");

        Config::seed_default(&path);

        let content = fs::read_to_string(&path).expect("Failed to read config");
        assert!(content.contains("Mine"));
    }

    #[test]
    fn test_seed_default_creates_parent_directories() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("nested").join("config.json");

        Config::seed_default(&path);

        let seeded = Config::load_from_file(&path).expect("seeded config should load");
        assert!(seeded.rules.iter().any(|r| r.name == "Images"));
        assert!(seeded.unknown_enabled);
        assert_eq!(seeded.unknown_name, "Others");
    }

    #[test]
    fn test_hidden_files_excluded_by_default() {
        let config = Config::from_json(r#"{"categories": {"Docs": [".pdf"]}}"#)
            .expect("config should parse");
        assert!(!config.filters.should_include(".hidden.pdf"));
        assert!(config.filters.should_include("report.pdf"));
    }

    #[test]
    fn test_hidden_files_included_when_enabled() {
        let config = Config::from_json(
            r#"{"categories": {"Docs": [".pdf"]}, "enable_hidden_files": true}"#,
        )
        .expect("config should parse");
        assert!(config.filters.should_include(".hidden.pdf"));
    }

    #[test]
    fn test_exclude_exact_filename() {
        let config =
            Config::from_json(r#"{"categories": {}, "exclude": {"filenames": ["Thumbs.db"]}}"#)
                .expect("config should parse");
        assert!(!config.filters.should_include("Thumbs.db"));
        assert!(config.filters.should_include("image.jpg"));
    }

    #[test]
    fn test_exclude_glob_pattern() {
        let config =
            Config::from_json(r#"{"categories": {}, "exclude": {"patterns": ["*.tmp"]}}"#)
                .expect("config should parse");
        assert!(!config.filters.should_include("scratch.tmp"));
        assert!(config.filters.should_include("scratch.txt"));
    }

    #[test]
    fn test_exclude_regex() {
        let config = Config::from_json(
            r#"{"categories": {}, "exclude": {"regex": ["^draft_.*\\.docx$"]}}"#,
        )
        .expect("config should parse");
        assert!(!config.filters.should_include("draft_notes.docx"));
        assert!(config.filters.should_include("notes.docx"));
    }

    #[test]
    fn test_invalid_glob_pattern_rejected() {
        let result =
            Config::from_json(r#"{"categories": {}, "exclude": {"patterns": ["[invalid"]}}"#);
        assert!(matches!(result, Err(ConfigError::InvalidGlobPattern(_))));
    }

    #[test]
    fn test_invalid_regex_pattern_rejected() {
        let result =
            Config::from_json(r#"{"categories": {}, "exclude": {"regex": ["[invalid("]}}"#);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidRegexPattern { .. })
        ));
    }
}
