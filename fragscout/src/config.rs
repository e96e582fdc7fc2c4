use config::{Config as ConfigBuilder, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::search::WordBoundary;

/// Configuration for corpus searches.
///
/// # Configuration Locations
///
/// The configuration can be loaded from multiple locations in order of precedence:
/// 1. Custom config file specified via `--config` flag
/// 2. Local `.fragscout.yaml` in the current directory
/// 3. Global `$HOME/.config/fragscout/config.yaml`
///
/// Every field has a default, so no file at all is a valid configuration.
///
/// # Configuration Format
///
/// ```yaml
/// # Corpus root
/// root_path: "."
///
/// # Recognized document kinds (matched case-insensitively)
/// fragment_extensions: ["wt"]
/// note_extensions: ["wtnote"]
/// config_file_name: ".config"
///
/// # Glob patterns, matched against root-relative paths
/// ignore_patterns:
///   - "tmp/**"
///
/// # Only report documents under these root-relative directories
/// scopes:
///   - "data/chapters"
///   - "data/snips"
///
/// # failfast | lossy
/// encoding_mode: "failfast"
///
/// # Characters that may flank a whole word, besides whitespace
/// word_separators: ".?:;,()!&+-\"'^_*~"
///
/// thread_count: 4
/// log_level: "info"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Root directory of the corpus
    pub root_path: PathBuf,

    /// Extensions (without the dot) of fragment documents
    pub fragment_extensions: Vec<String>,

    /// Extensions (without the dot) of note documents
    pub note_extensions: Vec<String>,

    /// Exact file name of corpus config files
    pub config_file_name: String,

    /// Patterns to ignore (glob syntax)
    pub ignore_patterns: Vec<String>,

    /// Root-relative directories results are restricted to; empty means everywhere
    pub scopes: Vec<PathBuf>,

    /// How to handle invalid UTF-8 in documents
    pub encoding_mode: EncodingMode,

    /// Characters accepted around whole-word matches, besides whitespace
    pub word_separators: String,

    /// Worker threads for the async runtime
    /// Defaults to number of CPU cores if not specified
    pub thread_count: NonZeroUsize,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// How to treat document bytes that are not valid UTF-8
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodingMode {
    /// Fail the load with an encoding error
    #[default]
    FailFast,
    /// Replace invalid sequences with U+FFFD
    Lossy,
}

impl std::str::FromStr for EncodingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "failfast" => Ok(Self::FailFast),
            "lossy" => Ok(Self::Lossy),
            other => Err(format!("unknown encoding mode '{}'", other)),
        }
    }
}

fn default_thread_count() -> NonZeroUsize {
    NonZeroUsize::new(num_cpus::get()).unwrap_or(NonZeroUsize::MIN)
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            root_path: PathBuf::from("."),
            fragment_extensions: vec!["wt".to_string()],
            note_extensions: vec!["wtnote".to_string()],
            config_file_name: ".config".to_string(),
            ignore_patterns: Vec::new(),
            scopes: Vec::new(),
            encoding_mode: EncodingMode::default(),
            word_separators: WordBoundary::default().separators(),
            thread_count: default_thread_count(),
            log_level: default_log_level(),
        }
    }
}

impl SearchConfig {
    /// Default configuration rooted at `root`
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root_path: root.into(),
            ..Self::default()
        }
    }

    /// Loads configuration from the default locations, plus `config_path` when given
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        let config_files = [
            dirs::config_dir().map(|p| p.join("fragscout/config.yaml")),
            Some(PathBuf::from(".fragscout.yaml")),
        ];

        for path in config_files.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        // An explicit file must exist
        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder.build()?.try_deserialize()
    }

    /// Merges CLI arguments with configuration file values
    pub fn merge_with_cli(mut self, cli_config: SearchConfig) -> Self {
        let defaults = SearchConfig::default();

        // CLI values take precedence over config file values
        if cli_config.root_path != defaults.root_path {
            self.root_path = cli_config.root_path;
        }
        if cli_config.fragment_extensions != defaults.fragment_extensions {
            self.fragment_extensions = cli_config.fragment_extensions;
        }
        if cli_config.note_extensions != defaults.note_extensions {
            self.note_extensions = cli_config.note_extensions;
        }
        if cli_config.config_file_name != defaults.config_file_name {
            self.config_file_name = cli_config.config_file_name;
        }
        if !cli_config.ignore_patterns.is_empty() {
            self.ignore_patterns = cli_config.ignore_patterns;
        }
        if !cli_config.scopes.is_empty() {
            self.scopes = cli_config.scopes;
        }
        if cli_config.encoding_mode != defaults.encoding_mode {
            self.encoding_mode = cli_config.encoding_mode;
        }
        if cli_config.word_separators != defaults.word_separators {
            self.word_separators = cli_config.word_separators;
        }
        if cli_config.thread_count != defaults.thread_count {
            self.thread_count = cli_config.thread_count;
        }
        if cli_config.log_level != defaults.log_level {
            self.log_level = cli_config.log_level;
        }
        self
    }

    /// Whole-word boundary built from `word_separators`
    pub fn word_boundary(&self) -> WordBoundary {
        WordBoundary::new(self.word_separators.chars(), true)
    }
}
