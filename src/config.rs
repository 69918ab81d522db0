//! Package configuration module.
//!
//! Every book directory carries a `_document.toml` at its root. It names the
//! compiled output file and may tune how identifiers are generated and which
//! compiler is run. Anything else in the file is package metadata for the
//! templates (title, author, publisher, ...) and is passed through untouched.
//!
//! ## Example
//!
//! ```toml
//! output_filename = "evening-edition.mobi"   # required
//! idref_scheme = "sequential"                # or "path-digits"
//!
//! title = "The Evening Edition"               # passthrough, read by templates
//! author = "Newsroom"
//! publisher = "Newsroom"
//! date = 2026-10-19
//!
//! [compiler]
//! program = "kindlegen"                      # looked up on PATH
//! args = ["-verbose", "-c2"]                 # placed before `-o <output> folio.opf`
//! ```
//!
//! ## Unknown Keys
//!
//! The root table cannot reject unknown keys because those keys *are* the
//! template metadata. The `[compiler]` table is closed and rejects typos.

use crate::ids::IdScheme;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file expected at the root of a book directory.
pub const CONFIG_FILE: &str = "_document.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "Missing {}. Your input file tree is not structured correctly. \
         Please read the README for the expected layout.",
        .0.display()
    )]
    Missing(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Template context keys filled in by the build itself.
const RESERVED_KEYS: &[&str] = &[
    "sections",
    "manifest_items",
    "spine_items",
    "images",
    "first_article",
];

/// Package configuration loaded from `_document.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentConfig {
    /// File name the external compiler writes, relative to the book directory.
    pub output_filename: String,
    /// How section and article identifiers are derived.
    #[serde(default)]
    pub idref_scheme: IdScheme,
    /// External compiler invocation.
    #[serde(default)]
    pub compiler: CompilerConfig,
    /// Author-supplied metadata handed to the templates as-is.
    #[serde(flatten)]
    pub extra: toml::Table,
}

impl DocumentConfig {
    /// Validate that required values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output_filename.trim().is_empty() {
            return Err(ConfigError::Validation(
                "output_filename must not be empty".into(),
            ));
        }
        if let Some(key) = RESERVED_KEYS.iter().find(|k| self.extra.contains_key(**k)) {
            return Err(ConfigError::Validation(format!(
                "{key} is generated during the build and cannot be set in {CONFIG_FILE}"
            )));
        }
        if self.compiler.program.trim().is_empty() {
            return Err(ConfigError::Validation(
                "compiler.program must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Passthrough keys as the templates see them.
    ///
    /// TOML dates and times become their plain string form, so an unquoted
    /// `date = 2026-10-19` renders as `2026-10-19`.
    pub fn template_metadata(&self) -> toml::Table {
        self.extra
            .iter()
            .map(|(key, value)| (key.clone(), plain_value(value)))
            .collect()
    }
}

fn plain_value(value: &toml::Value) -> toml::Value {
    match value {
        toml::Value::Datetime(dt) => toml::Value::String(dt.to_string()),
        toml::Value::Array(items) => toml::Value::Array(items.iter().map(plain_value).collect()),
        toml::Value::Table(table) => toml::Value::Table(
            table
                .iter()
                .map(|(key, value)| (key.clone(), plain_value(value)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// External compiler settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerConfig {
    /// Program name (resolved on `PATH`) or a path to the binary.
    pub program: String,
    /// Arguments placed before `-o <output_filename> <manifest>`.
    pub args: Vec<String>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            program: "kindlegen".to_string(),
            args: vec!["-verbose".to_string(), "-c2".to_string()],
        }
    }
}

/// Parse and validate a configuration document.
pub fn parse_config(content: &str) -> Result<DocumentConfig, ConfigError> {
    let config: DocumentConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load `_document.toml` from the book directory.
///
/// A missing file is reported as [`ConfigError::Missing`] so the CLI can tell
/// the user their tree is laid out wrong, rather than surfacing a bare IO error.
pub fn load_config(root: &Path) -> Result<DocumentConfig, ConfigError> {
    let config_path = root.join(CONFIG_FILE);
    if !config_path.is_file() {
        return Err(ConfigError::Missing(config_path));
    }
    let content = fs::read_to_string(&config_path)?;
    parse_config(&content)
}
