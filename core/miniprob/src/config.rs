//! Analysis configuration.
//!
//! Every field has a default, so an empty file is a valid configuration:
//!
//! ```toml
//! [types]
//! max-integer-width = 536870911
//!
//! [scoping]
//! fold-in-progress-locals = true
//! report-unindexed-imports = true
//! ```

use std::path::Path;

use anyhow::{Context, Result, bail};
use miniprob_linker::provider::ScopeOptions;
use miniprob_type_checker::infer::DEFAULT_MAX_INTEGER_WIDTH;
use serde::{Deserialize, Serialize};

/// Largest accepted ceiling. Widening a signed operand adds a bit, so the
/// ceiling keeps one bit of headroom below `u32::MAX`.
pub const MAX_INTEGER_WIDTH_LIMIT: u32 = u32::MAX - 1;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub types: TypesConfig,

    #[serde(default)]
    pub scoping: ScopingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct TypesConfig {
    /// Ceiling for integer widths in literal suffixes and declared types.
    #[serde(default = "default_max_integer_width")]
    pub max_integer_width: u32,
}

impl Default for TypesConfig {
    fn default() -> Self {
        Self {
            max_integer_width: default_max_integer_width(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct ScopingConfig {
    /// Offer the locals of a function that is still being typed at call sites.
    #[serde(default = "enabled")]
    pub fold_in_progress_locals: bool,

    /// Report imports whose target was never indexed instead of skipping them.
    #[serde(default = "enabled")]
    pub report_unindexed_imports: bool,
}

impl Default for ScopingConfig {
    fn default() -> Self {
        Self {
            fold_in_progress_locals: true,
            report_unindexed_imports: true,
        }
    }
}

impl ScopingConfig {
    #[must_use]
    pub fn options(&self) -> ScopeOptions {
        ScopeOptions {
            fold_in_progress_locals: self.fold_in_progress_locals,
            report_unindexed_imports: self.report_unindexed_imports,
        }
    }
}

fn default_max_integer_width() -> u32 {
    DEFAULT_MAX_INTEGER_WIDTH
}

fn enabled() -> bool {
    true
}

impl AnalysisConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML, does not match the
    /// configuration schema, or sets an integer width ceiling of zero or
    /// above [`MAX_INTEGER_WIDTH_LIMIT`].
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: AnalysisConfig =
            toml::from_str(content).context("Failed to parse analysis configuration")?;
        config.check()?;
        Ok(config)
    }

    /// Reads and parses the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid configuration: {}", path.display()))
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize analysis configuration")
    }

    fn check(&self) -> Result<()> {
        if self.types.max_integer_width == 0 {
            bail!("max-integer-width must be at least 1");
        }
        if self.types.max_integer_width > MAX_INTEGER_WIDTH_LIMIT {
            bail!("max-integer-width must be at most {MAX_INTEGER_WIDTH_LIMIT}");
        }
        Ok(())
    }
}
