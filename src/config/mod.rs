//! Tool configuration from `mangaprep.toml`.
//!
//! The config file is optional; every field has a default matching the
//! canonical formatter behavior. The `[format]` section exposes the knobs
//! that historically drifted between copies of the formatter script:
//! skip-title patterns, batch sort order, head curation and title update.
//!
//! ```toml
//! [format]
//! indent = 4
//! sort = "natural"
//! curate_head = true
//! update_title = true
//! skip_titles = ['^第[一二三四五六七八九十零百千万\d]+卷(\s+.+)?$']
//! ```

mod error;

pub use error::ConfigError;

use std::fs;
use std::path::Path;

use clap::ValueEnum;
use serde::Deserialize;

use crate::debug;

/// Default skip-title patterns: volume (第N卷), part (第N部) and extra (番外)
/// headings, with or without a trailing title.
pub const DEFAULT_SKIP_TITLES: [&str; 3] = [
    r"^第[一二三四五六七八九十零百千万\d]+卷(\s+.+)?$",
    r"^第[一二三四五六七八九十零百千万\d]+部(\s+.+)?$",
    r"^番外(\s+.+)?$",
];

/// Batch processing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Digit runs compared numerically (1, 2, 10).
    #[default]
    Natural,
    /// Plain byte-wise filename order (1, 10, 2).
    Lexicographic,
}

/// Root configuration structure representing mangaprep.toml
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// XHTML formatter settings
    pub format: FormatSection,
}

/// `[format]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FormatSection {
    /// Spaces per indent level
    pub indent: usize,

    /// Batch processing order
    pub sort: SortOrder,

    /// Reduce `<head>` to title + stylesheet links
    pub curate_head: bool,

    /// Copy the first heading's text into `<title>`
    pub update_title: bool,

    /// Raw-title patterns that skip title update and re-indentation
    pub skip_titles: Vec<String>,
}

impl Default for FormatSection {
    fn default() -> Self {
        Self {
            indent: 4,
            sort: SortOrder::default(),
            curate_head: true,
            update_title: true,
            skip_titles: DEFAULT_SKIP_TITLES.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

impl ToolConfig {
    /// Load configuration from the given path.
    ///
    /// A missing file yields the defaults; a present-but-broken file is an
    /// error (silently ignoring a config the user wrote would hide drift).
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!("config"; "no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let config: Self = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for pattern in &self.format.skip_titles {
            if let Err(e) = regex::Regex::new(pattern) {
                return Err(ConfigError::Pattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                });
            }
        }
        Ok(())
    }
}
