//! Rules files and data directory layout for the `court` CLI.
//!
//! A rules file is TOML with the fields of [`MatchConfiguration`]; every
//! field is optional and falls back to the standard game to 11.

use anyhow::{Context, Result};
use court_core::{MatchConfiguration, MatchId};
use std::path::{Path, PathBuf};

/// Load and validate a rules file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed, or played.
pub fn load_rules(path: &Path) -> Result<MatchConfiguration, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let rules: MatchConfiguration = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;

    rules.validate().map_err(|e| ConfigError::Invalid {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(rules)
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the rules file.
    #[error("failed to read rules file {path}: {source}")]
    ReadError {
        /// Path to the rules file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Failed to parse the rules file.
    #[error("failed to parse rules file {path}: {source}")]
    ParseError {
        /// Path to the rules file.
        path: PathBuf,
        /// Underlying TOML error.
        source: toml::de::Error,
    },
    /// Rules parsed but cannot be played.
    #[error("unplayable rules in {path}: {reason}")]
    Invalid {
        /// Path to the rules file.
        path: PathBuf,
        /// What is wrong.
        reason: String,
    },
}

/// Directory holding one JSON record per match.
pub fn matches_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("matches")
}

fn current_path(data_dir: &Path) -> PathBuf {
    data_dir.join("current")
}

/// Remember which match commands act on by default.
pub fn set_current(data_dir: &Path, id: MatchId) -> Result<()> {
    std::fs::write(current_path(data_dir), id.to_string())
        .context("Failed to record current match")
}

/// The match commands act on by default, if one was started.
pub fn current(data_dir: &Path) -> Result<Option<MatchId>> {
    let path = current_path(data_dir);
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(&path).context("Failed to read current match")?;
    let id = contents
        .parse()
        .with_context(|| format!("Invalid match id in {}", path.display()))?;
    Ok(Some(id))
}

/// Resolve an explicit `--match` or fall back to the current match.
pub fn resolve_match(data_dir: &Path, explicit: Option<MatchId>) -> Result<MatchId> {
    match explicit {
        Some(id) => Ok(id),
        None => current(data_dir)?
            .context("No current match. Run 'court new' first or pass --match <ID>."),
    }
}
