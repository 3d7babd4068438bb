//! Start a new match.

use anyhow::{Context, Result};
use court_core::{MatchConfiguration, MatchId, MatchKernel, SideSwitchPolicy, TeamSize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::commands::{save, status};
use crate::config;
use crate::store::FileStore;

/// Overrides applied on top of the rules file (or the standard rules).
#[derive(Debug, Default, Clone)]
pub struct NewOptions {
    /// TOML rules file.
    pub rules: Option<PathBuf>,
    /// Force singles or doubles.
    pub team_size: Option<TeamSize>,
    /// Winning score.
    pub to: Option<u32>,
    /// Drop the two-point lead requirement.
    pub no_win_by_two: bool,
    /// Side-switch policy.
    pub switch: Option<SideSwitchPolicy>,
    /// Time limit in seconds.
    pub time_limit: Option<u64>,
    /// Rally cap.
    pub max_rallies: Option<u32>,
    /// First serving side.
    pub first: Option<court_core::Side>,
}

impl NewOptions {
    fn configuration(&self) -> Result<MatchConfiguration> {
        let mut rules = match &self.rules {
            Some(path) => config::load_rules(path)?,
            None => MatchConfiguration::default(),
        };
        if let Some(team_size) = self.team_size {
            rules.team_size = team_size;
        }
        if let Some(to) = self.to {
            rules.winning_score = to;
        }
        if self.no_win_by_two {
            rules.win_by_two = false;
        }
        if let Some(policy) = self.switch {
            rules.side_switch = policy;
        }
        if let Some(secs) = self.time_limit {
            rules.time_limit = Some(Duration::from_secs(secs));
        }
        if let Some(max) = self.max_rallies {
            rules.max_rallies = Some(max);
        }
        if let Some(side) = self.first {
            rules.starting_side = side;
        }
        Ok(rules)
    }
}

/// Parse a `--switch` value: `every-point`, `halfway`, `six` or a number.
pub fn parse_switch(value: &str) -> Result<SideSwitchPolicy, String> {
    match value {
        "every-point" | "every_point" => Ok(SideSwitchPolicy::EveryPoint),
        "halfway" => Ok(SideSwitchPolicy::AtHalfway),
        "six" | "default" => Ok(SideSwitchPolicy::DefaultAtCombinedSix),
        other => other
            .parse::<u32>()
            .map(SideSwitchPolicy::Custom)
            .map_err(|_| format!("expected every-point, halfway, six or a number, got '{other}'")),
    }
}

/// Run the new command. The new match becomes the current one.
pub fn run(data_dir: &Path, options: &NewOptions) -> Result<MatchId> {
    let rules = options.configuration()?;
    let kernel = MatchKernel::new(rules).context("Cannot start match")?;

    let mut store = FileStore::open(data_dir).context("Failed to open match store")?;
    save(&mut store, &kernel)?;
    config::set_current(data_dir, kernel.id())?;

    println!("Started match {}", kernel.id());
    println!();
    print!("{}", status::render(&kernel));
    Ok(kernel.id())
}
