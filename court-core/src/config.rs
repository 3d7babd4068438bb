//! Match rulesets.
//!
//! A [`MatchConfiguration`] is an immutable snapshot of the rules a match is
//! played under. Each [`MatchState`](crate::MatchState) owns its own copy, so
//! editing a ruleset after a match started can never change that match.

use court_types::{MatchError, Side, TeamSize};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default winning score.
pub const DEFAULT_WINNING_SCORE: u32 = 11;

/// Combined score at which the default policy swaps ends.
pub const DEFAULT_SWITCH_AT: u32 = 6;

/// When the two sides swap court ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SideSwitchPolicy {
    /// Swap after every point.
    EveryPoint,
    /// Swap once when the combined score reaches half the winning score (rounded up).
    AtHalfway,
    /// Swap once when the combined score reaches 6.
    #[default]
    DefaultAtCombinedSix,
    /// Swap once when the combined score reaches the given value.
    Custom(u32),
}

impl SideSwitchPolicy {
    /// Combined score at which a single swap happens, `None` for [`EveryPoint`](Self::EveryPoint).
    pub fn threshold(self, winning_score: u32) -> Option<u32> {
        match self {
            SideSwitchPolicy::EveryPoint => None,
            SideSwitchPolicy::AtHalfway => Some(winning_score.div_ceil(2)),
            SideSwitchPolicy::DefaultAtCombinedSix => Some(DEFAULT_SWITCH_AT),
            SideSwitchPolicy::Custom(n) => Some(n),
        }
    }

    /// Whether the sides stand at swapped ends for this combined score.
    ///
    /// Pure function of the score, so recomputing after an undo lands on
    /// the same ends as the original point did.
    pub fn is_switched(self, winning_score: u32, combined: u32) -> bool {
        match self.threshold(winning_score) {
            None => combined % 2 == 1,
            Some(threshold) => combined >= threshold,
        }
    }
}

/// Immutable ruleset for one match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfiguration {
    /// Score a side needs to win.
    #[serde(default = "default_winning_score")]
    pub winning_score: u32,
    /// Whether the winner must lead by at least two.
    #[serde(default = "default_win_by_two")]
    pub win_by_two: bool,
    /// Players per side.
    #[serde(default = "default_team_size")]
    pub team_size: TeamSize,
    /// When the sides swap ends.
    #[serde(default)]
    pub side_switch: SideSwitchPolicy,
    /// Optional cap on playing time, in whole seconds on the wire.
    #[serde(default, with = "optional_secs", skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<Duration>,
    /// Optional cap on the number of scored rallies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_rallies: Option<u32>,
    /// Side that serves first.
    #[serde(default = "default_starting_side")]
    pub starting_side: Side,
}

fn default_winning_score() -> u32 {
    DEFAULT_WINNING_SCORE
}

fn default_win_by_two() -> bool {
    true
}

fn default_team_size() -> TeamSize {
    TeamSize::Doubles
}

fn default_starting_side() -> Side {
    Side::A
}

impl Default for MatchConfiguration {
    fn default() -> Self {
        Self {
            winning_score: default_winning_score(),
            win_by_two: default_win_by_two(),
            team_size: default_team_size(),
            side_switch: SideSwitchPolicy::default(),
            time_limit: None,
            max_rallies: None,
            starting_side: default_starting_side(),
        }
    }
}

impl MatchConfiguration {
    /// Standard singles game to 11, win by two.
    pub fn singles() -> Self {
        Self {
            team_size: TeamSize::Singles,
            ..Self::default()
        }
    }

    /// Standard doubles game to 11, win by two.
    pub fn doubles() -> Self {
        Self::default()
    }

    /// Same ruleset with a different winning score.
    pub fn with_winning_score(mut self, winning_score: u32) -> Self {
        self.winning_score = winning_score;
        self
    }

    /// Same ruleset with win-by-two toggled.
    pub fn with_win_by_two(mut self, win_by_two: bool) -> Self {
        self.win_by_two = win_by_two;
        self
    }

    /// Same ruleset with another side-switch policy.
    pub fn with_side_switch(mut self, policy: SideSwitchPolicy) -> Self {
        self.side_switch = policy;
        self
    }

    /// Same ruleset with a playing-time cap.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Same ruleset with a rally cap.
    pub fn with_max_rallies(mut self, max: u32) -> Self {
        self.max_rallies = Some(max);
        self
    }

    /// Same ruleset with another first server.
    pub fn with_starting_side(mut self, side: Side) -> Self {
        self.starting_side = side;
        self
    }

    /// Whether partner rotation applies.
    pub fn is_doubles(&self) -> bool {
        self.team_size == TeamSize::Doubles
    }

    /// Check the ruleset can actually be played.
    pub fn validate(&self) -> Result<(), MatchError> {
        if self.winning_score == 0 {
            return Err(MatchError::InvalidConfiguration(
                "winning score must be at least 1".into(),
            ));
        }
        if let SideSwitchPolicy::Custom(0) = self.side_switch {
            return Err(MatchError::InvalidConfiguration(
                "custom side switch threshold must be at least 1".into(),
            ));
        }
        if self.max_rallies == Some(0) {
            return Err(MatchError::InvalidConfiguration(
                "max rallies must be at least 1".into(),
            ));
        }
        if self.time_limit == Some(Duration::ZERO) {
            return Err(MatchError::InvalidConfiguration(
                "time limit must be non-zero".into(),
            ));
        }
        // Serialized as whole seconds.
        if self.time_limit.is_some_and(|limit| limit.subsec_nanos() != 0) {
            return Err(MatchError::InvalidConfiguration(
                "time limit must be a whole number of seconds".into(),
            ));
        }
        Ok(())
    }
}

/// `Option<Duration>` as whole seconds.
mod optional_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_some(&d.as_secs()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(d)?.map(Duration::from_secs))
    }
}
