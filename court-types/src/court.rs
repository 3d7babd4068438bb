//! Court vocabulary: sides, serve positions, lifecycle and team size.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::MatchError;

/// One of the two logical sides of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Side {
    /// The side listed first on the scoreboard.
    A = 0,
    /// The side listed second on the scoreboard.
    B = 1,
}

impl Side {
    /// The other side.
    pub fn opponent(self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

impl TryFrom<u8> for Side {
    type Error = MatchError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Side::A),
            1 => Ok(Side::B),
            _ => Err(MatchError::InvalidSideSelector(value.to_string())),
        }
    }
}

impl FromStr for Side {
    type Err = MatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "a" | "A" => Ok(Side::A),
            "b" | "B" => Ok(Side::B),
            other => Err(MatchError::InvalidSideSelector(other.to_string())),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::A => write!(f, "A"),
            Side::B => write!(f, "B"),
        }
    }
}

/// Half of the court the server stands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServePosition {
    /// Left service court.
    Left,
    /// Right service court.
    Right,
}

impl ServePosition {
    /// Position for a combined score: right on even, left on odd.
    pub fn for_combined(combined: u32) -> Self {
        if combined % 2 == 0 {
            ServePosition::Right
        } else {
            ServePosition::Left
        }
    }
}

/// Where a match is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lifecycle {
    /// Created, nothing played yet.
    Initial,
    /// Waiting for the next serve.
    Serving,
    /// A rally is in progress.
    Playing,
    /// Play suspended by the operator.
    Paused,
    /// Match over.
    Completed,
}

/// Players per side.
///
/// Serialized as the integer `1` or `2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TeamSize {
    /// One player per side.
    Singles,
    /// Two players per side.
    Doubles,
}

impl TeamSize {
    /// Number of players on each side.
    pub fn players(self) -> u8 {
        match self {
            TeamSize::Singles => 1,
            TeamSize::Doubles => 2,
        }
    }
}

impl TryFrom<u8> for TeamSize {
    type Error = MatchError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(TeamSize::Singles),
            2 => Ok(TeamSize::Doubles),
            other => Err(MatchError::InvalidConfiguration(format!(
                "team size must be 1 or 2, got {other}"
            ))),
        }
    }
}

impl From<TeamSize> for u8 {
    fn from(size: TeamSize) -> Self {
        size.players()
    }
}

/// Which partner of the serving side is serving (doubles).
///
/// Only ever holds 1 or 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ServerIndex(u8);

impl ServerIndex {
    /// First server of a side.
    pub const FIRST: ServerIndex = ServerIndex(1);
    /// Second server of a side.
    pub const SECOND: ServerIndex = ServerIndex(2);

    /// Validate a raw server index.
    pub fn new(value: u8) -> Result<Self, MatchError> {
        match value {
            1 | 2 => Ok(Self(value)),
            other => Err(MatchError::InvalidServerIndex(other)),
        }
    }

    /// Numeric value (1 or 2).
    pub fn value(self) -> u8 {
        self.0
    }

    /// The partner's index.
    pub fn other(self) -> Self {
        if self.0 == 1 {
            Self::SECOND
        } else {
            Self::FIRST
        }
    }
}

impl Default for ServerIndex {
    fn default() -> Self {
        Self::FIRST
    }
}

impl TryFrom<u8> for ServerIndex {
    type Error = MatchError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ServerIndex> for u8 {
    fn from(index: ServerIndex) -> Self {
        index.0
    }
}

impl fmt::Display for ServerIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_opponent() {
        assert_eq!(Side::A.opponent(), Side::B);
        assert_eq!(Side::B.opponent(), Side::A);
    }

    #[test]
    fn side_parses_either_case() {
        assert_eq!("a".parse::<Side>().unwrap(), Side::A);
        assert_eq!(" B ".parse::<Side>().unwrap(), Side::B);
    }

    #[test]
    fn side_rejects_unknown_selector() {
        assert_eq!(
            "c".parse::<Side>(),
            Err(MatchError::InvalidSideSelector("c".into()))
        );
        assert_eq!(
            Side::try_from(2u8),
            Err(MatchError::InvalidSideSelector("2".into()))
        );
    }

    #[test]
    fn serve_position_follows_parity() {
        assert_eq!(ServePosition::for_combined(0), ServePosition::Right);
        assert_eq!(ServePosition::for_combined(1), ServePosition::Left);
        assert_eq!(ServePosition::for_combined(14), ServePosition::Right);
    }

    #[test]
    fn server_index_only_accepts_one_or_two() {
        assert_eq!(ServerIndex::new(1).unwrap(), ServerIndex::FIRST);
        assert_eq!(ServerIndex::new(2).unwrap(), ServerIndex::SECOND);
        assert_eq!(ServerIndex::new(0), Err(MatchError::InvalidServerIndex(0)));
        assert_eq!(ServerIndex::new(3), Err(MatchError::InvalidServerIndex(3)));
    }

    #[test]
    fn server_index_other() {
        assert_eq!(ServerIndex::FIRST.other(), ServerIndex::SECOND);
        assert_eq!(ServerIndex::SECOND.other(), ServerIndex::FIRST);
    }

    #[test]
    fn team_size_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&TeamSize::Doubles).unwrap(), "2");
        let parsed: TeamSize = serde_json::from_str("1").unwrap();
        assert_eq!(parsed, TeamSize::Singles);
        assert!(serde_json::from_str::<TeamSize>("3").is_err());
    }

    #[test]
    fn server_index_deserialize_is_checked() {
        let parsed: ServerIndex = serde_json::from_str("2").unwrap();
        assert_eq!(parsed, ServerIndex::SECOND);
        assert!(serde_json::from_str::<ServerIndex>("7").is_err());
    }
}
