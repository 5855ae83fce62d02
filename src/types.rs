//! Common types used throughout the rating engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for players
pub type PlayerId = Uuid;

/// Unique identifier for games (one rating space per game)
pub type GameId = Uuid;

/// Unique identifier for tournament series
pub type SeriesId = Uuid;

/// Unique identifier for tournaments
pub type TournamentId = Uuid;

/// Unique identifier for matches
pub type MatchId = Uuid;

/// Unique identifier for placement results
pub type ResultId = Uuid;

/// A competitor, identified across every game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub handle: String,
}

/// A title that owns its own rating space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub name: String,
}

/// A recurring circuit grouping tournaments for standings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub id: SeriesId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub game_id: GameId,
    #[serde(default)]
    pub series_id: Option<SeriesId>,
    pub name: String,
}

/// Game count for each side of a single game (or a whole set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScorePair {
    pub p1: u32,
    pub p2: u32,
}

impl ScorePair {
    pub fn new(p1: u32, p2: u32) -> Self {
        Self { p1, p2 }
    }
}

/// Recorded score of a match: either a summed set score or game-by-game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MatchScore {
    Single(ScorePair),
    Series(Vec<ScorePair>),
}

impl MatchScore {
    /// View the score as a list of pairs
    pub fn pairs(&self) -> &[ScorePair] {
        match self {
            MatchScore::Single(pair) => std::slice::from_ref(pair),
            MatchScore::Series(pairs) => pairs,
        }
    }
}

/// Rating state written onto a match by the replay engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub player1_elo_before: f64,
    pub player1_elo_after: f64,
    pub player1_matches_before: u32,
    pub player2_elo_before: f64,
    pub player2_elo_after: f64,
    pub player2_matches_before: u32,
}

impl MatchSnapshot {
    /// Pre-match rating of the given player, if they took part
    pub fn elo_before(&self, m: &Match, player_id: PlayerId) -> Option<f64> {
        match m.side_of(player_id)? {
            Side::Player1 => Some(self.player1_elo_before),
            Side::Player2 => Some(self.player2_elo_before),
        }
    }

    /// Post-match rating of the given player, if they took part
    pub fn elo_after(&self, m: &Match, player_id: PlayerId) -> Option<f64> {
        match m.side_of(player_id)? {
            Side::Player1 => Some(self.player1_elo_after),
            Side::Player2 => Some(self.player2_elo_after),
        }
    }
}

/// Which slot of a match a player occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Player1,
    Player2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    pub player1: PlayerId,
    pub player2: PlayerId,
    pub winner: PlayerId,
    pub score: MatchScore,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Round label, e.g. "Winners Semi-Final"
    #[serde(default)]
    pub round: Option<String>,
    /// Bracket round number; negative values denote losers side
    #[serde(default)]
    pub round_number: Option<i32>,
    /// Derived; only ever written by the replay engine
    #[serde(default)]
    pub snapshot: Option<MatchSnapshot>,
}

impl Match {
    pub fn involves(&self, player_id: PlayerId) -> bool {
        self.player1 == player_id || self.player2 == player_id
    }

    pub fn side_of(&self, player_id: PlayerId) -> Option<Side> {
        if self.player1 == player_id {
            Some(Side::Player1)
        } else if self.player2 == player_id {
            Some(Side::Player2)
        } else {
            None
        }
    }
}

/// One placement of a player in a tournament
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementResult {
    pub id: ResultId,
    pub tournament_id: TournamentId,
    pub player_id: PlayerId,
    pub rank: u32,
    /// Derived; only ever written by the replay engine
    #[serde(default)]
    pub elo_before: Option<f64>,
    /// Derived; only ever written by the replay engine
    #[serde(default)]
    pub elo_after: Option<f64>,
}

impl PlacementResult {
    /// Rating gained (or lost) over the tournament
    pub fn rating_delta(&self) -> Option<f64> {
        Some(self.elo_after? - self.elo_before?)
    }
}

/// Current rating of a player within one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingRecord {
    pub player_id: PlayerId,
    pub game_id: GameId,
    pub rating: f64,
    pub matches_played: u32,
}

/// Row of the per-game leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub player_id: PlayerId,
    pub handle: Option<String>,
    pub rating: f64,
    pub matches_played: u32,
}

/// Row of a points standings table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub player_id: PlayerId,
    pub handle: Option<String>,
    pub total_score: u32,
    /// Ranks that contributed to the total, in input order
    pub ranks: Vec<u32>,
}
