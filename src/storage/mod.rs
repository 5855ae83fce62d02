//! Record storage interface
//!
//! The engine never owns persistence. It talks to the surrounding system
//! through [`RecordStore`], which stores and retrieves typed records. Every
//! call is an await point; none of them are transactional across records.

pub mod memory;

pub use memory::{Dataset, InMemoryStore};

use crate::error::Result;
use crate::types::{
    Game, GameId, Match, MatchId, MatchSnapshot, PlacementResult, Player, PlayerId, RatingRecord,
    ResultId, Series, SeriesId, Tournament, TournamentId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Tournament query; unset fields do not filter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TournamentFilter {
    pub game_id: Option<GameId>,
    pub series_id: Option<SeriesId>,
    pub ids: Option<Vec<TournamentId>>,
}

impl TournamentFilter {
    pub fn for_game(game_id: GameId) -> Self {
        Self {
            game_id: Some(game_id),
            ..Self::default()
        }
    }

    pub fn for_series(series_id: SeriesId) -> Self {
        Self {
            series_id: Some(series_id),
            ..Self::default()
        }
    }

    pub fn with_ids(ids: Vec<TournamentId>) -> Self {
        Self {
            ids: Some(ids),
            ..Self::default()
        }
    }

    pub fn matches(&self, tournament: &Tournament) -> bool {
        self.game_id.map_or(true, |id| tournament.game_id == id)
            && self
                .series_id
                .map_or(true, |id| tournament.series_id == Some(id))
            && self
                .ids
                .as_ref()
                .map_or(true, |ids| ids.contains(&tournament.id))
    }
}

/// Match query over a set of tournaments
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchFilter {
    pub tournament_ids: Vec<TournamentId>,
    pub player_id: Option<PlayerId>,
    /// Inclusive lower bound on start time
    pub started_from: Option<DateTime<Utc>>,
    /// Exclusive upper bound on start time
    pub started_before: Option<DateTime<Utc>>,
}

impl MatchFilter {
    pub fn in_tournaments(tournament_ids: Vec<TournamentId>) -> Self {
        Self {
            tournament_ids,
            ..Self::default()
        }
    }

    pub fn matches(&self, m: &Match) -> bool {
        self.tournament_ids.contains(&m.tournament_id)
            && self.player_id.map_or(true, |id| m.involves(id))
            && self.started_from.map_or(true, |from| m.start_time >= from)
            && self
                .started_before
                .map_or(true, |before| m.start_time < before)
    }
}

/// Trait for the persistence collaborator the engine reads and writes through
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get_game(&self, game_id: GameId) -> Result<Option<Game>>;

    async fn get_series(&self, series_id: SeriesId) -> Result<Option<Series>>;

    async fn get_tournament(&self, tournament_id: TournamentId) -> Result<Option<Tournament>>;

    async fn get_player(&self, player_id: PlayerId) -> Result<Option<Player>>;

    async fn list_tournaments(&self, filter: TournamentFilter) -> Result<Vec<Tournament>>;

    /// Matches satisfying the filter, ordered by start time ascending
    async fn list_matches(&self, filter: MatchFilter) -> Result<Vec<Match>>;

    /// Overwrite the derived rating snapshot of a match
    async fn update_match_snapshot(&self, match_id: MatchId, snapshot: MatchSnapshot)
        -> Result<()>;

    /// Remove every rating record of a game, returning how many were removed
    async fn delete_ratings(&self, game_id: GameId) -> Result<usize>;

    async fn create_rating(&self, record: RatingRecord) -> Result<()>;

    async fn list_ratings(&self, game_id: GameId) -> Result<Vec<RatingRecord>>;

    /// Placement results of the given tournaments, in tournament order
    async fn list_results(&self, tournament_ids: &[TournamentId]) -> Result<Vec<PlacementResult>>;

    /// Overwrite the derived rating fields of a placement result
    async fn update_result_elo(
        &self,
        result_id: ResultId,
        elo_before: Option<f64>,
        elo_after: Option<f64>,
    ) -> Result<()>;
}
