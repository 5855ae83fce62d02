//! In-memory record store
//!
//! Backs the CLI and the test-suite. Tables keep insertion order so query
//! results are stable from run to run.

use crate::error::{EngineError, Result};
use crate::storage::{MatchFilter, RecordStore, TournamentFilter};
use crate::types::{
    Game, GameId, Match, MatchId, MatchSnapshot, PlacementResult, Player, PlayerId, RatingRecord,
    ResultId, Series, SeriesId, Tournament, TournamentId,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Serializable snapshot of every table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dataset {
    pub players: Vec<Player>,
    pub games: Vec<Game>,
    pub series: Vec<Series>,
    pub tournaments: Vec<Tournament>,
    pub matches: Vec<Match>,
    pub results: Vec<PlacementResult>,
    pub ratings: Vec<RatingRecord>,
}

/// Record store kept entirely in process memory
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Dataset>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_dataset(dataset: Dataset) -> Self {
        Self {
            tables: RwLock::new(dataset),
        }
    }

    /// Copy of every table as currently stored
    pub fn dataset(&self) -> Result<Dataset> {
        Ok(self.read()?.clone())
    }

    pub fn insert_player(&self, player: Player) -> Result<()> {
        self.write()?.players.push(player);
        Ok(())
    }

    pub fn insert_game(&self, game: Game) -> Result<()> {
        self.write()?.games.push(game);
        Ok(())
    }

    pub fn insert_series(&self, series: Series) -> Result<()> {
        self.write()?.series.push(series);
        Ok(())
    }

    pub fn insert_tournament(&self, tournament: Tournament) -> Result<()> {
        self.write()?.tournaments.push(tournament);
        Ok(())
    }

    pub fn insert_match(&self, m: Match) -> Result<()> {
        self.write()?.matches.push(m);
        Ok(())
    }

    pub fn insert_result(&self, result: PlacementResult) -> Result<()> {
        self.write()?.results.push(result);
        Ok(())
    }

    pub fn get_match(&self, match_id: MatchId) -> Result<Option<Match>> {
        Ok(self.read()?.matches.iter().find(|m| m.id == match_id).cloned())
    }

    pub fn get_result(&self, result_id: ResultId) -> Result<Option<PlacementResult>> {
        Ok(self
            .read()?
            .results
            .iter()
            .find(|r| r.id == result_id)
            .cloned())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Dataset>> {
        self.tables
            .read()
            .map_err(|_| EngineError::persistence("Failed to acquire tables read lock"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Dataset>> {
        self.tables
            .write()
            .map_err(|_| EngineError::persistence("Failed to acquire tables write lock"))
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn get_game(&self, game_id: GameId) -> Result<Option<Game>> {
        Ok(self.read()?.games.iter().find(|g| g.id == game_id).cloned())
    }

    async fn get_series(&self, series_id: SeriesId) -> Result<Option<Series>> {
        Ok(self
            .read()?
            .series
            .iter()
            .find(|s| s.id == series_id)
            .cloned())
    }

    async fn get_tournament(&self, tournament_id: TournamentId) -> Result<Option<Tournament>> {
        Ok(self
            .read()?
            .tournaments
            .iter()
            .find(|t| t.id == tournament_id)
            .cloned())
    }

    async fn get_player(&self, player_id: PlayerId) -> Result<Option<Player>> {
        Ok(self
            .read()?
            .players
            .iter()
            .find(|p| p.id == player_id)
            .cloned())
    }

    async fn list_tournaments(&self, filter: TournamentFilter) -> Result<Vec<Tournament>> {
        Ok(self
            .read()?
            .tournaments
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect())
    }

    async fn list_matches(&self, filter: MatchFilter) -> Result<Vec<Match>> {
        let mut matches: Vec<Match> = self
            .read()?
            .matches
            .iter()
            .filter(|m| filter.matches(m))
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.start_time.cmp(&b.start_time));
        Ok(matches)
    }

    async fn update_match_snapshot(
        &self,
        match_id: MatchId,
        snapshot: MatchSnapshot,
    ) -> Result<()> {
        let mut tables = self.write()?;
        let m = tables
            .matches
            .iter_mut()
            .find(|m| m.id == match_id)
            .ok_or_else(|| EngineError::persistence(format!("Match {} does not exist", match_id)))?;
        m.snapshot = Some(snapshot);
        Ok(())
    }

    async fn delete_ratings(&self, game_id: GameId) -> Result<usize> {
        let mut tables = self.write()?;
        let before = tables.ratings.len();
        tables.ratings.retain(|r| r.game_id != game_id);
        Ok(before - tables.ratings.len())
    }

    async fn create_rating(&self, record: RatingRecord) -> Result<()> {
        let mut tables = self.write()?;
        let exists = tables
            .ratings
            .iter()
            .any(|r| r.game_id == record.game_id && r.player_id == record.player_id);
        if exists {
            return Err(EngineError::persistence(format!(
                "Rating for player {} in game {} already exists",
                record.player_id, record.game_id
            )));
        }
        tables.ratings.push(record);
        Ok(())
    }

    async fn list_ratings(&self, game_id: GameId) -> Result<Vec<RatingRecord>> {
        Ok(self
            .read()?
            .ratings
            .iter()
            .filter(|r| r.game_id == game_id)
            .cloned()
            .collect())
    }

    async fn list_results(&self, tournament_ids: &[TournamentId]) -> Result<Vec<PlacementResult>> {
        let tables = self.read()?;
        let results = &tables.results;
        Ok(tournament_ids
            .iter()
            .flat_map(|tournament_id| {
                results
                    .iter()
                    .filter(move |r| r.tournament_id == *tournament_id)
            })
            .cloned()
            .collect())
    }

    async fn update_result_elo(
        &self,
        result_id: ResultId,
        elo_before: Option<f64>,
        elo_after: Option<f64>,
    ) -> Result<()> {
        let mut tables = self.write()?;
        let result = tables
            .results
            .iter_mut()
            .find(|r| r.id == result_id)
            .ok_or_else(|| {
                EngineError::persistence(format!("Result {} does not exist", result_id))
            })?;
        result.elo_before = elo_before;
        result.elo_after = elo_after;
        Ok(())
    }
}
