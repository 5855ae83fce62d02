//! Test fixtures and store wrappers for integration testing

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use fgc_ratings::error::{EngineError, Result};
use fgc_ratings::storage::{Dataset, InMemoryStore, MatchFilter, RecordStore, TournamentFilter};
use fgc_ratings::types::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Fluent builder for datasets with a fixed clock
pub struct DatasetBuilder {
    dataset: Dataset,
    epoch: DateTime<Utc>,
}

impl DatasetBuilder {
    pub fn new() -> Self {
        Self {
            dataset: Dataset::default(),
            epoch: Utc.with_ymd_and_hms(2024, 1, 6, 12, 0, 0).unwrap(),
        }
    }

    pub fn player(&mut self, handle: &str) -> PlayerId {
        let id = Uuid::new_v4();
        self.dataset.players.push(Player {
            id,
            handle: handle.to_string(),
        });
        id
    }

    pub fn game(&mut self, name: &str) -> GameId {
        let id = Uuid::new_v4();
        self.dataset.games.push(Game {
            id,
            name: name.to_string(),
        });
        id
    }

    pub fn series(&mut self, name: &str) -> SeriesId {
        let id = Uuid::new_v4();
        self.dataset.series.push(Series {
            id,
            name: name.to_string(),
        });
        id
    }

    pub fn tournament(&mut self, game_id: GameId, series_id: Option<SeriesId>) -> TournamentId {
        let id = Uuid::new_v4();
        self.dataset.tournaments.push(Tournament {
            id,
            game_id,
            series_id,
            name: format!("Tournament {}", self.dataset.tournaments.len() + 1),
        });
        id
    }

    /// Match starting `minutes` after the builder epoch
    pub fn game_match(
        &mut self,
        tournament_id: TournamentId,
        player1: PlayerId,
        player2: PlayerId,
        score: MatchScore,
        minutes: i64,
    ) -> MatchId {
        let id = Uuid::new_v4();
        let totals = score.pairs().iter().fold((0, 0), |(a, b), p| (a + p.p1, b + p.p2));
        let start = self.epoch + Duration::minutes(minutes);
        self.dataset.matches.push(Match {
            id,
            tournament_id,
            player1,
            player2,
            winner: if totals.0 >= totals.1 { player1 } else { player2 },
            score,
            start_time: start,
            end_time: start + Duration::minutes(25),
            round: Some(format!("Round {}", minutes)),
            round_number: None,
            snapshot: None,
        });
        id
    }

    /// Shorthand for a match with a summed set score
    pub fn set(
        &mut self,
        tournament_id: TournamentId,
        player1: PlayerId,
        player2: PlayerId,
        p1: u32,
        p2: u32,
        minutes: i64,
    ) -> MatchId {
        self.game_match(
            tournament_id,
            player1,
            player2,
            MatchScore::Single(ScorePair::new(p1, p2)),
            minutes,
        )
    }

    pub fn result(&mut self, tournament_id: TournamentId, player_id: PlayerId, rank: u32) -> ResultId {
        let id = Uuid::new_v4();
        self.dataset.results.push(PlacementResult {
            id,
            tournament_id,
            player_id,
            rank,
            elo_before: None,
            elo_after: None,
        });
        id
    }

    pub fn stale_rating(&mut self, game_id: GameId, player_id: PlayerId, rating: f64) {
        self.dataset.ratings.push(RatingRecord {
            player_id,
            game_id,
            rating,
            matches_played: 99,
        });
    }

    pub fn build(self) -> Dataset {
        self.dataset
    }
}

/// Match snapshots keyed by match id, for comparing runs
pub fn snapshots(dataset: &Dataset) -> Vec<(MatchId, Option<MatchSnapshot>)> {
    let mut snapshots: Vec<_> = dataset.matches.iter().map(|m| (m.id, m.snapshot)).collect();
    snapshots.sort_by_key(|(id, _)| *id);
    snapshots
}

/// Rating records of a game ordered by player
pub fn ratings(dataset: &Dataset, game_id: GameId) -> Vec<RatingRecord> {
    let mut ratings: Vec<_> = dataset
        .ratings
        .iter()
        .filter(|r| r.game_id == game_id)
        .cloned()
        .collect();
    ratings.sort_by_key(|r| r.player_id);
    ratings
}

/// Record store that starts failing every write after a fixed budget
pub struct FailingStore {
    inner: Arc<InMemoryStore>,
    writes_left: AtomicUsize,
}

impl FailingStore {
    pub fn new(inner: Arc<InMemoryStore>, allowed_writes: usize) -> Self {
        Self {
            inner,
            writes_left: AtomicUsize::new(allowed_writes),
        }
    }

    fn spend_write(&self) -> Result<()> {
        self.writes_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .map(|_| ())
            .map_err(|_| EngineError::persistence("simulated write failure"))
    }
}

#[async_trait]
impl RecordStore for FailingStore {
    async fn get_game(&self, game_id: GameId) -> Result<Option<Game>> {
        self.inner.get_game(game_id).await
    }

    async fn get_series(&self, series_id: SeriesId) -> Result<Option<Series>> {
        self.inner.get_series(series_id).await
    }

    async fn get_tournament(&self, tournament_id: TournamentId) -> Result<Option<Tournament>> {
        self.inner.get_tournament(tournament_id).await
    }

    async fn get_player(&self, player_id: PlayerId) -> Result<Option<Player>> {
        self.inner.get_player(player_id).await
    }

    async fn list_tournaments(&self, filter: TournamentFilter) -> Result<Vec<Tournament>> {
        self.inner.list_tournaments(filter).await
    }

    async fn list_matches(&self, filter: MatchFilter) -> Result<Vec<Match>> {
        self.inner.list_matches(filter).await
    }

    async fn update_match_snapshot(
        &self,
        match_id: MatchId,
        snapshot: MatchSnapshot,
    ) -> Result<()> {
        self.spend_write()?;
        self.inner.update_match_snapshot(match_id, snapshot).await
    }

    async fn delete_ratings(&self, game_id: GameId) -> Result<usize> {
        self.spend_write()?;
        self.inner.delete_ratings(game_id).await
    }

    async fn create_rating(&self, record: RatingRecord) -> Result<()> {
        self.spend_write()?;
        self.inner.create_rating(record).await
    }

    async fn list_ratings(&self, game_id: GameId) -> Result<Vec<RatingRecord>> {
        self.inner.list_ratings(game_id).await
    }

    async fn list_results(&self, tournament_ids: &[TournamentId]) -> Result<Vec<PlacementResult>> {
        self.inner.list_results(tournament_ids).await
    }

    async fn update_result_elo(
        &self,
        result_id: ResultId,
        elo_before: Option<f64>,
        elo_after: Option<f64>,
    ) -> Result<()> {
        self.spend_write()?;
        self.inner
            .update_result_elo(result_id, elo_before, elo_after)
            .await
    }
}
