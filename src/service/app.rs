//! Rating service
//!
//! This module wires the replay engine and the standings aggregator to a
//! record store and exposes the operations the surrounding API layer calls.
//! Identifiers and limits arrive as raw strings and are validated here.

use crate::config::AppConfig;
use crate::error::{EngineError, Result};
use crate::rating::RatingModel;
use crate::replay::{ReplayEngine, ReplayOptions, ReplaySummary};
use crate::standings::{PointsTable, StandingsAggregator, TournamentSelection};
use crate::storage::RecordStore;
use crate::types::{GameId, LeaderboardEntry, Standing};
use crate::utils::{parse_id, parse_limit};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

pub struct RatingService {
    store: Arc<dyn RecordStore>,
    engine: ReplayEngine,
    standings: StandingsAggregator,
    config: AppConfig,
    /// One lock per game so recomputations of the same game never overlap
    recompute_locks: Mutex<HashMap<GameId, Arc<Mutex<()>>>>,
}

impl RatingService {
    /// Build the service from validated configuration
    pub fn new(store: Arc<dyn RecordStore>, config: AppConfig) -> Result<Self> {
        let model = RatingModel::from_config(&config.rating)?;
        let engine = ReplayEngine::new(
            Arc::clone(&store),
            model,
            ReplayOptions::from_config(&config),
        );
        let standings = StandingsAggregator::new(
            Arc::clone(&store),
            PointsTable::new(config.standings.points_table.clone()),
        );

        Ok(Self {
            store,
            engine,
            standings,
            config,
            recompute_locks: Mutex::new(HashMap::new()),
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Recompute every rating of a game from its full match history
    ///
    /// Requests for the same game queue behind each other; different games
    /// proceed independently.
    pub async fn recompute_ratings(&self, game_id: &str) -> Result<ReplaySummary> {
        let game_id = parse_id(game_id)?;

        let lock = {
            let mut locks = self.recompute_locks.lock().await;
            Arc::clone(locks.entry(game_id).or_default())
        };

        let outcome = {
            let _guard = lock.lock().await;
            info!(%game_id, "Recompute requested");
            self.engine.recompute(game_id).await.inspect_err(|e| {
                warn!(%game_id, "Recompute failed: {}", e);
            })
        };

        self.release_lock(game_id, lock).await;
        outcome
    }

    /// Drop the per-game lock once no other request is holding or waiting on it
    async fn release_lock(&self, game_id: GameId, lock: Arc<Mutex<()>>) {
        let mut locks = self.recompute_locks.lock().await;
        // The map and `lock` itself account for two references
        if Arc::strong_count(&lock) == 2 {
            locks.remove(&game_id);
        }
    }

    /// Rated players of a game with enough matches, highest rating first
    ///
    /// `min_matches` falls back to the configured threshold; players need
    /// strictly more matches than it.
    pub async fn leaderboard(
        &self,
        game_id: &str,
        min_matches: Option<u32>,
        limit: Option<&str>,
    ) -> Result<Vec<LeaderboardEntry>> {
        let game_id = parse_id(game_id)?;
        let limit = match limit {
            Some(raw) => Some(parse_limit(raw)?),
            None => self.config.leaderboard.default_limit,
        };
        let min_matches = min_matches.unwrap_or(self.config.leaderboard.min_matches);

        if self.store.get_game(game_id).await?.is_none() {
            return Err(EngineError::GameNotFound { game_id });
        }

        let mut records: Vec<_> = self
            .store
            .list_ratings(game_id)
            .await?
            .into_iter()
            .filter(|r| r.matches_played > min_matches)
            .collect();
        records.sort_by(|a, b| {
            b.rating
                .total_cmp(&a.rating)
                .then(a.player_id.cmp(&b.player_id))
        });
        if let Some(limit) = limit {
            records.truncate(limit);
        }

        let mut entries = Vec::with_capacity(records.len());
        for record in records {
            let handle = self
                .store
                .get_player(record.player_id)
                .await?
                .map(|p| p.handle);
            entries.push(LeaderboardEntry {
                player_id: record.player_id,
                handle,
                rating: record.rating,
                matches_played: record.matches_played,
            });
        }

        Ok(entries)
    }

    pub async fn standings_for_game(
        &self,
        game_id: &str,
        limit: Option<&str>,
    ) -> Result<Vec<Standing>> {
        let selection = TournamentSelection::Game(parse_id(game_id)?);
        self.standings(selection, limit).await
    }

    pub async fn standings_for_series(
        &self,
        series_id: &str,
        limit: Option<&str>,
    ) -> Result<Vec<Standing>> {
        let selection = TournamentSelection::Series(parse_id(series_id)?);
        self.standings(selection, limit).await
    }

    pub async fn standings_for_tournaments(
        &self,
        tournament_ids: &[&str],
        limit: Option<&str>,
    ) -> Result<Vec<Standing>> {
        let ids = tournament_ids
            .iter()
            .map(|id| parse_id(id))
            .collect::<Result<Vec<_>>>()?;
        self.standings(TournamentSelection::Tournaments(ids), limit)
            .await
    }

    async fn standings(
        &self,
        selection: TournamentSelection,
        limit: Option<&str>,
    ) -> Result<Vec<Standing>> {
        let limit = limit.map(parse_limit).transpose()?;
        self.standings.standings(&selection, limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStore;
    use crate::types::Game;
    use uuid::Uuid;

    fn service_with_game() -> (RatingService, GameId) {
        let store = Arc::new(InMemoryStore::new());
        let game_id = Uuid::new_v4();
        store
            .insert_game(Game {
                id: game_id,
                name: "Granblue Fantasy Versus".to_string(),
            })
            .unwrap();
        let service = RatingService::new(store, AppConfig::default()).unwrap();
        (service, game_id)
    }

    #[tokio::test]
    async fn test_recompute_lock_released_after_run() {
        let (service, game_id) = service_with_game();

        service.recompute_ratings(&game_id.to_string()).await.unwrap();
        assert!(service.recompute_locks.lock().await.is_empty());

        let missing = Uuid::new_v4().to_string();
        assert!(service.recompute_ratings(&missing).await.is_err());
        assert!(service.recompute_locks.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_recomputes_share_and_release_lock() {
        let (service, game_id) = service_with_game();
        let id = game_id.to_string();

        let (first, second) = tokio::join!(
            service.recompute_ratings(&id),
            service.recompute_ratings(&id)
        );
        assert!(first.is_ok() && second.is_ok());
        assert!(service.recompute_locks.lock().await.is_empty());
    }
}
