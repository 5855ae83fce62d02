//! Replay engine
//!
//! Rebuilds every rating of one game from its complete match history. The
//! match loop is strictly sequential because each match reads the ratings the
//! previous one produced; only the independent writes at the end fan out.

use crate::config::AppConfig;
use crate::error::{EngineError, Result};
use crate::rating::{actual_score, RatingModel};
use crate::storage::{MatchFilter, RecordStore, TournamentFilter};
use crate::types::{GameId, Match, MatchSnapshot, PlacementResult, PlayerId, RatingRecord, ResultId};
use futures::stream::{self, TryStreamExt};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Rating state of one player while a replay is running
#[derive(Debug, Clone, Copy, PartialEq)]
struct PlayerState {
    rating: f64,
    matches_played: u32,
}

/// Outcome of one full recomputation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplaySummary {
    pub game_id: GameId,
    pub matches_replayed: usize,
    pub matches_skipped: usize,
    pub players_rated: usize,
    pub ratings_removed: usize,
    pub results_updated: usize,
}

/// Replay engine parameters
#[derive(Debug, Clone)]
pub struct ReplayOptions {
    pub initial_rating: f64,
    pub round_ratings: bool,
    /// Maximum in-flight writes in the rating and result passes
    pub write_concurrency: usize,
}

impl Default for ReplayOptions {
    fn default() -> Self {
        Self {
            initial_rating: 1000.0,
            round_ratings: true,
            write_concurrency: 5,
        }
    }
}

impl ReplayOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            initial_rating: config.rating.initial_rating,
            round_ratings: config.rating.round_ratings,
            write_concurrency: config.replay.write_concurrency.max(1),
        }
    }
}

/// Deterministic full-history rating recomputation for one game
pub struct ReplayEngine {
    store: Arc<dyn RecordStore>,
    model: RatingModel,
    options: ReplayOptions,
}

impl ReplayEngine {
    pub fn new(store: Arc<dyn RecordStore>, model: RatingModel, options: ReplayOptions) -> Self {
        Self {
            store,
            model,
            options,
        }
    }

    pub fn model(&self) -> &RatingModel {
        &self.model
    }

    /// Wipe and rebuild all rating state of `game_id`
    ///
    /// Not atomic: a failure leaves whatever was already written. Running
    /// the recomputation again from scratch converges to the same state.
    /// Callers must not run two recomputations of the same game at once.
    pub async fn recompute(&self, game_id: GameId) -> Result<ReplaySummary> {
        if self.store.get_game(game_id).await?.is_none() {
            return Err(EngineError::GameNotFound { game_id });
        }

        let tournaments = self
            .store
            .list_tournaments(TournamentFilter::for_game(game_id))
            .await?;
        let tournament_ids: Vec<_> = tournaments.iter().map(|t| t.id).collect();

        let mut matches = self
            .store
            .list_matches(MatchFilter::in_tournaments(tournament_ids.clone()))
            .await?;
        sort_chronologically(&mut matches);

        info!(
            %game_id,
            tournaments = tournaments.len(),
            matches = matches.len(),
            "Starting rating replay"
        );
        if matches.is_empty() {
            warn!(%game_id, "Game has no match history, ratings will be empty");
        }

        let mut states = self.initial_states(&matches);

        let ratings_removed = self.store.delete_ratings(game_id).await?;
        debug!(%game_id, ratings_removed, "Cleared existing ratings");

        let mut matches_replayed = 0;
        let mut matches_skipped = 0;
        for m in matches.iter_mut() {
            let Some(snapshot) = self.replay_match(m, &mut states) else {
                // A snapshot loaded from an earlier run must not count as rated
                m.snapshot = None;
                matches_skipped += 1;
                continue;
            };

            if let Err(e) = self.store.update_match_snapshot(m.id, snapshot).await {
                error!(%game_id, match_id = %m.id, "Failed to persist match snapshot: {}", e);
                return Err(e);
            }
            m.snapshot = Some(snapshot);
            matches_replayed += 1;
        }

        let players_rated = states.len();
        self.persist_ratings(game_id, states).await?;

        let results = self.store.list_results(&tournament_ids).await?;
        let updates = result_updates(&results, &matches);
        let results_updated = updates.len();
        self.persist_results(game_id, updates).await?;

        let summary = ReplaySummary {
            game_id,
            matches_replayed,
            matches_skipped,
            players_rated,
            ratings_removed,
            results_updated,
        };
        info!(
            %game_id,
            matches_replayed,
            matches_skipped,
            players_rated,
            results_updated,
            "Rating replay complete"
        );

        Ok(summary)
    }

    fn initial_states(&self, matches: &[Match]) -> BTreeMap<PlayerId, PlayerState> {
        let fresh = PlayerState {
            rating: self.options.initial_rating,
            matches_played: 0,
        };

        matches
            .iter()
            .flat_map(|m| [m.player1, m.player2])
            .map(|player_id| (player_id, fresh))
            .collect()
    }

    /// Apply one match to the in-memory states and return its snapshot
    fn replay_match(
        &self,
        m: &Match,
        states: &mut BTreeMap<PlayerId, PlayerState>,
    ) -> Option<MatchSnapshot> {
        if m.player1 == m.player2 {
            warn!(match_id = %m.id, player_id = %m.player1, "Skipping match against self");
            return None;
        }

        let (Some(p1), Some(p2)) = (
            states.get(&m.player1).copied(),
            states.get(&m.player2).copied(),
        ) else {
            warn!(match_id = %m.id, "Skipping match with unknown player state");
            return None;
        };

        let expected1 = self.model.expected_score(p1.rating, p2.rating);
        let expected2 = self.model.expected_score(p2.rating, p1.rating);
        let actual1 = actual_score(m.score.pairs());
        let actual2 = 1.0 - actual1;

        let round = self.options.round_ratings;
        let after1 = self
            .model
            .new_rating(expected1, actual1, p1.rating, p1.matches_played, round);
        let after2 = self
            .model
            .new_rating(expected2, actual2, p2.rating, p2.matches_played, round);

        states.insert(
            m.player1,
            PlayerState {
                rating: after1,
                matches_played: p1.matches_played + 1,
            },
        );
        states.insert(
            m.player2,
            PlayerState {
                rating: after2,
                matches_played: p2.matches_played + 1,
            },
        );

        debug!(
            match_id = %m.id,
            player1 = %m.player1,
            player2 = %m.player2,
            before1 = p1.rating,
            after1,
            before2 = p2.rating,
            after2,
            "Replayed match"
        );

        Some(MatchSnapshot {
            player1_elo_before: p1.rating,
            player1_elo_after: after1,
            player1_matches_before: p1.matches_played,
            player2_elo_before: p2.rating,
            player2_elo_after: after2,
            player2_matches_before: p2.matches_played,
        })
    }

    async fn persist_ratings(
        &self,
        game_id: GameId,
        states: BTreeMap<PlayerId, PlayerState>,
    ) -> Result<()> {
        let records = states.into_iter().map(|(player_id, state)| {
            Ok::<_, EngineError>(RatingRecord {
                player_id,
                game_id,
                rating: state.rating,
                matches_played: state.matches_played,
            })
        });

        stream::iter(records)
            .try_for_each_concurrent(self.options.write_concurrency, |record| {
                let store = Arc::clone(&self.store);
                async move { store.create_rating(record).await }
            })
            .await
            .inspect_err(|e| error!(%game_id, "Failed to persist ratings: {}", e))
    }

    async fn persist_results(
        &self,
        game_id: GameId,
        updates: Vec<(ResultId, Option<f64>, Option<f64>)>,
    ) -> Result<()> {
        stream::iter(updates.into_iter().map(Ok::<_, EngineError>))
            .try_for_each_concurrent(
                self.options.write_concurrency,
                |(result_id, elo_before, elo_after)| {
                    let store = Arc::clone(&self.store);
                    async move {
                        store
                            .update_result_elo(result_id, elo_before, elo_after)
                            .await
                    }
                },
            )
            .await
            .inspect_err(|e| error!(%game_id, "Failed to persist result ratings: {}", e))
    }
}

/// Order matches by start time, breaking ties by id
pub fn sort_chronologically(matches: &mut [Match]) {
    matches.sort_by(|a, b| a.start_time.cmp(&b.start_time).then(a.id.cmp(&b.id)));
}

/// Rating span of every result within its own tournament
///
/// `matches` must already be replayed and in chronological order. A player
/// without rated matches in the tournament gets both fields cleared.
fn result_updates(
    results: &[PlacementResult],
    matches: &[Match],
) -> Vec<(ResultId, Option<f64>, Option<f64>)> {
    let mut by_tournament: HashMap<_, Vec<&Match>> = HashMap::new();
    for m in matches.iter().filter(|m| m.snapshot.is_some()) {
        by_tournament.entry(m.tournament_id).or_default().push(m);
    }

    results
        .iter()
        .map(|result| {
            let played: Vec<&Match> = by_tournament
                .get(&result.tournament_id)
                .map(|ms| {
                    ms.iter()
                        .copied()
                        .filter(|m| m.involves(result.player_id))
                        .collect()
                })
                .unwrap_or_default();

            let elo_before = played.first().and_then(|m| {
                m.snapshot
                    .as_ref()
                    .and_then(|s| s.elo_before(m, result.player_id))
            });
            let elo_after = played.last().and_then(|m| {
                m.snapshot
                    .as_ref()
                    .and_then(|s| s.elo_after(m, result.player_id))
            });

            (result.id, elo_before, elo_after)
        })
        .collect()
}
