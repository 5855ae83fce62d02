//! Standings aggregator
//!
//! Converts stored placements into cumulative points and ranks players by
//! total. Independent of the rating model.

use crate::error::{EngineError, Result};
use crate::standings::points::PointsTable;
use crate::storage::{RecordStore, TournamentFilter};
use crate::types::{GameId, PlacementResult, SeriesId, Standing, TournamentId};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Which tournaments count towards a standings table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TournamentSelection {
    Game(GameId),
    Series(SeriesId),
    Tournaments(Vec<TournamentId>),
}

pub struct StandingsAggregator {
    store: Arc<dyn RecordStore>,
    points: PointsTable,
}

impl StandingsAggregator {
    pub fn new(store: Arc<dyn RecordStore>, points: PointsTable) -> Self {
        Self { store, points }
    }

    pub fn points(&self) -> &PointsTable {
        &self.points
    }

    /// Ranked standings for the selection, truncated to `limit` when given
    pub async fn standings(
        &self,
        selection: &TournamentSelection,
        limit: Option<usize>,
    ) -> Result<Vec<Standing>> {
        let tournament_ids = self.resolve(selection).await?;
        let results = self.store.list_results(&tournament_ids).await?;

        let mut standings = tally(&self.points, &results);
        if let Some(limit) = limit {
            standings.truncate(limit);
        }

        for standing in standings.iter_mut() {
            standing.handle = self
                .store
                .get_player(standing.player_id)
                .await?
                .map(|p| p.handle);
        }

        info!(
            tournaments = tournament_ids.len(),
            results = results.len(),
            players = standings.len(),
            "Computed standings"
        );
        Ok(standings)
    }

    async fn resolve(&self, selection: &TournamentSelection) -> Result<Vec<TournamentId>> {
        let tournaments = match selection {
            TournamentSelection::Game(game_id) => {
                if self.store.get_game(*game_id).await?.is_none() {
                    return Err(EngineError::GameNotFound { game_id: *game_id });
                }
                self.store
                    .list_tournaments(TournamentFilter::for_game(*game_id))
                    .await?
            }
            TournamentSelection::Series(series_id) => {
                if self.store.get_series(*series_id).await?.is_none() {
                    return Err(EngineError::SeriesNotFound {
                        series_id: *series_id,
                    });
                }
                self.store
                    .list_tournaments(TournamentFilter::for_series(*series_id))
                    .await?
            }
            TournamentSelection::Tournaments(ids) => {
                let found = self
                    .store
                    .list_tournaments(TournamentFilter::with_ids(ids.clone()))
                    .await?;
                if let Some(missing) = ids.iter().find(|id| !found.iter().any(|t| t.id == **id)) {
                    return Err(EngineError::TournamentNotFound {
                        tournament_id: *missing,
                    });
                }
                found
            }
        };

        debug!(?selection, tournaments = tournaments.len(), "Resolved tournaments");
        Ok(tournaments.into_iter().map(|t| t.id).collect())
    }
}

/// Sum placement points per player, highest total first
///
/// Players appear in order of their first result; ties keep that order.
pub fn tally(points: &PointsTable, results: &[PlacementResult]) -> Vec<Standing> {
    let mut standings: Vec<Standing> = Vec::new();
    let mut index: HashMap<_, usize> = HashMap::new();

    for result in results {
        let slot = *index.entry(result.player_id).or_insert_with(|| {
            standings.push(Standing {
                player_id: result.player_id,
                handle: None,
                total_score: 0,
                ranks: Vec::new(),
            });
            standings.len() - 1
        });

        let standing = &mut standings[slot];
        standing.ranks.push(result.rank);
        standing.total_score = standing
            .total_score
            .saturating_add(points.points_for(result.rank));
    }

    // Stable: equal totals keep first-appearance order
    standings.sort_by(|a, b| b.total_score.cmp(&a.total_score));
    standings
}
