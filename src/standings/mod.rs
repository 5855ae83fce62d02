//! Placement standings
//!
//! Ranks players across a set of tournaments by the points their placements
//! are worth.

pub mod aggregator;
pub mod points;

pub use aggregator::{tally, StandingsAggregator, TournamentSelection};
pub use points::{PointsTable, DEFAULT_POINTS_TABLE};
