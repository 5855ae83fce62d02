//! Rating replay
//!
//! Full, ordered re-simulation of a game's match history. Produces the
//! per-player rating records, the per-match rating snapshots and the
//! per-tournament rating span of every placement result.

pub mod engine;

pub use engine::{sort_chronologically, ReplayEngine, ReplayOptions, ReplaySummary};
