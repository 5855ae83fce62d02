//! FGC Ratings - skill-rating replay and standings engine
//!
//! This crate recomputes Elo ratings for every player of a fighting game from
//! the complete chronological match history, annotates matches and
//! tournament placements with rating snapshots, and aggregates placements
//! into points standings.

pub mod config;
pub mod error;
pub mod rating;
pub mod replay;
pub mod service;
pub mod standings;
pub mod storage;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{EngineError, ErrorKind, Result};
pub use types::*;

// Re-export key components
pub use rating::RatingModel;
pub use replay::{ReplayEngine, ReplaySummary};
pub use service::RatingService;
pub use standings::StandingsAggregator;
pub use storage::{InMemoryStore, RecordStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
