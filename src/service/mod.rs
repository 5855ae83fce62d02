//! Service layer for the rating engine
//!
//! This module exposes the administrative recompute action and the read-only
//! leaderboard and standings queries to the surrounding API layer.

pub mod app;

pub use app::RatingService;
