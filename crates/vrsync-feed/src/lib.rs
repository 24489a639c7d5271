//! Roku Direct Publisher feed builder.
//!
//! This crate provides:
//! - Duration-based content classification with per-item overrides
//! - Genre and rating defaulting from configuration
//! - Series, playlist and category pass-through records
//! - Non-fatal feed validation against Roku requirements
//! - Atomic feed persistence (write to temp file, then rename)

pub mod config;
pub mod error;
pub mod generator;

pub use config::FeedConfig;
pub use error::{FeedError, FeedResult};
pub use generator::{FeedGenerator, FeedStats, SeriesSpec};
