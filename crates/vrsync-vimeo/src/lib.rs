//! Vimeo API client.
//!
//! This crate provides:
//! - Bearer-authenticated requests against the Vimeo REST API
//! - Minimum inter-request pacing on every outbound call
//! - Retry with exponential backoff for transient failures and
//!   server-directed delays for rate limiting
//! - Restartable pagination over user, album and folder listings
//! - Newest-first modified-since scans for incremental syncs

pub mod client;
pub mod config;
pub mod error;
pub mod pager;

pub use client::{RetryPolicy, VimeoClient, DEFAULT_PER_PAGE};
pub use config::VimeoConfig;
pub use error::{VimeoError, VimeoResult};
pub use pager::VideoPager;
