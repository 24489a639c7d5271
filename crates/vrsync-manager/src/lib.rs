//! Sync orchestration: fetch videos from Vimeo, build the Roku feed,
//! persist it, and optionally publish it.

pub mod config;
pub mod error;
pub mod filter;
pub mod manager;
pub mod state;

pub use config::{Config, SyncConfig};
pub use error::{ManagerResult, SyncError};
pub use filter::{SkipReason, VideoFilter};
pub use manager::{
    NoopObserver, SyncManager, SyncObserver, SyncOptions, SyncResult, VideoSource,
};
pub use state::SyncState;
