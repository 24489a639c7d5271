//! Feed hosting capabilities.
//!
//! This crate provides:
//! - Feed upload to an S3 bucket, returning the public URL
//! - Webhook notification when a feed has been updated

pub mod config;
pub mod error;
pub mod notify;
pub mod store;

pub use config::StorageConfig;
pub use error::{StorageError, StorageResult};
pub use notify::WebhookNotifier;
pub use store::FeedStore;
