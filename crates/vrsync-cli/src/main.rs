//! Vimeo → Roku feed sync binary.
//!
//! Runs one sync by default; set `SYNC_INTERVAL_SECS` to keep the process
//! alive and re-sync on a schedule until interrupted.

use std::time::Duration;

use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vrsync_manager::{Config, SyncManager, SyncOptions, VideoSource};

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for TLS/HTTPS)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("vrsync=info".parse().unwrap())
        .add_directive("aws_config=warn".parse().unwrap())
        .add_directive("hyper=warn".parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    info!("Starting vrsync");

    let config = Config::from_env();
    let problems = config.validate();
    if !problems.is_empty() {
        for problem in &problems {
            error!("Configuration error: {}", problem);
        }
        std::process::exit(1);
    }

    let options = options_from_env();
    let interval = std::env::var("SYNC_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok());

    let mut manager = match SyncManager::new(config) {
        Ok(m) => m,
        Err(e) => {
            error!("Failed to create sync manager: {}", e);
            std::process::exit(1);
        }
    };

    match interval {
        None => {
            let result = manager.sync(&options).await;
            report(&result);
            if !result.success {
                std::process::exit(1);
            }
        }
        Some(secs) => {
            info!("Running on a {}s schedule, Ctrl-C to stop", secs);
            loop {
                let result = manager.sync(&options).await;
                report(&result);

                tokio::select! {
                    _ = tokio::time::sleep(Duration::from_secs(secs)) => {}
                    _ = tokio::signal::ctrl_c() => {
                        info!("Received shutdown signal");
                        break;
                    }
                }
            }
        }
    }

    info!("vrsync shutdown complete");
}

fn options_from_env() -> SyncOptions {
    let source = match std::env::var("SYNC_SOURCE").as_deref() {
        Ok("album") => VideoSource::Album(None),
        Ok("folder") => VideoSource::Folder(None),
        _ => VideoSource::All,
    };
    SyncOptions {
        source,
        incremental: env_flag("SYNC_INCREMENTAL"),
        upload: env_flag("SYNC_UPLOAD"),
        notify: env_flag("SYNC_NOTIFY"),
    }
}

fn env_flag(key: &str) -> bool {
    std::env::var(key)
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

fn report(result: &vrsync_manager::SyncResult) {
    if result.success {
        info!(
            processed = result.videos_processed,
            added = result.videos_added,
            skipped = result.videos_skipped,
            failed = result.videos_failed,
            feed_path = ?result.feed_path,
            feed_url = ?result.feed_url,
            "Sync complete in {:.1}s",
            result.duration_seconds
        );
    } else {
        error!(
            processed = result.videos_processed,
            "Sync failed after {:.1}s",
            result.duration_seconds
        );
    }
    for e in &result.errors {
        warn!("  {}", e);
    }
}
