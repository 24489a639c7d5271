//! Live Vimeo API smoke tests.

/// Test authenticated access to the configured account.
#[tokio::test]
#[ignore = "requires Vimeo credentials"]
async fn test_vimeo_authentication() {
    dotenvy::dotenv().ok();

    let client = vrsync_vimeo::VimeoClient::from_env().expect("Failed to create Vimeo client");

    let user = client.get_user(None).await.expect("Failed to fetch user");
    println!(
        "Authenticated as {}",
        user.get("name").and_then(|n| n.as_str()).unwrap_or("?")
    );
}

/// Test fetching the first page of the configured catalog.
#[tokio::test]
#[ignore = "requires Vimeo credentials"]
async fn test_vimeo_catalog_page() {
    dotenvy::dotenv().ok();

    let client = vrsync_vimeo::VimeoClient::from_env().expect("Failed to create Vimeo client");

    let mut pager = client.all_videos();
    let page = pager.next_page().await.expect("Failed to fetch page");
    if let Some(records) = page {
        let translated = records.iter().filter(|r| r.is_ok()).count();
        println!("First page: {} records, {} translated", records.len(), translated);
    } else {
        println!("Catalog is empty");
    }
}

/// Test a full dry-run sync against the live account, no upload.
#[tokio::test]
#[ignore = "requires Vimeo credentials"]
async fn test_live_sync_dry_run() {
    use vrsync_manager::{Config, SyncManager, SyncOptions};

    dotenvy::dotenv().ok();

    let tmp = tempfile::tempdir().expect("Failed to create temp dir");
    let mut config = Config::from_env();
    config.feed.feed_output_path = tmp
        .path()
        .join("feed.json")
        .to_string_lossy()
        .into_owned();
    config.sync.cache_enabled = false;

    let mut manager = SyncManager::new(config).expect("Failed to create sync manager");
    let result = manager.sync(&SyncOptions::default()).await;

    println!(
        "Live sync: processed={} added={} skipped={} failed={}",
        result.videos_processed, result.videos_added, result.videos_skipped, result.videos_failed
    );
    assert!(result.success, "errors: {:?}", result.errors);
}
