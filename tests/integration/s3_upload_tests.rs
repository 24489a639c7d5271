//! Live S3 feed-hosting smoke tests.

/// Test uploading a small feed document to the configured bucket.
#[tokio::test]
#[ignore = "requires AWS credentials"]
async fn test_s3_feed_upload() {
    dotenvy::dotenv().ok();

    let store = vrsync_storage::FeedStore::from_env()
        .await
        .expect("Failed to create feed store");

    let body = br#"{"providerName":"Integration Test","language":"en","lastUpdated":"2025-01-01T00:00:00Z"}"#;
    let url = store
        .upload_bytes(body.to_vec(), Some("integration-test/feed.json"))
        .await
        .expect("Upload failed");

    println!("Uploaded feed to {url}");
    assert!(url.ends_with("integration-test/feed.json"));
}

/// Test the webhook notification round trip against a configured endpoint.
#[tokio::test]
#[ignore = "requires webhook endpoint"]
async fn test_webhook_notification() {
    dotenvy::dotenv().ok();

    let webhook_url = std::env::var("ROKU_WEBHOOK_URL").expect("ROKU_WEBHOOK_URL not set");
    let notifier = vrsync_storage::WebhookNotifier::new(Some(webhook_url));

    let delivered = notifier
        .notify_feed_updated("https://example.com/feed.json", None)
        .await;
    assert!(delivered, "Webhook endpoint rejected the notification");
}
