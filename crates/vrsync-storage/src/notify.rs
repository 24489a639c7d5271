//! Webhook notification for feed updates.

use std::time::Duration;

use chrono::Utc;
use serde_json::json;
use tracing::{error, info};

/// Sends a JSON event to a webhook when the feed has been updated.
///
/// Notification is best-effort: failures are logged and reported as
/// `false`, never raised.
pub struct WebhookNotifier {
    http: reqwest::Client,
    webhook_url: Option<String>,
}

impl WebhookNotifier {
    pub fn new(webhook_url: Option<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        Self { http, webhook_url }
    }

    /// Notify that the feed at `feed_url` was updated. Returns whether
    /// the webhook accepted the event. `webhook_url` overrides the
    /// configured target; with neither set this is a no-op `false`.
    pub async fn notify_feed_updated(&self, feed_url: &str, webhook_url: Option<&str>) -> bool {
        let Some(url) = webhook_url.or(self.webhook_url.as_deref()) else {
            return false;
        };

        let payload = json!({
            "event": "feed_updated",
            "feed_url": feed_url,
            "timestamp": Utc::now().to_rfc3339(),
        });

        match self.http.post(url).json(&payload).send().await {
            Ok(response) if response.status().is_success() => {
                info!("Webhook notification sent to {}", url);
                true
            }
            Ok(response) => {
                error!(
                    "Webhook notification to {} rejected with status {}",
                    url,
                    response.status()
                );
                false
            }
            Err(e) => {
                error!("Failed to send webhook notification: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_notify_posts_event_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hooks/feed"))
            .and(body_partial_json(serde_json::json!({
                "event": "feed_updated",
                "feed_url": "https://bucket.s3.amazonaws.com/roku-feed.json"
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let notifier = WebhookNotifier::new(Some(format!("{}/hooks/feed", server.uri())));
        assert!(
            notifier
                .notify_feed_updated("https://bucket.s3.amazonaws.com/roku-feed.json", None)
                .await
        );
    }

    #[tokio::test]
    async fn test_notify_failure_is_swallowed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let notifier = WebhookNotifier::new(Some(server.uri()));
        assert!(!notifier.notify_feed_updated("https://example.com/feed.json", None).await);
    }

    #[tokio::test]
    async fn test_notify_without_url_is_noop() {
        let notifier = WebhookNotifier::new(None);
        assert!(!notifier.notify_feed_updated("https://example.com/feed.json", None).await);
    }
}
