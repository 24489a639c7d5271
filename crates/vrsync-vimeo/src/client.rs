//! Vimeo API client implementation.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use vrsync_models::Video;

use crate::config::VimeoConfig;
use crate::error::{VimeoError, VimeoResult};
use crate::pager::VideoPager;

const BASE_URL: &str = "https://api.vimeo.com";

/// Vimeo's maximum page size.
pub const DEFAULT_PER_PAGE: u32 = 100;

/// Field set requested on every video listing, to keep payloads small.
pub(crate) const VIDEO_FIELDS: &str = "uri,name,description,duration,created_time,\
modified_time,release_time,pictures,files,play,tags,categories,privacy,\
embed,link,stats,metadata,player_embed_url";

/// Retry, pacing and timeout knobs for the client.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts per request, including the first.
    pub max_attempts: u32,
    /// Base delay for exponential backoff (doubles each failed attempt).
    pub backoff_base: Duration,
    /// Retry-After fallback when a 429 carries no usable header.
    pub default_retry_after: Duration,
    /// Minimum spacing between outbound requests.
    pub min_request_interval: Duration,
    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_base: Duration::from_secs(1),
            default_retry_after: Duration::from_secs(60),
            min_request_interval: Duration::from_millis(100),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_backoff_base(mut self, backoff_base: Duration) -> Self {
        self.backoff_base = backoff_base;
        self
    }

    pub fn with_default_retry_after(mut self, default_retry_after: Duration) -> Self {
        self.default_retry_after = default_retry_after;
        self
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// Backoff delay after a given failed attempt (0-based).
    fn backoff_for(&self, failed_attempt: u32) -> Duration {
        self.backoff_base.saturating_mul(2u32.saturating_pow(failed_attempt))
    }
}

/// Client for the Vimeo REST API.
///
/// Every outbound call is paced to the policy's minimum interval and
/// runs through the retry loop: transient network failures back off
/// exponentially, 429s wait out the server-provided Retry-After, and
/// authentication or other API errors surface immediately.
#[derive(Debug)]
pub struct VimeoClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
    user_id: Option<String>,
    folder_id: Option<String>,
    album_id: Option<String>,
    policy: RetryPolicy,
    last_request: Mutex<Option<Instant>>,
}

impl VimeoClient {
    /// Create a new client from configuration.
    pub fn new(config: VimeoConfig) -> VimeoResult<Self> {
        if config.access_token.is_empty() {
            return Err(VimeoError::Auth("Access token is required".to_string()));
        }
        let policy = RetryPolicy::default();
        let http = build_http(&config.access_token, &policy)?;

        Ok(Self {
            http,
            base_url: BASE_URL.to_string(),
            access_token: config.access_token,
            user_id: config.user_id,
            folder_id: config.folder_id,
            album_id: config.album_id,
            policy,
            last_request: Mutex::new(None),
        })
    }

    /// Create from environment variables.
    pub fn from_env() -> VimeoResult<Self> {
        Self::new(VimeoConfig::from_env())
    }

    /// Override the API base URL (used by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Replace the retry policy, rebuilding the HTTP client so the
    /// request timeout takes effect.
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> VimeoResult<Self> {
        self.http = build_http(&self.access_token, &policy)?;
        self.policy = policy;
        Ok(self)
    }

    /// Sleep out the remainder of the minimum inter-request interval.
    async fn pace(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.policy.min_request_interval {
                tokio::time::sleep(self.policy.min_request_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }

    /// GET an endpoint with pacing and the retry loop applied.
    pub(crate) async fn get(&self, path: &str, params: &[(String, String)]) -> VimeoResult<Value> {
        self.pace().await;
        let url = format!("{}{}", self.base_url, path);

        let mut attempt = 0u32;
        loop {
            let response = match self.http.get(&url).query(params).send().await {
                Ok(r) => r,
                Err(e) => {
                    attempt += 1;
                    if attempt < self.policy.max_attempts {
                        let delay = self.policy.backoff_for(attempt - 1);
                        warn!("Request to {} failed, retrying in {:?}: {}", path, delay, e);
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(VimeoError::Transient {
                        attempts: attempt,
                        message: e.to_string(),
                    });
                }
            };

            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                let retry_after = response
                    .headers()
                    .get("Retry-After")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(self.policy.default_retry_after.as_secs());
                attempt += 1;
                if attempt < self.policy.max_attempts {
                    warn!("Rate limited on {}, waiting {}s", path, retry_after);
                    tokio::time::sleep(Duration::from_secs(retry_after)).await;
                    continue;
                }
                return Err(VimeoError::RateLimit {
                    retry_after_secs: retry_after,
                });
            }

            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                let text = response.text().await.unwrap_or_default();
                return Err(VimeoError::Auth(format!(
                    "Authentication failed ({}): {}",
                    status.as_u16(),
                    text
                )));
            }

            if status.as_u16() >= 400 {
                let text = response.text().await.unwrap_or_default();
                let body = serde_json::from_str(&text).ok();
                return Err(VimeoError::Api {
                    status: status.as_u16(),
                    message: text,
                    body,
                });
            }

            let text = response.text().await.unwrap_or_default();
            if text.is_empty() {
                return Ok(Value::Object(Default::default()));
            }
            return serde_json::from_str(&text).map_err(|e| VimeoError::Api {
                status: status.as_u16(),
                message: format!("Invalid JSON body: {e}"),
                body: None,
            });
        }
    }

    fn resolved_user<'a>(&'a self, user_id: Option<&'a str>) -> &'a str {
        user_id.or(self.user_id.as_deref()).unwrap_or("me")
    }

    /// Get user information as raw JSON.
    pub async fn get_user(&self, user_id: Option<&str>) -> VimeoResult<Value> {
        let path = format!("/users/{}", self.resolved_user(user_id));
        self.get(&path, &[]).await
    }

    /// Get a single video by ID.
    pub async fn get_video(&self, video_id: &str) -> VimeoResult<Video> {
        let params = vec![("fields".to_string(), VIDEO_FIELDS.to_string())];
        let data = self.get(&format!("/videos/{video_id}"), &params).await?;
        Ok(Video::from_vimeo_response(&data)?)
    }

    /// Get one page of a user's videos as raw JSON.
    pub async fn get_videos(
        &self,
        user_id: Option<&str>,
        page: u32,
        per_page: u32,
        sort: &str,
        direction: &str,
        filter_playable: bool,
    ) -> VimeoResult<Value> {
        let path = format!("/users/{}/videos", self.resolved_user(user_id));
        let mut params = page_params(page, per_page);
        params.push(("sort".to_string(), sort.to_string()));
        params.push(("direction".to_string(), direction.to_string()));
        if filter_playable {
            params.push(("filter".to_string(), "playable".to_string()));
        }
        self.get(&path, &params).await
    }

    /// Search videos by query, within a user's catalog when one is
    /// configured, otherwise across all of Vimeo.
    pub async fn search_videos(
        &self,
        query: &str,
        user_id: Option<&str>,
        page: u32,
        per_page: u32,
    ) -> VimeoResult<Value> {
        let path = match user_id.or(self.user_id.as_deref()) {
            Some(uid) => format!("/users/{uid}/videos"),
            None => "/videos".to_string(),
        };
        let mut params = page_params(page, per_page);
        params.push(("query".to_string(), query.to_string()));
        self.get(&path, &params).await
    }

    /// Pager over all of a user's videos, newest-first.
    pub fn all_videos(&self) -> VideoPager<'_> {
        let path = format!("/users/{}/videos", self.resolved_user(None));
        VideoPager::new(
            self,
            path,
            vec![
                ("sort".to_string(), "date".to_string()),
                ("direction".to_string(), "desc".to_string()),
                ("filter".to_string(), "playable".to_string()),
            ],
        )
    }

    /// Pager over an album/showcase's videos.
    pub fn album_videos(&self, album_id: Option<&str>) -> VimeoResult<VideoPager<'_>> {
        let album_id = album_id
            .or(self.album_id.as_deref())
            .ok_or_else(|| VimeoError::config("Album ID is required"))?;
        let path = format!("/users/{}/albums/{}/videos", self.resolved_user(None), album_id);
        Ok(VideoPager::new(self, path, Vec::new()))
    }

    /// Pager over a folder/project's videos.
    pub fn folder_videos(&self, folder_id: Option<&str>) -> VimeoResult<VideoPager<'_>> {
        let folder_id = folder_id
            .or(self.folder_id.as_deref())
            .ok_or_else(|| VimeoError::config("Folder ID is required"))?;
        let path = format!(
            "/users/{}/projects/{}/videos",
            self.resolved_user(None),
            folder_id
        );
        Ok(VideoPager::new(self, path, Vec::new()))
    }

    /// Collect videos modified since a cutoff, for incremental syncs.
    ///
    /// Walks the full catalog newest-first and stops at the first video
    /// older than the cutoff. Correct only because the listing is
    /// sorted descending by date; the pager is created with that order.
    /// Untranslatable records are passed through for the caller to
    /// account for.
    pub async fn get_videos_modified_since(
        &self,
        since: DateTime<Utc>,
    ) -> VimeoResult<Vec<VimeoResult<Video>>> {
        let mut pager = self.all_videos();
        let mut results = Vec::new();

        'pages: while let Some(page) = pager.next_page().await? {
            for record in page {
                match record {
                    Ok(video) => {
                        if video.modified_time < since {
                            break 'pages;
                        }
                        results.push(Ok(video));
                    }
                    Err(e) => results.push(Err(e)),
                }
            }
        }

        debug!("Found {} videos modified since {}", results.len(), since);
        Ok(results)
    }
}

fn page_params(page: u32, per_page: u32) -> Vec<(String, String)> {
    vec![
        ("per_page".to_string(), per_page.min(DEFAULT_PER_PAGE).to_string()),
        ("page".to_string(), page.to_string()),
        ("fields".to_string(), VIDEO_FIELDS.to_string()),
    ]
}

fn build_http(access_token: &str, policy: &RetryPolicy) -> VimeoResult<reqwest::Client> {
    let mut headers = HeaderMap::new();
    let auth = HeaderValue::from_str(&format!("Bearer {access_token}"))
        .map_err(|_| VimeoError::Auth("Access token contains invalid characters".to_string()))?;
    headers.insert(AUTHORIZATION, auth);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/vnd.vimeo.*+json;version=3.4"),
    );

    reqwest::Client::builder()
        .default_headers(headers)
        .timeout(policy.request_timeout)
        .build()
        .map_err(|e| VimeoError::config(format!("Failed to build HTTP client: {e}")))
}
