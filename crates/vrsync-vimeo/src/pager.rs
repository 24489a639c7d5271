//! Pagination over video listings.

use serde_json::Value;
use tracing::debug;

use vrsync_models::Video;

use crate::client::{VimeoClient, DEFAULT_PER_PAGE, VIDEO_FIELDS};
use crate::error::{VimeoError, VimeoResult};

/// A restartable pager over a paginated video listing.
///
/// Pages are fetched lazily, one request per [`next_page`] call, and
/// the pager stops when the response stops carrying a `paging.next`
/// indicator. Each record is translated to a [`Video`] individually:
/// a record that fails translation yields an `Err` entry without
/// aborting the rest of its page. Creating a new pager restarts the
/// iteration from page one.
///
/// [`next_page`]: VideoPager::next_page
pub struct VideoPager<'a> {
    client: &'a VimeoClient,
    path: String,
    extra_params: Vec<(String, String)>,
    page: u32,
    done: bool,
}

impl<'a> VideoPager<'a> {
    pub(crate) fn new(
        client: &'a VimeoClient,
        path: String,
        extra_params: Vec<(String, String)>,
    ) -> Self {
        Self {
            client,
            path,
            extra_params,
            page: 1,
            done: false,
        }
    }

    /// Fetch and translate the next page. Returns `None` once the
    /// listing is exhausted.
    pub async fn next_page(&mut self) -> VimeoResult<Option<Vec<VimeoResult<Video>>>> {
        if self.done {
            return Ok(None);
        }

        let mut params = vec![
            ("per_page".to_string(), DEFAULT_PER_PAGE.to_string()),
            ("page".to_string(), self.page.to_string()),
            ("fields".to_string(), VIDEO_FIELDS.to_string()),
        ];
        params.extend(self.extra_params.iter().cloned());

        let response = self.client.get(&self.path, &params).await?;

        let records = match response.get("data").and_then(Value::as_array) {
            Some(arr) if !arr.is_empty() => arr,
            _ => {
                self.done = true;
                return Ok(None);
            }
        };

        let items: Vec<VimeoResult<Video>> = records
            .iter()
            .map(|record| {
                Video::from_vimeo_response(record).map_err(VimeoError::Translation)
            })
            .collect();

        let has_next = response
            .get("paging")
            .and_then(|p| p.get("next"))
            .map(|n| !n.is_null())
            .unwrap_or(false);
        if has_next {
            self.page += 1;
            debug!("Fetching page {} of {}", self.page, self.path);
        } else {
            self.done = true;
        }

        Ok(Some(items))
    }

    /// Drain the pager, optionally stopping after `limit` records.
    pub async fn collect(mut self, limit: Option<usize>) -> VimeoResult<Vec<VimeoResult<Video>>> {
        let mut all = Vec::new();
        while let Some(page) = self.next_page().await? {
            for item in page {
                all.push(item);
                if limit.is_some_and(|n| all.len() >= n) {
                    return Ok(all);
                }
            }
        }
        Ok(all)
    }
}
