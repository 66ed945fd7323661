//! HTTP client creation and request handling for RSS feeds.

use anyhow::{anyhow, Result};
use reqwest::header;
use tokio::time::{sleep, timeout, Duration};
use tracing::{debug, error, info, warn};

use super::types::{MAX_RETRIES, REQUEST_TIMEOUT, RETRY_DELAY};
use crate::TARGET_WEB_REQUEST;

/// Create the client used for feed requests
pub fn create_http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .gzip(true)
        .timeout(REQUEST_TIMEOUT)
        .redirect(reqwest::redirect::Policy::default())
        .build()
        .map_err(|e| anyhow!("Failed to build HTTP client: {}", e))
}

/// Fetch a feed body, retrying transient failures
pub async fn fetch_feed(client: &reqwest::Client, url: &str) -> Result<String> {
    fetch_with_retries(client, url, MAX_RETRIES, RETRY_DELAY).await
}

pub(crate) async fn fetch_with_retries(
    client: &reqwest::Client,
    url: &str,
    max_retries: usize,
    retry_delay: Duration,
) -> Result<String> {
    let mut attempts = 0;
    let mut last_error = anyhow!("No attempt made to fetch {}", url);

    while attempts < max_retries {
        attempts += 1;
        info!(target: TARGET_WEB_REQUEST, "Loading RSS feed from {} (attempt {})", url, attempts);

        let request = client
            .get(url)
            .header(header::USER_AGENT, "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36")
            .header(header::ACCEPT, "application/rss+xml, application/atom+xml, application/xml, text/xml, */*;q=0.9")
            .send();

        match timeout(REQUEST_TIMEOUT, request).await {
            Ok(Ok(response)) if response.status().is_success() => {
                debug!(target: TARGET_WEB_REQUEST, "Request to {} succeeded with status {}", url, response.status());
                match response.text().await {
                    Ok(body) => return Ok(body),
                    Err(err) => {
                        error!(target: TARGET_WEB_REQUEST, "Failed to read response body from {}: {}", url, err);
                        last_error = anyhow!("Failed to read response body: {}", err);
                    }
                }
            }
            Ok(Ok(response)) => {
                warn!(target: TARGET_WEB_REQUEST, "Request to {} returned status {}", url, response.status());
                last_error = anyhow!("HTTP error: {}", response.status());
            }
            Ok(Err(err)) => {
                warn!(target: TARGET_WEB_REQUEST, "Request to {} failed: {}", url, err);
                last_error = anyhow!("Request failed: {}", err);
            }
            Err(_) => {
                warn!(target: TARGET_WEB_REQUEST, "Request to {} timed out", url);
                last_error = anyhow!("Request timed out after {} seconds", REQUEST_TIMEOUT.as_secs());
            }
        }

        if attempts < max_retries {
            sleep(retry_delay).await;
        }
    }

    error!(target: TARGET_WEB_REQUEST, "Max retries reached for URL: {}", url);
    Err(last_error)
}
