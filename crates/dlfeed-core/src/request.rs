//! Outbound requests to the download service.
//!
//! These run outside the live session: failures are returned to the caller
//! instead of being retried.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use url::Url;

use crate::endpoint::Endpoints;

fn is_false(flag: &bool) -> bool {
    !*flag
}

/// Ask the service to fetch `url`. Flags are omitted from the body when unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadRequest {
    #[serde(rename = "URL")]
    pub url: String,
    /// Re-encode the audio to Opus.
    #[serde(rename = "ForceOpus", skip_serializing_if = "is_false")]
    pub force_opus: bool,
    /// Use the external downloader instead of the built-in one.
    #[serde(rename = "YTDownloader", skip_serializing_if = "is_false")]
    pub yt_downloader: bool,
}

impl DownloadRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            force_opus: false,
            yt_downloader: false,
        }
    }
}

/// Remove entries from the server's recent list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteRequest {
    pub delete_urls: Vec<String>,
}

/// HTTP side channel next to the live connection.
#[derive(Debug, Clone)]
pub struct RequestClient {
    http: reqwest::Client,
    endpoints: Endpoints,
}

impl RequestClient {
    pub fn new(endpoints: Endpoints) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoints,
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// POST a download request. Progress arrives on the live channel.
    pub async fn submit(&self, request: &DownloadRequest) -> Result<()> {
        tracing::info!(url = %request.url, "submitting download");
        self.post(self.endpoints.submit(), request).await
    }

    /// POST a delete request for the given recent entries. An empty list
    /// sends nothing.
    pub async fn delete_recent(&self, urls: Vec<String>) -> Result<()> {
        if urls.is_empty() {
            return Ok(());
        }
        let body = DeleteRequest { delete_urls: urls };
        self.post(self.endpoints.submit(), &body).await
    }

    /// Ask the server to push the recent list over the live channel.
    pub async fn request_recent(&self) -> Result<()> {
        let url = self.endpoints.recent();
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("GET {url}"))?;
        ensure_success(&url, response.status())
    }

    async fn post<T: Serialize + ?Sized>(&self, url: Url, body: &T) -> Result<()> {
        let response = self
            .http
            .post(url.clone())
            .json(body)
            .send()
            .await
            .with_context(|| format!("POST {url}"))?;
        ensure_success(&url, response.status())
    }
}

fn ensure_success(url: &Url, status: reqwest::StatusCode) -> Result<()> {
    if !status.is_success() {
        bail!("{url} answered {status}");
    }
    Ok(())
}
