//! `dlfeed submit` – ask the server to download a URL.

use anyhow::Result;
use dlfeed_core::config::DlfeedConfig;
use dlfeed_core::endpoint::Endpoints;
use dlfeed_core::request::{DownloadRequest, RequestClient};

pub async fn run_submit(
    cfg: &DlfeedConfig,
    url: String,
    force_opus: bool,
    yt_downloader: bool,
) -> Result<()> {
    let client = RequestClient::new(Endpoints::parse(&cfg.server_url)?);
    let request = DownloadRequest {
        url,
        force_opus,
        yt_downloader,
    };
    client.submit(&request).await?;
    println!("Requested {}", request.url);
    Ok(())
}
