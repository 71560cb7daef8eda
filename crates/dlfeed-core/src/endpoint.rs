//! Service endpoint derivation from the configured base URL.
//!
//! Every path is resolved relative to the base, so a service mounted under a
//! sub-path (`https://host/app/`) keeps its prefix.

use anyhow::{bail, Context, Result};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: Url,
}

impl Endpoints {
    /// Parse the base URL. Only `http` and `https` are accepted.
    pub fn parse(server_url: &str) -> Result<Self> {
        let mut base = Url::parse(server_url)
            .with_context(|| format!("invalid server URL: {server_url}"))?;
        match base.scheme() {
            "http" | "https" => {}
            other => bail!("unsupported server URL scheme {other:?} (expected http or https)"),
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.set_query(None);
        base.set_fragment(None);
        Ok(Self { base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Server-sent events stream.
    pub fn sse(&self) -> Url {
        self.join("sse")
    }

    /// WebSocket channel; `ws` for `http` bases, `wss` for `https`.
    pub fn websocket(&self) -> Url {
        let mut url = self.join("websocket");
        let scheme = if url.scheme() == "https" { "wss" } else { "ws" };
        // http <-> ws are both special schemes, so this cannot fail.
        let _ = url.set_scheme(scheme);
        url
    }

    /// Download submission (POST).
    pub fn submit(&self) -> Url {
        self.join("dl")
    }

    /// Ask the service to push the recent list over the live channel (GET).
    pub fn recent(&self) -> Url {
        self.join("recent")
    }

    /// Resolve a server-relative download URL (as carried by `link` and
    /// `link_stream` messages) against the base.
    pub fn resolve(&self, download_url: &str) -> Result<Url> {
        self.base
            .join(download_url)
            .with_context(|| format!("invalid download URL: {download_url}"))
    }

    fn join(&self, path: &str) -> Url {
        let mut url = self.base.clone();
        let joined = format!("{}{}", self.base.path(), path);
        url.set_path(&joined);
        url
    }
}
