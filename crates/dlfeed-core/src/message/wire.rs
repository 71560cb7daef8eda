//! Serde shapes of envelope payloads as the server writes them.
//!
//! Producers are loose about scalar types (ids and percentages show up both as
//! numbers and as strings), so scalars go through `Scalar` and are normalised
//! by the helpers at the bottom of this file.

use serde::Deserialize;

/// A JSON scalar that may be a number or a string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(super) enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
}

#[derive(Debug, Deserialize)]
pub(super) struct WireInfo {
    #[serde(rename = "Id")]
    pub id: Option<Scalar>,
    #[serde(rename = "Title")]
    pub title: Option<String>,
    #[serde(rename = "FileSize")]
    pub file_size: Option<Scalar>,
    #[serde(rename = "Progress")]
    pub progress: Option<WireProgress>,
}

#[derive(Debug, Deserialize)]
pub(super) struct WireProgress {
    #[serde(rename = "Id")]
    pub id: Option<Scalar>,
    #[serde(rename = "Pct")]
    pub pct: Option<Scalar>,
    #[serde(rename = "ETA")]
    pub eta: Option<String>,
    #[serde(rename = "FileSize")]
    pub file_size: Option<Scalar>,
}

#[derive(Debug, Deserialize)]
pub(super) struct WireUnknown {
    #[serde(rename = "Id")]
    pub id: Option<Scalar>,
    #[serde(rename = "Msg")]
    pub msg: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct WireCompleted {
    #[serde(rename = "Id")]
    pub id: Option<Scalar>,
}

#[derive(Debug, Deserialize)]
pub(super) struct WireLink {
    #[serde(rename = "DownloadURL")]
    pub download_url: String,
    #[serde(rename = "Title")]
    pub title: Option<String>,
    #[serde(rename = "Artist")]
    pub artist: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct WireRecent {
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "Title")]
    pub title: Option<String>,
    #[serde(rename = "Artist")]
    pub artist: Option<String>,
}

const MIB: f64 = 1024.0 * 1024.0;

/// Job ids: integers print without decoration, strings are trimmed.
pub(super) fn job_id(value: Option<Scalar>) -> Option<String> {
    match value? {
        Scalar::Int(n) => Some(n.to_string()),
        Scalar::Float(f) if f.is_finite() && f.fract() == 0.0 => Some((f as i64).to_string()),
        Scalar::Float(f) => Some(f.to_string()),
        Scalar::Text(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
    }
}

/// Percent as a float; numeric strings are accepted, anything else is absent.
pub(super) fn percent(value: Option<Scalar>) -> Option<f64> {
    let pct = match value? {
        Scalar::Int(n) => n as f64,
        Scalar::Float(f) => f,
        Scalar::Text(s) => s.trim().trim_end_matches('%').parse().ok()?,
    };
    pct.is_finite().then_some(pct)
}

/// File sizes: numbers are bytes; strings are decimal MiB as the progress
/// scraper formats them (`"6.25"`).
pub(super) fn file_size_bytes(value: Option<Scalar>) -> Option<u64> {
    match value? {
        Scalar::Int(n) => u64::try_from(n).ok(),
        Scalar::Float(f) if f.is_finite() && f >= 0.0 => Some(f.round() as u64),
        Scalar::Float(_) => None,
        Scalar::Text(s) => {
            let mib: f64 = s.trim().parse().ok()?;
            (mib.is_finite() && mib >= 0.0).then(|| (mib * MIB).round() as u64)
        }
    }
}

/// Empty strings carry no information; treat them as absent.
pub(super) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}
