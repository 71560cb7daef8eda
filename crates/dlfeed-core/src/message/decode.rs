//! Envelope decoding: raw text unit -> `Message`.

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use super::wire::{
    file_size_bytes, job_id, non_empty, percent, WireCompleted, WireInfo, WireLink, WireProgress,
    WireRecent, WireUnknown,
};
use super::{JobInfo, Message, ProgressUpdate, RecentEntry, StreamLink};

/// Why a unit could not be turned into a message. Every variant means the
/// unit is dropped; none of them affect the connection.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("unit is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("envelope has no string Key")]
    MissingKey,
    #[error("malformed {key} payload: {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{key} payload has no {field}")]
    MissingField { key: String, field: &'static str },
}

/// Decode one raw unit (a single JSON envelope).
pub fn decode(raw: &str) -> Result<Message, DecodeError> {
    let mut envelope: Value = serde_json::from_str(raw)?;
    let key = envelope
        .get("Key")
        .and_then(Value::as_str)
        .ok_or(DecodeError::MissingKey)?
        .to_string();
    let value = envelope
        .get_mut("Value")
        .map(Value::take)
        .unwrap_or(Value::Null);

    let msg = match key.as_str() {
        "error" => match value {
            Value::String(text) => Message::Error(text),
            other => Message::Error(other.to_string()),
        },
        "info" => {
            let wire: WireInfo = payload(&key, value)?;
            let id = job_id(wire.id).ok_or_else(|| missing(&key, "Id"))?;
            let progress = wire.progress.map(progress_update);
            // A zero size means "not known yet"; the nested progress may know.
            let file_size = file_size_bytes(wire.file_size)
                .filter(|&b| b > 0)
                .or_else(|| progress.as_ref().and_then(|p| p.file_size_bytes));
            Message::Info(JobInfo {
                id,
                title: wire.title,
                file_size_bytes: file_size,
                progress,
            })
        }
        "progress" => {
            let wire: WireProgress = payload(&key, value)?;
            let id = job_id(wire.id.clone()).ok_or_else(|| missing(&key, "Id"))?;
            Message::Progress {
                id,
                update: progress_update(wire),
            }
        }
        "unknown" => match value {
            Value::String(text) => Message::Unknown { id: None, text },
            other => {
                let wire: WireUnknown = payload(&key, other)?;
                Message::Unknown {
                    id: job_id(wire.id),
                    text: wire.msg.unwrap_or_default(),
                }
            }
        },
        "completed" => {
            let wire: WireCompleted = payload(&key, value)?;
            let id = job_id(wire.id).ok_or_else(|| missing(&key, "Id"))?;
            Message::Completed { id }
        }
        "link" => {
            let wire: WireLink = payload(&key, value)?;
            Message::Link {
                download_url: wire.download_url,
            }
        }
        "link_stream" => {
            let wire: WireLink = payload(&key, value)?;
            Message::LinkStream(StreamLink {
                download_url: wire.download_url,
                title: wire.title.unwrap_or_default(),
                artist: wire.artist.unwrap_or_default(),
            })
        }
        "recent" => {
            let entries: Option<Vec<WireRecent>> = payload(&key, value)?;
            Message::Recent(
                entries
                    .unwrap_or_default()
                    .into_iter()
                    .map(|r| RecentEntry {
                        url: r.url,
                        title: r.title.unwrap_or_default(),
                        artist: r.artist.unwrap_or_default(),
                    })
                    .collect(),
            )
        }
        _ => Message::Unrecognized { key },
    };
    Ok(msg)
}

fn payload<T: DeserializeOwned>(key: &str, value: Value) -> Result<T, DecodeError> {
    serde_json::from_value(value).map_err(|source| DecodeError::Malformed {
        key: key.to_string(),
        source,
    })
}

fn missing(key: &str, field: &'static str) -> DecodeError {
    DecodeError::MissingField {
        key: key.to_string(),
        field,
    }
}

fn progress_update(wire: WireProgress) -> ProgressUpdate {
    ProgressUpdate {
        percent: percent(wire.pct),
        eta: non_empty(wire.eta),
        file_size_bytes: file_size_bytes(wire.file_size).filter(|&b| b > 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_info() {
        let msg = decode(r#"{"Key":"info","Value":{"Id":"7","Title":"Song","FileSize":1048576}}"#)
            .unwrap();
        assert_eq!(
            msg,
            Message::Info(JobInfo {
                id: "7".into(),
                title: Some("Song".into()),
                file_size_bytes: Some(1_048_576),
                progress: None,
            })
        );
    }

    #[test]
    fn info_with_zero_size_takes_nested_progress_size() {
        let msg = decode(
            r#"{"Key":"info","Value":{"Id":3,"Title":"T","FileSize":0,
                "Progress":{"Pct":"12.5","ETA":"00:10","FileSize":"2.00"}}}"#,
        )
        .unwrap();
        let Message::Info(info) = msg else {
            panic!("expected info");
        };
        assert_eq!(info.id, "3");
        assert_eq!(info.file_size_bytes, Some(2 * 1_048_576));
        let progress = info.progress.unwrap();
        assert_eq!(progress.percent, Some(12.5));
        assert_eq!(progress.eta.as_deref(), Some("00:10"));
    }

    #[test]
    fn decodes_progress_with_numeric_id() {
        let msg = decode(r#"{"Key":"progress","Value":{"Id":42,"Pct":55,"ETA":"30s"}}"#).unwrap();
        assert_eq!(
            msg,
            Message::Progress {
                id: "42".into(),
                update: ProgressUpdate {
                    percent: Some(55.0),
                    eta: Some("30s".into()),
                    file_size_bytes: None,
                },
            }
        );
    }

    #[test]
    fn unknown_accepts_object_and_bare_string() {
        let with_id = decode(r#"{"Key":"unknown","Value":{"Id":"9","Msg":"[download] 5%"}}"#)
            .unwrap();
        assert_eq!(
            with_id,
            Message::Unknown {
                id: Some("9".into()),
                text: "[download] 5%".into()
            }
        );
        let bare = decode(r#"{"Key":"unknown","Value":"Restarting download...\n"}"#).unwrap();
        assert_eq!(
            bare,
            Message::Unknown {
                id: None,
                text: "Restarting download...\n".into()
            }
        );
    }

    #[test]
    fn completed_without_id_is_rejected() {
        let err = decode(r#"{"Key":"completed","Value":"true"}"#).unwrap_err();
        assert!(matches!(err, DecodeError::Malformed { .. }));
        let err = decode(r#"{"Key":"completed","Value":{}}"#).unwrap_err();
        assert!(matches!(err, DecodeError::MissingField { field: "Id", .. }));
    }

    #[test]
    fn decodes_links_and_recent() {
        let link = decode(r#"{"Key":"link","Value":{"DownloadURL":"dl/a.m4a"}}"#).unwrap();
        assert_eq!(
            link,
            Message::Link {
                download_url: "dl/a.m4a".into()
            }
        );
        let stream = decode(
            r#"{"Key":"link_stream","Value":{"DownloadURL":"dl/s.oga","Title":"T","Artist":"A"}}"#,
        )
        .unwrap();
        assert_eq!(stream.kind(), "link_stream");

        let recent = decode(
            r#"{"Key":"recent","Value":[{"URL":"dl/1","Title":"One","Artist":"X","Timestamp":"2024-01-01T00:00:00Z"},{"URL":"dl/2"}]}"#,
        )
        .unwrap();
        let Message::Recent(entries) = recent else {
            panic!("expected recent");
        };
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "One");
        assert_eq!(entries[1].artist, "");

        let empty = decode(r#"{"Key":"recent","Value":null}"#).unwrap();
        assert_eq!(empty, Message::Recent(Vec::new()));
    }

    #[test]
    fn unrecognized_key_is_explicit() {
        let msg = decode(r#"{"Key":"ping","Value":1}"#).unwrap();
        assert_eq!(
            msg,
            Message::Unrecognized {
                key: "ping".into()
            }
        );
    }

    #[test]
    fn protocol_faults() {
        assert!(matches!(decode("not json"), Err(DecodeError::InvalidJson(_))));
        assert!(matches!(decode(r#"{"Value":1}"#), Err(DecodeError::MissingKey)));
        assert!(matches!(decode(r#"{"Key":5}"#), Err(DecodeError::MissingKey)));
        assert!(matches!(decode("[1,2]"), Err(DecodeError::MissingKey)));
        assert!(matches!(
            decode(r#"{"Key":"link","Value":{"Title":"no url"}}"#),
            Err(DecodeError::Malformed { .. })
        ));
    }
}
