use async_trait::async_trait;
use futures::{future, stream, StreamExt};
use reqwest::header::{ACCEPT, CACHE_CONTROL};
use url::Url;

use super::framing::SseParser;
use super::{Connector, EventStream, TransportError};

/// Server-sent events over a long-lived HTTP GET.
#[derive(Debug, Clone)]
pub struct SseConnector {
    client: reqwest::Client,
    url: Url,
}

impl SseConnector {
    pub fn new(url: Url) -> Self {
        Self::with_client(reqwest::Client::new(), url)
    }

    pub fn with_client(client: reqwest::Client, url: Url) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl Connector for SseConnector {
    async fn connect(&self) -> Result<EventStream, TransportError> {
        let response = self
            .client
            .get(self.url.clone())
            .header(ACCEPT, "text/event-stream")
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        let events = response
            .bytes_stream()
            .scan(SseParser::new(), |parser, chunk| {
                let batch: Vec<Result<String, TransportError>> = match chunk {
                    Ok(bytes) => parser.feed(&bytes),
                    Err(err) => vec![Err(TransportError::from(err))],
                };
                future::ready(Some(stream::iter(batch)))
            })
            .flatten();
        Ok(events.boxed())
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}
