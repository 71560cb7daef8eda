//! Framing: events into units, and a minimal server-sent events parser.

use super::TransportError;

/// Split one delivered event into units on `\n` / `\r\n`. Blank pieces are
/// skipped; order is preserved.
pub fn split_units(event: &str) -> impl Iterator<Item = &str> {
    event
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty())
}

/// Largest line, and largest joined `data:` payload, the parser buffers.
pub const MAX_EVENT_BYTES: usize = 1 << 20;

/// Incremental `text/event-stream` parser.
///
/// Feed raw body chunks in arrival order; complete events come out as the
/// joined `data:` payload. Comments and the `event`, `id` and `retry` fields
/// are ignored. A line may span chunk boundaries.
///
/// An event that outgrows the limit yields one
/// [`TransportError::Undecodable`] and is dropped up to its closing blank
/// line; the stream itself stays usable.
#[derive(Debug)]
pub struct SseParser {
    line: Vec<u8>,
    data: Vec<String>,
    data_len: usize,
    limit: usize,
    skip_line: bool,
    poisoned: bool,
}

impl Default for SseParser {
    fn default() -> Self {
        Self::with_limit(MAX_EVENT_BYTES)
    }
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            line: Vec::new(),
            data: Vec::new(),
            data_len: 0,
            limit,
            skip_line: false,
            poisoned: false,
        }
    }

    /// Consume a chunk and return every event (or oversize fault) it completed.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Result<String, TransportError>> {
        let mut events = Vec::new();
        for &byte in chunk {
            if byte == b'\n' {
                if std::mem::take(&mut self.skip_line) {
                    continue;
                }
                let line = std::mem::take(&mut self.line);
                if let Some(event) = self.process_line(&line) {
                    events.push(event);
                }
            } else if self.skip_line {
                continue;
            } else if self.line.len() >= self.limit {
                events.push(Err(self.overflow("line")));
                self.skip_line = true;
            } else {
                self.line.push(byte);
            }
        }
        events
    }

    /// Drop everything buffered for the current event.
    fn overflow(&mut self, what: &str) -> TransportError {
        self.line = Vec::new();
        self.data.clear();
        self.data_len = 0;
        self.poisoned = true;
        TransportError::Undecodable(format!("sse {what} exceeds {} bytes", self.limit))
    }

    fn process_line(&mut self, raw: &[u8]) -> Option<Result<String, TransportError>> {
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        if raw.is_empty() {
            let poisoned = std::mem::take(&mut self.poisoned);
            self.data_len = 0;
            if poisoned || self.data.is_empty() {
                self.data.clear();
                return None;
            }
            let data = std::mem::take(&mut self.data);
            return Some(Ok(data.join("\n")));
        }
        if self.poisoned || raw.first() == Some(&b':') {
            return None;
        }
        let line = String::from_utf8_lossy(raw);
        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line.as_ref(), ""),
        };
        if field != "data" {
            return None;
        }
        // Joined payload: values plus one separator between each.
        let grown = self.data_len + value.len() + usize::from(!self.data.is_empty());
        if grown > self.limit {
            return Some(Err(self.overflow("event")));
        }
        self.data_len = grown;
        self.data.push(value.to_string());
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_ok(parser: &mut SseParser, chunk: &[u8]) -> Vec<String> {
        parser
            .feed(chunk)
            .into_iter()
            .map(|event| event.expect("well-formed event"))
            .collect()
    }

    #[test]
    fn split_units_handles_crlf_and_blank_lines() {
        let units: Vec<&str> = split_units("{\"a\":1}\r\n\n{\"b\":2}\n  \n{\"c\":3}").collect();
        assert_eq!(units, vec!["{\"a\":1}", "{\"b\":2}", "{\"c\":3}"]);
        assert_eq!(split_units("").count(), 0);
    }

    #[test]
    fn sse_event_split_across_chunks() {
        let mut parser = SseParser::new();
        assert!(feed_ok(&mut parser, b"data: {\"Key\":").is_empty());
        assert!(feed_ok(&mut parser, b"\"link\"}\r").is_empty());
        assert!(feed_ok(&mut parser, b"\n").is_empty());
        assert_eq!(feed_ok(&mut parser, b"\r\n"), vec!["{\"Key\":\"link\"}"]);
    }

    #[test]
    fn sse_multi_data_lines_join_with_newline() {
        let mut parser = SseParser::new();
        let events = feed_ok(&mut parser, b": keepalive\nevent: msg\nid: 4\ndata: one\ndata:two\n\ndata: three\n\n");
        assert_eq!(events, vec!["one\ntwo", "three"]);
        let units: Vec<&str> = split_units(&events[0]).collect();
        assert_eq!(units, vec!["one", "two"]);
    }

    #[test]
    fn sse_blank_lines_without_data_emit_nothing() {
        let mut parser = SseParser::new();
        assert!(feed_ok(&mut parser, b"\n\nretry: 100\n\n").is_empty());
    }

    #[test]
    fn endless_line_is_capped_and_the_stream_recovers() {
        let mut parser = SseParser::with_limit(16);
        let mut faults = 0;
        for _ in 0..100 {
            for event in parser.feed(b"data: xxxxxxxxxxxxxxxx") {
                assert!(matches!(event, Err(TransportError::Undecodable(_))));
                faults += 1;
            }
            assert!(parser.line.len() <= 16);
        }
        assert_eq!(faults, 1, "one fault per oversized event");

        // The rest of the broken event is discarded, later events pass.
        assert!(parser.feed(b"yyy\ndata: tail\n\n").is_empty());
        assert_eq!(feed_ok(&mut parser, b"data: ok\n\n"), vec!["ok"]);
    }

    #[test]
    fn many_short_data_lines_are_capped_too() {
        let mut parser = SseParser::with_limit(10);
        let out = parser.feed(b"data: abcd\ndata: efgh\ndata: ijkl\n\ndata: fine\n\n");
        assert_eq!(out.len(), 2);
        assert!(matches!(&out[0], Err(TransportError::Undecodable(_))));
        assert_eq!(out[1].as_ref().unwrap(), "fine");
    }

}
