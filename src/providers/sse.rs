//! Incremental server-sent events decoding
//!
//! Chat-completion streams arrive as `text/event-stream` bodies split at
//! arbitrary byte boundaries. [`SseDecoder`] buffers raw bytes, cuts them
//! into events at blank lines and returns the joined `data:` payload of
//! each complete event.

/// Decoder state for one SSE response body
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    /// Create an empty decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of body bytes and return every event it completed
    ///
    /// Bytes after the last event boundary stay buffered, so a multi-byte
    /// character split between chunks is decoded intact.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_agent::providers::sse::SseDecoder;
    ///
    /// let mut decoder = SseDecoder::new();
    /// assert!(decoder.push(b"data: hel").is_empty());
    /// assert_eq!(decoder.push(b"lo\n\n"), vec!["hello".to_string()]);
    /// ```
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some((end, separator_len)) = find_event_boundary(&self.buffer) {
            let block: Vec<u8> = self.buffer.drain(..end + separator_len).take(end).collect();
            if let Some(data) = event_data(&String::from_utf8_lossy(&block)) {
                events.push(data);
            }
        }
        events
    }

    /// Flush whatever is left once the body has ended
    pub fn finish(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        let block = std::mem::take(&mut self.buffer);
        event_data(&String::from_utf8_lossy(&block))
    }
}

/// Locate the first blank line, accepting `\n\n` and `\r\n\r\n`
fn find_event_boundary(buffer: &[u8]) -> Option<(usize, usize)> {
    let lf = buffer.windows(2).position(|w| w == b"\n\n").map(|p| (p, 2));
    let crlf = buffer
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .map(|p| (p, 4));

    match (lf, crlf) {
        (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
        (a, b) => a.or(b),
    }
}

/// Join the `data:` lines of one event block; comments and other fields
/// are ignored. Returns `None` for events without data.
fn event_data(block: &str) -> Option<String> {
    let data_lines: Vec<&str> = block
        .lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|value| value.strip_prefix(' ').unwrap_or(value))
        .collect();

    if data_lines.is_empty() {
        return None;
    }
    Some(data_lines.join("\n"))
}
