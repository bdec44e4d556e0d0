/// Longest line kept; longer lines are dropped whole.
pub(crate) const MAX_LINE_BYTES: usize = 64 * 1024;
/// Largest `data` payload of one event; larger events are dropped whole.
pub(crate) const MAX_EVENT_BYTES: usize = 64 * 1024;

/// Incremental `text/event-stream` decoder.
///
/// Bytes are fed in arbitrary chunks; each completed event yields its
/// `data` payload (multiple `data:` lines joined with `\n`). Lines end with
/// `\n`, `\r\n` or a bare `\r`. Comments, `id`, `event` and `retry` fields
/// are ignored.
#[derive(Debug, Default)]
pub struct SseDecoder {
    line: Vec<u8>,
    data: Vec<String>,
    data_bytes: usize,
    /// Previous byte was `\r`, so a following `\n` is part of the same break.
    after_cr: bool,
    skip_line: bool,
    skip_event: bool,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk, returning the payloads of all events it completed.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut events = Vec::new();
        for &byte in chunk {
            match byte {
                b'\n' if self.after_cr => self.after_cr = false,
                b'\n' | b'\r' => {
                    self.after_cr = byte == b'\r';
                    self.end_line(&mut events);
                }
                _ => {
                    self.after_cr = false;
                    if self.skip_line {
                        continue;
                    }
                    if self.line.len() >= MAX_LINE_BYTES {
                        tracing::warn!("live: dropping line longer than {MAX_LINE_BYTES} bytes");
                        self.line.clear();
                        self.skip_line = true;
                        continue;
                    }
                    self.line.push(byte);
                }
            }
        }
        events
    }

    fn end_line(&mut self, events: &mut Vec<String>) {
        let raw = std::mem::take(&mut self.line);
        if std::mem::take(&mut self.skip_line) {
            return;
        }
        let line = String::from_utf8_lossy(&raw);
        self.process_line(&line, events);
    }

    fn process_line(&mut self, line: &str, events: &mut Vec<String>) {
        if line.is_empty() {
            if !self.data.is_empty() {
                events.push(self.data.join("\n"));
            }
            self.data.clear();
            self.data_bytes = 0;
            self.skip_event = false;
            return;
        }
        if line.starts_with(':') || self.skip_event {
            return;
        }
        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        if field != "data" {
            return;
        }
        self.data_bytes += value.len() + 1;
        if self.data_bytes > MAX_EVENT_BYTES {
            tracing::warn!("live: dropping event larger than {MAX_EVENT_BYTES} bytes");
            self.data.clear();
            self.data_bytes = 0;
            self.skip_event = true;
            return;
        }
        self.data.push(value.to_string());
    }
}
