pub mod sse;

use std::collections::VecDeque;

use futures::stream::{self, BoxStream};
use futures::{Stream, StreamExt};

use crate::error::LiveError;
use sse::SseDecoder;

/// Delay before a failed connection is retried. Fixed, no backoff and no
/// attempt limit.
pub(crate) const RECONNECT_DELAY_MS: u64 = 5000;

/// Identity of one live connection. A new generation means a new
/// subscription, which drops (and closes) the previous one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LiveKey {
    pub endpoint: String,
    pub generation: u64,
}

/// Events produced by a live connection, tagged with its generation.
#[derive(Debug, Clone)]
pub enum LiveEvent {
    Connected { generation: u64 },
    Data { generation: u64, payload: String },
    Failed { generation: u64, reason: String },
}

impl LiveEvent {
    pub fn generation(&self) -> u64 {
        match self {
            LiveEvent::Connected { generation }
            | LiveEvent::Data { generation, .. }
            | LiveEvent::Failed { generation, .. } => *generation,
        }
    }
}

/// Handle bookkeeping for the single live connection of a display.
#[derive(Debug)]
pub struct LiveChannel {
    endpoint: String,
    last_generation: u64,
    open: Option<u64>,
}

impl LiveChannel {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            last_generation: 0,
            open: None,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Open a new connection, closing the current one first.
    /// Returns the new generation.
    pub fn open(&mut self) -> u64 {
        self.close();
        self.last_generation += 1;
        self.open = Some(self.last_generation);
        tracing::info!(
            generation = self.last_generation,
            "live: opening {}",
            self.endpoint()
        );
        self.last_generation
    }

    /// Close the current connection, if any. Returns whether one was open.
    pub fn close(&mut self) -> bool {
        match self.open.take() {
            Some(generation) => {
                tracing::info!(generation, "live: closed");
                true
            }
            None => false,
        }
    }

    #[cfg(test)]
    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Whether `generation` is the connection currently held open.
    pub fn is_current(&self, generation: u64) -> bool {
        self.open == Some(generation)
    }

    /// Subscription key of the open connection.
    pub fn key(&self) -> Option<LiveKey> {
        self.open.map(|generation| LiveKey {
            endpoint: self.endpoint.clone(),
            generation,
        })
    }
}

type Body = BoxStream<'static, Result<Vec<u8>, reqwest::Error>>;

enum Phase {
    Connect(LiveKey),
    Read {
        generation: u64,
        body: Body,
        decoder: SseDecoder,
        ready: VecDeque<String>,
    },
    Done,
}

async fn connect(endpoint: &str) -> Result<Body, LiveError> {
    let response = reqwest::Client::new()
        .get(endpoint)
        .header(reqwest::header::ACCEPT, "text/event-stream")
        .send()
        .await?;
    let status = response.status();
    if !status.is_success() {
        return Err(LiveError::Status(status));
    }
    Ok(response
        .bytes_stream()
        .map(|chunk| chunk.map(|bytes| bytes.to_vec()))
        .boxed())
}

/// Stream the events of one connection. The stream ends after the first
/// failure; dropping it closes the HTTP connection.
pub fn live_stream(key: &LiveKey) -> impl Stream<Item = LiveEvent> + use<> {
    stream::unfold(Phase::Connect(key.clone()), |phase| async move {
        match phase {
            Phase::Connect(key) => {
                let generation = key.generation;
                match connect(&key.endpoint).await {
                    Ok(body) => Some((
                        LiveEvent::Connected { generation },
                        Phase::Read {
                            generation,
                            body,
                            decoder: SseDecoder::new(),
                            ready: VecDeque::new(),
                        },
                    )),
                    Err(e) => Some((
                        LiveEvent::Failed {
                            generation,
                            reason: e.to_string(),
                        },
                        Phase::Done,
                    )),
                }
            }
            Phase::Read {
                generation,
                mut body,
                mut decoder,
                mut ready,
            } => loop {
                if let Some(payload) = ready.pop_front() {
                    return Some((
                        LiveEvent::Data {
                            generation,
                            payload,
                        },
                        Phase::Read {
                            generation,
                            body,
                            decoder,
                            ready,
                        },
                    ));
                }
                let failure = match body.next().await {
                    Some(Ok(chunk)) => {
                        ready.extend(decoder.feed(&chunk));
                        continue;
                    }
                    Some(Err(e)) => LiveError::from(e),
                    None => LiveError::Closed,
                };
                return Some((
                    LiveEvent::Failed {
                        generation,
                        reason: failure.to_string(),
                    },
                    Phase::Done,
                ));
            },
            Phase::Done => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;

    use super::*;

    #[test]
    fn opening_twice_keeps_one_connection() {
        let mut channel = LiveChannel::new("http://localhost/stream");
        let first = channel.open();
        let second = channel.open();
        assert_ne!(first, second);
        assert!(channel.is_open());
        assert!(!channel.is_current(first));
        assert!(channel.is_current(second));
        assert_eq!(channel.key().map(|k| k.generation), Some(second));
    }

    #[test]
    fn close_clears_the_handle() {
        let mut channel = LiveChannel::new("http://localhost/stream");
        assert!(!channel.close());
        let generation = channel.open();
        assert!(channel.close());
        assert!(!channel.is_open());
        assert!(!channel.is_current(generation));
        assert!(channel.key().is_none());
    }

    #[test]
    fn generations_never_repeat() {
        let mut channel = LiveChannel::new("http://localhost/stream");
        let a = channel.open();
        channel.close();
        let b = channel.open();
        assert!(b > a);
    }

    #[test]
    fn key_carries_the_endpoint() {
        let mut channel = LiveChannel::new("http://tv.local/visitors");
        channel.open();
        let key = channel.key().unwrap();
        assert_eq!(key.endpoint, "http://tv.local/visitors");
        assert_eq!(channel.endpoint(), "http://tv.local/visitors");
    }

    #[test]
    fn event_generation_accessor() {
        let ev = LiveEvent::Data {
            generation: 4,
            payload: String::new(),
        };
        assert_eq!(ev.generation(), 4);
    }

    /// Accept one connection on a loopback port, read the request head and
    /// answer with `response` (or hang up without a word when it is empty).
    fn serve_once(response: &'static [u8]) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            if response.is_empty() {
                return;
            }
            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => return,
                    Ok(n) => head.extend_from_slice(&buf[..n]),
                }
            }
            let _ = stream.write_all(response);
        });
        format!("http://{addr}/visitors/stream")
    }

    async fn events_from(endpoint: String) -> Vec<LiveEvent> {
        let key = LiveKey {
            endpoint,
            generation: 7,
        };
        live_stream(&key).collect().await
    }

    fn failure_reason(event: &LiveEvent) -> &str {
        match event {
            LiveEvent::Failed { generation, reason } => {
                assert_eq!(*generation, 7);
                reason
            }
            other => panic!("expected a failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn events_arrive_in_order_then_end_of_body_fails() {
        let endpoint = serve_once(
            b"HTTP/1.1 200 OK\r\n\
              Content-Type: text/event-stream\r\n\
              Connection: close\r\n\r\n\
              data: {\"total\": 1}\n\n\
              : keepalive\n\n\
              data: {\"total\": 2, \"history\": [1, 2]}\n\n",
        );
        let events = events_from(endpoint).await;
        assert_eq!(events.len(), 4, "{events:?}");
        assert!(matches!(events[0], LiveEvent::Connected { generation: 7 }));
        match (&events[1], &events[2]) {
            (LiveEvent::Data { payload: a, .. }, LiveEvent::Data { payload: b, .. }) => {
                assert_eq!(a, r#"{"total": 1}"#);
                assert_eq!(b, r#"{"total": 2, "history": [1, 2]}"#);
            }
            other => panic!("expected two data events, got {other:?}"),
        }
        assert_eq!(failure_reason(&events[3]), LiveError::Closed.to_string());
    }

    #[tokio::test]
    async fn error_status_fails_without_connecting() {
        let endpoint = serve_once(
            b"HTTP/1.1 503 Service Unavailable\r\n\
              Content-Length: 0\r\n\
              Connection: close\r\n\r\n",
        );
        let events = events_from(endpoint).await;
        assert_eq!(events.len(), 1, "{events:?}");
        assert!(failure_reason(&events[0]).contains("503"));
    }

    #[tokio::test]
    async fn hang_up_before_response_fails() {
        let endpoint = serve_once(b"");
        let events = events_from(endpoint).await;
        assert_eq!(events.len(), 1, "{events:?}");
        failure_reason(&events[0]);
    }

    #[tokio::test]
    async fn refused_connection_fails() {
        let addr = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();
        // listener dropped: nothing accepts on this port any more
        let events = events_from(format!("http://{addr}/visitors/stream")).await;
        assert_eq!(events.len(), 1, "{events:?}");
        failure_reason(&events[0]);
    }
}
