//! Scripted transport for prober tests

use bytes::Bytes;
use snapfind_errors::NetworkError;
use snapfind_net::{ByteStream, HeadResponse, ProbeTransport};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum Head {
    /// 200 with an optional raw `Content-Length`
    Ok(Option<&'static str>),
    /// 200 after a delay
    Delayed(Duration),
    Status(u16),
    Hang,
    Refused,
}

#[derive(Debug, Clone)]
pub enum Body {
    /// Endless stream of `chunk` bytes every `every`
    Steady { chunk: usize, every: Duration },
    /// `count` chunks, then end of stream
    Finite {
        count: usize,
        chunk: usize,
        every: Duration,
    },
    /// `count` chunks, then a read error
    Broken {
        count: usize,
        chunk: usize,
        every: Duration,
    },
    Status(u16),
    HangOpen,
}

#[derive(Default)]
pub struct MockTransport {
    heads: HashMap<String, Head>,
    bodies: HashMap<String, Body>,
    pub head_calls: AtomicUsize,
    pub stream_calls: AtomicUsize,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn head(mut self, url: &str, head: Head) -> Self {
        self.heads.insert(url.to_string(), head);
        self
    }

    pub fn body(mut self, url: &str, body: Body) -> Self {
        self.bodies.insert(url.to_string(), body);
        self
    }
}

fn chunks(count: Option<usize>, chunk: usize, every: Duration, fail_at_end: bool) -> ByteStream {
    let stream = futures::stream::unfold((0usize, false), move |(sent, done)| async move {
        if done {
            return None;
        }
        if count.is_some_and(|count| sent >= count) {
            let error = NetworkError::StreamInterrupted {
                bytes_read: (sent * chunk) as u64,
                message: "connection reset".to_string(),
            };
            return fail_at_end.then_some((Err(error), (sent, true)));
        }
        tokio::time::sleep(every).await;
        Some((Ok(Bytes::from(vec![0u8; chunk])), (sent + 1, false)))
    });
    Box::pin(stream)
}

impl ProbeTransport for MockTransport {
    async fn head(&self, url: &str, _timeout: Duration) -> Result<HeadResponse, NetworkError> {
        self.head_calls.fetch_add(1, Ordering::SeqCst);
        let ok = |content_length: Option<&str>| HeadResponse {
            status: 200,
            content_length: content_length.map(str::to_string),
            content_type: Some("application/octet-stream".to_string()),
            accept_ranges: Some("bytes".to_string()),
        };
        match self.heads.get(url).cloned().unwrap_or(Head::Refused) {
            Head::Ok(content_length) => Ok(ok(content_length)),
            Head::Delayed(delay) => {
                tokio::time::sleep(delay).await;
                Ok(ok(None))
            }
            Head::Status(status) => Ok(HeadResponse {
                status,
                ..HeadResponse::default()
            }),
            Head::Hang => std::future::pending().await,
            Head::Refused => Err(NetworkError::ConnectionRefused(url.to_string())),
        }
    }

    async fn open_stream(&self, url: &str) -> Result<ByteStream, NetworkError> {
        self.stream_calls.fetch_add(1, Ordering::SeqCst);
        match self.bodies.get(url).cloned() {
            Some(Body::Steady { chunk, every }) => Ok(chunks(None, chunk, every, false)),
            Some(Body::Finite {
                count,
                chunk,
                every,
            }) => Ok(chunks(Some(count), chunk, every, false)),
            Some(Body::Broken {
                count,
                chunk,
                every,
            }) => Ok(chunks(Some(count), chunk, every, true)),
            Some(Body::Status(status)) => Err(NetworkError::HttpError {
                status,
                message: "mock".to_string(),
            }),
            Some(Body::HangOpen) => std::future::pending().await,
            None => Err(NetworkError::ConnectionRefused(url.to_string())),
        }
    }
}
