use std::collections::VecDeque;
use std::fmt;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::HeaderMap;

use crate::{error::BoxError, Logger, Transport};

/// What the scripted transport does with the next request.
pub(crate) enum Reply {
    Status(u16, &'static str),
    Fail(&'static str),
    /// 200 whose body stream breaks after a few bytes.
    BrokenBody,
}

#[derive(Clone, Debug)]
pub(crate) struct SentRequest {
    pub(crate) method: reqwest::Method,
    pub(crate) url: reqwest::Url,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Option<Vec<u8>>,
    pub(crate) timeout: Option<Duration>,
}

impl SentRequest {
    fn capture(request: &reqwest::Request) -> Self {
        Self {
            method: request.method().clone(),
            url: request.url().clone(),
            headers: request.headers().clone(),
            body: request
                .body()
                .and_then(reqwest::Body::as_bytes)
                .map(<[u8]>::to_vec),
            timeout: request.timeout().copied(),
        }
    }
}

pub(crate) struct ScriptedTransport {
    replies: Mutex<VecDeque<Reply>>,
    sent: Mutex<Vec<SentRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new(replies: impl IntoIterator<Item = Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().collect()),
            sent: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn hits(&self) -> usize {
        self.sent().len()
    }

    pub(crate) fn sent(&self) -> Vec<SentRequest> {
        self.sent
            .lock()
            .expect("sent mutex must not be poisoned")
            .clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: reqwest::Request) -> Result<reqwest::Response, BoxError> {
        let attempt = {
            let mut sent = self.sent.lock().expect("sent mutex must not be poisoned");
            sent.push(SentRequest::capture(&request));
            sent.len()
        };
        let reply = self
            .replies
            .lock()
            .expect("reply queue mutex must not be poisoned")
            .pop_front()
            .unwrap_or(Reply::Fail("no scripted reply available"));

        match reply {
            Reply::Fail(message) => Err(message.into()),
            Reply::Status(status, body) => Ok(http::Response::builder()
                .status(status)
                .header("x-attempt", attempt.to_string())
                .body(body)
                .expect("scripted response must build")
                .into()),
            Reply::BrokenBody => {
                let chunks: Vec<Result<Bytes, io::Error>> = vec![
                    Ok(Bytes::from_static(b"par")),
                    Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset mid-body")),
                ];
                let body = reqwest::Body::wrap_stream(futures_util::stream::iter(chunks));
                Ok(http::Response::builder()
                    .status(200)
                    .header("x-attempt", attempt.to_string())
                    .body(body)
                    .expect("scripted response must build")
                    .into())
            }
        }
    }
}

#[derive(Default)]
pub(crate) struct RecordingLogger {
    lines: Mutex<Vec<String>>,
}

impl RecordingLogger {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .expect("log mutex must not be poisoned")
            .clone()
    }
}

impl Logger for RecordingLogger {
    fn error(&self, args: fmt::Arguments<'_>) {
        self.lines
            .lock()
            .expect("log mutex must not be poisoned")
            .push(args.to_string());
    }
}
