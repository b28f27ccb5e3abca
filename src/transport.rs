use async_trait::async_trait;

use crate::error::BoxError;

/// Sends one fully built request and hands back the response without
/// looking at its status or body.
///
/// [`ReqwestTransport`] is the production implementation. Tests swap in
/// fakes that build responses with `reqwest::Response::from(http::Response)`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: reqwest::Request) -> Result<reqwest::Response, BoxError>;
}

/// [`Transport`] backed by a `reqwest::Client`.
///
/// Per-request timeouts set on the `reqwest::Request` are honored by the
/// client.
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: reqwest::Request) -> Result<reqwest::Response, BoxError> {
        self.http.execute(request).await.map_err(Into::into)
    }
}
