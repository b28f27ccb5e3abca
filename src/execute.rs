use bytes::Bytes;
use reqwest::{
    header::{HeaderName, HeaderValue},
    StatusCode,
};
use tokio::time::sleep;
use url::Url;

use crate::{HttpClientError, HttpRequest, ResponseHead, Result};

impl HttpRequest {
    /// Sends the request, retrying failed attempts.
    ///
    /// A failed attempt is retried until [`retry`](HttpRequest::retry)
    /// retries have been spent; the n-th retry waits `n * backoff` first and
    /// is announced through the request's [`Logger`](crate::Logger). URL and
    /// header errors are returned without retrying. After the last attempt
    /// fails, its error is returned.
    pub async fn execute(&mut self) -> Result<Bytes> {
        let mut retried = 0usize;
        loop {
            let err = match self.attempt().await {
                Ok(body) => return Ok(body),
                Err(err) => err,
            };
            if !err.is_retryable() || retried == self.retry {
                return Err(err);
            }

            retried += 1;
            self.logger.error(format_args!(
                "request [{}] failed: {err}, retry {retried} of {}",
                self.url, self.retry
            ));
            self.wait_before_retry(retried).await;
        }
    }

    /// Status and headers of the most recent response, if any attempt got
    /// one. Attempts that fail before a response arrives leave it unchanged.
    pub fn last_response(&self) -> Option<&ResponseHead> {
        self.last_response.as_ref()
    }

    async fn attempt(&mut self) -> Result<Bytes> {
        let request = self.build_wire_request()?;
        let response = self
            .transport
            .send(request)
            .await
            .map_err(HttpClientError::Transport)?;

        self.last_response = Some(ResponseHead::of(&response));
        if response.status() != StatusCode::OK {
            return Err(HttpClientError::NotOk);
        }

        response.bytes().await.map_err(HttpClientError::Body)
    }

    fn build_wire_request(&self) -> Result<reqwest::Request> {
        let mut url = Url::parse(&self.url).map_err(|source| HttpClientError::InvalidUrl {
            url: self.url.clone(),
            source,
        })?;
        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.query {
                pairs.append_pair(key, value);
            }
        }

        let mut request = reqwest::Request::new(self.method.into(), url);
        for (name, value) in &self.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|err| {
                HttpClientError::InvalidHeader {
                    name: name.clone(),
                    reason: err.to_string(),
                }
            })?;
            let header_value =
                HeaderValue::from_str(value).map_err(|err| HttpClientError::InvalidHeader {
                    name: name.clone(),
                    reason: err.to_string(),
                })?;
            request.headers_mut().insert(header_name, header_value);
        }
        if let Some(body) = &self.body {
            *request.body_mut() = Some(body.clone().into());
        }
        *request.timeout_mut() = self.timeout;

        Ok(request)
    }

    async fn wait_before_retry(&self, retried: usize) {
        let factor = u32::try_from(retried).unwrap_or(u32::MAX);
        let delay = self.backoff.saturating_mul(factor);

        tracing::debug!(
            url = %self.url,
            delay_ms = delay.as_millis() as u64,
            "retrying request"
        );

        sleep(delay).await;
    }
}
