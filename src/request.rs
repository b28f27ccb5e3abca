use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;

use crate::{
    options::DEFAULT_RETRY_BACKOFF_MS, Logger, Method, ReqwestTransport, RequestOption,
    ResponseHead, TracingLogger, Transport,
};

/// A configurable HTTP request.
///
/// Built from a method, a URL and an ordered list of [`RequestOption`]s.
/// Options apply in order, so later ones override earlier ones. The request
/// can be executed any number of times with [`HttpRequest::execute`].
pub struct HttpRequest {
    pub(crate) method: Method,
    pub(crate) url: String,
    pub(crate) body: Option<Bytes>,
    pub(crate) headers: HashMap<String, String>,
    pub(crate) query: BTreeMap<String, String>,
    pub(crate) retry: usize,
    pub(crate) timeout: Option<Duration>,
    pub(crate) backoff: Duration,
    pub(crate) logger: Arc<dyn Logger>,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) last_response: Option<ResponseHead>,
}

impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &self.headers)
            .field("query", &self.query)
            .field("body_len", &self.body.as_ref().map(Bytes::len))
            .field("retry", &self.retry)
            .field("timeout", &self.timeout)
            .field("backoff", &self.backoff)
            .field("last_response", &self.last_response)
            .finish_non_exhaustive()
    }
}

impl HttpRequest {
    /// Creates a request sent through a fresh [`ReqwestTransport`] and
    /// logging retries through [`TracingLogger`].
    ///
    /// Use [`Client::request`](crate::Client::request) to share one
    /// transport and logger across many requests.
    ///
    /// ```no_run
    /// use httpclient::{with_header, with_retry, HttpRequest, Method};
    ///
    /// # async fn run() -> httpclient::Result<()> {
    /// let mut request = HttpRequest::new(
    ///     Method::Get,
    ///     "https://example.com/items",
    ///     [with_header("Accept", "application/json"), with_retry(2)],
    /// );
    /// let body = request.execute().await?;
    /// # let _ = body;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new<I>(method: Method, url: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = RequestOption>,
    {
        let mut request = Self::draft(
            method,
            url.into(),
            Arc::new(ReqwestTransport::default()),
            Arc::new(TracingLogger),
        );
        request.with(options);
        request
    }

    pub(crate) fn draft(
        method: Method,
        url: String,
        transport: Arc<dyn Transport>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            method,
            url,
            body: None,
            headers: HashMap::new(),
            query: BTreeMap::new(),
            retry: 0,
            timeout: None,
            backoff: Duration::from_millis(DEFAULT_RETRY_BACKOFF_MS),
            logger,
            transport,
            last_response: None,
        }
    }

    /// Applies more options to an already built request.
    pub fn with<I>(&mut self, options: I) -> &mut Self
    where
        I: IntoIterator<Item = RequestOption>,
    {
        for option in options {
            option.apply(self);
        }
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// The encoded body set by the last body option, if any.
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    pub fn query(&self) -> &BTreeMap<String, String> {
        &self.query
    }

    /// Number of retries after the first attempt.
    pub fn retry(&self) -> usize {
        self.retry
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Linear backoff step: the n-th retry waits `n * backoff`.
    pub fn backoff(&self) -> Duration {
        self.backoff
    }

    /// Sets a header, replacing any existing header whose name matches
    /// ignoring ASCII case.
    pub(crate) fn set_header(&mut self, key: String, value: String) {
        self.headers
            .retain(|existing, _| !existing.eq_ignore_ascii_case(&key));
        self.headers.insert(key, value);
    }

    pub(crate) fn set_body(&mut self, body: Bytes, content_type: String) {
        self.body = Some(body);
        self.set_header("Content-Type".to_owned(), content_type);
    }
}
