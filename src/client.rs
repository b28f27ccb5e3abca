use std::fmt;
use std::sync::Arc;

use crate::{
    ClientOptions, HttpRequest, Logger, Method, ReqwestTransport, RequestOption, Result,
    TracingLogger, Transport,
};

/// Factory for [`HttpRequest`]s that share one transport, one logger and
/// one set of default options.
///
/// Create it once at startup and pass it (or clones of it) to the code that
/// issues requests.
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
    logger: Arc<dyn Logger>,
    options: ClientOptions,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Creates a client backed by a new `reqwest::Client` that logs retries
    /// through [`TracingLogger`].
    pub fn new() -> Self {
        Self::from_reqwest(reqwest::Client::new())
    }

    /// Creates a client around an existing `reqwest::Client`, e.g. one with
    /// a proxy or custom TLS roots.
    pub fn from_reqwest(http: reqwest::Client) -> Self {
        Self {
            transport: Arc::new(ReqwestTransport::new(http)),
            logger: Arc::new(TracingLogger),
            options: ClientOptions::default(),
        }
    }

    /// Creates a client whose defaults come from the environment.
    ///
    /// See [`ClientOptions::from_env`] for the variables read.
    ///
    /// ```no_run
    /// use httpclient::Client;
    ///
    /// let client = Client::from_env().expect("invalid HTTPCLIENT_* env vars");
    /// ```
    pub fn from_env() -> Result<Self> {
        Ok(Self::new().with_options(ClientOptions::from_env()?))
    }

    /// Applies default timeout and retry behavior.
    pub fn with_options(mut self, options: ClientOptions) -> Self {
        self.options = options;
        self
    }

    /// Replaces the logger handed to every new request.
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Replaces the transport handed to every new request.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Creates a request seeded with this client's transport, logger and
    /// defaults, then applies `options` on top.
    pub fn request<I>(&self, method: Method, url: impl Into<String>, options: I) -> HttpRequest
    where
        I: IntoIterator<Item = RequestOption>,
    {
        let mut request = HttpRequest::draft(
            method,
            url.into(),
            Arc::clone(&self.transport),
            Arc::clone(&self.logger),
        );
        request.retry = self.options.max_retries;
        request.timeout = self.options.timeout();
        request.backoff = self.options.retry_backoff();
        request.with(options);
        request
    }

    pub fn get<I>(&self, url: impl Into<String>, options: I) -> HttpRequest
    where
        I: IntoIterator<Item = RequestOption>,
    {
        self.request(Method::Get, url, options)
    }

    pub fn post<I>(&self, url: impl Into<String>, options: I) -> HttpRequest
    where
        I: IntoIterator<Item = RequestOption>,
    {
        self.request(Method::Post, url, options)
    }

    pub fn put<I>(&self, url: impl Into<String>, options: I) -> HttpRequest
    where
        I: IntoIterator<Item = RequestOption>,
    {
        self.request(Method::Put, url, options)
    }

    pub fn delete<I>(&self, url: impl Into<String>, options: I) -> HttpRequest
    where
        I: IntoIterator<Item = RequestOption>,
    {
        self.request(Method::Delete, url, options)
    }
}
