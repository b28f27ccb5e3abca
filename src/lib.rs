//! `httpclient` builds HTTP requests from composable options and executes
//! them with a linear retry backoff.
//!
//! - [`HttpRequest::new`] / [`Client::request`] create a request from a
//!   method, a URL and options such as [`with_header`], [`with_query`],
//!   [`with_json`], [`with_form`], [`with_multipart`], [`with_timeout`] and
//!   [`with_retry`].
//! - [`HttpRequest::execute`] sends it, retrying failed attempts after
//!   200 ms, 400 ms, 600 ms, … and returns the raw response body.
//! - [`HttpRequest::last_response`] exposes the status and headers of the
//!   most recent response, including failed ones.
//!
//! ```no_run
//! use httpclient::{with_json, with_retry, Client};
//! use serde_json::json;
//!
//! # async fn run() -> httpclient::Result<()> {
//! let client = Client::new();
//! let mut request = client.post(
//!     "https://example.com/items",
//!     [with_json(&json!({"name": "kit"})), with_retry(3)],
//! );
//! let body = request.execute().await?;
//! println!("{} bytes", body.len());
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod execute;
mod form;
mod logger;
mod multipart;
mod option;
mod options;
mod request;
mod transport;
mod types;

#[cfg(test)]
mod testing;

pub use client::Client;
pub use error::{BoxError, HttpClientError};
pub use form::{encode_form, FormValue};
pub use logger::{Logger, TracingLogger};
pub use multipart::UploadFile;
pub use option::{
    with_backoff, with_form, with_header, with_json, with_logger, with_multipart, with_query,
    with_retry, with_timeout, with_transport, RequestOption, FORM_CONTENT_TYPE,
    JSON_CONTENT_TYPE,
};
pub use options::ClientOptions;
pub use request::HttpRequest;
pub use transport::{ReqwestTransport, Transport};
pub use types::{Method, ResponseHead};

pub type Result<T> = std::result::Result<T, HttpClientError>;
