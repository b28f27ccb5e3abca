use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use serde::Serialize;

use crate::{
    form::{encode_form, FormValue},
    multipart::MultipartWriter,
    HttpRequest, Logger, Transport, UploadFile,
};

/// `Content-Type` set by [`with_json`].
pub const JSON_CONTENT_TYPE: &str = "application/json;charset=UTF-8";
/// `Content-Type` set by [`with_form`].
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded;charset=UTF-8";

/// A configuration step applied to an [`HttpRequest`].
pub struct RequestOption(Box<dyn FnOnce(&mut HttpRequest) + Send>);

impl RequestOption {
    /// Wraps an arbitrary mutation as an option.
    pub fn new(apply: impl FnOnce(&mut HttpRequest) + Send + 'static) -> Self {
        Self(Box::new(apply))
    }

    pub(crate) fn apply(self, request: &mut HttpRequest) {
        (self.0)(request)
    }
}

impl fmt::Debug for RequestOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RequestOption(..)")
    }
}

/// Replaces the logger that receives retry messages.
pub fn with_logger(logger: Arc<dyn Logger>) -> RequestOption {
    RequestOption::new(move |request| request.logger = logger)
}

/// Replaces the transport the request is sent through.
pub fn with_transport(transport: Arc<dyn Transport>) -> RequestOption {
    RequestOption::new(move |request| request.transport = transport)
}

/// Replaces the whole query mapping. Pairs are appended to whatever query
/// the URL already carries.
pub fn with_query<I, K, V>(query: I) -> RequestOption
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let query: BTreeMap<String, String> = query
        .into_iter()
        .map(|(key, value)| (key.into(), value.into()))
        .collect();
    RequestOption::new(move |request| request.query = query)
}

/// Sets the per-attempt timeout. `Duration::ZERO` means no timeout.
pub fn with_timeout(timeout: Duration) -> RequestOption {
    RequestOption::new(move |request| request.timeout = (!timeout.is_zero()).then_some(timeout))
}

/// Sets how many times a failed attempt is retried. `0` means one attempt.
pub fn with_retry(retry: usize) -> RequestOption {
    RequestOption::new(move |request| request.retry = retry)
}

/// Sets the linear backoff step (200 ms unless changed).
pub fn with_backoff(step: Duration) -> RequestOption {
    RequestOption::new(move |request| request.backoff = step)
}

/// Sets one header. A later call for the same name wins.
pub fn with_header(key: impl Into<String>, value: impl Into<String>) -> RequestOption {
    let key = key.into();
    let value = value.into();
    RequestOption::new(move |request| request.set_header(key, value))
}

/// Sends `body` as JSON.
///
/// Serialization failures do not surface as errors: the request is sent
/// with an empty body and a warning is logged through `tracing`.
pub fn with_json<T>(body: &T) -> RequestOption
where
    T: Serialize + ?Sized,
{
    let encoded = serde_json::to_vec(body).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "failed to serialize JSON body, sending it empty");
        Vec::new()
    });
    body_option(Bytes::from(encoded), JSON_CONTENT_TYPE.to_owned())
}

/// Sends the pairs as an `application/x-www-form-urlencoded` body.
///
/// ```
/// use httpclient::{with_form, FormValue, HttpRequest, Method};
///
/// let request = HttpRequest::new(
///     Method::Post,
///     "http://localhost/login",
///     [with_form([("user", FormValue::from("kit")), ("attempt", FormValue::from(3))])],
/// );
/// assert_eq!(request.body().unwrap().as_ref(), b"user=kit&attempt=3");
/// ```
pub fn with_form<I, K, V>(pairs: I) -> RequestOption
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<FormValue>,
{
    let encoded = encode_form(pairs);
    body_option(Bytes::from(encoded), FORM_CONTENT_TYPE.to_owned())
}

/// Sends a `multipart/form-data` body with an optional file part followed
/// by one part per plain field.
///
/// The body is built here, once: the file is read now and every retry
/// resends the same bytes. A read error truncates the file part and is
/// logged through `tracing`; the remaining fields are still written.
pub fn with_multipart<I, K, V>(file: Option<UploadFile>, fields: I) -> RequestOption
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut writer = MultipartWriter::new();

    if let Some(mut file) = file {
        if let Err(err) = writer.write_file(&file.field, &file.file_name, &mut file.reader) {
            tracing::warn!(
                error = %err,
                field = %file.field,
                file_name = %file.file_name,
                "failed to read multipart file part"
            );
        }
    }

    for (name, value) in fields {
        writer.write_field(name.as_ref(), value.as_ref());
    }

    let content_type = writer.content_type();
    body_option(Bytes::from(writer.finish()), content_type)
}

fn body_option(body: Bytes, content_type: String) -> RequestOption {
    RequestOption::new(move |request| request.set_body(body, content_type))
}
