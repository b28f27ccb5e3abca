use std::fmt;

/// Scalar value accepted by [`with_form`](crate::with_form).
///
/// Every value renders to the string that ends up on the wire. `Null`
/// stands for anything without a scalar representation and renders empty.
#[derive(Clone, Debug, PartialEq)]
pub enum FormValue {
    Null,
    Integer(i64),
    Unsigned(u64),
    Float(f64),
    Text(String),
}

impl FormValue {
    pub fn null() -> Self {
        Self::Null
    }

    pub fn integer(value: i64) -> Self {
        Self::Integer(value)
    }

    pub fn float(value: f64) -> Self {
        Self::Float(value)
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }
}

impl fmt::Display for FormValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Unsigned(value) => write!(f, "{value}"),
            // `Display` for f64 is the shortest round-trippable form, never
            // in exponent notation. Infinities carry an explicit sign.
            Self::Float(value) if value.is_infinite() => {
                f.write_str(if value.is_sign_positive() { "+Inf" } else { "-Inf" })
            }
            Self::Float(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<String> for FormValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for FormValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<i64> for FormValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for FormValue {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<u64> for FormValue {
    fn from(value: u64) -> Self {
        Self::Unsigned(value)
    }
}

impl From<u32> for FormValue {
    fn from(value: u32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<usize> for FormValue {
    fn from(value: usize) -> Self {
        Self::Unsigned(value as u64)
    }
}

impl From<f64> for FormValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<f32> for FormValue {
    fn from(value: f32) -> Self {
        Self::Float(value.into())
    }
}

impl From<serde_json::Value> for FormValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(text) => Self::Text(text),
            serde_json::Value::Number(number) => {
                if let Some(value) = number.as_i64() {
                    Self::Integer(value)
                } else if let Some(value) = number.as_u64() {
                    Self::Unsigned(value)
                } else {
                    number.as_f64().map_or(Self::Null, Self::Float)
                }
            }
            _ => Self::Null,
        }
    }
}

/// Encodes pairs as an `application/x-www-form-urlencoded` body, in the
/// order they are yielded.
///
/// This is the body [`with_form`](crate::with_form) sends.
///
/// ```
/// use httpclient::{encode_form, FormValue};
///
/// let body = encode_form([("name", FormValue::from("Kit Cat")), ("age", FormValue::from(7))]);
/// assert_eq!(body, "name=Kit+Cat&age=7");
/// ```
pub fn encode_form<I, K, V>(pairs: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<FormValue>,
{
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        serializer.append_pair(key.as_ref(), &value.into().to_string());
    }
    serializer.finish()
}
