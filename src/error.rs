//! Failures raised by the geocoding and routing adapters.
//!
//! None of these escape the pipeline; they are logged and replaced by the
//! fallback of the stage that saw them.

use std::fmt;

#[derive(Debug)]
pub enum LookupError {
    Http(reqwest::Error),
    Status { code: u16, body: String },
    Decode(serde_json::Error),
    Malformed(String),
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupError::Http(err) => write!(f, "request failed: {}", err),
            LookupError::Status { code, body } => {
                write!(f, "service returned status {}: {}", code, body)
            }
            LookupError::Decode(err) => write!(f, "could not decode response: {}", err),
            LookupError::Malformed(reason) => write!(f, "malformed response: {}", reason),
        }
    }
}

impl std::error::Error for LookupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LookupError::Http(err) => Some(err),
            LookupError::Decode(err) => Some(err),
            LookupError::Status { .. } | LookupError::Malformed(_) => None,
        }
    }
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        LookupError::Http(err)
    }
}

impl From<serde_json::Error> for LookupError {
    fn from(err: serde_json::Error) -> Self {
        LookupError::Decode(err)
    }
}

/// Turns a non-2xx response into [`LookupError::Status`], otherwise returns
/// the body text.
pub(crate) async fn read_body(response: reqwest::Response) -> Result<String, LookupError> {
    let status = response.status();
    let body = response.text().await?;
    if status.is_success() {
        Ok(body)
    } else {
        Err(LookupError::Status {
            code: status.as_u16(),
            body,
        })
    }
}
