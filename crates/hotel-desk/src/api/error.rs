use reqwest::StatusCode;
use serde_json::Value;

/// Failure talking to the hotel management API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{detail}")]
    Unauthorized { detail: String },
    #[error("{detail}")]
    Status { status: u16, detail: String },
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    pub(crate) fn from_response(status: StatusCode, body: &str) -> Self {
        let detail = error_detail(status, body);
        if status == StatusCode::UNAUTHORIZED {
            Self::Unauthorized { detail }
        } else {
            Self::Status {
                status: status.as_u16(),
                detail,
            }
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(StatusCode::UNAUTHORIZED.as_u16()),
            Self::Status { status, .. } => Some(*status),
            Self::Transport(err) => err.status().map(|status| status.as_u16()),
            Self::Decode(_) => None,
        }
    }
}

/// Human-readable message for a failed response.
///
/// A string `detail` is surfaced verbatim, a structured one as its JSON text. Bodies without a
/// `detail` fall back to the body itself and finally to the status reason.
pub(crate) fn error_detail(status: StatusCode, body: &str) -> String {
    let trimmed = body.trim();
    let reason = || status.canonical_reason().unwrap_or("request failed").to_string();

    if trimmed.is_empty() {
        return reason();
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(map)) => match map.get("detail") {
            Some(Value::String(detail)) => detail.clone(),
            Some(Value::Null) | None => trimmed.to_string(),
            Some(other) => other.to_string(),
        },
        Ok(Value::String(text)) if !text.is_empty() => text,
        Ok(Value::Null) => reason(),
        Ok(other) => other.to_string(),
        Err(_) => trimmed.to_string(),
    }
}
