//! Shared vocabulary of the desk intents: input validation failures, the error every
//! intent returns, and the status line shown after an action.

use serde::Serialize;

use crate::api::ApiError;
use crate::housekeeping::lifecycle::TransitionError;

/// Input rejected before any request is made.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Select start and end dates")]
    MissingDates,
    #[error("start_date must be <= end_date")]
    DateOrder,
    #[error("Please enter username and password")]
    MissingCredentials,
    #[error("Username must be at least {min} characters")]
    UsernameTooShort { min: usize },
    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },
    #[error("Check-out must be after check-in")]
    StayOrder,
    #[error("{0}")]
    Incomplete(&'static str),
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ValidationError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Error returned by every intent.
#[derive(Debug, thiserror::Error)]
pub enum DeskError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("{0}")]
    AuthRequired(String),
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl DeskError {
    pub(crate) fn auth_required() -> Self {
        Self::AuthRequired("Not authenticated".to_string())
    }

    /// True when the session should fall back to the login view.
    pub fn is_auth_failure(&self) -> bool {
        match self {
            Self::AuthRequired(_) => true,
            Self::Api(err) => err.is_unauthorized(),
            _ => false,
        }
    }

    /// True when nothing reached the network.
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Transition(_))
    }
}

/// Line shown in a screen's status area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }

    pub fn cleared() -> Self {
        Self::info("")
    }

    /// `"<context>: <error>"` for remote failures; local rejections show their own text.
    pub fn failure(context: &str, err: &DeskError) -> Self {
        if err.is_local() {
            Self::error(err.to_string())
        } else {
            Self::error(format!("{context}: {err}"))
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// What an intent hands back to the UI layer.
#[derive(Debug, Clone, Serialize)]
pub struct Outcome<T> {
    pub data: T,
    pub status: StatusMessage,
}

impl<T> Outcome<T> {
    pub fn new(data: T, status: StatusMessage) -> Self {
        Self { data, status }
    }
}

pub(crate) fn require_text(value: &str, message: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::Incomplete(message))
    } else {
        Ok(trimmed.to_string())
    }
}
