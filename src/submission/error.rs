use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};

use crate::database::StoreError;

/// Message shown to clients for any backend failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// A rejected form field. The message is what the client sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid name")]
    Name,
    #[error("Invalid email")]
    Email,
    #[error("Invalid minutes")]
    Minutes,
    #[error("Invalid seconds")]
    Seconds,
    #[error("Invalid milliseconds")]
    Milliseconds,
    #[error("Invalid rings count")]
    Rings,
    #[error("Invalid score ID")]
    ScoreId,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("Incorrect password")]
    Unauthorized,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SubmissionError {
    pub fn status(&self) -> Status {
        match self {
            Self::Invalid(_) => Status::BadRequest,
            Self::Unauthorized => Status::Forbidden,
            Self::Store(_) => Status::InternalServerError,
        }
    }

    /// The message that may cross the service boundary.
    /// Storage details stay in the server log.
    pub fn public_message(&self) -> String {
        match self {
            Self::Store(_) => INTERNAL_ERROR_MESSAGE.to_owned(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct ActionSuccess {
    pub success: bool,
}

impl ActionSuccess {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct ActionError {
    pub error: String,
}

pub type ActionFailure = status::Custom<Json<ActionError>>;

pub type ActionResult = Result<Json<ActionSuccess>, ActionFailure>;

impl From<SubmissionError> for ActionFailure {
    fn from(error: SubmissionError) -> Self {
        status::Custom(
            error.status(),
            Json(ActionError {
                error: error.public_message(),
            }),
        )
    }
}
