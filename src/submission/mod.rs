//! Gatekeeper between untrusted form input and the score store.

use crate::database::{NewScore, RaceTime, ScoreId, ScoreRecord, ScoreStore, StoreError};
use crate::delete_password::DeletePassword;

mod error;
mod forms;
pub mod validate;

pub use error::*;
pub use forms::{AddScoreForm, DeleteScoreForm};

/// Validates `form` and stores it as a new score.
/// Nothing reaches the store unless every field is valid.
pub async fn add_score(
    store: &ScoreStore,
    form: &AddScoreForm,
) -> Result<ScoreRecord, SubmissionError> {
    let score = validate::new_score(form).map_err(|error| {
        tracing::debug!(%error, "Rejected score submission");
        error
    })?;

    store.create(score).await.map_err(|error| {
        tracing::error!(%error, "Failed to add score");
        error.into()
    })
}

/// Checks the id, then the password, then deletes the score.
/// A wrong password is reported before the store is touched.
pub async fn delete_score(
    store: &ScoreStore,
    delete_password: &DeletePassword,
    form: &DeleteScoreForm,
) -> Result<ScoreId, SubmissionError> {
    let id = validate::score_id(form.id.as_deref())?;

    let password = form.password.as_deref().unwrap_or_default();
    if !delete_password.matches(password) {
        tracing::warn!(id, "Rejected score deletion: incorrect password");
        return Err(SubmissionError::Unauthorized);
    }

    match store.delete(id).await {
        Ok(()) => Ok(id),
        Err(error @ StoreError::NotFound { .. }) => {
            tracing::warn!(%error, "Failed to delete score");
            Err(error.into())
        }
        Err(error) => {
            tracing::error!(%error, "Failed to delete score");
            Err(error.into())
        }
    }
}
