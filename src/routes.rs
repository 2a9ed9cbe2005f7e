use rocket::form::Form;
use rocket::http::{Status, StatusClass};
use rocket::response::status;
use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};
use rocket::*;

use crate::database::{ScoreRecord, ScoreStore, DEFAULT_LIMIT};
use crate::delete_password::DeletePassword;
use crate::leaderboard::Leaderboard;
use crate::submission::{
    self, ActionError, ActionFailure, ActionResult, ActionSuccess, SubmissionError,
    INTERNAL_ERROR_MESSAGE,
};

#[derive(Serialize, Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct LoadResponse {
    pub scores: Leaderboard<ScoreRecord>,
}

#[get("/")]
pub fn index() -> &'static str {
    "This is an online race leaderboard server!"
}

/// Returns the top of the leaderboard, fastest first.
/// `limit` defaults to and is capped at 100; a limit of 0 yields an empty list.
#[get("/scores?<limit>")]
pub async fn load(
    limit: Option<u32>,
    store: &State<ScoreStore>,
) -> Result<Json<LoadResponse>, ActionFailure> {
    let scores = store
        .list_top(limit.unwrap_or(DEFAULT_LIMIT))
        .await
        .map_err(|error| {
            tracing::error!(%error, "Failed to fetch scores");
            SubmissionError::from(error)
        })?;

    let scores = Leaderboard::new(scores);
    tracing::debug!(count = scores.len(), "Loaded leaderboard");
    Ok(Json(LoadResponse { scores }))
}

#[post("/scores", data = "<form>")]
pub async fn add_score(form: Form<submission::AddScoreForm>, store: &State<ScoreStore>) -> ActionResult {
    submission::add_score(store.inner(), &form).await?;
    Ok(Json(ActionSuccess::ok()))
}

#[post("/scores/delete", data = "<form>")]
pub async fn delete_score(
    form: Form<submission::DeleteScoreForm>,
    store: &State<ScoreStore>,
    delete_password: &State<DeletePassword>,
) -> ActionResult {
    submission::delete_score(store.inner(), delete_password.inner(), &form).await?;
    Ok(Json(ActionSuccess::ok()))
}

#[catch(404)]
pub fn not_found() -> ActionFailure {
    status::Custom(
        Status::NotFound,
        Json(ActionError {
            error: "The requested resource could not be found.".to_owned(),
        }),
    )
}

/// Requests rejected before reaching a handler (wrong content type,
/// unparsable body, panics) still answer with an `{error}` body.
#[catch(default)]
pub fn default_catcher(code: Status, _request: &Request<'_>) -> ActionFailure {
    let error = match code.class() {
        StatusClass::ServerError => INTERNAL_ERROR_MESSAGE.to_owned(),
        _ => code.reason_lossy().to_owned(),
    };
    status::Custom(code, Json(ActionError { error }))
}
