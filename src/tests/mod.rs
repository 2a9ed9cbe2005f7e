use rocket::{
    http::{ContentType, RawStr, Status},
    local::asynchronous::{Client, LocalResponse},
};

use crate::{
    database::{NewScore, ScoreRecord, ScoreStore, StoreError},
    delete_password::DeletePassword,
    routes::LoadResponse,
    submission::{ActionError, ActionSuccess},
};

const TEST_PASSWORD: &str = "BouvetPingviner";

async fn spawn_client() -> Client {
    let store = ScoreStore::connect("sqlite::memory:", 1)
        .await
        .expect("in-memory database");
    Client::tracked(super::build(store, DeletePassword::new(TEST_PASSWORD)))
        .await
        .expect("valid rocket instance")
}

fn store(client: &Client) -> &ScoreStore {
    client.rocket().state::<ScoreStore>().expect("managed store")
}

async fn deserialize_response<'a, T: rocket::serde::DeserializeOwned>(
    response: LocalResponse<'a>,
) -> rocket::serde::json::serde_json::Result<T> {
    let string = response.into_string().await.unwrap();
    rocket::serde::json::serde_json::from_str(&string)
}

fn form_body(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(key, value)| format!("{}={}", key, RawStr::new(value).percent_encode()))
        .collect::<Vec<_>>()
        .join("&")
}

/// Posts a form and returns the status with the error message, if any.
async fn post_form(client: &Client, uri: &'static str, fields: &[(&str, &str)]) -> (Status, Option<String>) {
    let response = client
        .post(uri)
        .header(ContentType::Form)
        .body(form_body(fields))
        .dispatch()
        .await;

    let status = response.status();
    if status == Status::Ok {
        let success = deserialize_response::<ActionSuccess>(response).await.unwrap();
        assert!(success.success);
        (status, None)
    } else {
        let error = deserialize_response::<ActionError>(response).await.unwrap();
        (status, Some(error.error))
    }
}

/// Submits a score with the given race time.
async fn add_score(
    client: &Client,
    name: &str,
    (minutes, seconds, milliseconds): (&str, &str, &str),
    rings: Option<&str>,
) -> (Status, Option<String>) {
    let email = format!("{}@example.com", name.to_lowercase());
    let mut fields = vec![
        ("name", name),
        ("email", email.as_str()),
        ("minutes", minutes),
        ("seconds", seconds),
        ("milliseconds", milliseconds),
    ];
    if let Some(rings) = rings {
        fields.push(("rings", rings));
    }
    post_form(client, "/scores", &fields).await
}

async fn delete_score(client: &Client, id: &str, password: &str) -> (Status, Option<String>) {
    post_form(client, "/scores/delete", &[("id", id), ("password", password)]).await
}

async fn get_scores(client: &Client, uri: &str) -> Vec<ScoreRecord> {
    let response = client.get(uri).dispatch().await;
    assert_eq!(response.status(), Status::Ok);

    let load = deserialize_response::<LoadResponse>(response).await.unwrap();
    load.scores.iter().cloned().collect()
}

/// Adds scores and fetches them back fastest first
#[rocket::async_test]
async fn add_and_list_scores() {
    let client = spawn_client().await;

    assert!(get_scores(&client, "/scores").await.is_empty());

    for (name, time) in [
        ("Slow", ("3", "0", "0")),
        ("Ada", ("2", "5", "500")),
        ("Fast", ("0", "59", "999")),
    ] {
        assert_eq!(add_score(&client, name, time, None).await, (Status::Ok, None));
    }

    let scores = get_scores(&client, "/scores").await;
    let names: Vec<_> = scores.iter().map(|score| score.name.as_str()).collect();
    assert_eq!(names, vec!["Fast", "Ada", "Slow"]);

    let ada = &scores[1];
    assert_eq!(ada.time, 125_500);
    assert_eq!(ada.email, "ada@example.com");
    assert_eq!(ada.rings, None);
    assert!(ada.id >= 1);
}

/// The time is sent as a plain JSON number
#[rocket::async_test]
async fn time_is_a_plain_number() {
    let client = spawn_client().await;
    add_score(&client, "Ada", ("2", "5", "500"), None).await;

    let response = client.get("/scores").dispatch().await;
    let value = deserialize_response::<rocket::serde::json::Value>(response)
        .await
        .unwrap();
    assert_eq!(value["scores"][0]["time"].as_i64(), Some(125_500));
    assert!(value["scores"][0]["createdAt"].is_string());
}

/// Equal times are ranked by rings, most rings first
#[rocket::async_test]
async fn rings_break_ties() {
    let client = spawn_client().await;

    add_score(&client, "Amy", ("1", "10", "0"), Some("5")).await;
    add_score(&client, "Bob", ("1", "10", "0"), Some("9")).await;
    add_score(&client, "Cat", ("1", "10", "0"), None).await;
    add_score(&client, "Dan", ("1", "9", "999"), None).await;

    let scores = get_scores(&client, "/scores").await;
    let names: Vec<_> = scores.iter().map(|score| score.name.as_str()).collect();
    assert_eq!(names, vec!["Dan", "Bob", "Amy", "Cat"]);
    assert_eq!(scores[1].time, 70_000);
    assert_eq!(scores[1].rings, Some(9));
}

#[rocket::async_test]
async fn limit_narrows_the_list() {
    let client = spawn_client().await;
    for name in ["Amy", "Bob", "Cat"] {
        add_score(&client, name, ("1", "0", "0"), None).await;
    }

    assert_eq!(get_scores(&client, "/scores?limit=2").await.len(), 2);
    assert_eq!(get_scores(&client, "/scores?limit=500").await.len(), 3);
    assert!(get_scores(&client, "/scores?limit=0").await.is_empty());
}

/// Numeric fields are read up to the first non-digit
#[rocket::async_test]
async fn decimal_fields_are_truncated() {
    let client = spawn_client().await;

    let response = add_score(&client, "Ada", ("2.0", "5", "500.5"), Some("3.9")).await;
    assert_eq!(response, (Status::Ok, None));

    let scores = get_scores(&client, "/scores").await;
    assert_eq!(scores[0].time, 125_500);
    assert_eq!(scores[0].rings, Some(3));

    let response = add_score(&client, "Bob", (".5", "0", "0"), None).await;
    assert_eq!(response, (Status::BadRequest, Some("Invalid minutes".to_owned())));
}

/// A body that is not a form still gets an `{error}` answer
#[rocket::async_test]
async fn wrong_content_type_answers_with_error_body() {
    let client = spawn_client().await;

    let response = client
        .post("/scores")
        .header(ContentType::JSON)
        .body(r#"{"name":"Ada","email":"ada@example.com"}"#)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::UnsupportedMediaType);
    assert_eq!(response.content_type(), Some(ContentType::JSON));

    let error = deserialize_response::<ActionError>(response).await.unwrap();
    assert!(!error.error.is_empty());
    assert!(get_scores(&client, "/scores").await.is_empty());
}

#[rocket::async_test]
async fn unknown_route_answers_with_error_body() {
    let client = spawn_client().await;

    let response = client.get("/leaderboard").dispatch().await;
    assert_eq!(response.status(), Status::NotFound);

    let error = deserialize_response::<ActionError>(response).await.unwrap();
    assert_eq!(error.error, "The requested resource could not be found.");
}

/// Invalid submissions are rejected with a 400 and never stored
#[rocket::async_test]
async fn invalid_submissions_are_not_stored() {
    let client = spawn_client().await;

    let long_name = "x".repeat(101);
    let response = add_score(&client, &long_name, ("1", "0", "0"), None).await;
    assert_eq!(response, (Status::BadRequest, Some("Invalid name".to_owned())));

    let response = post_form(
        &client,
        "/scores",
        &[
            ("name", "Ada"),
            ("email", "ada@example"),
            ("minutes", "1"),
            ("seconds", "0"),
            ("milliseconds", "0"),
        ],
    )
    .await;
    assert_eq!(response, (Status::BadRequest, Some("Invalid email".to_owned())));

    let response = add_score(&client, "Ada", ("-1", "0", "0"), None).await;
    assert_eq!(response, (Status::BadRequest, Some("Invalid minutes".to_owned())));

    let response = add_score(&client, "Ada", ("1", "60", "0"), None).await;
    assert_eq!(response, (Status::BadRequest, Some("Invalid seconds".to_owned())));

    let response = add_score(&client, "Ada", ("1", "0", "1000"), None).await;
    assert_eq!(
        response,
        (Status::BadRequest, Some("Invalid milliseconds".to_owned()))
    );

    let response = add_score(&client, "Ada", ("1", "0", "0"), Some("1000")).await;
    assert_eq!(
        response,
        (Status::BadRequest, Some("Invalid rings count".to_owned()))
    );

    let response = post_form(&client, "/scores", &[]).await;
    assert_eq!(response, (Status::BadRequest, Some("Invalid name".to_owned())));

    assert!(get_scores(&client, "/scores").await.is_empty());
}

/// Adds a score, fails to delete it, then deletes it
#[rocket::async_test]
async fn delete_requires_password() {
    let client = spawn_client().await;
    add_score(&client, "Ada", ("1", "0", "0"), None).await;
    let id = get_scores(&client, "/scores").await[0].id.to_string();

    // Fail to delete the score
    let response = delete_score(&client, &id, "thatisarandomkey").await;
    assert_eq!(
        response,
        (Status::Forbidden, Some("Incorrect password".to_owned()))
    );
    let response = delete_score(&client, &id, "").await;
    assert_eq!(response.0, Status::Forbidden);
    assert_eq!(get_scores(&client, "/scores").await.len(), 1);

    // Delete the score
    let response = delete_score(&client, &id, TEST_PASSWORD).await;
    assert_eq!(response, (Status::Ok, None));
    assert!(get_scores(&client, "/scores").await.is_empty());
}

/// The id is checked before the password
#[rocket::async_test]
async fn invalid_id_reported_first() {
    let client = spawn_client().await;

    for id in ["0", "-4", "abc", ""] {
        let response = delete_score(&client, id, "thatisarandomkey").await;
        assert_eq!(
            response,
            (Status::BadRequest, Some("Invalid score ID".to_owned()))
        );
    }
}

/// Deleting a missing score fails with a generic server error
#[rocket::async_test]
async fn delete_missing_score() {
    let client = spawn_client().await;

    let response = delete_score(&client, "42", TEST_PASSWORD).await;
    assert_eq!(
        response,
        (
            Status::InternalServerError,
            Some("Internal server error".to_owned())
        )
    );
}

/// Two deletes of the same score race; exactly one wins
#[rocket::async_test]
async fn concurrent_deletes() {
    let client = spawn_client().await;
    add_score(&client, "Ada", ("1", "0", "0"), None).await;
    let id = get_scores(&client, "/scores").await[0].id.to_string();

    let (first, second) = tokio::join!(
        delete_score(&client, &id, TEST_PASSWORD),
        delete_score(&client, &id, TEST_PASSWORD),
    );
    let mut statuses = vec![first.0.code, second.0.code];
    statuses.sort_unstable();
    assert_eq!(statuses, vec![200, 500]);
}

/// The store reports a missing id as its own error kind
#[rocket::async_test]
async fn store_distinguishes_not_found() {
    let client = spawn_client().await;
    let store = store(&client);

    let created = store
        .create(NewScore {
            name: "Ada".to_owned(),
            email: "ada@example.com".to_owned(),
            time: 125_500,
            rings: Some(3),
        })
        .await
        .unwrap();
    assert_eq!(store.list_top(100).await.unwrap(), vec![created.clone()]);

    store.delete(created.id).await.unwrap();
    let error = store.delete(created.id).await.unwrap_err();
    assert!(matches!(error, StoreError::NotFound { id } if id == created.id));
}

/// The table's own constraints reject what validation would have caught
#[rocket::async_test]
async fn store_rejects_negative_time() {
    let client = spawn_client().await;
    let store = store(&client);

    let error = store
        .create(NewScore {
            name: "Ada".to_owned(),
            email: "ada@example.com".to_owned(),
            time: -1,
            rings: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(error, StoreError::Storage(_)));
    assert!(store.list_top(100).await.unwrap().is_empty());
}
