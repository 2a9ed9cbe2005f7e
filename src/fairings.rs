use std::time::Instant;

use rocket::fairing::{AdHoc, Fairing, Info, Kind};
use rocket::http::StatusClass;
use rocket::request::Request;
use rocket::response::Response;

use crate::database::ScoreStore;

/// Logs each response under the name of the route that served it.
/// Server failures go out at `error`, client rejections at `warn`.
#[derive(Clone, Copy)]
pub struct RequestLogFairing;

#[rocket::async_trait]
impl Fairing for RequestLogFairing {
    fn info(&self) -> Info {
        Info {
            name: "Request log",
            kind: Kind::Request | Kind::Response,
        }
    }

    async fn on_request(&self, request: &mut Request<'_>, _data: &mut rocket::Data<'_>) {
        request.local_cache(Instant::now);
    }

    async fn on_response<'r>(&self, request: &'r Request<'_>, response: &mut Response<'r>) {
        let elapsed_ms = request.local_cache(Instant::now).elapsed().as_millis();
        let route = request
            .route()
            .and_then(|route| route.name.as_deref())
            .unwrap_or("unrouted");
        let status = response.status();

        match status.class() {
            StatusClass::ServerError => {
                tracing::error!(route, status = status.code, elapsed_ms, "Request failed")
            }
            StatusClass::ClientError => {
                tracing::warn!(route, status = status.code, elapsed_ms, "Request rejected")
            }
            _ => tracing::info!(route, status = status.code, elapsed_ms, "Request served"),
        }
    }
}

/// Closes the score store's connection pool when Rocket shuts down.
pub fn close_store_on_shutdown() -> AdHoc {
    AdHoc::on_shutdown("Close score store", |rocket| {
        Box::pin(async move {
            if let Some(store) = rocket.state::<ScoreStore>() {
                store.close().await;
            }
        })
    })
}
