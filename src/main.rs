use rocket::*;
use tracing_subscriber::EnvFilter;

mod config;
mod database;
mod delete_password;
mod fairings;
mod leaderboard;
mod routes;
mod submission;
#[cfg(test)]
mod tests;

use config::Config;
use database::ScoreStore;
use delete_password::DeletePassword;

#[launch]
async fn rocket() -> _ {
    init_tracing();

    // Read configuration
    let config = Config::from_env().expect("invalid configuration");

    // Connect to a database
    let store = ScoreStore::connect(&config.database_url, config.max_connections)
        .await
        .expect("failed to connect to a database");

    build(store, config.delete_password)
}

/// Builds the rocket around an already opened store.
pub fn build(store: ScoreStore, delete_password: DeletePassword) -> Rocket<Build> {
    rocket::build()
        .mount(
            "/",
            routes![
                routes::index,
                routes::load,
                routes::add_score,
                routes::delete_score
            ],
        )
        .register("/", catchers![routes::not_found, routes::default_catcher])
        .attach(fairings::RequestLogFairing)
        .attach(fairings::close_store_on_shutdown())
        .manage::<ScoreStore>(store)
        .manage::<DeletePassword>(delete_password)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("race_leaderboard=info,rocket=warn"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
