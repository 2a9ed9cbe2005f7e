use sqlx::Row;

pub mod schema;
mod score;
mod store;
mod store_error;

pub use score::{NewScore, RaceTime, ScoreId, ScoreRecord};
pub use store::{ScoreStore, DEFAULT_LIMIT};
pub use store_error::*;

pub type DatabasePool = sqlx::AnyPool;
