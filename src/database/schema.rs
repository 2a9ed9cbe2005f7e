use super::*;

/// Relational engines the score table can be created on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    Sqlite,
    Postgres,
}

impl Backend {
    pub fn from_url(database_url: &str) -> StoreResult<Self> {
        let url_scheme = database_url
            .split(':')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match url_scheme.as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            _ => Err(StoreError::UnsupportedBackend { url_scheme }),
        }
    }

    fn create_scores_table(self) -> &'static str {
        match self {
            Self::Sqlite => {
                "CREATE TABLE IF NOT EXISTS scores (
                    id          INTEGER PRIMARY KEY AUTOINCREMENT,
                    name        TEXT NOT NULL,
                    email       TEXT NOT NULL,
                    time        BIGINT NOT NULL CHECK (time >= 0),
                    rings       BIGINT CHECK (rings BETWEEN 0 AND 999),
                    created_at  BIGINT NOT NULL
                )"
            }
            Self::Postgres => {
                "CREATE TABLE IF NOT EXISTS scores (
                    id          BIGSERIAL PRIMARY KEY,
                    name        VARCHAR(100) NOT NULL,
                    email       VARCHAR(100) NOT NULL,
                    time        BIGINT NOT NULL CHECK (time >= 0),
                    rings       BIGINT CHECK (rings BETWEEN 0 AND 999),
                    created_at  BIGINT NOT NULL
                )"
            }
        }
    }
}

const CREATE_RANKING_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_scores_ranking ON scores (time, rings)";

/// Creates the `scores` table and its ranking index if they are missing.
pub async fn migrate(database: &DatabasePool, backend: Backend) -> StoreResult<()> {
    sqlx::query(backend.create_scores_table())
        .execute(database)
        .await?;
    sqlx::query(CREATE_RANKING_INDEX).execute(database).await?;

    tracing::info!(?backend, "Score table migrations complete");
    Ok(())
}
