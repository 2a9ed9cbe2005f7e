use crate::delete_password::DeletePassword;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} environment variable is not set")]
    Missing { key: &'static str },
    #[error("{key} environment variable is invalid: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Process configuration, read once at launch.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub delete_password: DeletePassword,
}

impl Config {
    /// Reads the configuration from the environment, loading `.env` first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing {
            key: "DATABASE_URL",
        })?;

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            None => DEFAULT_MAX_CONNECTIONS,
            Some(value) => match value.trim().parse::<u32>() {
                Ok(count) if count > 0 => count,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "DATABASE_MAX_CONNECTIONS",
                        value,
                    })
                }
            },
        };

        let delete_password = lookup("DELETE_PASSWORD").ok_or(ConfigError::Missing {
            key: "DELETE_PASSWORD",
        })?;
        if delete_password.is_empty() {
            return Err(ConfigError::Invalid {
                key: "DELETE_PASSWORD",
                value: String::new(),
            });
        }

        Ok(Self {
            database_url,
            max_connections,
            delete_password: DeletePassword::new(delete_password),
        })
    }
}
