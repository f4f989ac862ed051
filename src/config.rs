use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub db_max_connections: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, crate::error::AppError> {
        dotenv().ok();
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| crate::error::AppError::Config("DATABASE_URL missing".into()))?;
        let port = env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8080);
        let db_max_connections = env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(16);

        Ok(Self {
            database_url,
            port,
            db_max_connections,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_uses_defaults_for_optional_values() {
        env::remove_var("PORT");
        env::remove_var("DB_MAX_CONNECTIONS");
        env::set_var("DATABASE_URL", "postgres://localhost/live_qa_test");

        let cfg = Config::from_env().unwrap();
        assert_eq!(cfg.database_url, "postgres://localhost/live_qa_test");
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.db_max_connections, 16);
    }
}
