use anyhow::{Context, Result, anyhow};
use shared::config::RedisConfig;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub run_migrations: bool,
    pub port: u16,
    pub db_max_conn: u32,
    pub db_min_conn: u32,
    pub redis: RedisConfig,
    pub otel_endpoint: String,
    pub stock_update_max_retries: u32,
    pub is_dev: bool,
    pub enable_file_log: bool,
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(anyhow!("{name} must be 'true' or 'false', got '{other}'")),
    }
}

impl Config {
    pub fn init() -> Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").context("Missing environment variable: DATABASE_URL")?;
        let run_migrations_str = std::env::var("RUN_MIGRATIONS")
            .context("Missing environment variable: RUN_MIGRATIONS")?;
        let port_str = std::env::var("PORT").context("Missing environment variable: PORT")?;

        let run_migrations = parse_flag("RUN_MIGRATIONS", &run_migrations_str)?;

        let port = port_str
            .parse::<u16>()
            .context("PORT must be a valid u16 integer")?;

        let db_max_conn: u32 = std::env::var("DB_MAX_CONNECTION")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()
            .context("Unable to parse DB_MAX_CONNECTION as u32")?;

        let db_min_conn: u32 = std::env::var("DB_MIN_CONNECTION")
            .unwrap_or_else(|_| "1".to_string())
            .parse::<u32>()
            .context("Unable to parse DB_MIN_CONNECTION as u32")?;

        let redis = RedisConfig::from_env().context("Invalid redis configuration")?;

        let otel_endpoint = std::env::var("OTEL_ENDPOINT")
            .unwrap_or_else(|_| "http://otel-collector:4317".to_string());

        let stock_update_max_retries: u32 = std::env::var("STOCK_UPDATE_MAX_RETRIES")
            .unwrap_or_else(|_| "3".to_string())
            .parse::<u32>()
            .context("Unable to parse STOCK_UPDATE_MAX_RETRIES as u32")?;

        let is_dev = std::env::var("DEV_MODE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let enable_file_log = std::env::var("ENABLE_FILE_LOG")
            .map(|v| v == "true")
            .unwrap_or(false);

        Ok(Self {
            database_url,
            run_migrations,
            port,
            db_max_conn,
            db_min_conn,
            redis,
            otel_endpoint,
            stock_update_max_retries,
            is_dev,
            enable_file_log,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migration_flag_accepts_numeric_forms() {
        assert!(parse_flag("RUN_MIGRATIONS", "1").unwrap());
        assert!(!parse_flag("RUN_MIGRATIONS", "false").unwrap());
    }

    #[test]
    fn migration_flag_rejects_other_values() {
        let err = parse_flag("RUN_MIGRATIONS", "yes").unwrap_err();
        assert!(err.to_string().contains("RUN_MIGRATIONS"));
    }
}
