use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::path::PathBuf;
use std::str::FromStr;

fn default_max_upload_size() -> usize {
    // 100 MB in bytes
    100 * 1024 * 1024
}

fn default_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://localhost:5173".to_string(),
        "http://localhost:8080".to_string(),
    ]
}

#[derive(Debug, Clone)]
pub struct Config {
    pub project_name: String,
    pub version: String,
    pub host: String,
    pub port: u16,
    pub api_prefix: String,
    pub allowed_origins: Vec<String>,
    pub max_upload_size: usize,
    pub temp_dir: PathBuf,
    /// Upper bound on datasets kept in the registry before the least recently
    /// used one is evicted together with its stored file.
    pub dataset_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            project_name: "Flownix".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            host: "0.0.0.0".to_string(),
            port: 8000,
            api_prefix: "/api/v1".to_string(),
            allowed_origins: default_allowed_origins(),
            max_upload_size: default_max_upload_size(),
            temp_dir: PathBuf::from("./temp"),
            dataset_capacity: 1024,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file first
        dotenv().ok();

        let defaults = Config::default();

        let allowed_origins = match std::env::var("ALLOWED_ORIGINS") {
            Ok(raw) => parse_origins(&raw),
            Err(_) => defaults.allowed_origins,
        };

        let dataset_capacity: usize = env_or("DATASET_CAPACITY", defaults.dataset_capacity)?;
        if dataset_capacity == 0 {
            anyhow::bail!("DATASET_CAPACITY must be greater than zero");
        }

        let api_prefix = std::env::var("API_PREFIX").unwrap_or(defaults.api_prefix);
        if !api_prefix.starts_with('/') || api_prefix.ends_with('/') {
            anyhow::bail!(
                "API_PREFIX must start with '/' and not end with one, got '{}'",
                api_prefix
            );
        }

        Ok(Config {
            project_name: std::env::var("PROJECT_NAME").unwrap_or(defaults.project_name),
            version: std::env::var("VERSION").unwrap_or(defaults.version),
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: env_or("PORT", defaults.port)?,
            api_prefix,
            allowed_origins,
            max_upload_size: env_or("MAX_UPLOAD_SIZE", defaults.max_upload_size)?,
            temp_dir: std::env::var("TEMP_DIR").map(PathBuf::from).unwrap_or(defaults.temp_dir),
            dataset_capacity,
        })
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Failed to parse {} from '{}'", key, raw)),
        Err(_) => Ok(default),
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_split_and_trimmed() {
        let origins = parse_origins(" http://a.test , http://b.test,,");
        assert_eq!(origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn defaults_follow_documented_limits() {
        let config = Config::default();
        assert_eq!(config.max_upload_size, 100 * 1024 * 1024);
        assert_eq!(config.api_prefix, "/api/v1");
        assert_eq!(config.temp_dir, PathBuf::from("./temp"));
    }
}
