use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use axum::http::HeaderName;
use products_hr::{EmployeeStore, InMemoryEmployeeStore};
use tracing::warn;

pub const DEFAULT_AUTHORITIES_HEADER: &str = "x-granted-authorities";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub directory_path: Option<PathBuf>,
    pub cors_allowed_origins: Vec<String>,
    /// Header the upstream authentication layer fills with granted authorities.
    pub authorities_header: HeaderName,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            directory_path: None,
            cors_allowed_origins: Vec::new(),
            authorities_header: HeaderName::from_static(DEFAULT_AUTHORITIES_HEADER),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let directory_path = std::env::var("DIRECTORY_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .filter_map(|s| {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            })
            .collect::<Vec<_>>();

        let authorities_header = match std::env::var("AUTHORITIES_HEADER") {
            Ok(raw) => HeaderName::try_from(raw.trim().to_ascii_lowercase())
                .map_err(|_| anyhow!("AUTHORITIES_HEADER is not a valid header name: {raw}"))?,
            Err(_) => HeaderName::from_static(DEFAULT_AUTHORITIES_HEADER),
        };

        Ok(Self {
            directory_path,
            cors_allowed_origins,
            authorities_header,
        })
    }

    /// A directory given on the command line wins over `DIRECTORY_PATH`.
    pub fn with_directory(mut self, path: Option<PathBuf>) -> Self {
        if path.is_some() {
            self.directory_path = path;
        }
        self
    }

    pub fn load_directory(&self) -> Result<InMemoryEmployeeStore> {
        match &self.directory_path {
            Some(path) => InMemoryEmployeeStore::from_json_file(path)
                .with_context(|| format!("failed to load directory {}", path.display())),
            None => {
                let store = InMemoryEmployeeStore::demo();
                warn!(
                    employees = store.len(),
                    "DIRECTORY_PATH not set; serving the built-in demo directory"
                );
                Ok(store)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_directory_overrides_env() {
        let config = AppConfig {
            directory_path: Some(PathBuf::from("from-env.json")),
            ..AppConfig::default()
        };
        let config = config.with_directory(Some(PathBuf::from("from-cli.json")));
        assert_eq!(config.directory_path, Some(PathBuf::from("from-cli.json")));
        let config = config.with_directory(None);
        assert_eq!(config.directory_path, Some(PathBuf::from("from-cli.json")));
    }

    #[test]
    fn missing_directory_falls_back_to_demo() {
        let store = AppConfig::default().load_directory().unwrap();
        assert!(store.lookup("1").is_some());
    }

    #[test]
    fn unreadable_directory_is_an_error() {
        let config = AppConfig::default().with_directory(Some(PathBuf::from("/nonexistent.json")));
        let err = config.load_directory().unwrap_err();
        assert!(err.to_string().contains("failed to load directory"));
    }
}
