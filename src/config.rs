// src/config.rs
use std::env;
use std::str::FromStr;

use crate::error::{ForumError, Result};
use crate::pagination::{PageRequest, DEFAULT_PAGE_SIZE};

const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq)]
pub struct ForumConfig {
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub default_page_size: u64,
    pub log_filter: String,
}

impl Default for ForumConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            default_page_size: DEFAULT_PAGE_SIZE,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ForumConfig {
    /// Reads the process environment, after loading `.env` if there is one.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_connections = parse_positive(&lookup, "DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;
        let default_page_size = parse_positive(&lookup, "DEFAULT_PAGE_SIZE", DEFAULT_PAGE_SIZE)?;

        Ok(Self {
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            max_connections,
            default_page_size,
            log_filter: lookup("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        })
    }

    pub fn page_request(&self, requested_page_number: &str, requested_page_size: i64) -> PageRequest {
        PageRequest::with_default_size(requested_page_number, requested_page_size, self.default_page_size)
    }
}

fn parse_positive<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + PartialOrd + Default,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    let value = raw
        .trim()
        .parse::<T>()
        .map_err(|_| ForumError::config(format!("{key} must be a number, got {raw:?}")))?;
    if value <= T::default() {
        return Err(ForumError::config(format!("{key} must be positive")));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<ForumConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ForumConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        assert_eq!(config(&[]).unwrap(), ForumConfig::default());
    }

    #[test]
    fn reads_all_keys() {
        let config = config(&[
            ("DATABASE_URL", "postgres://forum@localhost/forum"),
            ("DATABASE_MAX_CONNECTIONS", "12"),
            ("DEFAULT_PAGE_SIZE", "25"),
            ("RUST_LOG", "forum_polls=debug"),
        ])
        .unwrap();

        assert_eq!(config.database_url.as_deref(), Some("postgres://forum@localhost/forum"));
        assert_eq!(config.max_connections, 12);
        assert_eq!(config.default_page_size, 25);
        assert_eq!(config.log_filter, "forum_polls=debug");
    }

    #[test]
    fn rejects_bad_numbers() {
        assert!(matches!(
            config(&[("DEFAULT_PAGE_SIZE", "lots")]),
            Err(ForumError::Config(_))
        ));
        assert!(matches!(
            config(&[("DEFAULT_PAGE_SIZE", "0")]),
            Err(ForumError::Config(_))
        ));
        assert!(matches!(
            config(&[("DATABASE_MAX_CONNECTIONS", "-3")]),
            Err(ForumError::Config(_))
        ));
    }

    #[test]
    fn page_request_uses_configured_default() {
        let config = config(&[("DEFAULT_PAGE_SIZE", "30")]).unwrap();
        let request = config.page_request("3", 0);
        assert_eq!(request.page_size(), 30);
        assert_eq!(request.offset(), 60);
    }
}
