use actix_cors::Cors;
use std::num::ParseIntError;
use thiserror::Error;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:5173";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid PORT {value:?}: {source}")]
    InvalidPort {
        value: String,
        #[source]
        source: ParseIntError,
    },
    #[error("ALLOWED_ORIGIN must not be empty")]
    EmptyOrigin,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AllowedOrigin {
    Any,
    Exact(String),
}

impl AllowedOrigin {
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim() {
            "" => Err(ConfigError::EmptyOrigin),
            "*" => Ok(AllowedOrigin::Any),
            origin => Ok(AllowedOrigin::Exact(origin.trim_end_matches('/').to_owned())),
        }
    }

    pub fn allows(&self, origin: &str) -> bool {
        match self {
            AllowedOrigin::Any => true,
            AllowedOrigin::Exact(allowed) => allowed == origin.trim_end_matches('/'),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub host: String,
    pub port: u16,
    pub allowed_origin: AllowedOrigin,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.into(),
            port: DEFAULT_PORT,
            allowed_origin: AllowedOrigin::Exact(DEFAULT_ALLOWED_ORIGIN.into()),
        }
    }
}

impl RelayConfig {
    /// Reads `HOST`, `PORT` and `ALLOWED_ORIGIN`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let host = lookup("HOST").unwrap_or(defaults.host);
        let port = match lookup("PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|source| ConfigError::InvalidPort { value, source })?,
            None => defaults.port,
        };
        let allowed_origin = match lookup("ALLOWED_ORIGIN") {
            Some(value) => AllowedOrigin::parse(&value)?,
            None => defaults.allowed_origin,
        };
        Ok(Self {
            host,
            port,
            allowed_origin,
        })
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }

    pub fn cors(&self) -> Cors {
        let cors = match &self.allowed_origin {
            AllowedOrigin::Any => Cors::default().allow_any_origin(),
            AllowedOrigin::Exact(origin) => Cors::default().allowed_origin(origin),
        };
        cors.allowed_methods(vec!["GET", "POST"]).allow_any_header()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn it_falls_back_to_defaults() {
        let config = RelayConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind_address(), ("127.0.0.1".to_string(), 3001));
        assert!(config.allowed_origin.allows("http://localhost:5173"));
        assert!(!config.allowed_origin.allows("http://evil.example"));
    }

    #[test]
    fn it_reads_overrides() {
        let config = RelayConfig::from_lookup(lookup(&[
            ("HOST", "0.0.0.0"),
            ("PORT", "8080"),
            ("ALLOWED_ORIGIN", "*"),
        ]))
        .unwrap();
        assert_eq!(config.bind_address(), ("0.0.0.0".to_string(), 8080));
        assert_eq!(config.allowed_origin, AllowedOrigin::Any);
    }

    #[test]
    fn it_rejects_bad_values() {
        assert!(matches!(
            RelayConfig::from_lookup(lookup(&[("PORT", "eighty")])),
            Err(ConfigError::InvalidPort { .. })
        ));
        assert!(matches!(
            RelayConfig::from_lookup(lookup(&[("ALLOWED_ORIGIN", " ")])),
            Err(ConfigError::EmptyOrigin)
        ));
    }

    #[test]
    fn it_ignores_trailing_slash_in_origin() {
        let origin = AllowedOrigin::parse("https://board.example/").unwrap();
        assert!(origin.allows("https://board.example"));
    }
}
