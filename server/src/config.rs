use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use secrecy::SecretString;

const DEFAULT_BASE_URL: &str = "https://api.assemblyai.com";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 3;
const DEFAULT_POLL_DEADLINE_SECS: u64 = 600;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("ASSEMBLYAI_API_KEY not found in environment variables")]
    ApiKeyMissing,
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Runtime configuration, loaded from the environment once at startup.
pub struct Config {
    /// AssemblyAI API key (required; startup fails without it)
    pub api_key: SecretString,
    /// Vendor API base URL, overridable for tests
    pub base_url: String,
    /// Address the HTTP server binds to
    pub bind_addr: SocketAddr,
    /// Delay between vendor job status polls
    pub poll_interval: Duration,
    /// Overall deadline for one vendor transcription round trip
    pub poll_deadline: Duration,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("bind_addr", &self.bind_addr)
            .field("poll_interval", &self.poll_interval)
            .field("poll_deadline", &self.poll_deadline)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// `ASSEMBLYAI_API_KEY` is required; everything else has a default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("ASSEMBLYAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::ApiKeyMissing)?;

        let base_url = std::env::var("ASSEMBLYAI_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let bind_addr = env_or("AUDIOLENS_BIND", DEFAULT_BIND_ADDR);
        let bind_addr: SocketAddr =
            bind_addr
                .parse()
                .map_err(|_| ConfigError::InvalidValue {
                    name: "AUDIOLENS_BIND",
                    value: bind_addr,
                })?;

        let poll_interval = secs_from_env("ASSEMBLYAI_POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL_SECS)?;
        let poll_deadline = secs_from_env("ASSEMBLYAI_POLL_DEADLINE_SECS", DEFAULT_POLL_DEADLINE_SECS)?;

        Ok(Self {
            api_key: SecretString::from(api_key),
            base_url,
            bind_addr,
            poll_interval: Duration::from_secs(poll_interval),
            poll_deadline: Duration::from_secs(poll_deadline),
        })
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn secs_from_env(name: &'static str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value: raw }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Environment access is process-global, so the whole cycle lives in one
    // test to avoid races with parallel test threads.
    #[test]
    fn from_env_requires_api_key_and_applies_defaults() {
        std::env::remove_var("ASSEMBLYAI_API_KEY");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::ApiKeyMissing)
        ));

        std::env::set_var("ASSEMBLYAI_API_KEY", "   ");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::ApiKeyMissing)
        ));

        std::env::set_var("ASSEMBLYAI_API_KEY", "test-key");
        let config = Config::from_env().unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.poll_interval, Duration::from_secs(3));
        assert_eq!(config.poll_deadline, Duration::from_secs(600));

        // Debug must never leak the key
        let debug = format!("{:?}", config);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("test-key"));

        std::env::remove_var("ASSEMBLYAI_API_KEY");
    }
}
