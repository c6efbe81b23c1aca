use std::{path::Path, time::Duration};

use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Json, Serialized},
    Figment,
};
use kgs_api::{fetch::DEFAULT_ENDPOINT, HttpClient};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Config {
    pub endpoint: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: 30,
            user_agent: concat!("kgs-fetcher/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Config {
    /// Defaults, then the JSON file if it exists, then `KGS_*` variables.
    #[instrument]
    pub fn load(path: &Path) -> Result<Self> {
        let config: Config = Figment::from(Serialized::defaults(Config::default()))
            .merge(Json::file(path))
            .merge(Env::prefixed("KGS_"))
            .extract()
            .context("Failed to load config")?;
        debug!(config = ?config, "Loaded config");
        Ok(config)
    }

    pub fn client(&self) -> Result<HttpClient> {
        HttpClient::builder()
            .endpoint(&self.endpoint)
            .timeout(Duration::from_secs(self.timeout_secs))
            .user_agent(&self.user_agent)
            .build()
            .context("Failed to build HTTP client")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_and_env_override_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("kgs.json", r#"{"endpoint": "http://localhost:8080/api"}"#)?;
            jail.set_env("KGS_TIMEOUT_SECS", "5");
            let config = Config::load(Path::new("kgs.json")).unwrap();
            assert_eq!(config.endpoint, "http://localhost:8080/api");
            assert_eq!(config.timeout_secs, 5);
            assert_eq!(config.user_agent, Config::default().user_agent);
            Ok(())
        });
    }

    #[test]
    fn missing_file_uses_defaults() {
        figment::Jail::expect_with(|_| {
            let config = Config::load(Path::new("absent.json")).unwrap();
            assert_eq!(config, Config::default());
            Ok(())
        });
    }
}
