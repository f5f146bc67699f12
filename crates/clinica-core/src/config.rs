//! Process configuration.
//!
//! The services never read the environment themselves: the signing secret
//! and everything else they need arrive as constructor parameters. This
//! struct is the one place that collects those values at startup.

use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context};
use serde::Deserialize;

/// Minimum accepted signing-secret length.
const MIN_SECRET_LEN: usize = 10;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Symmetric secret for bearer-token signing.
    pub token_secret: String,
    /// SQLite database path; in-memory storage when absent.
    #[serde(default)]
    pub database_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from `CLINICA_TOKEN_SECRET` and
    /// `CLINICA_DATABASE_PATH`.
    pub fn from_env() -> anyhow::Result<Self> {
        let token_secret =
            env::var("CLINICA_TOKEN_SECRET").context("CLINICA_TOKEN_SECRET must be set")?;
        let database_path = env::var_os("CLINICA_DATABASE_PATH").map(PathBuf::from);

        let config = Self {
            token_secret,
            database_path,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that would weaken token signing.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.token_secret.len() < MIN_SECRET_LEN {
            bail!("token secret must be at least {MIN_SECRET_LEN} characters");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_secret_rejected() {
        let config = Config {
            token_secret: "short".into(),
            database_path: None,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_long_enough_secret_accepted() {
        let config = Config {
            token_secret: "long-enough-secret".into(),
            database_path: Some(PathBuf::from("/tmp/clinica.db")),
        };
        assert!(config.validate().is_ok());
    }
}
