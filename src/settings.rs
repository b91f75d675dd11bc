//! Connection settings for the console API.
//!
//! Settings layer in the usual order: built-in defaults, then an
//! optional config file, then `MESHWATCH_*` environment variables.
//! Command-line flags are applied on top by the binary.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use config::{Config, Environment, File};
use serde::Deserialize;

/// Connection profile for a mesh console backend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    /// Console API base URL.
    pub endpoint: String,
    /// Bearer token for the API, if it requires one.
    pub token: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Settings {
    /// Load settings, layering an optional file and the environment on
    /// top of the defaults. A file passed explicitly must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("endpoint", "http://localhost:20001")?
            .set_default("timeout_secs", 10i64)?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let settings = builder
            .add_source(Environment::with_prefix("MESHWATCH"))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::load(None).unwrap();
        assert_eq!(settings.endpoint, "http://localhost:20001");
        assert!(settings.token.is_none());
        assert_eq!(settings.timeout_secs, 10);
        assert_eq!(settings.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
            endpoint = "http://mesh-console.local:20001"
            token = "s3cr3t"
            "#
        )
        .unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.endpoint, "http://mesh-console.local:20001");
        assert_eq!(settings.token.as_deref(), Some("s3cr3t"));
        // Unset keys keep their defaults
        assert_eq!(settings.timeout_secs, 10);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        assert!(Settings::load(Some(Path::new("/nonexistent/meshwatch.toml"))).is_err());
    }
}
