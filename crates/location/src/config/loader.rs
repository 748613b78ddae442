//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{LocationError, Result};
use std::path::{Path, PathBuf};

/// Configuration wrapper
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub schema: ConfigSchema,
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file path or the standard locations, apply
    /// environment overrides, and validate.
    ///
    /// An explicit `path` must exist. Without one, a missing file just means
    /// defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path.map(Path::to_path_buf).or_else(find_config_file);

        let schema = match config_path {
            Some(ref p) => load_config_file(p)?,
            None => ConfigSchema::default(),
        };

        let mut config = Self {
            schema,
            path: config_path,
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.schema.validate()?;
        Ok(config)
    }

    /// Apply `DEALZSTA_*` overrides read through `lookup`.
    ///
    /// - `DEALZSTA_GEOCODER_URL`: geocoder base URL
    /// - `DEALZSTA_GEOCODER_TIMEOUT_SECS`: request timeout in seconds
    /// - `DEALZSTA_LOG_LEVEL`: log level
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DEALZSTA_GEOCODER_URL") {
            self.schema.geocoder.base_url = url;
        }

        if let Some(secs) = lookup("DEALZSTA_GEOCODER_TIMEOUT_SECS") {
            self.schema.geocoder.timeout_secs = secs.trim().parse().map_err(|_| {
                LocationError::config(format!("DEALZSTA_GEOCODER_TIMEOUT_SECS: '{secs}' is not a number"))
            })?;
        }

        if let Some(level) = lookup("DEALZSTA_LOG_LEVEL") {
            self.schema.telemetry.log_level = level;
        }

        Ok(())
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<PathBuf> {
    let candidates = [".dealzsta.toml", "dealzsta.toml", ".config/dealzsta.toml"];

    candidates
        .into_iter()
        .map(PathBuf::from)
        .chain(dirs::config_dir().map(|dir| dir.join("dealzsta").join("config.toml")))
        .find(|candidate| candidate.exists())
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &Path) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        LocationError::config(format!("Failed to read config file {}: {}", path.display(), e))
    })?;

    toml::from_str(&content).map_err(|e| {
        LocationError::config(format!("Failed to parse config file {}: {}", path.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeocoderProvider;
    use std::io::Write;
    use std::time::Duration;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.path.is_none());
        assert_eq!(config.schema.geocoder.max_results, 5);
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[geocoder]
provider = "table"
table_path = "addresses.json"
timeout_secs = 3

[geocoder.retry]
max_attempts = 2
initial_delay = 50
max_delay = 400
backoff_multiplier = 3.0

[position]
latitude = 52.52
longitude = 13.405

[telemetry]
log_level = "debug"
json = true
"#
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        let schema = &config.schema;

        assert_eq!(config.path.as_deref(), Some(file.path()));
        assert_eq!(schema.geocoder.provider, GeocoderProvider::Table);
        assert_eq!(schema.geocoder.timeout_secs, 3);
        assert_eq!(schema.geocoder.retry.max_attempts, 2);
        assert_eq!(schema.geocoder.retry.initial_delay, Duration::from_millis(50));
        assert!(schema.position.coordinate().unwrap().is_some());
        assert!(schema.telemetry.json);
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let err = Config::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, LocationError::Config(_)));
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[geocoder]\nmax_results = 0").unwrap();

        assert!(Config::load(Some(file.path())).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_env_overrides(|key| match key {
                "DEALZSTA_GEOCODER_URL" => Some("http://localhost:8080".to_string()),
                "DEALZSTA_GEOCODER_TIMEOUT_SECS" => Some("2".to_string()),
                _ => None,
            })
            .unwrap();

        assert_eq!(config.schema.geocoder.base_url, "http://localhost:8080");
        assert_eq!(config.schema.geocoder.timeout_secs, 2);
        assert_eq!(config.schema.telemetry.log_level, "info");

        let bad = config.apply_env_overrides(|key| {
            (key == "DEALZSTA_GEOCODER_TIMEOUT_SECS").then(|| "soon".to_string())
        });
        assert!(bad.is_err());
    }
}
