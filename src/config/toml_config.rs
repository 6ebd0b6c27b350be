use crate::adapters::export::ExportFormat;
use crate::core::location::DEFAULT_FALLBACK;
use crate::domain::model::{Coordinate, PositionOptions};
use crate::utils::error::{Result, SearchError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "host-search.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub backend: BackendConfig,
    pub location: LocationConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub url: String,
    pub anon_key: String,
    pub companies_table: String,
    pub services_table: String,
    pub timeout_seconds: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: String::new(),
            companies_table: "empresas".to_string(),
            services_table: "servicos".to_string(),
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationProvider {
    /// No geolocation capability; searches rank from the fallback.
    #[default]
    None,
    Http,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    pub provider: LocationProvider,
    pub endpoint: Option<String>,
    pub fallback_latitude: f64,
    pub fallback_longitude: f64,
    pub high_accuracy: bool,
    pub timeout_seconds: u64,
    pub maximum_age_seconds: u64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        let options = PositionOptions::default();
        Self {
            provider: LocationProvider::None,
            endpoint: None,
            fallback_latitude: DEFAULT_FALLBACK.latitude,
            fallback_longitude: DEFAULT_FALLBACK.longitude,
            high_accuracy: options.high_accuracy,
            timeout_seconds: options.timeout.as_secs(),
            maximum_age_seconds: options.maximum_age.as_secs(),
        }
    }
}

impl LocationConfig {
    pub fn position_options(&self) -> PositionOptions {
        PositionOptions {
            high_accuracy: self.high_accuracy,
            timeout: Duration::from_secs(self.timeout_seconds),
            maximum_age: Duration::from_secs(self.maximum_age_seconds),
        }
    }

    pub fn fallback(&self) -> Coordinate {
        Coordinate::new(self.fallback_latitude, self.fallback_longitude)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: ExportFormat,
    pub path: Option<String>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SearchError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Loads `path`, or `host-search.toml` in the working directory when it
    /// exists, or built-in defaults. Unset backend values are then taken from
    /// `SUPABASE_URL` / `SUPABASE_ANON_KEY`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path.display());
                Self::from_file(path)?
            }
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                tracing::info!("📁 Loading configuration from: {}", DEFAULT_CONFIG_FILE);
                Self::from_file(DEFAULT_CONFIG_FILE)?
            }
            None => {
                tracing::debug!("No configuration file, using defaults");
                Self::default()
            }
        };
        config.fill_from_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    pub fn fill_from_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.backend.url.is_empty() {
            if let Some(url) = lookup("SUPABASE_URL") {
                self.backend.url = url;
            }
        }
        if self.backend.anon_key.is_empty() {
            if let Some(key) = lookup("SUPABASE_ANON_KEY") {
                self.backend.anon_key = key;
            }
        }
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SearchError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if self.backend.url.is_empty() {
            return Err(SearchError::MissingConfigError {
                field: "backend.url".to_string(),
            });
        }
        validation::validate_url("backend.url", &self.backend.url)?;
        if self.backend.anon_key.trim().is_empty() {
            return Err(SearchError::MissingConfigError {
                field: "backend.anon_key".to_string(),
            });
        }
        validation::validate_non_empty_string(
            "backend.companies_table",
            &self.backend.companies_table,
        )?;
        validation::validate_non_empty_string(
            "backend.services_table",
            &self.backend.services_table,
        )?;
        validation::validate_positive_number(
            "backend.timeout_seconds",
            self.backend.timeout_seconds,
            1,
        )?;

        let location = &self.location;
        validation::validate_latitude("location.fallback_latitude", location.fallback_latitude)?;
        validation::validate_longitude(
            "location.fallback_longitude",
            location.fallback_longitude,
        )?;
        validation::validate_positive_number(
            "location.timeout_seconds",
            location.timeout_seconds,
            1,
        )?;
        if location.provider == LocationProvider::Http {
            let endpoint =
                validation::validate_required_field("location.endpoint", &location.endpoint)?;
            validation::validate_url("location.endpoint", endpoint)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
[backend]
url = "https://demo.supabase.co"
anon_key = "public-anon"
timeout_seconds = 15

[location]
provider = "http"
endpoint = "https://ipapi.co/json/"
fallback_latitude = 59.437
fallback_longitude = 24.7536
timeout_seconds = 5

[output]
format = "csv"
path = "out/results.csv"
"#;

    #[test]
    fn test_parse_full_config() {
        let config = TomlConfig::from_toml_str(FULL).unwrap();

        assert_eq!(config.backend.url, "https://demo.supabase.co");
        assert_eq!(config.backend.companies_table, "empresas");
        assert_eq!(config.backend.timeout_seconds, 15);
        assert_eq!(config.location.provider, LocationProvider::Http);
        assert_eq!(config.location.fallback(), Coordinate::new(59.437, 24.7536));
        assert_eq!(config.location.position_options().timeout, Duration::from_secs(5));
        assert_eq!(
            config.location.position_options().maximum_age,
            Duration::from_secs(300)
        );
        assert_eq!(config.output.format, ExportFormat::Csv);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert_eq!(config.location.provider, LocationProvider::None);
        assert_eq!(config.location.fallback(), DEFAULT_FALLBACK);
        assert!(config.location.high_accuracy);
        assert_eq!(config.output.format, ExportFormat::Table);
    }

    #[test]
    fn test_missing_backend_url_fails_validation() {
        let config = TomlConfig::default();
        assert!(matches!(
            config.validate(),
            Err(SearchError::MissingConfigError { field }) if field == "backend.url"
        ));
    }

    #[test]
    fn test_http_provider_requires_endpoint() {
        let mut config = TomlConfig::from_toml_str(FULL).unwrap();
        config.location.endpoint = None;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_out_of_range_fallback_fails_validation() {
        let mut config = TomlConfig::from_toml_str(FULL).unwrap();
        config.location.fallback_latitude = -95.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_fill_from_env_only_sets_missing_values() {
        let mut config = TomlConfig::default();
        config.backend.anon_key = "from-file".to_string();
        config.fill_from_env(|name| match name {
            "SUPABASE_URL" => Some("https://env.supabase.co".to_string()),
            "SUPABASE_ANON_KEY" => Some("from-env".to_string()),
            _ => None,
        });

        assert_eq!(config.backend.url, "https://env.supabase.co");
        assert_eq!(config.backend.anon_key, "from-file");
    }

    #[test]
    fn test_unknown_env_placeholder_is_kept() {
        let config = TomlConfig::from_toml_str(
            "[backend]\nanon_key = \"${HOST_SEARCH_SURELY_UNSET_VAR}\"\n",
        )
        .unwrap();
        assert_eq!(config.backend.anon_key, "${HOST_SEARCH_SURELY_UNSET_VAR}");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[backend\nurl = 1").unwrap_err();
        assert!(matches!(err, SearchError::ConfigValidationError { .. }));
    }
}
