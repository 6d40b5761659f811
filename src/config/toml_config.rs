use crate::core::registry::DEFAULT_SEEDS;
use crate::core::server::ServerInfo;
use crate::domain::model::{CityKey, Temperature};
use crate::utils::error::{Result, WeatherError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub server: ServerSection,
    pub logging: LoggingConfig,
    /// Initial registry contents. `None` means the built-in seeds.
    pub seeds: Option<BTreeMap<String, Temperature>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub name: String,
    pub version: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        let info = ServerInfo::default();
        Self {
            name: info.name,
            version: info.version,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub json: bool,
}

impl ServerConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| WeatherError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${WEATHER_SERVER_NAME})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| WeatherError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn server_info(&self) -> ServerInfo {
        ServerInfo {
            name: self.server.name.clone(),
            version: self.server.version.clone(),
        }
    }

    pub fn seed_entries(&self) -> Vec<(String, Temperature)> {
        match &self.seeds {
            Some(seeds) => seeds.iter().map(|(city, temp)| (city.clone(), *temp)).collect(),
            None => DEFAULT_SEEDS
                .iter()
                .map(|(city, temp)| (city.to_string(), *temp))
                .collect(),
        }
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("server.name", &self.server.name)?;
        validation::validate_non_empty_string("server.version", &self.server.version)?;

        if let Some(level) = &self.logging.level {
            validation::validate_one_of("logging.level", level, &LOG_LEVELS)?;
        }

        for (city, temp) in self.seed_entries() {
            let field = format!("seeds.{}", city);
            if CityKey::normalize(&city).is_empty() {
                return Err(WeatherError::InvalidConfigValueError {
                    field,
                    value: city,
                    reason: "Seed city names cannot be blank".to_string(),
                });
            }
            validation::validate_finite(&field, temp)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ServerConfig::from_toml_str("").unwrap();

        assert_eq!(config.server_info(), ServerInfo::default());
        assert_eq!(config.seed_entries(), vec![("berlin".to_string(), 20.0)]);
        assert!(!config.logging.json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[server]
name = "weather-test"
version = "9.9.9"

[logging]
level = "debug"
json = true

[seeds]
berlin = 20.0
"Buenos Aires" = 17
reykjavik = -3.5
"#;

        let config = ServerConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.server.name, "weather-test");
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
        assert!(config.logging.json);

        let seeds = config.seed_entries();
        assert_eq!(seeds.len(), 3);
        assert!(seeds.contains(&("Buenos Aires".to_string(), 17.0)));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_explicit_empty_seeds_table() {
        let config = ServerConfig::from_toml_str("[seeds]\n").unwrap();
        assert!(config.seed_entries().is_empty());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("MINI_WEATHER_TEST_NAME", "from-env");

        let config =
            ServerConfig::from_toml_str("[server]\nname = \"${MINI_WEATHER_TEST_NAME}\"\n").unwrap();
        assert_eq!(config.server.name, "from-env");

        std::env::remove_var("MINI_WEATHER_TEST_NAME");
    }

    #[test]
    fn test_config_validation() {
        let blank_name = ServerConfig::from_toml_str("[server]\nname = \"  \"\n").unwrap();
        assert!(blank_name.validate().is_err());

        let bad_level = ServerConfig::from_toml_str("[logging]\nlevel = \"loud\"\n").unwrap();
        assert!(bad_level.validate().is_err());

        let blank_city = ServerConfig::from_toml_str("[seeds]\n\" \" = 1.0\n").unwrap();
        assert!(blank_city.validate().is_err());

        let infinite = ServerConfig::from_toml_str("[seeds]\nberlin = inf\n").unwrap();
        assert!(infinite.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = ServerConfig::from_toml_str("[seeds\nberlin = ").unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[server]\nname = \"file-test\"\n\n[seeds]\noslo = -7.0\n")
            .unwrap();

        let config = ServerConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.server.name, "file-test");
        assert_eq!(config.seed_entries(), vec![("oslo".to_string(), -7.0)]);
    }
}
