use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub registry: RegistryConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Username registry settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Usernames that are taken before any account is created
    pub reserved_usernames: Vec<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(environment())
            .build()?;

        config.try_deserialize()
    }
}

/// `APP__*` variables; `APP__REGISTRY__RESERVED_USERNAMES` takes a comma-separated list
fn environment() -> config::Environment {
    config::Environment::with_prefix("APP")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("registry.reserved_usernames")
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.logging.level, "warn");
        assert!(matches!(config.logging.format, LogFormat::Pretty));
        assert!(config.registry.reserved_usernames.is_empty());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AppConfig = config::Config::builder()
            .set_override("logging.format", "json")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert!(matches!(config.logging.format, LogFormat::Json));
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_reserved_usernames() {
        let config: AppConfig = config::Config::builder()
            .set_override("registry.reserved_usernames", vec!["admin", "root"])
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.registry.reserved_usernames, ["admin", "root"]);
    }

    #[test]
    fn test_reserved_usernames_from_environment() {
        let vars = HashMap::from([
            (
                "APP__REGISTRY__RESERVED_USERNAMES".to_string(),
                "admin,root".to_string(),
            ),
            ("APP__LOGGING__LEVEL".to_string(), "debug".to_string()),
        ]);

        let config: AppConfig = config::Config::builder()
            .add_source(environment().source(Some(vars)))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.registry.reserved_usernames, ["admin", "root"]);
        assert_eq!(config.logging.level, "debug");
    }
}
