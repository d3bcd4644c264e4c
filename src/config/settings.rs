use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::{logging::LoggingConfig, pubsub::RegistryConfig};

/// Настройки приложения, встраивающего реестр курьеров.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub registry: RegistryConfig,
    pub logging: LoggingConfig,
}

impl Settings {
    /// Значения по умолчанию, поверх них переменные окружения `COURIER_*`.
    ///
    /// Вложенные поля разделяются `__`: `COURIER_REGISTRY__ROUTE_CAPACITY=8`.
    pub fn load() -> Result<Self, ConfigError> {
        Self::builder(None).build()?.try_deserialize()
    }

    /// Как [`load`](Self::load), но сначала читает файл (toml/yaml/json по
    /// расширению). Отсутствующий файл не считается ошибкой.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::builder(Some(path.as_ref())).build()?.try_deserialize()
    }

    fn builder(path: Option<&Path>) -> config::ConfigBuilder<config::builder::DefaultState> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(false));
        }
        // Переменные окружения с префиксом COURIER_ перекрывают файл
        builder.add_source(
            Environment::with_prefix("COURIER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::{env, fs};

    use serial_test::serial;
    use tempfile::tempdir;

    use super::*;
    use crate::logging::LogFormat;

    #[test]
    #[serial]
    fn test_load_defaults() {
        let settings = Settings::load().unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.registry.route_capacity, 4);
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    #[serial]
    fn test_env_overrides_nested_fields() {
        env::set_var("COURIER_REGISTRY__ROUTE_CAPACITY", "32");
        env::set_var("COURIER_REGISTRY__LOG_UNROUTED", "true");
        let settings = Settings::load();
        env::remove_var("COURIER_REGISTRY__ROUTE_CAPACITY");
        env::remove_var("COURIER_REGISTRY__LOG_UNROUTED");

        let settings = settings.unwrap();
        assert_eq!(settings.registry.route_capacity, 32);
        assert!(settings.registry.log_unrouted);
    }

    #[test]
    #[serial]
    fn test_load_from_file_then_env() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("courier.toml");
        fs::write(
            &path,
            "[registry]\nroute_capacity = 2\n\n[logging]\nlevel = \"debug\"\nformat = \"json\"\n",
        )
        .unwrap();

        env::set_var("COURIER_LOGGING__LEVEL", "trace");
        let settings = Settings::load_from(&path);
        env::remove_var("COURIER_LOGGING__LEVEL");

        let settings = settings.unwrap();
        assert_eq!(settings.registry.route_capacity, 2);
        assert_eq!(settings.logging.format, LogFormat::Json);
        assert_eq!(settings.logging.level, "trace");
    }

    #[test]
    #[serial]
    fn test_missing_file_is_not_an_error() {
        let dir = tempdir().unwrap();
        let settings = Settings::load_from(dir.path().join("absent.toml")).unwrap();
        assert_eq!(settings, Settings::default());
    }
}
