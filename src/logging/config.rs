use std::{env, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::LoggingError;

/// Уровни, которые принимает `LoggingConfig::level`.
const LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// Формат вывода событий.
#[derive(Debug, Default, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(LoggingError::InvalidFormat(other.to_string())),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let s = match self {
            Self::Compact => "compact",
            Self::Pretty => "pretty",
            Self::Json => "json",
        };
        f.write_str(s)
    }
}

/// Конфигурация логирования.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Уровень для событий крейта `courier`
    pub level: String,
    pub format: LogFormat,
    pub with_ansi: bool,
    pub with_target: bool,
    pub with_thread_ids: bool,
    /// Дополнительные директивы EnvFilter, например `"my_app=debug"`
    pub directives: Vec<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
            with_ansi: true,
            with_target: true,
            with_thread_ids: false,
            directives: Vec::new(),
        }
    }
}

impl LoggingConfig {
    /// Переопределения из окружения: `COURIER_LOG_LEVEL`, `COURIER_LOG_FORMAT`.
    ///
    /// Некорректный формат игнорируется, некорректный уровень отлавливает
    /// [`validate`](Self::validate).
    pub fn apply_env_overrides(&mut self) {
        if let Ok(level) = env::var("COURIER_LOG_LEVEL") {
            self.level = level.trim().to_ascii_lowercase();
        }
        if let Ok(format) = env::var("COURIER_LOG_FORMAT") {
            if let Ok(format) = format.parse() {
                self.format = format;
            }
        }
    }

    pub fn validate(&self) -> Result<(), LoggingError> {
        if !LEVELS.contains(&self.level.as_str()) {
            return Err(LoggingError::InvalidLevel(self.level.clone()));
        }
        Ok(())
    }

    /// Директива для EnvFilter: чужие крейты на `warn`, `courier` на
    /// заданном уровне, затем пользовательские директивы.
    pub fn build_filter_directive(&self) -> String {
        let mut directive = format!("warn,courier={}", self.level);
        for extra in &self.directives {
            directive.push(',');
            directive.push_str(extra);
        }
        directive
    }
}
