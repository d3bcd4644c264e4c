//! Логирование на `tracing` / `tracing-subscriber`.

pub mod config;
mod filters;
mod formatter;

pub use self::config::{LogFormat, LoggingConfig};
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log level '{0}'")]
    InvalidLevel(String),

    #[error("invalid log format '{0}'")]
    InvalidFormat(String),

    #[error("failed to install global subscriber: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Устанавливает глобальный подписчик `tracing`, пишущий в stdout.
///
/// Повторный вызов в одном процессе вернёт [`LoggingError::Init`].
pub fn init_logging(mut config: LoggingConfig) -> Result<(), LoggingError> {
    config.apply_env_overrides();
    config.validate()?;

    let env_filter = filters::build_filter_from_config(&config);
    let fmt_layer = formatter::build_formatter_from_config(&config, std::io::stdout);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        log_level = %config.level,
        log_format = %config.format,
        "Logging system initialized"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use serial_test::serial;
    use tracing_subscriber::{prelude::*, registry::Registry};

    use super::{formatter::tests::VecMakeWriter, *};
    use crate::{Handler, RegistryConfig};

    #[test]
    #[serial]
    fn test_init_rejects_invalid_level() {
        std::env::remove_var("COURIER_LOG_LEVEL");
        let cfg = LoggingConfig {
            level: "chatty".into(),
            ..Default::default()
        };
        assert!(matches!(
            init_logging(cfg),
            Err(LoggingError::InvalidLevel(level)) if level == "chatty"
        ));
    }

    /// Сбой подписчика и доставка на неизвестный маршрут попадают в лог
    /// с полями курьера и маршрута.
    #[test]
    fn test_courier_events_reach_the_log() {
        let writer = VecMakeWriter::default();
        let cfg = LoggingConfig {
            level: "debug".into(),
            format: LogFormat::Json,
            with_ansi: false,
            ..Default::default()
        };
        let filter = tracing_subscriber::EnvFilter::new(cfg.build_filter_directive());
        let layer = formatter::build_formatter_from_config(&cfg, writer.clone());
        let subscriber = Registry::default().with(filter).with(layer);

        let calls = Arc::new(AtomicUsize::new(0));
        tracing::subscriber::with_default(subscriber, || {
            let registry = crate::Registry::<u8>::with_config(RegistryConfig {
                log_unrouted: true,
                ..Default::default()
            });
            let bus = registry.get_or_create("bus").unwrap();
            let seen = calls.clone();
            bus.on(
                "tick",
                Handler::new(move |_| {
                    seen.fetch_add(1, Ordering::SeqCst);
                    Err("boom".into())
                }),
            );
            assert!(bus.deliver("tick", &[1]).is_err());
            assert!(bus.deliver("nowhere", &[1]).is_ok());
        });

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let out = writer.contents();
        assert!(out.contains("courier created"), "{out}");
        assert!(out.contains("subscriber failed, delivery aborted"), "{out}");
        assert!(out.contains("delivery to unknown route dropped"), "{out}");
        assert!(out.contains("\"route\":\"tick\""), "{out}");
    }
}
