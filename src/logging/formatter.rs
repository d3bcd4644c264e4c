use tracing_subscriber::{
    fmt::{self, format::FmtSpan, MakeWriter},
    layer::Layer as LayerTrait,
    registry::LookupSpan,
};

use crate::logging::config::{LogFormat, LoggingConfig};

/// Собирает fmt-слой по конфигурации.
///
/// Возвращаем boxed trait-объект, чтобы стереть конкретный тип формата
/// (json/pretty/compact).
pub fn build_formatter_from_config<S, W>(
    config: &LoggingConfig,
    writer: W,
) -> Box<dyn LayerTrait<S> + Send + Sync>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let base = fmt::layer()
        .with_writer(writer)
        .with_ansi(config.with_ansi)
        .with_target(config.with_target)
        .with_thread_ids(config.with_thread_ids);

    match config.format {
        LogFormat::Json => Box::new(base.json().with_current_span(true)),
        LogFormat::Pretty => Box::new(base.pretty().with_span_events(FmtSpan::CLOSE)),
        LogFormat::Compact => Box::new(base.compact()),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::{Arc, Mutex};

    use tracing_subscriber::{prelude::*, registry::Registry};

    use super::*;

    /// Мини-буферный writer для тестов.
    #[derive(Clone, Default)]
    pub(crate) struct VecMakeWriter(pub(crate) Arc<Mutex<Vec<u8>>>);

    impl VecMakeWriter {
        pub(crate) fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl<'a> MakeWriter<'a> for VecMakeWriter {
        type Writer = VecWriterGuard;

        fn make_writer(&'a self) -> Self::Writer {
            VecWriterGuard(self.0.clone())
        }
    }

    pub(crate) struct VecWriterGuard(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for VecWriterGuard {
        fn write(
            &mut self,
            buf: &[u8],
        ) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn capture(format: LogFormat) -> String {
        let writer = VecMakeWriter::default();
        let cfg = LoggingConfig {
            format,
            with_ansi: false,
            ..Default::default()
        };
        let layer = build_formatter_from_config::<Registry, _>(&cfg, writer.clone());
        let subscriber = Registry::default().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(route = "tick", "delivering");
        });
        writer.contents()
    }

    #[test]
    fn test_json_format_emits_fields() {
        let out = capture(LogFormat::Json);
        let line = out.lines().next().expect("one json line");
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(value["fields"]["message"], "delivering");
        assert_eq!(value["fields"]["route"], "tick");
        assert_eq!(value["level"], "INFO");
    }

    #[test]
    fn test_compact_and_pretty_formats_write_message() {
        for format in [LogFormat::Compact, LogFormat::Pretty] {
            let out = capture(format);
            assert!(out.contains("delivering"), "{format}: {out}");
            assert!(out.contains("tick"), "{format}: {out}");
        }
    }
}
