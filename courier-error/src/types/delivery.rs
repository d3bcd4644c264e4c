use std::any::Any;

use thiserror::Error;

use crate::{BoxError, ErrorExt, StatusCode};

/// Ошибка доставки: обработчик подписчика вернул `Err`.
///
/// Доставка прерывается на первом упавшем подписчике; оставшиеся
/// подписчики маршрута не вызываются.
#[derive(Debug, Error)]
pub enum DeliverError {
    #[error("subscriber #{index} on route '{route}' of courier '{courier}' failed: {source}")]
    Subscriber {
        courier: String,
        route: String,
        index: usize,
        #[source]
        source: BoxError,
    },
}

impl DeliverError {
    pub fn subscriber(
        courier: impl Into<String>,
        route: impl Into<String>,
        index: usize,
        source: BoxError,
    ) -> Self {
        Self::Subscriber {
            courier: courier.into(),
            route: route.into(),
            index,
            source,
        }
    }

    /// Позиция упавшего подписчика в маршруте на момент доставки.
    pub fn index(&self) -> usize {
        match self {
            Self::Subscriber { index, .. } => *index,
        }
    }

    pub fn route(&self) -> &str {
        match self {
            Self::Subscriber { route, .. } => route,
        }
    }

    /// Забирает исходную ошибку обработчика.
    pub fn into_source(self) -> BoxError {
        match self {
            Self::Subscriber { source, .. } => source,
        }
    }
}

impl ErrorExt for DeliverError {
    fn status_code(&self) -> StatusCode {
        StatusCode::SubscriberFailed
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn client_message(&self) -> String {
        match self {
            Self::Subscriber { route, .. } => format!("Delivery to route '{route}' failed"),
        }
    }

    fn metrics_tags(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Subscriber { courier, route, .. } => vec![
                ("error_type", "deliver".to_string()),
                ("status_code", self.status_code().to_string()),
                ("courier", courier.clone()),
                ("route", route.clone()),
            ],
        }
    }
}
