use std::any::Any;

use thiserror::Error;

use crate::{ErrorExt, StatusCode};

/// Ошибки строгих операций реестра (`try_get_or_create`, `require`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("courier name must be a non-empty string")]
    InvalidName,

    #[error("courier not found: {name}")]
    NotFound { name: String },
}

impl ErrorExt for RegistryError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidName => StatusCode::InvalidName,
            Self::NotFound { .. } => StatusCode::NotFound,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn metrics_tags(&self) -> Vec<(&'static str, String)> {
        let mut tags = vec![
            ("error_type", "registry".to_string()),
            ("status_code", self.status_code().to_string()),
        ];
        if let Self::NotFound { name } = self {
            tags.push(("courier", name.clone()));
        }
        tags
    }
}
