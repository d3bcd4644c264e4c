pub mod delivery;
pub mod registry;

pub use delivery::*;
pub use registry::*;

use std::any::Any;

use thiserror::Error;

use crate::{ErrorExt, StatusCode};

/// Общая ошибка крейта: объединяет ошибки реестра и доставки,
/// чтобы вызывающий код мог использовать один `?`.
#[derive(Debug, Error)]
pub enum CourierError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Deliver(#[from] DeliverError),
}

impl ErrorExt for CourierError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Registry(e) => e.status_code(),
            Self::Deliver(e) => e.status_code(),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn client_message(&self) -> String {
        match self {
            Self::Registry(e) => e.client_message(),
            Self::Deliver(e) => e.client_message(),
        }
    }
}
