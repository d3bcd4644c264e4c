//! Именованные курьеры: синхронный publish/subscribe внутри процесса.
//!
//! ```
//! use std::sync::{
//!     atomic::{AtomicI64, Ordering},
//!     Arc,
//! };
//!
//! use courier::{Delivery, Handler, Registry};
//! use serde_json::json;
//!
//! let registry = Registry::new();
//! let total = Arc::new(AtomicI64::new(0));
//! let sink = total.clone();
//! let cb = Handler::new(move |d: &Delivery<'_>| {
//!     sink.fetch_add(d.arg(0).and_then(|v| v.as_i64()).unwrap_or(0), Ordering::SeqCst);
//!     Ok(())
//! });
//!
//! let bus = registry.get_or_create("bus").unwrap();
//! bus.on("tick", cb.clone()).deliver("tick", &[json!(42)]).unwrap();
//! bus.cancel("tick", Some(&cb), None).deliver("tick", &[json!(42)]).unwrap();
//! assert_eq!(total.load(Ordering::SeqCst), 42);
//! ```

/// Loading settings from files and `COURIER_*` environment variables.
pub mod config;
/// Logging setup on top of `tracing-subscriber`.
pub mod logging;
/// Registry, couriers, routes and subscriptions.
pub mod pubsub;

// -----------------------------------------------------------------------------
//  Frequently used public types
// -----------------------------------------------------------------------------

/// Settings.
pub use crate::config::Settings;
/// Error types shared with the `courier-error` crate.
pub use courier_error::{
    BoxError, CourierError, CourierResult, DeliverError, ErrorExt, RegistryError, StatusCode,
};
/// Logging entry points.
pub use logging::{init_logging, LogFormat, LoggingConfig, LoggingError};
/// Pub/Sub API.
pub use pubsub::{Context, Courier, Delivery, Handler, Registry, RegistryConfig, Subscription};
