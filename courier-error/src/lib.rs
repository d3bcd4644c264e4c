pub mod ext;
pub mod status_code;
pub mod types;

// Publicly re-export all error types so that downstream code can reach them
// through the crate root.
pub use ext::*;
pub use status_code::*;
pub use types::*;

/// Type-erased error returned by subscriber handlers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type CourierResult<T> = Result<T, CourierError>;
