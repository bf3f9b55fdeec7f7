pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "loans")]
pub mod loans;

#[cfg(feature = "store")]
pub mod store;

pub use error::CoopBookError;
pub use types::*;

/// Standard result type for all coopbook operations
pub type CoopBookResult<T> = Result<T, CoopBookError>;
