pub mod display;
pub mod error;
pub mod text_input;
pub mod time_value;
pub mod types;

#[cfg(feature = "affordability")]
pub mod affordability;

#[cfg(feature = "advisory")]
pub mod advisory;

pub use error::KprError;
pub use types::*;

/// Standard result type for all KPR operations
pub type KprResult<T> = Result<T, KprError>;
