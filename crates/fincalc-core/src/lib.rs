pub mod compounding;
pub mod error;
pub mod growth;
pub mod types;

#[cfg(feature = "sip")]
pub mod sip;

#[cfg(feature = "loans")]
pub mod loans;

#[cfg(feature = "tax")]
pub mod tax;

#[cfg(feature = "planning")]
pub mod planning;

pub use error::FinCalcError;
pub use types::*;

/// Standard result type for all fincalc operations
pub type FinCalcResult<T> = Result<T, FinCalcError>;
