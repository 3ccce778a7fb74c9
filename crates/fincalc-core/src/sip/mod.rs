pub mod annuity;
pub mod stepped;
