pub mod goal;
pub mod insurance;
pub mod retirement;
