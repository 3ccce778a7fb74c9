pub mod investment;
pub mod loans;
pub mod planning;
pub mod tax;
