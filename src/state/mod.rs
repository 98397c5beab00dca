pub mod cadence;
pub mod error;
pub mod store;
