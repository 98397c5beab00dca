pub mod client;
pub mod endpoint;
pub mod error;
pub mod fetcher;
pub mod series;
