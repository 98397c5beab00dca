pub mod region;
pub mod schema;
