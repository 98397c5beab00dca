pub mod global_anomalies;
pub mod precipitation;
pub mod regional_trends;
