pub mod csv_export;
pub mod database;
pub mod industries;
pub mod metrics;
pub mod pipeline;
pub mod tags;
pub mod validation;
