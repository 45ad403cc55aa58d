pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod helpers;
pub mod integrations;
pub mod jobs;

pub use database::Database;
