pub mod ghl;
pub mod sheets;
pub mod webhook;
