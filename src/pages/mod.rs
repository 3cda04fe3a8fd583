pub mod models;
pub mod not_found;
pub mod workflow;
