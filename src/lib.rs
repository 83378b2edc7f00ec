pub mod config;
pub mod errors;
pub mod models;
pub mod repositories;
pub mod services;
