pub mod charts;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod export;
pub mod fetch;
pub mod infra;
pub mod models;
pub mod parser;
pub mod services;
pub mod session;
