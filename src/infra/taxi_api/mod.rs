pub mod client;

pub use client::TaxiApiClient;
