pub mod client;
pub mod errors;
pub mod parser;
pub mod provider;
pub mod types;

pub use client::{YahooClient, YahooConfig};
pub use errors::YahooError;
pub use provider::YahooProvider;
