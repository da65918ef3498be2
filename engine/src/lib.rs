pub mod align;
pub mod analyzer;
pub mod config;
pub mod error;
pub mod rolling_window;
pub mod service;
pub mod summary;

pub use analyzer::analyze;
pub use config::AnalysisParams;
pub use error::AnalysisError;
pub use service::{AnalysisRequest, SpreadService};
pub use summary::SignalSummary;
