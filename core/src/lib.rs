pub mod models;
pub mod provider;

pub use models::{PricePoint, PriceSeries, SeriesError, Signal, SpreadRecord};
pub use provider::{DataSourceError, MarketDataProvider};
