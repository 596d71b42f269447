pub mod app;

pub use app::{AppConfig, DispatchConfig, PayoutConfig, PricingConfig};
