pub mod config;
pub mod logging;
pub mod store;

pub use config::{Config, StoreBackend};
