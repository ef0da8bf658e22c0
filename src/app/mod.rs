pub mod registry_service;
pub mod status;

pub use registry_service::{RegistryService, DEFAULT_INVESTMENT_SHARES};
pub use status::{StatusBoard, StatusKind, TransactionStatus};
