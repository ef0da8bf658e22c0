pub mod router;
pub mod types;
pub mod handlers {
    pub mod common;
    pub mod decrypt;
    pub mod health;
    pub mod insights;
    pub mod projects;
}

pub use router::{create_router, ApiDoc};
pub use types::AppState;
