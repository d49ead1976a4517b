pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;
pub mod types;

pub use routes::{
    create_breast_cancer_router, create_character_router, BREAST_CANCER_BANNER, CHARACTER_BANNER,
};
pub use server::serve;
pub use state::AppState;
