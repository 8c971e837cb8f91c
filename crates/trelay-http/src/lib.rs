//! HTTP surface: the five relay routes and their response mapping.

pub mod reply;
pub mod routes;
pub mod state;

pub use routes::build_router;
pub use state::AppState;
