pub mod handlers;
pub mod pages;
pub mod routes;
pub mod session;
pub mod state;
pub mod views;

pub use routes::create_router;
pub use session::{SessionContext, SessionStore};
pub use state::AppState;
