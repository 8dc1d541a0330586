pub mod rest;
pub mod state;

// Re-export the handlers to make them easily accessible to the binary that
// builds the web server router.
pub use rest::{chat_handler, clear_history_handler, ApiDoc};
pub use state::AppState;
