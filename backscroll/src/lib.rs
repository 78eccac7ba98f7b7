pub mod handlers;
pub mod session;

// Re-export commonly used handler functions for convenience
pub use handlers::{ReplayEntry, load_session, load_settings, run_replay};
pub use session::{PageSnapshot, Session, Step, ViewportSize};
