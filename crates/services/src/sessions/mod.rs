mod picker;
mod service;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use picker::pick_next;
pub use service::QuizSession;
pub use workflow::{QuizLoopService, SessionBootstrap};
