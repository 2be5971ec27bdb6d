#![forbid(unsafe_code)]

pub mod dataset_service;
pub mod error;
pub mod sessions;
pub mod settings_service;

pub use quiz_core::Clock;

pub use dataset_service::{DatasetService, DatasetSource};
pub use error::{DatasetError, SessionError, SettingsError};
pub use settings_service::SettingsService;

pub use sessions::{QuizLoopService, QuizSession, SessionBootstrap, pick_next};
