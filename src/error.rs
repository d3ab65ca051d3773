//! Core error type
//!
//! Every fallible operation in the runtime returns `Result<T, CoreError>`.
//! Each variant carries a short stable code so the top-level caller can
//! record it into the [`Diagnostics`](crate::diagnostics::Diagnostics)
//! collector and print it after the process exits.

use std::path::PathBuf;
use thiserror::Error;

use crate::video::BankId;

#[derive(Debug, Error)]
pub enum CoreError {
    /// Window, renderer, audio or input device setup failed
    #[error("unable to initialize {subsystem}: {reason}")]
    InitializationFailure { subsystem: &'static str, reason: String },

    /// Audio device reported a failure after setup
    #[error("sound system failure: {0}")]
    Sound(String),

    #[error("state not found: {0}")]
    UnknownState(u32),

    #[error("state already registered: {0}")]
    DuplicateState(u32),

    #[error("the game state stack must not be empty.")]
    EmptyStack,

    #[error("font not loaded: {0}")]
    UnknownFont(BankId),

    #[error("image not loaded: {0}")]
    UnknownImage(BankId),

    /// A decoder or the filesystem rejected a resource
    #[error("unable to load {}", path.display())]
    ResourceLoadFailure { path: PathBuf, detail: String },

    #[error("entity is not alive: {0:?}")]
    UnknownEntity(crate::game::Entity),

    #[error("bank files are not supported yet: {}", path.display())]
    BankUnsupported { path: PathBuf },

    #[error("config error: {0}")]
    Config(String),
}

impl CoreError {
    /// Stable short code used in diagnostics output.
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::InitializationFailure { .. } => "G001",
            CoreError::Sound(_) => "S001",
            CoreError::EmptyStack => "G400",
            CoreError::UnknownState(_) => "G401",
            CoreError::DuplicateState(_) => "G402",
            CoreError::UnknownFont(_) => "V002",
            CoreError::UnknownImage(_) => "V003",
            CoreError::ResourceLoadFailure { .. } => "R001",
            CoreError::UnknownEntity(_) => "T001",
            CoreError::BankUnsupported { .. } => "B001",
            CoreError::Config(_) => "C001",
        }
    }

    pub(crate) fn load_failure(path: impl Into<PathBuf>, detail: impl ToString) -> Self {
        CoreError::ResourceLoadFailure {
            path: path.into(),
            detail: detail.to_string(),
        }
    }
}

impl From<ron::error::SpannedError> for CoreError {
    fn from(e: ron::error::SpannedError) -> Self {
        CoreError::Config(e.to_string())
    }
}

impl From<ron::Error> for CoreError {
    fn from(e: ron::Error) -> Self {
        CoreError::Config(e.to_string())
    }
}
