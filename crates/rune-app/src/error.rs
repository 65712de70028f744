//! Error types for application bootstrap.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] rune_config::ConfigError),

    /// A font registration had no file name.
    #[error("font registration with alias {alias:?} has an empty file name")]
    InvalidFont { alias: Option<String> },

    /// The native window could not be created.
    #[error(transparent)]
    Window(#[from] rune_window::WindowError),
}
