use thiserror::Error;

use pomodoro_core::ConfigError;

/// Anything that stops the window from opening.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to prepare data directories: {0}")]
    Io(#[from] std::io::Error),

    #[error("Window error: {0}")]
    Window(#[from] eframe::Error),
}
