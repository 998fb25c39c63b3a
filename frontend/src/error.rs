use std::fmt;

use thiserror::Error;

/// Failures reported by SDL while setting up or drawing to the window and audio device.
#[derive(Debug, Error)]
pub enum Error {
    #[error("sdl: {0}")]
    Sdl(String),
}

impl Error {
    pub(crate) fn sdl(e: impl fmt::Display) -> Self {
        Error::Sdl(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
