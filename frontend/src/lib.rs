pub use audio::{AudioSettings, Beeper};
pub use display::{Display, DisplaySettings};
pub use error::{Error, Result};

mod audio;
mod display;
mod error;
