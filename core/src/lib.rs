pub use chip8::Chip8;
pub use constants::DEFAULT_INSTRUCTIONS_PER_SECOND;
pub use error::{Error, Result};
pub use instruction::Instruction;
pub use opcode::Decoded;
pub use scheduler::{Scheduler, Silent, Step, Tone};
pub use state::{FrameBuffer, Machine};

mod chip8;
pub mod constants;
mod error;
mod instruction;
mod opcode;
mod operations;
mod scheduler;
pub mod state;
