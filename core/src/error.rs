use std::io;

use thiserror::Error;

use crate::constants::ENTRY_POINT;

/// Conditions that stop the machine.
///
/// Loading errors happen before any state is touched. Everything else is raised while
/// executing and carries the address of the offending instruction.
#[derive(Debug, Error)]
pub enum Error {
    #[error(
        "program is {size} bytes but only {capacity} bytes fit from {entry:#05X}",
        entry = ENTRY_POINT
    )]
    ProgramTooLarge { size: usize, capacity: usize },

    #[error("unable to read program image")]
    Io(#[from] io::Error),

    #[error("stack overflow calling {target:#05X} from {pc:#05X}")]
    StackOverflow { pc: u16, target: u16 },

    #[error("stack underflow returning from {pc:#05X}")]
    StackUnderflow { pc: u16 },

    #[error("unknown opcode {opcode:#06X} at {pc:#05X}")]
    UnknownOpcode { opcode: u16, pc: u16 },
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_addresses() {
        let err = Error::UnknownOpcode {
            opcode: 0xE1FF,
            pc: 0x2A4,
        };
        assert_eq!(err.to_string(), "unknown opcode 0xE1FF at 0x2A4");

        let err = Error::StackOverflow {
            pc: 0x300,
            target: 0x200,
        };
        assert_eq!(err.to_string(), "stack overflow calling 0x200 from 0x300");
    }

    #[test]
    fn test_load_error_mentions_entry_point() {
        let err = Error::ProgramTooLarge {
            size: 4000,
            capacity: 3584,
        };
        assert_eq!(
            err.to_string(),
            "program is 4000 bytes but only 3584 bytes fit from 0x200"
        );
    }
}
