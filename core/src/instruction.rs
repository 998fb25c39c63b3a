use std::fmt;

use log::{debug, warn};
use rand::RngCore;

use crate::error::Result;
use crate::opcode::Decoded;
use crate::operations::*;
use crate::state::Machine;

/// One of the 35 operations, with its operands pulled out of the opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 0nnn, a call into native code on the original machine; ignored
    Sys(u16),
    Cls,
    Ret,
    Jump(u16),
    Call(u16),
    SkipEqByte { x: u8, kk: u8 },
    SkipNeByte { x: u8, kk: u8 },
    SkipEqReg { x: u8, y: u8 },
    SkipNeReg { x: u8, y: u8 },
    /// 5xyn or 9xyn with a nonzero n; tolerated and ignored
    Malformed(u16),
    LoadByte { x: u8, kk: u8 },
    AddByte { x: u8, kk: u8 },
    Move { x: u8, y: u8 },
    Or { x: u8, y: u8 },
    And { x: u8, y: u8 },
    Xor { x: u8, y: u8 },
    AddReg { x: u8, y: u8 },
    Sub { x: u8, y: u8 },
    ShiftRight { x: u8, y: u8 },
    SubNeg { x: u8, y: u8 },
    ShiftLeft { x: u8, y: u8 },
    LoadIndex(u16),
    JumpOffset(u16),
    Random { x: u8, kk: u8 },
    Draw { x: u8, y: u8, n: u8 },
    SkipPressed { x: u8 },
    SkipNotPressed { x: u8 },
    LoadDelay { x: u8 },
    WaitKey { x: u8 },
    SetDelay { x: u8 },
    SetSound { x: u8 },
    AddIndex { x: u8 },
    LoadGlyph { x: u8 },
    Bcd { x: u8 },
    Store { x: u8 },
    Read { x: u8 },
}

impl Instruction {
    /// Selects the correct Instruction for a decoded opcode.
    ///
    /// Returns `None` for the sub-operations of groups 8, E and F that do not exist.
    pub fn decode(op: &Decoded) -> Option<Instruction> {
        let Decoded {
            opcode,
            nnn,
            nn: kk,
            n,
            x,
            y,
        } = *op;
        let instruction = match op.nibbles() {
            (0x0, 0x0, 0xE, 0x0) => Instruction::Cls,
            (0x0, 0x0, 0xE, 0xE) => Instruction::Ret,
            (0x0, ..) => Instruction::Sys(nnn),
            (0x1, ..) => Instruction::Jump(nnn),
            (0x2, ..) => Instruction::Call(nnn),
            (0x3, ..) => Instruction::SkipEqByte { x, kk },
            (0x4, ..) => Instruction::SkipNeByte { x, kk },
            (0x5, .., 0x0) => Instruction::SkipEqReg { x, y },
            (0x5, ..) => Instruction::Malformed(opcode),
            (0x6, ..) => Instruction::LoadByte { x, kk },
            (0x7, ..) => Instruction::AddByte { x, kk },
            (0x8, .., 0x0) => Instruction::Move { x, y },
            (0x8, .., 0x1) => Instruction::Or { x, y },
            (0x8, .., 0x2) => Instruction::And { x, y },
            (0x8, .., 0x3) => Instruction::Xor { x, y },
            (0x8, .., 0x4) => Instruction::AddReg { x, y },
            (0x8, .., 0x5) => Instruction::Sub { x, y },
            (0x8, .., 0x6) => Instruction::ShiftRight { x, y },
            (0x8, .., 0x7) => Instruction::SubNeg { x, y },
            (0x8, .., 0xE) => Instruction::ShiftLeft { x, y },
            (0x9, .., 0x0) => Instruction::SkipNeReg { x, y },
            (0x9, ..) => Instruction::Malformed(opcode),
            (0xA, ..) => Instruction::LoadIndex(nnn),
            (0xB, ..) => Instruction::JumpOffset(nnn),
            (0xC, ..) => Instruction::Random { x, kk },
            (0xD, ..) => Instruction::Draw { x, y, n },
            (0xE, _, 0x9, 0xE) => Instruction::SkipPressed { x },
            (0xE, _, 0xA, 0x1) => Instruction::SkipNotPressed { x },
            (0xF, _, 0x0, 0x7) => Instruction::LoadDelay { x },
            (0xF, _, 0x0, 0xA) => Instruction::WaitKey { x },
            (0xF, _, 0x1, 0x5) => Instruction::SetDelay { x },
            (0xF, _, 0x1, 0x8) => Instruction::SetSound { x },
            (0xF, _, 0x1, 0xE) => Instruction::AddIndex { x },
            (0xF, _, 0x2, 0x9) => Instruction::LoadGlyph { x },
            (0xF, _, 0x3, 0x3) => Instruction::Bcd { x },
            (0xF, _, 0x5, 0x5) => Instruction::Store { x },
            (0xF, _, 0x6, 0x5) => Instruction::Read { x },
            _ => return None,
        };
        Some(instruction)
    }

    /// Applies the instruction to `machine`, whose pc already points past it.
    pub fn execute(self, machine: &mut Machine, rng: &mut dyn RngCore) -> Result<()> {
        match self {
            Instruction::Sys(addr) => debug!("ignoring machine code routine at {:#05X}", addr),
            Instruction::Cls => clr(machine),
            Instruction::Ret => rts(machine)?,
            Instruction::Jump(addr) => jump(machine, addr),
            Instruction::Call(addr) => call(machine, addr)?,
            Instruction::SkipEqByte { x, kk } => ske(machine, x, kk),
            Instruction::SkipNeByte { x, kk } => skne(machine, x, kk),
            Instruction::SkipEqReg { x, y } => skre(machine, x, y),
            Instruction::SkipNeReg { x, y } => skrne(machine, x, y),
            Instruction::Malformed(opcode) => warn!(
                "ignoring malformed opcode {:04X} at {:#05X}",
                opcode,
                machine.pc.wrapping_sub(2)
            ),
            Instruction::LoadByte { x, kk } => load(machine, x, kk),
            Instruction::AddByte { x, kk } => add(machine, x, kk),
            Instruction::Move { x, y } => mv(machine, x, y),
            Instruction::Or { x, y } => or(machine, x, y),
            Instruction::And { x, y } => and(machine, x, y),
            Instruction::Xor { x, y } => xor(machine, x, y),
            Instruction::AddReg { x, y } => addr(machine, x, y),
            Instruction::Sub { x, y } => sub(machine, x, y),
            Instruction::ShiftRight { x, y } => shr(machine, x, y),
            Instruction::SubNeg { x, y } => subn(machine, x, y),
            Instruction::ShiftLeft { x, y } => shl(machine, x, y),
            Instruction::LoadIndex(addr) => loadi(machine, addr),
            Instruction::JumpOffset(addr) => jumpi(machine, addr),
            Instruction::Random { x, kk } => rand(machine, x, kk, rng),
            Instruction::Draw { x, y, n } => draw(machine, x, y, n),
            Instruction::SkipPressed { x } => skpr(machine, x),
            Instruction::SkipNotPressed { x } => skup(machine, x),
            Instruction::LoadDelay { x } => moved(machine, x),
            Instruction::WaitKey { x } => keyd(machine, x),
            Instruction::SetDelay { x } => loads(machine, x),
            Instruction::SetSound { x } => ld(machine, x),
            Instruction::AddIndex { x } => addi(machine, x),
            Instruction::LoadGlyph { x } => ldspr(machine, x),
            Instruction::Bcd { x } => bcd(machine, x),
            Instruction::Store { x } => stor(machine, x),
            Instruction::Read { x } => read(machine, x),
        }
        Ok(())
    }
}

/// Assembly-style mnemonics, used when tracing execution.
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Instruction::Sys(addr) => write!(f, "SYS {:#05X}", addr),
            Instruction::Cls => write!(f, "CLS"),
            Instruction::Ret => write!(f, "RET"),
            Instruction::Jump(addr) => write!(f, "JP {:#05X}", addr),
            Instruction::Call(addr) => write!(f, "CALL {:#05X}", addr),
            Instruction::SkipEqByte { x, kk } => write!(f, "SE V{:X}, {:#04X}", x, kk),
            Instruction::SkipNeByte { x, kk } => write!(f, "SNE V{:X}, {:#04X}", x, kk),
            Instruction::SkipEqReg { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            Instruction::SkipNeReg { x, y } => write!(f, "SNE V{:X}, V{:X}", x, y),
            Instruction::Malformed(opcode) => write!(f, "??? {:04X}", opcode),
            Instruction::LoadByte { x, kk } => write!(f, "LD V{:X}, {:#04X}", x, kk),
            Instruction::AddByte { x, kk } => write!(f, "ADD V{:X}, {:#04X}", x, kk),
            Instruction::Move { x, y } => write!(f, "LD V{:X}, V{:X}", x, y),
            Instruction::Or { x, y } => write!(f, "OR V{:X}, V{:X}", x, y),
            Instruction::And { x, y } => write!(f, "AND V{:X}, V{:X}", x, y),
            Instruction::Xor { x, y } => write!(f, "XOR V{:X}, V{:X}", x, y),
            Instruction::AddReg { x, y } => write!(f, "ADD V{:X}, V{:X}", x, y),
            Instruction::Sub { x, y } => write!(f, "SUB V{:X}, V{:X}", x, y),
            Instruction::ShiftRight { x, y } => write!(f, "SHR V{:X}, V{:X}", x, y),
            Instruction::SubNeg { x, y } => write!(f, "SUBN V{:X}, V{:X}", x, y),
            Instruction::ShiftLeft { x, y } => write!(f, "SHL V{:X}, V{:X}", x, y),
            Instruction::LoadIndex(addr) => write!(f, "LD I, {:#05X}", addr),
            Instruction::JumpOffset(addr) => write!(f, "JP V0, {:#05X}", addr),
            Instruction::Random { x, kk } => write!(f, "RND V{:X}, {:#04X}", x, kk),
            Instruction::Draw { x, y, n } => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            Instruction::SkipPressed { x } => write!(f, "SKP V{:X}", x),
            Instruction::SkipNotPressed { x } => write!(f, "SKNP V{:X}", x),
            Instruction::LoadDelay { x } => write!(f, "LD V{:X}, DT", x),
            Instruction::WaitKey { x } => write!(f, "LD V{:X}, K", x),
            Instruction::SetDelay { x } => write!(f, "LD DT, V{:X}", x),
            Instruction::SetSound { x } => write!(f, "LD ST, V{:X}", x),
            Instruction::AddIndex { x } => write!(f, "ADD I, V{:X}", x),
            Instruction::LoadGlyph { x } => write!(f, "LD F, V{:X}", x),
            Instruction::Bcd { x } => write!(f, "LD B, V{:X}", x),
            Instruction::Store { x } => write!(f, "LD [I], V{:X}", x),
            Instruction::Read { x } => write!(f, "LD V{:X}, [I]", x),
        }
    }
}
