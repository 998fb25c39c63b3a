/// # Opcodes
///
/// Opcodes are 16 bits each, stored big-endian. Their behavior is cased on some combination of:
/// - `(n, _, _, _)` broad categorization; applies to all opcodes
/// - `(_, _, _, n)` specific behavior within a category
/// - `(_, _, n, n)` more specific behavior within a category
/// - `(_, n, n, n)` some fixed function that doesn't require variables (e.g. CLS; clear screen)
///
/// Nibbles not used to determine the operation often (but not always) carry important data.
/// - `(_, n, n, n)` represent a 12-bit address
/// - `(_, _, n, n)` encodes some data that is assigned to and/or compared with Vx
/// - `(_, n, _, _)` refers either to the register Vx or a range of registers V0..Vx
/// - `(_, _, n, _)` refers to the the register Vy
pub trait Opcode {
    /// Returns the Opcode's component nibbles.
    fn nibbles(&self) -> (u8, u8, u8, u8);

    /// The Opcode's most significant nibble, which selects an instruction group.
    /// `[g___]`
    fn group(&self) -> u8;

    /// The Opcode's second nibble.
    /// `[_x__]`
    fn x(&self) -> u8;

    /// The Opcode's third nibble.
    /// `[__y_]`
    fn y(&self) -> u8;

    /// The Opcode's fourth nibble.
    /// `[___n]`
    fn n(&self) -> u8;

    /// The Opcode's least significant byte.
    /// `[__kk]`
    fn kk(&self) -> u8;

    /// The Opcode's without its most significant nibble.
    /// `[_adr]`
    fn addr(&self) -> u16;
}

impl Opcode for u16 {
    fn nibbles(&self) -> (u8, u8, u8, u8) {
        (self.group(), self.x(), self.y(), self.n())
    }

    fn group(&self) -> u8 {
        ((self & 0xF000) >> 12) as u8
    }

    fn x(&self) -> u8 {
        ((self & 0x0F00) >> 8) as u8
    }

    fn y(&self) -> u8 {
        ((self & 0x00F0) >> 4) as u8
    }

    fn n(&self) -> u8 {
        (self & 0x000F) as u8
    }

    fn kk(&self) -> u8 {
        (self & 0x00FF) as u8
    }

    fn addr(&self) -> u16 {
        self & 0x0FFF
    }
}

/// Every field of the most recently fetched word, extracted up front.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Decoded {
    pub opcode: u16,
    pub nnn: u16,
    pub nn: u8,
    pub n: u8,
    pub x: u8,
    pub y: u8,
}

impl Decoded {
    /// Assembles the word stored at `hi`, `lo` and decodes it.
    pub fn from_bytes(hi: u8, lo: u8) -> Self {
        Self::from(u16::from_be_bytes([hi, lo]))
    }

    pub fn nibbles(&self) -> (u8, u8, u8, u8) {
        self.opcode.nibbles()
    }
}

impl From<u16> for Decoded {
    fn from(opcode: u16) -> Self {
        Decoded {
            opcode,
            nnn: opcode.addr(),
            nn: opcode.kk(),
            n: opcode.n(),
            x: opcode.x(),
            y: opcode.y(),
        }
    }
}
