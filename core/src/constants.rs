/// Bytes of addressable memory.
pub const MEMORY_SIZE: usize = 0x1000;

/// Valid addresses fit in 12 bits; wider values are masked when used.
pub const ADDRESS_MASK: u16 = 0x0FFF;

/// Programs are copied here and execution starts here.
pub const ENTRY_POINT: u16 = 0x200;

/// Largest program image that fits between the entry point and the end of memory.
pub const PROGRAM_CAPACITY: usize = MEMORY_SIZE - ENTRY_POINT as usize;

pub const REGISTER_COUNT: usize = 16;

/// VF doubles as the carry, borrow, shift-out and collision flag.
pub const FLAG: usize = 0xF;

/// Levels of nesting allowed in the call stack.
pub const STACK_SIZE: usize = 16;

pub const KEY_COUNT: usize = 16;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;
pub const DISPLAY_SIZE: usize = DISPLAY_WIDTH * DISPLAY_HEIGHT;

/// Timers count down at the refresh rate of the original hardware.
pub const TIMER_HZ: u32 = 60;

/// Instructions per second when nothing else is configured.
pub const DEFAULT_INSTRUCTIONS_PER_SECOND: u32 = 700;

/// Where the built-in hexadecimal font lives.
pub const FONT_ADDR: u16 = 0x050;

/// Each glyph is 5 rows of 8 pixels, only the high nibble is lit.
pub const GLYPH_SIZE: u16 = 5;

/// # Sprite sheet
/// Glyphs for the hexadecimal digits 0..F, 4x5 pixels each.
///
/// ```text
/// 0xF0  ****
/// 0x90  *  *
/// 0x90  *  *
/// 0x90  *  *
/// 0xF0  ****
/// ```
#[rustfmt::skip]
pub const SPRITE_SHEET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
