use crate::constants::{
    ADDRESS_MASK, DISPLAY_SIZE, DISPLAY_WIDTH, ENTRY_POINT, FONT_ADDR, KEY_COUNT,
    MEMORY_SIZE, PROGRAM_CAPACITY, REGISTER_COUNT, SPRITE_SHEET, STACK_SIZE,
};
use crate::error::{Error, Result};
use crate::opcode::Decoded;

/// The FrameBuffer is flattened row-major and indexed as `y * DISPLAY_WIDTH + x`.
pub type FrameBuffer = [bool; DISPLAY_SIZE];

/// # Machine
/// The complete mutable state of the virtual machine.
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) is the carry, borrow and collision flag
/// - (i) a 16-bit memory address register, masked to 12 bits when used
///
/// Counter
/// - (pc) a 16-bit program counter, bumped past each instruction before it executes
///
/// Stack
/// - (stack) 16 return addresses
/// - (sp) the number of addresses currently pushed
///
/// Timers
/// - 2 8-bit timers (delay & sound), decremented at 60Hz until they reach 0
///
/// ## Memory
/// - 4096 bytes of addressable memory
///     - 0x000..0x200 is reserved, with the font at 0x050..0x0A0
///     - programs are loaded at 0x200
/// - 64x32 frame buffer
///
/// ## Input
/// - 16 flags tracking the pressed status of keys 0..F
/// - (held_key) the key latched by a pending FX0A
#[derive(Clone, PartialEq, Eq)]
pub struct Machine {
    pub memory: [u8; MEMORY_SIZE],
    pub v: [u8; REGISTER_COUNT],
    pub i: u16,
    pub pc: u16,
    pub stack: [u16; STACK_SIZE],
    pub sp: usize,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub frame_buffer: FrameBuffer,
    pub keypad: [bool; KEY_COUNT],
    pub held_key: Option<u8>,
    pub current: Decoded,
    pub draw_flag: bool,
}

impl Machine {
    /// A cold-booted machine: everything zeroed, the font in place and the pc at the
    /// entry point.
    pub fn new() -> Self {
        let mut memory = [0; MEMORY_SIZE];
        let font = usize::from(FONT_ADDR);
        memory[font..font + SPRITE_SHEET.len()].copy_from_slice(&SPRITE_SHEET);

        Machine {
            memory,
            v: [0; REGISTER_COUNT],
            i: 0,
            pc: ENTRY_POINT,
            stack: [0; STACK_SIZE],
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            frame_buffer: [false; DISPLAY_SIZE],
            keypad: [false; KEY_COUNT],
            held_key: None,
            current: Decoded::default(),
            draw_flag: false,
        }
    }

    /// Copies a program image to the entry point.
    ///
    /// Oversized images are rejected before memory is touched.
    pub fn load_program(&mut self, program: &[u8]) -> Result<()> {
        if program.len() > PROGRAM_CAPACITY {
            return Err(Error::ProgramTooLarge {
                size: program.len(),
                capacity: PROGRAM_CAPACITY,
            });
        }
        let start = usize::from(ENTRY_POINT);
        self.memory[start..start + program.len()].copy_from_slice(program);
        Ok(())
    }

    pub fn read_byte(&self, addr: u16) -> u8 {
        self.memory[usize::from(addr & ADDRESS_MASK)]
    }

    pub fn write_byte(&mut self, addr: u16, value: u8) {
        self.memory[usize::from(addr & ADDRESS_MASK)] = value;
    }

    /// Gets the opcode currently pointed at by the pc.
    /// Memory is stored as bytes, but opcodes are 16 bits so we combine two subsequent bytes.
    pub fn fetch(&self) -> u16 {
        u16::from_be_bytes([self.read_byte(self.pc), self.read_byte(self.pc.wrapping_add(1))])
    }

    /// Advance the pc past the next instruction.
    pub fn skip(&mut self) {
        self.pc = self.pc.wrapping_add(2);
    }

    /// Pushes a return address; `target` is only used to describe an overflow.
    pub fn push(&mut self, addr: u16, target: u16) -> Result<()> {
        let slot = self.stack.get_mut(self.sp).ok_or(Error::StackOverflow {
            pc: addr.wrapping_sub(2),
            target,
        })?;
        *slot = addr;
        self.sp += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16> {
        if self.sp == 0 {
            return Err(Error::StackUnderflow {
                pc: self.pc.wrapping_sub(2),
            });
        }
        self.sp -= 1;
        Ok(self.stack[self.sp])
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.frame_buffer[y * DISPLAY_WIDTH + x]
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, on: bool) {
        self.frame_buffer[y * DISPLAY_WIDTH + x] = on;
    }

    pub fn clear_screen(&mut self) {
        self.frame_buffer = [false; DISPLAY_SIZE];
        self.draw_flag = true;
    }

    /// Decrements both timers without going below zero.
    pub fn tick_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cold_boot() {
        let machine = Machine::new();
        assert_eq!(machine.pc, 0x200);
        assert_eq!(machine.v, [0; 16]);
        assert_eq!(machine.i, 0);
        assert_eq!(machine.sp, 0);
        assert!(machine.frame_buffer.iter().all(|&px| !px));
        assert_eq!(machine.memory[0x50..0xA0], SPRITE_SHEET);
        assert_eq!(machine.memory[..0x50], [0; 0x50]);
        assert!(machine.memory[0xA0..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_loads_program_at_entry_point() {
        let mut machine = Machine::new();
        machine.load_program(&[0x00, 0xE0, 0x12, 0x00]).unwrap();
        assert_eq!(machine.memory[0x200..0x204], [0x00, 0xE0, 0x12, 0x00]);
        assert_eq!(machine.fetch(), 0x00E0);
    }

    #[test]
    fn test_program_filling_memory_fits() {
        let mut machine = Machine::new();
        machine.load_program(&[0xAB; PROGRAM_CAPACITY]).unwrap();
        assert_eq!(machine.memory[0xFFF], 0xAB);
    }

    #[test]
    fn test_rejects_oversized_program_untouched() {
        let mut machine = Machine::new();
        let err = machine
            .load_program(&[0xAB; PROGRAM_CAPACITY + 1])
            .unwrap_err();
        assert!(matches!(
            err,
            Error::ProgramTooLarge {
                size: 3585,
                capacity: 3584
            }
        ));
        assert!(machine == Machine::new());
    }

    #[test]
    fn test_addresses_wrap_at_4k() {
        let mut machine = Machine::new();
        machine.write_byte(0x1005, 0x42);
        assert_eq!(machine.memory[0x005], 0x42);
        assert_eq!(machine.read_byte(0xF005), 0x42);
    }

    #[test]
    fn test_fetch_wraps_past_end_of_memory() {
        let mut machine = Machine::new();
        machine.memory[0xFFF] = 0x12;
        machine.memory[0x000] = 0x34;
        machine.pc = 0xFFF;
        assert_eq!(machine.fetch(), 0x1234);
    }

    #[test]
    fn test_push_then_pop() {
        let mut machine = Machine::new();
        machine.push(0x202, 0x300).unwrap();
        machine.push(0x302, 0x400).unwrap();
        assert_eq!(machine.pop().unwrap(), 0x302);
        assert_eq!(machine.pop().unwrap(), 0x202);
        assert_eq!(machine.sp, 0);
    }

    #[test]
    fn test_push_overflows_after_sixteen() {
        let mut machine = Machine::new();
        for _ in 0..STACK_SIZE {
            machine.push(0x202, 0x200).unwrap();
        }
        let err = machine.push(0x202, 0x200).unwrap_err();
        assert!(matches!(
            err,
            Error::StackOverflow {
                pc: 0x200,
                target: 0x200
            }
        ));
        assert_eq!(machine.sp, STACK_SIZE);
    }

    #[test]
    fn test_pop_empty_underflows() {
        let mut machine = Machine::new();
        machine.pc = 0x202;
        assert!(matches!(
            machine.pop(),
            Err(Error::StackUnderflow { pc: 0x200 })
        ));
        assert_eq!(machine.sp, 0);
    }

    #[test]
    fn test_timers_floor_at_zero() {
        let mut machine = Machine::new();
        machine.delay_timer = 1;
        machine.tick_timers();
        machine.tick_timers();
        assert_eq!(machine.delay_timer, 0);
        assert_eq!(machine.sound_timer, 0);
    }

    #[test]
    fn test_pixels_are_row_major() {
        let mut machine = Machine::new();
        machine.set_pixel(3, 1, true);
        assert!(machine.frame_buffer[DISPLAY_WIDTH + 3]);
        assert!(machine.pixel(3, 1));
        assert!(!machine.pixel(1, 3));
    }
}
