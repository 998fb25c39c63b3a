use std::io::Read;

use log::{info, trace, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::constants::PROGRAM_CAPACITY;
use crate::error::{Error, Result};
use crate::instruction::Instruction;
use crate::opcode::Decoded;
use crate::state::{FrameBuffer, Machine};

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - the current `machine`
///  - the loaded `program`, so the machine can be reset
///  - a random source for `CXNN`
///
/// Supplies interfaces for:
/// - loading roms
/// - resetting to the freshly loaded state
/// - pressing and releasing keys
/// - advancing the CPU by a single instruction
/// - advancing its timers
/// - inspecting its frame buffer for rendering by some display
pub struct Chip8 {
    machine: Machine,
    program: Vec<u8>,
    rng: StdRng,
}

impl Chip8 {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// A machine whose random numbers are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Chip8 {
            machine: Machine::new(),
            program: Vec::new(),
            rng,
        }
    }

    /// Load a rom from a source file
    ///
    /// Reading stops one byte past the program capacity, so an oversized image is rejected
    /// without being read in full.
    ///
    /// # Arguments
    /// * `reader` a reader that yields the whole ROM image
    pub fn load_rom(&mut self, reader: &mut dyn Read) -> Result<()> {
        let mut program = Vec::new();
        reader
            .take(PROGRAM_CAPACITY as u64 + 1)
            .read_to_end(&mut program)?;
        self.load_program(&program)
    }

    /// Loads a program image into a cold-booted machine.
    ///
    /// The current machine is left untouched if the image does not fit.
    pub fn load_program(&mut self, program: &[u8]) -> Result<()> {
        let mut machine = Machine::new();
        machine.load_program(program)?;
        self.machine = machine;
        self.program = program.to_vec();
        info!("loaded {} byte program", program.len());
        Ok(())
    }

    /// Puts the machine back the way it was straight after the program was loaded.
    pub fn reset(&mut self) {
        let mut machine = Machine::new();
        // the program already fit once
        if let Err(e) = machine.load_program(&self.program) {
            warn!("unable to reload program: {}", e);
        }
        self.machine = machine;
        info!("machine reset");
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut Machine {
        &mut self.machine
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.machine.frame_buffer
    }

    /// Returns the FrameBuffer if the display should be redrawn
    pub fn take_frame(&mut self) -> Option<&FrameBuffer> {
        if self.machine.draw_flag {
            self.machine.draw_flag = false;
            Some(&self.machine.frame_buffer)
        } else {
            None
        }
    }

    pub fn sound_timer(&self) -> u8 {
        self.machine.sound_timer
    }

    /// Set the pressed status of key
    ///
    /// # Arguments
    /// * `key` the index of the key that was pressed, 0x0..=0xF
    pub fn key_press(&mut self, key: u8) {
        self.set_key(key, true);
    }

    /// Unset the pressed status of key
    ///
    /// # Arguments
    /// * `key` the index of the key that was released, 0x0..=0xF
    pub fn key_release(&mut self, key: u8) {
        self.set_key(key, false);
    }

    fn set_key(&mut self, key: u8, pressed: bool) {
        match self.machine.keypad.get_mut(usize::from(key)) {
            Some(state) => *state = pressed,
            None => warn!("ignoring key {:#X} outside the keypad", key),
        }
    }

    /// Advances the CPU by a single instruction
    /// - fetches the opcode at the pc and decodes it
    /// - bumps the pc past it
    /// - executes it
    pub fn advance_cpu(&mut self) -> Result<()> {
        let pc = self.machine.pc;
        let op = self.machine.fetch();
        self.machine.current = Decoded::from(op);
        self.machine.skip();

        let instruction = Instruction::decode(&self.machine.current)
            .ok_or(Error::UnknownOpcode { opcode: op, pc })?;
        trace!(
            "{:03X}: {:04X} {:<16} v{:02X?} i{:04X}",
            pc,
            op,
            instruction.to_string(),
            self.machine.v,
            self.machine.i
        );
        instruction.execute(&mut self.machine, &mut self.rng)
    }

    /// Decrements both timers once, returning the sound timer value from before the tick
    pub fn advance_timers(&mut self) -> u8 {
        let sound = self.machine.sound_timer;
        self.machine.tick_timers();
        sound
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}
