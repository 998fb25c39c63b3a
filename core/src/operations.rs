use rand::{Rng, RngCore};

use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH, FLAG, FONT_ADDR, GLYPH_SIZE, KEY_COUNT};
use crate::error::Result;
use crate::state::Machine;

// Every operation runs after the pc has already been bumped past its own instruction.

fn flag(set: bool) -> u8 {
    u8::from(set)
}

/// clear
pub fn clr(machine: &mut Machine) {
    machine.clear_screen();
}

/// PC = STACK.pop()
pub fn rts(machine: &mut Machine) -> Result<()> {
    machine.pc = machine.pop()?;
    Ok(())
}

/// PC = addr
pub fn jump(machine: &mut Machine, addr: u16) {
    machine.pc = addr;
}

/// STACK.push(PC); PC = addr
pub fn call(machine: &mut Machine, addr: u16) -> Result<()> {
    machine.push(machine.pc, addr)?;
    machine.pc = addr;
    Ok(())
}

/// if Vx == kk then pc += 2
pub fn ske(machine: &mut Machine, x: u8, kk: u8) {
    if machine.v[usize::from(x)] == kk {
        machine.skip();
    }
}

/// if Vx != kk then pc += 2
pub fn skne(machine: &mut Machine, x: u8, kk: u8) {
    if machine.v[usize::from(x)] != kk {
        machine.skip();
    }
}

/// if Vx == Vy then pc += 2
pub fn skre(machine: &mut Machine, x: u8, y: u8) {
    if machine.v[usize::from(x)] == machine.v[usize::from(y)] {
        machine.skip();
    }
}

/// if Vx != Vy then pc += 2
pub fn skrne(machine: &mut Machine, x: u8, y: u8) {
    if machine.v[usize::from(x)] != machine.v[usize::from(y)] {
        machine.skip();
    }
}

/// Vx = kk
pub fn load(machine: &mut Machine, x: u8, kk: u8) {
    machine.v[usize::from(x)] = kk;
}

/// Vx += kk
/// Add kk to Vx; allow for overflow but implicitly drop it, VF is untouched
pub fn add(machine: &mut Machine, x: u8, kk: u8) {
    let vx = &mut machine.v[usize::from(x)];
    *vx = vx.wrapping_add(kk);
}

/// Vx = Vy
pub fn mv(machine: &mut Machine, x: u8, y: u8) {
    machine.v[usize::from(x)] = machine.v[usize::from(y)];
}

/// Vx |= Vy; VF = 0
pub fn or(machine: &mut Machine, x: u8, y: u8) {
    machine.v[usize::from(x)] |= machine.v[usize::from(y)];
    machine.v[FLAG] = 0;
}

/// Vx &= Vy; VF = 0
pub fn and(machine: &mut Machine, x: u8, y: u8) {
    machine.v[usize::from(x)] &= machine.v[usize::from(y)];
    machine.v[FLAG] = 0;
}

/// Vx ^= Vy; VF = 0
pub fn xor(machine: &mut Machine, x: u8, y: u8) {
    machine.v[usize::from(x)] ^= machine.v[usize::from(y)];
    machine.v[FLAG] = 0;
}

/// Vx += Vy; VF = overflow
pub fn addr(machine: &mut Machine, x: u8, y: u8) {
    let (res, over) = machine.v[usize::from(x)].overflowing_add(machine.v[usize::from(y)]);
    machine.v[usize::from(x)] = res;
    machine.v[FLAG] = flag(over);
}

/// Vx -= Vy; VF = !borrow
pub fn sub(machine: &mut Machine, x: u8, y: u8) {
    let (vx, vy) = (machine.v[usize::from(x)], machine.v[usize::from(y)]);
    machine.v[usize::from(x)] = vx.wrapping_sub(vy);
    machine.v[FLAG] = flag(vy <= vx);
}

/// Vx = Vy >> 1; VF = shifted out bit
pub fn shr(machine: &mut Machine, x: u8, y: u8) {
    let vy = machine.v[usize::from(y)];
    machine.v[usize::from(x)] = vy >> 1;
    machine.v[FLAG] = vy & 0x1;
}

/// Vx = Vy - Vx; VF = !borrow
/// The flag compares Vy against Vx as it was before the subtraction.
pub fn subn(machine: &mut Machine, x: u8, y: u8) {
    let (vx, vy) = (machine.v[usize::from(x)], machine.v[usize::from(y)]);
    machine.v[usize::from(x)] = vy.wrapping_sub(vx);
    machine.v[FLAG] = flag(vx <= vy);
}

/// Vx = Vy << 1; VF = shifted out bit
pub fn shl(machine: &mut Machine, x: u8, y: u8) {
    let vy = machine.v[usize::from(y)];
    machine.v[usize::from(x)] = vy << 1;
    machine.v[FLAG] = vy >> 7;
}

/// I = addr
pub fn loadi(machine: &mut Machine, addr: u16) {
    machine.i = addr;
}

/// PC = V0 + addr
pub fn jumpi(machine: &mut Machine, addr: u16) {
    machine.pc = addr + u16::from(machine.v[0x0]);
}

/// Vx = rand_byte & kk
pub fn rand(machine: &mut Machine, x: u8, kk: u8, rng: &mut dyn RngCore) {
    let rand_byte: u8 = rng.random();
    machine.v[usize::from(x)] = rand_byte & kk;
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs a sprite from memory i..i+n at position x, y on the FrameBuffer.
/// The start position wraps around the screen but the sprite itself is clipped at the edges.
/// Sets VF if any pixels are erased
pub fn draw(machine: &mut Machine, x: u8, y: u8, n: u8) {
    let start_x = usize::from(machine.v[usize::from(x)]) % DISPLAY_WIDTH;
    let start_y = usize::from(machine.v[usize::from(y)]) % DISPLAY_HEIGHT;

    // Reset the carry flag (used for collision detection)
    machine.v[FLAG] = 0x0;

    for row in 0..u16::from(n) {
        let py = start_y + usize::from(row);
        if py >= DISPLAY_HEIGHT {
            break;
        }
        let sprite = machine.read_byte(machine.i.wrapping_add(row));
        for bit in 0..8 {
            let px = start_x + bit;
            if px >= DISPLAY_WIDTH {
                break;
            }
            let sprite_bit = (sprite >> (7 - bit)) & 0x1 == 1;
            let pixel = machine.pixel(px, py);
            if sprite_bit && pixel {
                machine.v[FLAG] = 0x1;
            }
            machine.set_pixel(px, py, pixel ^ sprite_bit);
        }
    }

    machine.draw_flag = true;
}

fn key_pressed(machine: &Machine, x: u8) -> bool {
    machine.keypad[usize::from(machine.v[usize::from(x)]) % KEY_COUNT]
}

/// if Vx.pressed then pc += 2
pub fn skpr(machine: &mut Machine, x: u8) {
    if key_pressed(machine, x) {
        machine.skip();
    }
}

/// if !Vx.pressed then pc += 2
pub fn skup(machine: &mut Machine, x: u8) {
    if !key_pressed(machine, x) {
        machine.skip();
    }
}

/// Vx = DT
pub fn moved(machine: &mut Machine, x: u8) {
    machine.v[usize::from(x)] = machine.delay_timer;
}

/// await keypress for Vx
///
/// Latches onto the lowest pressed key and waits for that key to be released before
/// storing it. Until then the pc is wound back so this instruction is fetched again.
pub fn keyd(machine: &mut Machine, x: u8) {
    match machine.held_key {
        None => {
            machine.held_key = machine
                .keypad
                .iter()
                .position(|&pressed| pressed)
                .map(|key| key as u8);
            machine.pc = machine.pc.wrapping_sub(2);
        }
        Some(key) if machine.keypad[usize::from(key)] => {
            machine.pc = machine.pc.wrapping_sub(2);
        }
        Some(key) => {
            machine.v[usize::from(x)] = key;
            machine.held_key = None;
        }
    }
}

/// DT = Vx
pub fn loads(machine: &mut Machine, x: u8) {
    machine.delay_timer = machine.v[usize::from(x)];
}

/// ST = Vx
pub fn ld(machine: &mut Machine, x: u8) {
    machine.sound_timer = machine.v[usize::from(x)];
}

/// I += Vx
pub fn addi(machine: &mut Machine, x: u8) {
    machine.i = machine.i.wrapping_add(u16::from(machine.v[usize::from(x)]));
}

/// I = FONT_ADDR + Vx * 5
/// Set I to the memory address of the glyph for the low nibble of Vx
/// See constants::SPRITE_SHEET for more details
pub fn ldspr(machine: &mut Machine, x: u8) {
    machine.i = FONT_ADDR + u16::from(machine.v[usize::from(x)] & 0xF) * GLYPH_SIZE;
}

/// mem[I..I+3] = bcd(Vx)
/// Store BCD repr of Vx in memory starting at address i
pub fn bcd(machine: &mut Machine, x: u8) {
    let vx = machine.v[usize::from(x)];
    let digits = [vx / 100, vx / 10 % 10, vx % 10];
    for (offset, digit) in (0u16..).zip(digits) {
        machine.write_byte(machine.i.wrapping_add(offset), digit);
    }
}

/// mem[I..=I+x] = V0..=Vx
/// I itself is left where it was
pub fn stor(machine: &mut Machine, x: u8) {
    for r in 0..=x {
        let value = machine.v[usize::from(r)];
        machine.write_byte(machine.i.wrapping_add(u16::from(r)), value);
    }
}

/// V0..=Vx = mem[I..=I+x]
/// I itself is left where it was
pub fn read(machine: &mut Machine, x: u8) {
    for r in 0..=x {
        machine.v[usize::from(r)] = machine.read_byte(machine.i.wrapping_add(u16::from(r)));
    }
}
