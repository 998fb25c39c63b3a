use std::path::PathBuf;

use clap::Parser;

use chip8_core::DEFAULT_INSTRUCTIONS_PER_SECOND;
use chip8_frontend::{AudioSettings, DisplaySettings};

/// Runs a Chip-8 program in a window.
#[derive(Parser, Debug)]
#[command(name = "chip8", version)]
pub struct Config {
    /// Program image to load at 0x200
    #[arg(value_name = "ROM")]
    pub rom: PathBuf,

    /// How many instructions to execute each second
    #[arg(long, default_value_t = DEFAULT_INSTRUCTIONS_PER_SECOND)]
    pub instructions_per_second: u32,

    /// Size of each display pixel on screen
    #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u32).range(1..=64))]
    pub scale: u32,

    /// Colour of lit pixels as RGBA hex
    #[arg(long, default_value = "FFFFFFFF", value_parser = parse_color)]
    pub foreground: u32,

    /// Colour of unlit pixels as RGBA hex
    #[arg(long, default_value = "000000FF", value_parser = parse_color)]
    pub background: u32,

    /// Draw lit pixels without a background coloured border
    #[arg(long)]
    pub no_outlines: bool,

    /// Pitch of the beep in Hz
    #[arg(long, default_value_t = 440)]
    pub tone_frequency: u32,

    /// Audio samples per second
    #[arg(
        long,
        default_value_t = 44100,
        value_parser = clap::value_parser!(u32).range(1..=i32::MAX as i64)
    )]
    pub sample_rate: u32,

    /// Loudness of the beep
    #[arg(
        long,
        default_value_t = 3000,
        value_parser = clap::value_parser!(i16).range(0..=i16::MAX as i64)
    )]
    pub volume: i16,

    /// Never open an audio device
    #[arg(long)]
    pub mute: bool,
}

impl Config {
    pub fn display(&self) -> DisplaySettings {
        DisplaySettings {
            scale: self.scale,
            foreground: self.foreground,
            background: self.background,
            pixel_outlines: !self.no_outlines,
        }
    }

    pub fn audio(&self) -> AudioSettings {
        AudioSettings {
            frequency: self.tone_frequency,
            sample_rate: self.sample_rate,
            volume: self.volume,
        }
    }
}

/// Parses an `RRGGBBAA` colour, with or without a leading `#` or `0x`.
pub fn parse_color(s: &str) -> Result<u32, String> {
    let hex = s
        .strip_prefix('#')
        .or_else(|| s.strip_prefix("0x"))
        .unwrap_or(s);
    if hex.len() != 8 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("expected 8 hex digits (RRGGBBAA), got {:?}", s));
    }
    u32::from_str_radix(hex, 16).map_err(|e| format!("invalid colour {:?}: {}", s, e))
}
