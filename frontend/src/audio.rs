use log::debug;
use sdl2::audio::{AudioCallback, AudioDevice, AudioSpecDesired};

use chip8_core::Tone;

use crate::error::{Error, Result};

/// The beep played while the sound timer is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioSettings {
    /// Pitch of the square wave in Hz
    pub frequency: u32,
    /// Samples per second requested from the device
    pub sample_rate: u32,
    pub volume: i16,
}

impl Default for AudioSettings {
    fn default() -> Self {
        AudioSettings {
            frequency: 440,
            sample_rate: 44100,
            volume: 3000,
        }
    }
}

/// The value of a square wave at sample `index`, alternating between `volume` and
/// `-volume` every `half_period` samples.
pub fn square_sample(index: u32, half_period: u32, volume: i16) -> i16 {
    if (index / half_period.max(1)) % 2 == 0 {
        volume
    } else {
        volume.saturating_neg()
    }
}

/// Fills SDL's buffers from its audio thread.
pub struct SquareWave {
    half_period: u32,
    volume: i16,
    index: u32,
}

impl SquareWave {
    fn new(sample_rate: u32, frequency: u32, volume: i16) -> Self {
        SquareWave {
            half_period: sample_rate / frequency.max(1) / 2,
            volume,
            index: 0,
        }
    }
}

impl AudioCallback for SquareWave {
    type Channel = i16;

    fn callback(&mut self, out: &mut [i16]) {
        for sample in out.iter_mut() {
            *sample = square_sample(self.index, self.half_period, self.volume);
            self.index = self.index.wrapping_add(1);
        }
    }
}

/// # Beeper
/// An SDL audio device that plays a square wave whenever the sound timer is nonzero.
pub struct Beeper {
    device: AudioDevice<SquareWave>,
    playing: bool,
}

impl Beeper {
    /// Opens the default playback device. It starts out paused.
    pub fn new(sdl: &sdl2::Sdl, settings: AudioSettings) -> Result<Self> {
        let audio_subsystem = sdl.audio().map_err(Error::sdl)?;
        let desired = AudioSpecDesired {
            freq: Some(i32::try_from(settings.sample_rate).map_err(Error::sdl)?),
            channels: Some(1),
            samples: None,
        };
        let device = audio_subsystem
            .open_playback(None, &desired, |spec| {
                debug!("opened audio device at {} Hz", spec.freq);
                SquareWave::new(spec.freq as u32, settings.frequency, settings.volume)
            })
            .map_err(Error::sdl)?;

        Ok(Beeper {
            device,
            playing: false,
        })
    }
}

impl Tone for Beeper {
    fn update(&mut self, sound_timer: u8) {
        match (sound_timer > 0, self.playing) {
            (true, false) => self.device.resume(),
            (false, true) => self.device.pause(),
            _ => return,
        }
        self.playing = sound_timer > 0;
    }
}
