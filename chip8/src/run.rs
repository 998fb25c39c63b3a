use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::time::{Duration, Instant};

use log::{debug, info};
use sdl2::event::Event;

use chip8_core::{Chip8, Scheduler, Silent, Tone};
use chip8_frontend::{Beeper, Display};

use crate::config::Config;
use crate::keymap::{command, keymap, Command};

/// How long the loop sleeps between steps so it doesn't spin a core.
const IDLE: Duration = Duration::from_millis(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EmulatorState {
    Running,
    Paused,
    Quit,
}

impl EmulatorState {
    fn apply(self, command: Command) -> Self {
        match (command, self) {
            (Command::Quit, _) => EmulatorState::Quit,
            (Command::TogglePause, EmulatorState::Running) => EmulatorState::Paused,
            (Command::TogglePause, EmulatorState::Paused) => EmulatorState::Running,
            (Command::TogglePause, EmulatorState::Quit) => EmulatorState::Quit,
            // a reset restarts the program but keeps it running or paused
            (Command::Reset, state) => state,
        }
    }
}

pub fn run(config: &Config) -> Result<(), Box<dyn Error>> {
    let mut chip8 = Chip8::new();

    // Load ROM
    let file = File::open(&config.rom)
        .map_err(|e| format!("unable to open {}: {}", config.rom.display(), e))?;
    chip8.load_rom(&mut BufReader::new(file))?;
    info!("running {}", config.rom.display());

    // Get SDL2 context
    let sdl = sdl2::init()?;
    let mut display = Display::new(&sdl, config.display())?;
    let mut tone: Box<dyn Tone> = if config.mute {
        Box::new(Silent)
    } else {
        Box::new(Beeper::new(&sdl, config.audio())?)
    };
    let mut events = sdl.event_pump()?;

    let mut scheduler = Scheduler::new(config.instructions_per_second);
    let mut state = EmulatorState::Running;
    display.render(chip8.frame())?;

    while state != EmulatorState::Quit {
        // Handle input
        for event in events.poll_iter() {
            match event {
                Event::Quit { .. } => state = EmulatorState::Quit,
                Event::KeyDown {
                    keycode: Some(key),
                    repeat,
                    ..
                } => match (keymap(key), command(key)) {
                    (Some(kc), _) => chip8.key_press(kc),
                    (_, Some(cmd)) if !repeat => {
                        let next = state.apply(cmd);
                        match (cmd, state, next) {
                            (Command::Reset, ..) => {
                                chip8.reset();
                                display.render(chip8.frame())?;
                            }
                            (_, EmulatorState::Running, EmulatorState::Paused) => {
                                scheduler.pause();
                                tone.update(0);
                                info!("paused");
                            }
                            (_, EmulatorState::Paused, EmulatorState::Running) => {
                                scheduler.resume(Instant::now());
                                info!("resumed");
                            }
                            _ => {}
                        }
                        state = next;
                    }
                    (None, None) => debug!("unmapped key {:?}", key),
                    _ => {}
                },
                Event::KeyUp {
                    keycode: Some(key), ..
                } => {
                    if let Some(kc) = keymap(key) {
                        chip8.key_release(kc);
                    }
                }
                _ => continue,
            };
        }

        // Update state
        if state == EmulatorState::Running {
            scheduler.step(&mut chip8, Instant::now(), tone.as_mut())?;
            if let Some(frame) = chip8.take_frame() {
                display.render(frame)?;
            }
        }

        std::thread::sleep(IDLE);
    }

    tone.update(0);
    info!("quit");
    Ok(())
}
