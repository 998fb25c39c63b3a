use std::time::{Duration, Instant};

use log::debug;

use crate::chip8::Chip8;
use crate::constants::TIMER_HZ;
use crate::error::Result;

/// Something that can make a beep while the sound timer is running.
pub trait Tone {
    /// Called once per timer tick with the sound timer as it was before the tick.
    fn update(&mut self, sound_timer: u8);
}

/// Tone implementation that never makes a sound.
pub struct Silent;

impl Tone for Silent {
    fn update(&mut self, _sound_timer: u8) {}
}

/// What a single scheduling step got through.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub instructions: u32,
    pub timer_ticks: u32,
}

/// # Scheduler
/// Paces instruction execution and the 60Hz timers against real time.
///
/// Elapsed time is poured into two budgets. Whole instruction periods are drained from the
/// first by executing that many instructions; the second decrements the timers at most once
/// per step, so the timers fall behind rather than jump when steps come in late.
pub struct Scheduler {
    instruction_period: Duration,
    timer_period: Duration,
    instruction_budget: Duration,
    timer_budget: Duration,
    last_step: Option<Instant>,
    paused: bool,
}

impl Scheduler {
    /// # Arguments
    /// * `instructions_per_second` the target instruction rate, at least 1
    pub fn new(instructions_per_second: u32) -> Self {
        Scheduler {
            instruction_period: Duration::from_secs(1) / instructions_per_second.max(1),
            timer_period: Duration::from_secs(1) / TIMER_HZ,
            instruction_budget: Duration::ZERO,
            timer_budget: Duration::ZERO,
            last_step: None,
            paused: false,
        }
    }

    pub fn instruction_period(&self) -> Duration {
        self.instruction_period
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Stops consuming time. Both budgets keep whatever they had.
    pub fn pause(&mut self) {
        self.paused = true;
        self.last_step = None;
    }

    /// Picks up from `now`; time spent paused is never replayed.
    pub fn resume(&mut self, now: Instant) {
        self.paused = false;
        self.last_step = Some(now);
    }

    /// Runs everything that is due between the previous step and `now`.
    ///
    /// The first step after construction only records `now`.
    pub fn step(&mut self, chip8: &mut Chip8, now: Instant, tone: &mut dyn Tone) -> Result<Step> {
        let elapsed = self
            .last_step
            .map_or(Duration::ZERO, |last| now.saturating_duration_since(last));
        self.last_step = Some(now);
        self.advance(chip8, elapsed, tone)
    }

    /// Runs everything that is due after `elapsed` more time.
    pub fn advance(
        &mut self,
        chip8: &mut Chip8,
        elapsed: Duration,
        tone: &mut dyn Tone,
    ) -> Result<Step> {
        let mut step = Step::default();
        if self.paused {
            return Ok(step);
        }

        self.instruction_budget += elapsed;
        self.timer_budget += elapsed;

        while self.instruction_budget >= self.instruction_period {
            self.instruction_budget -= self.instruction_period;
            chip8.advance_cpu()?;
            step.instructions += 1;
        }

        if self.timer_budget >= self.timer_period {
            tone.update(chip8.advance_timers());
            self.timer_budget -= self.timer_period;
            step.timer_ticks += 1;
        }

        if self.timer_budget >= self.timer_period {
            debug!("timers running {:?} behind", self.timer_budget);
        }
        Ok(step)
    }
}
