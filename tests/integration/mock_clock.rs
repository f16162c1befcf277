//! Fake clock for integration tests.
//!
//! Records every wait instead of sleeping, can deliver a user stop at a
//! chosen wait, and can snapshot the simulated board each time the code
//! under test waits (the moment a real observer would see the outputs).

use std::time::Duration;

use rpi_outputs::adapters::sim::SimBoard;
use rpi_outputs::app::ports::Sleeper;
use rpi_outputs::{Error, Level, Result};

pub struct MockClock {
    pub waits: Vec<Duration>,
    /// Levels of the watched pins at each completed wait.
    pub frames: Vec<Vec<Level>>,
    /// Duty (percent) of the watched pins at each completed wait.
    pub duties: Vec<Vec<f32>>,
    interrupt_at: Option<usize>,
    watch: Option<(SimBoard, Vec<u8>)>,
}

#[allow(dead_code)]
impl MockClock {
    pub fn new() -> Self {
        Self {
            waits: Vec::new(),
            frames: Vec::new(),
            duties: Vec::new(),
            interrupt_at: None,
            watch: None,
        }
    }

    /// Wait number `n` (0-based) and every later one report a user stop.
    pub fn interrupt_at(mut self, n: usize) -> Self {
        self.interrupt_at = Some(n);
        self
    }

    /// Snapshot `pins` on `board` at every wait.
    pub fn watching(mut self, board: &SimBoard, pins: &[u8]) -> Self {
        self.watch = Some((board.clone(), pins.to_vec()));
        self
    }

    pub fn total(&self) -> Duration {
        self.waits.iter().sum()
    }
}

impl Sleeper for MockClock {
    fn sleep(&mut self, duration: Duration) -> Result<()> {
        if self.interrupt_at.is_some_and(|n| self.waits.len() >= n) {
            return Err(Error::Interrupted);
        }
        self.waits.push(duration);
        if let Some((board, pins)) = &self.watch {
            self.frames.push(board.levels(pins));
            self.duties
                .push(pins.iter().map(|&id| board.duty(id).percent()).collect());
        }
        Ok(())
    }
}
