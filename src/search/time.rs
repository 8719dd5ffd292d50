//! Per-move time budget.

use std::time::Instant;

pub struct TimeManager {
    start_time: Instant,
    time_per_move: u128,
}

impl TimeManager {
    pub fn new() -> Self {
        Self { start_time: Instant::now(), time_per_move: 0 }
    }

    /// Restart the timer; called at the top of every iterative-deepening
    /// iteration.
    pub fn start(&mut self) {
        self.start_time = Instant::now();
    }

    /// Set the budget in milliseconds.
    pub fn set_time_per_move(&mut self, ms: u32) {
        self.time_per_move = ms as u128;
    }

    pub fn is_time_exceeded(&self) -> bool {
        self.start_time.elapsed().as_millis() > self.time_per_move
    }
}
