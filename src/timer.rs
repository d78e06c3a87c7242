#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;
#[cfg(target_arch = "wasm32")]
use web_time::Instant;

/// Wall-clock timer for one game.
#[derive(Debug, Clone, Copy, Default)]
pub struct GameTimer {
    start: Option<Instant>,
    end: Option<Instant>,
}

impl GameTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.start = Some(Instant::now());
        self.end = None;
    }

    pub fn stop(&mut self) {
        if self.start.is_some() {
            self.end = Some(Instant::now());
        }
    }

    pub fn is_started(&self) -> bool {
        self.start.is_some()
    }

    pub fn is_running(&self) -> bool {
        self.start.is_some() && self.end.is_none()
    }

    pub fn elapsed_secs(&self) -> f64 {
        match (self.start, self.end) {
            (Some(start), Some(end)) => end.duration_since(start).as_secs_f64(),
            (Some(start), None) => start.elapsed().as_secs_f64(),
            _ => 0.0,
        }
    }
}
