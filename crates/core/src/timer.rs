use std::fmt;

/// Whole-second play timer, advanced by external ticks.
///
/// The timer never reads a clock itself; a driver calls [`Timer::tick`] once
/// per nominal second. Ticks while stopped are ignored, so stopping the timer
/// is enough to freeze its reading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timer {
    elapsed_seconds: u64,
    running: bool,
}

impl Timer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Stop and zero the timer.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Count one second if running. Returns whether the tick was counted.
    pub fn tick(&mut self) -> bool {
        if self.running {
            self.elapsed_seconds = self.elapsed_seconds.saturating_add(1);
        }
        self.running
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }
}

impl fmt::Display for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_clock(self.elapsed_seconds))
    }
}

/// Format seconds as `mm:ss`. Minutes are not wrapped into hours.
#[must_use]
pub fn format_clock(total_seconds: u64) -> String {
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{minutes:02}:{seconds:02}")
}
