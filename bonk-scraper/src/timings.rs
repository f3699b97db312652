use std::time::Duration;

/// Which collection pass is driving the locator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Initial,
    /// Second pass over incomplete ranks: scrolls back up for the top ranks
    /// and lets rows settle longer.
    Retry,
}

/// Attempt ceilings, distances and delays for driving the virtualized list.
#[derive(Debug, Clone)]
pub struct Timings {
    pub navigation_timeout: Duration,
    pub initial_selector_timeout: Duration,

    pub search_attempts: usize,
    pub search_step_down: f64,
    pub search_step_up: f64,
    /// Retry passes scroll up instead of down for ranks below this.
    pub backward_bias_below_rank: u32,
    pub search_delay: Duration,

    /// Counter-scroll after scrolling a row into view; clears the fixed header.
    pub overlay_correction: f64,
    pub settle_delay: Duration,
    pub retry_settle_delay: Duration,

    pub expand_attempts: usize,
    pub expanded_height: f64,
    pub expand_growth: f64,
    pub expand_delay: Duration,
    pub expand_delay_step: Duration,
    /// Horizontal position of the first click, as a fraction of row width.
    pub expand_click_fraction: f64,

    pub retry_attempts: usize,
    pub retry_nudge: f64,
    pub retry_delay: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            navigation_timeout: Duration::from_secs(90),
            initial_selector_timeout: Duration::from_secs(60),
            search_attempts: 20,
            search_step_down: 300.0,
            search_step_up: -500.0,
            backward_bias_below_rank: 10,
            search_delay: Duration::from_millis(300),
            overlay_correction: -150.0,
            settle_delay: Duration::from_millis(500),
            retry_settle_delay: Duration::from_millis(1000),
            expand_attempts: 3,
            expanded_height: 150.0,
            expand_growth: 50.0,
            expand_delay: Duration::from_millis(800),
            expand_delay_step: Duration::from_millis(500),
            expand_click_fraction: 0.95,
            retry_attempts: 2,
            retry_nudge: -100.0,
            retry_delay: Duration::from_secs(1),
        }
    }
}

impl Timings {
    pub fn search_step(&self, pass: Pass, rank: u32) -> f64 {
        match pass {
            Pass::Retry if rank < self.backward_bias_below_rank => self.search_step_up,
            _ => self.search_step_down,
        }
    }

    pub fn settle(&self, pass: Pass) -> Duration {
        match pass {
            Pass::Initial => self.settle_delay,
            Pass::Retry => self.retry_settle_delay,
        }
    }

    /// Pause after the `attempt`-th expand click (zero-based).
    pub fn expand_pause(&self, attempt: usize) -> Duration {
        self.expand_delay + self.expand_delay_step * attempt as u32
    }
}
