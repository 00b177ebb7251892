use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Rolling window of per-frame work times measured against the frame budget.
///
/// Only the last `window` frames feed `average`/`max`; `frames` and
/// `overruns` count the whole session.
#[derive(Debug)]
pub struct FrameTimer {
    samples: VecDeque<Duration>,
    window: usize,
    budget: Duration,
    frames: u64,
    overruns: u64,
}

impl FrameTimer {
    pub fn new(window: usize, budget: Duration) -> Self {
        let window = window.max(1);
        Self {
            samples: VecDeque::with_capacity(window),
            window,
            budget,
            frames: 0,
            overruns: 0,
        }
    }

    /// Record one frame's work time. Returns true if it exceeded the budget.
    pub fn record(&mut self, work: Duration) -> bool {
        if self.samples.len() == self.window {
            self.samples.pop_front();
        }
        self.samples.push_back(work);
        self.frames += 1;
        let over = work > self.budget;
        if over {
            self.overruns += 1;
        }
        over
    }

    pub fn average(&self) -> Duration {
        match self.samples.len() {
            0 => Duration::ZERO,
            n => self.samples.iter().sum::<Duration>() / n as u32,
        }
    }

    pub fn max(&self) -> Duration {
        self.samples.iter().copied().max().unwrap_or_default()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn overruns(&self) -> u64 {
        self.overruns
    }
}

/// Sleeps out the rest of a fixed frame budget.
#[derive(Debug, Clone, Copy)]
pub struct FramePacer {
    target: Duration,
}

impl FramePacer {
    pub fn new(target: Duration) -> Self {
        Self { target }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn target(&self) -> Duration {
        self.target
    }

    /// Time left in the frame after `elapsed` has been spent; zero when over budget.
    pub fn remaining(&self, elapsed: Duration) -> Duration {
        self.target.saturating_sub(elapsed)
    }

    /// Sleep until `target` has passed since `frame_start`. Returns the frame's work time.
    pub fn pace(&self, frame_start: Instant) -> Duration {
        let elapsed = frame_start.elapsed();
        let remaining = self.remaining(elapsed);
        if remaining.is_zero() {
            tracing::trace!(?elapsed, target = ?self.target, "frame over budget");
        } else {
            std::thread::sleep(remaining);
        }
        elapsed
    }
}
