use std::collections::VecDeque;

/// Number of instantaneous samples kept for the displayed rate.
pub const FPS_WINDOW: usize = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FpsSummary {
    pub current: u32,
    pub mean: u32,
    pub min: u32,
    pub max: u32,
}

/// Sliding window over the rate at which frames are painted. Display only; it
/// has no say in scheduling.
#[derive(Clone, Debug)]
pub struct FrameClock {
    /// Timestamp of the previous sample, in milliseconds.
    last: f64,
    samples: VecDeque<f64>,
}

impl FrameClock {
    pub fn new(now: f64) -> Self {
        Self {
            last: now,
            samples: VecDeque::with_capacity(FPS_WINDOW),
        }
    }

    /// Records a frame painted at `now`. Returns `None` when no time has passed
    /// since the previous sample.
    pub fn sample(&mut self, now: f64) -> Option<FpsSummary> {
        let delta = now - self.last;
        if !(delta > 0.0) {
            return None;
        }
        self.last = now;

        let fps = 1000.0 / delta;
        if self.samples.len() >= FPS_WINDOW {
            self.samples.pop_front();
        }
        self.samples.push_back(fps);

        self.summary().map(|s| FpsSummary {
            current: fps.floor() as u32,
            ..s
        })
    }

    pub fn summary(&self) -> Option<FpsSummary> {
        let &current = self.samples.back()?;
        let (sum, min, max) = self.samples.iter().fold(
            (0.0, f64::INFINITY, f64::NEG_INFINITY),
            |(sum, min, max), &s| (sum + s, min.min(s), max.max(s)),
        );
        Some(FpsSummary {
            current: current.floor() as u32,
            mean: (sum / self.samples.len() as f64).floor() as u32,
            min: min.floor() as u32,
            max: max.floor() as u32,
        })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Forgets every sample; the next delta is measured from `now`.
    pub fn reset(&mut self, now: f64) {
        self.last = now;
        self.samples.clear();
    }
}
