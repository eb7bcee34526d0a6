// Audio clock - Sample-counting time base
//
// The output callback (or the offline renderer) advances the frame counter;
// everybody else reads seconds from it. Monotonic by construction.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Clone, Debug)]
pub struct AudioClock {
    frames: Arc<AtomicU64>,
    sample_rate: f64,
}

impl AudioClock {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            frames: Arc::new(AtomicU64::new(0)),
            sample_rate: sample_rate.max(1.0) as f64,
        }
    }

    /// Frames rendered so far
    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::Relaxed)
    }

    /// Advance by rendered frames (called from the render path)
    pub fn advance(&self, frames: usize) {
        self.frames.fetch_add(frames as u64, Ordering::Relaxed);
    }

    /// Elapsed time in seconds
    pub fn seconds(&self) -> f64 {
        self.frames() as f64 / self.sample_rate
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate as f32
    }

    /// Frames needed to cover `seconds` of audio
    pub fn frames_for(&self, seconds: f64) -> usize {
        (seconds.max(0.0) * self.sample_rate).round() as usize
    }
}
