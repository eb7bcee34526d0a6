// Frame ticker - Fixed-rate update cycle for headless hosts
// Calls `Transport::tick` once per frame until playback stops or a deadline

use std::time::{Duration, Instant};

use crate::audio::engine::SoundEngine;
use crate::sequencer::composition::Composition;
use crate::sequencer::transport::Transport;

/// Roughly one display refresh
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

#[derive(Debug, Clone, Copy)]
pub struct FrameTicker {
    interval: Duration,
    realtime: bool,
}

impl FrameTicker {
    /// Ticker sleeping `interval` between frames
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            realtime: true,
        }
    }

    /// Ticker that never sleeps; the frame callback is expected to move the
    /// engine clock (offline rendering)
    pub fn offline(interval: Duration) -> Self {
        Self {
            interval,
            realtime: false,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Drive `transport` until it stops or `max_frames` frames have run.
    ///
    /// `on_frame` runs after every tick with the frame interval, and is where
    /// the host renders audio or edits the composition between frames.
    /// Returns the number of frames ticked.
    pub fn run<E, F>(
        &self,
        transport: &mut Transport<E>,
        composition: &mut Composition,
        max_frames: usize,
        mut on_frame: F,
    ) -> usize
    where
        E: SoundEngine,
        F: FnMut(&mut Transport<E>, &mut Composition, Duration),
    {
        let mut frames = 0;
        let mut next_frame = Instant::now();

        while frames < max_frames && transport.tick(composition) {
            frames += 1;
            on_frame(transport, composition, self.interval);

            if self.realtime {
                next_frame += self.interval;
                let now = Instant::now();
                if next_frame > now {
                    std::thread::sleep(next_frame - now);
                } else {
                    // Running late; don't try to catch up
                    next_frame = now;
                }
            }
        }

        log::debug!("frame ticker ran {} frames", frames);
        frames
    }
}

impl Default for FrameTicker {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_INTERVAL)
    }
}
