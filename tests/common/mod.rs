// Shared test double: a sound engine with a hand-driven clock that records
// every call it receives

#![allow(dead_code)]

use pianoroll::{AudioError, Composition, SoundEngine, Transport, TransportConfig};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sound {
    On { pitch: u8, velocity: u8 },
    Off { pitch: u8 },
    AllOff,
}

#[derive(Debug, Default)]
pub struct RecordingEngine {
    pub now: f64,
    pub initialized: bool,
    pub resumes: usize,
    pub log: Vec<(f64, Sound)>,
}

impl RecordingEngine {
    /// Note-on events as (time, pitch)
    pub fn note_ons(&self) -> Vec<(f64, u8)> {
        self.log
            .iter()
            .filter_map(|(t, s)| match s {
                Sound::On { pitch, .. } => Some((*t, *pitch)),
                _ => None,
            })
            .collect()
    }

    /// Note-off events as (time, pitch)
    pub fn note_offs(&self) -> Vec<(f64, u8)> {
        self.log
            .iter()
            .filter_map(|(t, s)| match s {
                Sound::Off { pitch } => Some((*t, *pitch)),
                _ => None,
            })
            .collect()
    }
}

impl SoundEngine for RecordingEngine {
    fn initialize(&mut self) -> Result<(), AudioError> {
        self.initialized = true;
        Ok(())
    }

    fn resume(&mut self) -> Result<(), AudioError> {
        self.resumes += 1;
        Ok(())
    }

    fn note_on(&mut self, pitch: u8, velocity: u8) {
        self.log.push((self.now, Sound::On { pitch, velocity }));
    }

    fn note_off(&mut self, pitch: u8) {
        self.log.push((self.now, Sound::Off { pitch }));
    }

    fn all_off(&mut self) {
        self.log.push((self.now, Sound::AllOff));
    }

    fn current_time(&self) -> f64 {
        if self.initialized { self.now } else { 0.0 }
    }
}

pub fn recording_transport() -> Transport<RecordingEngine> {
    Transport::new(RecordingEngine::default(), TransportConfig::default())
}

/// Tick at a steady frame rate from the current clock up to `until`
pub fn run_frames(
    transport: &mut Transport<RecordingEngine>,
    comp: &Composition,
    until: f64,
    frame: f64,
) {
    let mut frame_index = 1.0;
    let start = transport.engine().now;
    loop {
        let time = start + frame_index * frame;
        if time > until + 1e-12 {
            break;
        }
        transport.engine_mut().now = time;
        transport.tick(comp);
        frame_index += 1.0;
    }
}
