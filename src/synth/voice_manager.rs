// Voice Manager - One held voice per pitch
//
// Starting a pitch that is already held releases the old voice first, so two
// voices never hold the same pitch. Released voices keep ringing until their
// ramp reaches zero.

use std::collections::HashMap;

use super::voice::Voice;
use crate::config::SynthConfig;

/// Upper bound on voices still ringing out; the oldest are dropped first
const MAX_RELEASING: usize = 64;

pub struct VoiceManager {
    config: SynthConfig,
    sample_rate: f32,
    held: HashMap<u8, Voice>,
    releasing: Vec<Voice>,
}

impl VoiceManager {
    pub fn new(config: SynthConfig, sample_rate: f32) -> Self {
        Self {
            config,
            sample_rate,
            held: HashMap::new(),
            releasing: Vec::new(),
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn set_master_gain(&mut self, gain: f32) {
        self.config.master_gain = gain;
    }

    pub fn note_on(&mut self, pitch: u8, velocity: u8) {
        self.note_off(pitch);
        let voice = Voice::start(pitch, velocity, &self.config, self.sample_rate);
        self.held.insert(pitch, voice);
    }

    pub fn note_off(&mut self, pitch: u8) {
        if let Some(mut voice) = self.held.remove(&pitch) {
            voice.release();
            if self.releasing.len() >= MAX_RELEASING {
                self.releasing.remove(0);
            }
            self.releasing.push(voice);
        }
    }

    pub fn all_off(&mut self) {
        let pitches: Vec<u8> = self.held.keys().copied().collect();
        for pitch in pitches {
            self.note_off(pitch);
        }
    }

    /// Pitch currently held (note-on without note-off)
    pub fn is_held(&self, pitch: u8) -> bool {
        self.held.contains_key(&pitch)
    }

    pub fn held_count(&self) -> usize {
        self.held.len()
    }

    /// Held plus still-ringing voices
    pub fn active_voice_count(&self) -> usize {
        self.held.len() + self.releasing.len()
    }

    pub fn next_sample(&mut self) -> f32 {
        let mut mix: f32 = self.held.values_mut().map(|v| v.next_sample()).sum();
        for voice in &mut self.releasing {
            mix += voice.next_sample();
        }
        self.releasing.retain(|v| v.is_active());
        mix * self.config.master_gain
    }
}
