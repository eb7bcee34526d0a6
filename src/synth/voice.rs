// Voice - One sounding pitch

use super::envelope::RampEnvelope;
use super::filter::OnePoleLowpass;
use super::oscillator::Oscillator;
use crate::config::SynthConfig;
use crate::sequencer::timeline::midi_to_frequency;

pub struct Voice {
    pitch: u8,
    oscillator: Oscillator,
    filter: OnePoleLowpass,
    envelope: RampEnvelope,
}

impl Voice {
    /// Build and start a voice: the attack ramp begins immediately
    pub fn start(pitch: u8, velocity: u8, config: &SynthConfig, sample_rate: f32) -> Self {
        let normalized = velocity.min(127) as f32 / 127.0;
        let frequency = midi_to_frequency(pitch) as f32;

        let mut envelope = RampEnvelope::new(config.attack, config.release, sample_rate);
        envelope.note_on(normalized * config.peak_gain);

        Self {
            pitch,
            oscillator: Oscillator::new(config.waveform, frequency, sample_rate),
            filter: OnePoleLowpass::new(
                config.cutoff_base_hz + normalized * config.cutoff_velocity_hz,
                sample_rate,
            ),
            envelope,
        }
    }

    pub fn pitch(&self) -> u8 {
        self.pitch
    }

    /// Begin the release ramp
    pub fn release(&mut self) {
        self.envelope.note_off();
    }

    /// Still producing sound (including while releasing)
    pub fn is_active(&self) -> bool {
        self.envelope.is_active()
    }

    pub fn is_releasing(&self) -> bool {
        self.envelope.is_releasing()
    }

    pub fn next_sample(&mut self) -> f32 {
        let raw = self.filter.process(self.oscillator.next_sample());
        raw * self.envelope.process()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_sounds_then_releases() {
        let config = SynthConfig::default();
        let mut voice = Voice::start(69, 127, &config, 48000.0);

        let energy: f32 = (0..4800).map(|_| voice.next_sample().abs()).sum();
        assert!(energy > 0.0);
        assert!(voice.is_active());

        voice.release();
        assert!(voice.is_releasing());

        // Release is 0.1s = 4800 samples
        for _ in 0..5000 {
            voice.next_sample();
        }
        assert!(!voice.is_active());
    }

    #[test]
    fn test_zero_velocity_is_silent() {
        let config = SynthConfig::default();
        let mut voice = Voice::start(60, 0, &config, 48000.0);
        for _ in 0..1000 {
            assert_eq!(voice.next_sample(), 0.0);
        }
    }
}
