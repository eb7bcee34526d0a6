// Oscillators - Waveform generators

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaveformType {
    Sine,
    Square,
    Saw,
    Triangle,
}

/// Phase-accumulating oscillator, output in [-1, 1]
#[derive(Debug, Clone)]
pub struct Oscillator {
    waveform: WaveformType,
    phase: f32,
    phase_increment: f32,
}

impl Oscillator {
    pub fn new(waveform: WaveformType, frequency: f32, sample_rate: f32) -> Self {
        let mut osc = Self {
            waveform,
            phase: 0.0,
            phase_increment: 0.0,
        };
        osc.set_frequency(frequency, sample_rate);
        osc
    }

    pub fn set_frequency(&mut self, frequency: f32, sample_rate: f32) {
        self.phase_increment = if sample_rate > 0.0 && frequency.is_finite() {
            (frequency / sample_rate).abs()
        } else {
            0.0
        };
    }

    pub fn next_sample(&mut self) -> f32 {
        let sample = match self.waveform {
            WaveformType::Sine => (self.phase * 2.0 * PI).sin(),
            WaveformType::Square => {
                if self.phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            WaveformType::Saw => (self.phase * 2.0) - 1.0,
            WaveformType::Triangle => {
                if self.phase < 0.5 {
                    (self.phase * 4.0) - 1.0
                } else {
                    3.0 - (self.phase * 4.0)
                }
            }
        };

        self.phase = (self.phase + self.phase_increment).fract();
        sample
    }
}
