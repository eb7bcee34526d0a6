// Filter - One-pole low-pass
//
// y[n] = y[n-1] + a * (x[n] - y[n-1]), a = 1 - exp(-2π fc / fs)

use std::f32::consts::PI;

#[derive(Debug, Clone)]
pub struct OnePoleLowpass {
    coefficient: f32,
    state: f32,
}

impl OnePoleLowpass {
    pub fn new(cutoff_hz: f32, sample_rate: f32) -> Self {
        let nyquist = sample_rate * 0.5;
        let cutoff = cutoff_hz.clamp(1.0, nyquist.max(1.0));
        let coefficient = if sample_rate > 0.0 {
            1.0 - (-2.0 * PI * cutoff / sample_rate).exp()
        } else {
            1.0
        };
        Self {
            coefficient,
            state: 0.0,
        }
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        self.state += self.coefficient * (input - self.state);
        self.state
    }
}
