// Envelope - Linear attack / release ramps
//
// A piano-roll voice has no decay or sustain stage: it ramps up to its peak,
// holds while the key is down, then ramps from wherever it is to silence.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Idle,
    Attack,
    Hold,
    Release,
}

#[derive(Debug, Clone)]
pub struct RampEnvelope {
    stage: Stage,
    value: f32,
    peak: f32,
    attack_step: f32,
    release_samples: f32,
    release_step: f32,
}

impl RampEnvelope {
    /// `attack` and `release` in seconds
    pub fn new(attack: f32, release: f32, sample_rate: f32) -> Self {
        Self {
            stage: Stage::Idle,
            value: 0.0,
            peak: 1.0,
            attack_step: Self::step_for(attack, sample_rate),
            release_samples: (release.max(0.0) * sample_rate).max(1.0),
            release_step: 0.0,
        }
    }

    fn step_for(seconds: f32, sample_rate: f32) -> f32 {
        let samples = seconds * sample_rate;
        if samples > 1.0 { 1.0 / samples } else { 1.0 }
    }

    /// Start the attack ramp towards `peak`
    pub fn note_on(&mut self, peak: f32) {
        self.peak = peak.clamp(0.0, 1.0);
        self.value = 0.0;
        self.stage = Stage::Attack;
    }

    /// Start the release ramp from the current level
    pub fn note_off(&mut self) {
        if matches!(self.stage, Stage::Idle | Stage::Release) {
            return;
        }
        self.release_step = self.value / self.release_samples;
        self.stage = Stage::Release;
    }

    pub fn process(&mut self) -> f32 {
        match self.stage {
            Stage::Idle => self.value = 0.0,
            Stage::Attack => {
                self.value += self.attack_step * self.peak;
                if self.value >= self.peak {
                    self.value = self.peak;
                    self.stage = Stage::Hold;
                }
            }
            Stage::Hold => {}
            Stage::Release => {
                self.value -= self.release_step;
                if self.value <= 0.0 || self.release_step <= 0.0 {
                    self.value = 0.0;
                    self.stage = Stage::Idle;
                }
            }
        }
        self.value
    }

    pub fn is_active(&self) -> bool {
        self.stage != Stage::Idle
    }

    pub fn is_releasing(&self) -> bool {
        self.stage == Stage::Release
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 1000.0;

    #[test]
    fn test_attack_reaches_peak() {
        // 10 ms at 1 kHz = 10 samples
        let mut env = RampEnvelope::new(0.01, 0.1, SAMPLE_RATE);
        env.note_on(0.5);

        let mut last = 0.0;
        for _ in 0..10 {
            last = env.process();
        }
        assert!((last - 0.5).abs() < 1e-4);
        assert!(env.is_active());
        assert!(!env.is_releasing());
    }

    #[test]
    fn test_release_goes_idle() {
        let mut env = RampEnvelope::new(0.0, 0.1, SAMPLE_RATE);
        env.note_on(1.0);
        env.process();
        env.note_off();
        assert!(env.is_releasing());

        for _ in 0..101 {
            env.process();
        }
        assert!(!env.is_active());
        assert_eq!(env.process(), 0.0);
    }

    #[test]
    fn test_release_during_attack_starts_from_current_level() {
        let mut env = RampEnvelope::new(0.1, 0.01, SAMPLE_RATE);
        env.note_on(1.0);
        for _ in 0..50 {
            env.process();
        }
        env.note_off();
        let first = env.process();
        assert!(first < 0.5 && first > 0.4);
    }

    #[test]
    fn test_note_off_when_idle_is_noop() {
        let mut env = RampEnvelope::new(0.01, 0.01, SAMPLE_RATE);
        env.note_off();
        assert!(!env.is_active());
    }
}
