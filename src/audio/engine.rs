// Sound engine - The boundary the transport drives
//
// `SoundEngine` is what the transport (and direct key presses) talk to:
// start/stop a tone per pitch, and read a monotonic clock in seconds.
// `SynthEngine` is the built-in implementation on top of the voice manager.
// It can run offline (the host pulls samples with `render`, which advances
// the clock) or on the default output device with the `audio-output` feature.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::AudioError;
use super::timing::AudioClock;
use crate::config::SynthConfig;
use crate::synth::voice_manager::VoiceManager;

/// Audible output with a monotonic time base.
///
/// `initialize` and `resume` finish their work before returning; callers
/// must let them complete before issuing `note_on`.
pub trait SoundEngine {
    /// One-time output acquisition. Repeated calls are no-ops.
    fn initialize(&mut self) -> Result<(), AudioError>;

    /// Leave a suspended power state. No-op when running or uninitialized.
    fn resume(&mut self) -> Result<(), AudioError>;

    /// Start (or restart) the tone for `pitch`; a sounding voice on the same
    /// pitch is released first.
    fn note_on(&mut self, pitch: u8, velocity: u8);

    /// Release the tone for `pitch`, if any
    fn note_off(&mut self, pitch: u8);

    /// Release every voice
    fn all_off(&mut self);

    /// Seconds since initialization, never decreasing; 0 before it
    fn current_time(&self) -> f64;
}

/// Where rendered samples go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// The host pulls samples through `SynthEngine::render`
    Offline,
    /// Default system output device (needs the `audio-output` feature)
    Device,
}

struct Running {
    voices: Arc<Mutex<VoiceManager>>,
    clock: AudioClock,
    #[cfg(feature = "audio-output")]
    stream: Option<cpal::Stream>,
}

pub struct SynthEngine {
    config: SynthConfig,
    mode: OutputMode,
    running: Option<Running>,
    suspended: bool,
}

impl SynthEngine {
    /// Engine rendered by the host at `config.sample_rate`
    pub fn offline(config: SynthConfig) -> Self {
        Self::with_mode(config, OutputMode::Offline)
    }

    /// Engine playing through the default output device
    pub fn device(config: SynthConfig) -> Self {
        Self::with_mode(config, OutputMode::Device)
    }

    fn with_mode(config: SynthConfig, mode: OutputMode) -> Self {
        Self {
            config,
            mode,
            running: None,
            suspended: false,
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    pub fn is_initialized(&self) -> bool {
        self.running.is_some()
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Enter the suspended power state: the clock stops advancing
    pub fn suspend(&mut self) -> Result<(), AudioError> {
        if self.running.is_none() || self.suspended {
            return Ok(());
        }
        self.set_stream_running(false)?;
        self.suspended = true;
        log::debug!("sound engine suspended");
        Ok(())
    }

    /// Master gain, clamped to [0, 1]
    pub fn set_volume(&mut self, volume: f32) {
        let volume = if volume.is_nan() { 0.0 } else { volume.clamp(0.0, 1.0) };
        self.config.master_gain = volume;
        if let Some(mut vm) = self.voices() {
            vm.set_master_gain(volume);
        }
    }

    pub fn volume(&self) -> f32 {
        self.config.master_gain
    }

    /// Whether a voice currently holds `pitch`
    pub fn is_sounding(&self, pitch: u8) -> bool {
        self.voices().is_some_and(|vm| vm.is_held(pitch))
    }

    /// Held plus still-ringing voices
    pub fn active_voice_count(&self) -> usize {
        self.voices().map_or(0, |vm| vm.active_voice_count())
    }

    pub fn sample_rate(&self) -> Option<f32> {
        self.running.as_ref().map(|r| r.clock.sample_rate())
    }

    /// Pull mono samples in offline mode and advance the clock.
    ///
    /// Returns the number of frames rendered: 0 (buffer untouched) when the
    /// engine is uninitialized, suspended or bound to a device.
    pub fn render(&mut self, out: &mut [f32]) -> usize {
        if self.mode != OutputMode::Offline || self.suspended {
            return 0;
        }
        let Some(running) = self.running.as_ref() else {
            return 0;
        };

        let mut vm = lock(&running.voices);
        for sample in out.iter_mut() {
            *sample = vm.next_sample();
        }
        running.clock.advance(out.len());
        out.len()
    }

    /// Render and discard `seconds` of audio (offline mode)
    pub fn advance(&mut self, seconds: f64) -> usize {
        let Some(frames) = self.running.as_ref().map(|r| r.clock.frames_for(seconds)) else {
            return 0;
        };
        let mut buffer = vec![0.0; frames];
        self.render(&mut buffer)
    }

    fn voices(&self) -> Option<MutexGuard<'_, VoiceManager>> {
        self.running.as_ref().map(|r| lock(&r.voices))
    }

    fn start_offline(&self) -> Running {
        let sample_rate = self.config.sample_rate.max(1.0);
        Running {
            voices: Arc::new(Mutex::new(VoiceManager::new(self.config.clone(), sample_rate))),
            clock: AudioClock::new(sample_rate),
            #[cfg(feature = "audio-output")]
            stream: None,
        }
    }

    #[cfg(feature = "audio-output")]
    fn start_device(&self) -> Result<Running, AudioError> {
        let device = super::output::OutputDevice::default_output()?;
        let sample_rate = device.sample_rate();
        let voices = Arc::new(Mutex::new(VoiceManager::new(self.config.clone(), sample_rate)));
        let clock = AudioClock::new(sample_rate);
        let stream = device.start(Arc::clone(&voices), clock.clone())?;

        Ok(Running {
            voices,
            clock,
            stream: Some(stream),
        })
    }

    #[cfg(not(feature = "audio-output"))]
    fn start_device(&self) -> Result<Running, AudioError> {
        Err(AudioError::OutputUnavailable)
    }

    #[cfg(feature = "audio-output")]
    fn set_stream_running(&self, running: bool) -> Result<(), AudioError> {
        match self.running.as_ref().and_then(|r| r.stream.as_ref()) {
            Some(stream) => super::output::set_stream_running(stream, running),
            None => Ok(()),
        }
    }

    #[cfg(not(feature = "audio-output"))]
    fn set_stream_running(&self, _running: bool) -> Result<(), AudioError> {
        Ok(())
    }
}

fn lock(voices: &Mutex<VoiceManager>) -> MutexGuard<'_, VoiceManager> {
    voices.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SoundEngine for SynthEngine {
    fn initialize(&mut self) -> Result<(), AudioError> {
        if self.running.is_some() {
            return Ok(());
        }
        let running = match self.mode {
            OutputMode::Offline => self.start_offline(),
            OutputMode::Device => self.start_device()?,
        };
        log::info!(
            "sound engine initialized ({:?}, {} Hz)",
            self.mode,
            running.clock.sample_rate()
        );
        self.running = Some(running);
        Ok(())
    }

    fn resume(&mut self) -> Result<(), AudioError> {
        if self.running.is_none() || !self.suspended {
            return Ok(());
        }
        self.set_stream_running(true)?;
        self.suspended = false;
        log::debug!("sound engine resumed");
        Ok(())
    }

    fn note_on(&mut self, pitch: u8, velocity: u8) {
        if let Some(mut vm) = self.voices() {
            vm.note_on(pitch, velocity);
        }
    }

    fn note_off(&mut self, pitch: u8) {
        if let Some(mut vm) = self.voices() {
            vm.note_off(pitch);
        }
    }

    fn all_off(&mut self) {
        if let Some(mut vm) = self.voices() {
            vm.all_off();
        }
    }

    fn current_time(&self) -> f64 {
        self.running.as_ref().map_or(0.0, |r| r.clock.seconds())
    }
}
