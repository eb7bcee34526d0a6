// Device output - CPAL stream feeding the voice manager
//
// The stream callback renders mono voices into every channel of the
// interleaved device buffer and advances the shared clock by the frames
// written. Sample conversion goes through `FromSample<f32>`.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, FromSample, Sample, SampleFormat, SizedSample, Stream, StreamConfig};
use std::sync::{Arc, Mutex, PoisonError};

use super::AudioError;
use super::timing::AudioClock;
use crate::synth::voice_manager::VoiceManager;

/// Default output device plus its preferred configuration
pub struct OutputDevice {
    device: Device,
    config: cpal::SupportedStreamConfig,
}

impl OutputDevice {
    pub fn default_output() -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(AudioError::NoDevice)?;

        log::info!(
            "audio device: {}",
            device.name().unwrap_or_else(|_| "Unknown".to_string())
        );

        let config = device
            .default_output_config()
            .map_err(|e| AudioError::Config(e.to_string()))?;
        log::debug!("audio config: {:?}", config);

        Ok(Self { device, config })
    }

    pub fn sample_rate(&self) -> f32 {
        self.config.sample_rate().0 as f32
    }

    /// Build and start the stream
    pub fn start(
        self,
        voices: Arc<Mutex<VoiceManager>>,
        clock: AudioClock,
    ) -> Result<Stream, AudioError> {
        let sample_format = self.config.sample_format();
        let channels = self.config.channels() as usize;
        let config: StreamConfig = self.config.into();

        let stream = match sample_format {
            SampleFormat::F32 => build_stream::<f32>(&self.device, &config, channels, voices, clock),
            SampleFormat::I16 => build_stream::<i16>(&self.device, &config, channels, voices, clock),
            SampleFormat::U16 => build_stream::<u16>(&self.device, &config, channels, voices, clock),
            other => return Err(AudioError::UnsupportedFormat(format!("{:?}", other))),
        }?;

        stream
            .play()
            .map_err(|e| AudioError::Stream(e.to_string()))?;
        Ok(stream)
    }
}

fn build_stream<T>(
    device: &Device,
    config: &StreamConfig,
    channels: usize,
    voices: Arc<Mutex<VoiceManager>>,
    clock: AudioClock,
) -> Result<Stream, AudioError>
where
    T: SizedSample + FromSample<f32> + Send + 'static,
{
    let channels = channels.max(1);
    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                let mut vm = voices.lock().unwrap_or_else(PoisonError::into_inner);
                let mut frames = 0;
                for frame in data.chunks_mut(channels) {
                    let value = vm.next_sample();
                    for sample in frame.iter_mut() {
                        *sample = Sample::from_sample::<f32>(value);
                    }
                    frames += 1;
                }
                clock.advance(frames);
            },
            |err| log::error!("audio stream error: {}", err),
            None,
        )
        .map_err(|e| AudioError::BuildStream(e.to_string()))
}

/// Pause/resume handle around a running stream
pub fn set_stream_running(stream: &Stream, running: bool) -> Result<(), AudioError> {
    let result = if running { stream.play() } else { stream.pause() };
    result.map_err(|e| AudioError::Stream(e.to_string()))
}
