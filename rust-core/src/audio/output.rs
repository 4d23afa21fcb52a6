//! Audio output playback using cpal
//!
//! The output callback is the engine's real-time context: it pulls captured
//! frames from the ring buffer, runs the block processor over them and plays
//! the result with the test tone mixed in.

use super::buffer::AudioConsumer;
use super::input::AudioDeviceInfo;
use super::processor::SpectrumProcessor;
use crate::error::AudioError;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, Stream, StreamConfig};

/// Frames handled per pass inside one callback
const CALLBACK_CHUNK_FRAMES: usize = 1024;

/// Input channels deinterleaved for analysis
const MAX_ANALYZED_CHANNELS: usize = 2;

/// Preallocated state owned by the output callback
struct OutputCallback {
    processor: SpectrumProcessor,
    consumer: AudioConsumer,
    sample_rate: f64,
    out_channels: usize,

    /// Interleaved input frames for one chunk
    input: Vec<f32>,

    /// Planar working buffers, one per analyzed input channel
    planar: Vec<Vec<f32>>,
}

impl OutputCallback {
    fn new(
        processor: SpectrumProcessor,
        consumer: AudioConsumer,
        sample_rate: f64,
        out_channels: usize,
    ) -> Self {
        let in_channels = consumer.channels();
        let analyzed = in_channels.min(MAX_ANALYZED_CHANNELS);
        Self {
            processor,
            consumer,
            sample_rate,
            out_channels: out_channels.max(1),
            input: vec![0.0; CALLBACK_CHUNK_FRAMES * in_channels],
            planar: vec![vec![0.0; CALLBACK_CHUNK_FRAMES]; analyzed],
        }
    }

    fn render(&mut self, data: &mut [f32]) {
        let out_channels = self.out_channels;
        let in_channels = self.consumer.channels();
        let analyzed = self.planar.len();

        for out_chunk in data.chunks_mut(CALLBACK_CHUNK_FRAMES * out_channels) {
            let frames = out_chunk.len() / out_channels;
            let input = &mut self.input[..frames * in_channels];
            self.consumer.read_frames(input);

            // Input layout decides what is analyzed, independent of the outputs
            for (ch, planar) in self.planar.iter_mut().enumerate() {
                for (frame, dst) in planar[..frames].iter_mut().enumerate() {
                    *dst = input[frame * in_channels + ch];
                }
            }

            self.processor
                .process_block(&mut self.planar[..], frames, self.sample_rate);

            let planar = &self.planar;
            for (frame, out_frame) in out_chunk.chunks_mut(out_channels).enumerate() {
                if out_channels < analyzed {
                    // Fold the processed channels down onto a narrower output
                    let sum: f32 = planar.iter().map(|c| c[frame]).sum();
                    out_frame.fill(sum / analyzed as f32);
                } else {
                    for (ch, sample) in out_frame.iter_mut().enumerate() {
                        *sample = planar[ch.min(analyzed - 1)][frame];
                    }
                }
            }
        }
    }
}

/// Audio output stream
pub struct AudioOutput {
    stream: Stream,
    device_info: AudioDeviceInfo,
}

/// Default output device and its stream config, before a stream is built
pub fn default_output() -> Result<(Device, AudioDeviceInfo, StreamConfig), AudioError> {
    let host = cpal::default_host();
    let device = host.default_output_device().ok_or(AudioError::NoDevice)?;

    let name = device
        .name()
        .map_err(|e| AudioError::DeviceName(e.to_string()))?;

    let config = device
        .default_output_config()
        .map_err(|e| AudioError::DefaultConfig(e.to_string()))?;

    if config.sample_format() != SampleFormat::F32 {
        return Err(AudioError::UnsupportedFormat(format!("{:?}", config.sample_format())));
    }

    let device_info = AudioDeviceInfo {
        name,
        sample_rate: config.sample_rate().0,
        channels: config.channels(),
    };

    Ok((device, device_info, config.into()))
}

impl AudioOutput {
    /// Build a playback stream on `device` that drives `processor`
    ///
    /// # Arguments
    /// * `consumer` - Ring buffer consumer for captured input frames
    /// * `processor` - Engine, moved into the callback
    pub fn from_device(
        device: &Device,
        device_info: AudioDeviceInfo,
        config: &StreamConfig,
        consumer: AudioConsumer,
        processor: SpectrumProcessor,
    ) -> Result<Self, AudioError> {
        let mut callback = OutputCallback::new(
            processor,
            consumer,
            device_info.sample_rate as f64,
            device_info.channels as usize,
        );

        let stream = device
            .build_output_stream(
                config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    callback.render(data);
                },
                move |err| {
                    log::error!("Audio output error: {}", err);
                },
                None,
            )
            .map_err(|e| AudioError::BuildStream(e.to_string()))?;

        Ok(Self { stream, device_info })
    }

    /// Start playing audio
    pub fn start(&self) -> Result<(), AudioError> {
        self.stream
            .play()
            .map_err(|e| AudioError::PlayStream(e.to_string()))
    }

    /// Pause audio playback
    pub fn pause(&self) -> Result<(), AudioError> {
        self.stream
            .pause()
            .map_err(|e| AudioError::PlayStream(e.to_string()))
    }

    /// Get device information
    pub fn device_info(&self) -> &AudioDeviceInfo {
        &self.device_info
    }
}

/// List available audio output devices
pub fn list_output_devices() -> Result<Vec<AudioDeviceInfo>, AudioError> {
    let host = cpal::default_host();
    let mut devices = Vec::new();

    let device_iter = host
        .output_devices()
        .map_err(|e| AudioError::DeviceName(e.to_string()))?;

    for device in device_iter {
        if let (Ok(name), Ok(config)) = (device.name(), device.default_output_config()) {
            devices.push(AudioDeviceInfo {
                name,
                sample_rate: config.sample_rate().0,
                channels: config.channels(),
            });
        }
    }

    Ok(devices)
}
