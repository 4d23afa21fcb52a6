//! Audio input capture using cpal
//!
//! Captured interleaved frames go straight into the ring buffer; nothing is
//! converted or allocated in the callback.

use super::buffer::AudioProducer;
use crate::error::AudioError;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, Stream, StreamConfig};

/// Audio device information
#[derive(Debug, Clone)]
pub struct AudioDeviceInfo {
    pub name: String,
    pub sample_rate: u32,
    pub channels: u16,
}

/// Audio input stream
pub struct AudioInput {
    stream: Stream,
    device_info: AudioDeviceInfo,
}

/// Default input device and its stream config, before a stream is built
pub fn default_input() -> Result<(Device, AudioDeviceInfo, StreamConfig), AudioError> {
    let host = cpal::default_host();
    let device = host.default_input_device().ok_or(AudioError::NoDevice)?;

    let name = device
        .name()
        .map_err(|e| AudioError::DeviceName(e.to_string()))?;

    let config = device
        .default_input_config()
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

impl AudioInput {
    /// Build a capture stream on `device`
    ///
    /// # Arguments
    /// * `producer` - Ring buffer producer for captured frames
    pub fn from_device(
        device: &Device,
        device_info: AudioDeviceInfo,
        config: &StreamConfig,
        mut producer: AudioProducer,
    ) -> Result<Self, AudioError> {
        let stream = device
            .build_input_stream(
                config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    producer.write(data);
                },
                move |err| {
                    log::error!("Audio input error: {}", err);
                },
                None,
            )
            .map_err(|e| AudioError::BuildStream(e.to_string()))?;

        Ok(Self { stream, device_info })
    }

    /// Start capturing audio
    pub fn start(&self) -> Result<(), AudioError> {
        self.stream
            .play()
            .map_err(|e| AudioError::PlayStream(e.to_string()))
    }

    /// Pause audio capture
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

/// List available audio input devices
pub fn list_input_devices() -> Result<Vec<AudioDeviceInfo>, AudioError> {
    let host = cpal::default_host();
    let mut devices = Vec::new();

    let device_iter = host
        .input_devices()
        .map_err(|e| AudioError::DeviceName(e.to_string()))?;

    for device in device_iter {
        if let (Ok(name), Ok(config)) = (device.name(), device.default_input_config()) {
            devices.push(AudioDeviceInfo {
                name,
                sample_rate: config.sample_rate().0,
                channels: config.channels(),
            });
        }
    }

    Ok(devices)
}
