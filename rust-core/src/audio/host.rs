//! Standalone host: default input → engine → default output

use super::buffer::AudioRingBuffer;
use super::input::{default_input, AudioDeviceInfo, AudioInput};
use super::output::{default_output, AudioOutput};
use super::processor::{SpectrumHandle, SpectrumProcessor};
use crate::config::EngineConfig;
use crate::error::{validate_sample_rate, AudioError};

/// Captured frames buffered between the input and output callbacks
const RING_FRAMES: usize = 16384;

/// Running duplex stream pair with the engine inside the output callback
pub struct LiveHost {
    input: AudioInput,
    output: AudioOutput,
    handle: SpectrumHandle,
}

impl LiveHost {
    /// Open the default devices and start streaming
    ///
    /// The engine runs at the output device's rate; `config.sample_rate` is
    /// ignored.
    pub fn start(config: EngineConfig) -> Result<Self, AudioError> {
        let (in_device, in_info, in_config) = default_input()?;
        let (out_device, out_info, out_config) = default_output()?;

        let sample_rate = validate_sample_rate(out_info.sample_rate as f64)?;
        if in_info.sample_rate != out_info.sample_rate {
            log::warn!(
                "Input runs at {} Hz, output at {} Hz; input will drift",
                in_info.sample_rate,
                out_info.sample_rate
            );
        }

        let processor = SpectrumProcessor::new(EngineConfig {
            sample_rate,
            ..config
        });
        let handle = processor.handle();

        let rb = AudioRingBuffer::new(RING_FRAMES, in_info.channels as usize);
        let (producer, consumer) = rb.split();

        let input = AudioInput::from_device(&in_device, in_info, &in_config, producer)?;
        let output = AudioOutput::from_device(&out_device, out_info, &out_config, consumer, processor)?;

        input.start()?;
        output.start()?;

        log::info!(
            "Streaming '{}' -> '{}' at {} Hz",
            input.device_info().name,
            output.device_info().name,
            sample_rate
        );

        Ok(Self {
            input,
            output,
            handle,
        })
    }

    /// Consumer handle for the running engine
    pub fn handle(&self) -> &SpectrumHandle {
        &self.handle
    }

    pub fn input_info(&self) -> &AudioDeviceInfo {
        self.input.device_info()
    }

    pub fn output_info(&self) -> &AudioDeviceInfo {
        self.output.device_info()
    }

    /// Pause both streams
    pub fn stop(&self) {
        if let Err(e) = self.input.pause() {
            log::warn!("Failed to pause input: {}", e);
        }
        if let Err(e) = self.output.pause() {
            log::warn!("Failed to pause output: {}", e);
        }
    }
}

impl Drop for LiveHost {
    fn drop(&mut self) {
        self.stop();
    }
}
