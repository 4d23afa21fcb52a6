//! Lock-free ring buffer carrying captured input to the output callback
//!
//! Single producer (input stream callback), single consumer (output stream
//! callback). Samples are interleaved f32 frames.

use ringbuf::{HeapConsumer, HeapProducer, HeapRb};

/// Interleaved sample ring between two audio callbacks
pub struct AudioRingBuffer {
    producer: HeapProducer<f32>,
    consumer: HeapConsumer<f32>,
    channels: usize,
}

impl AudioRingBuffer {
    /// Create a ring holding `frames` frames of `channels` interleaved samples
    pub fn new(frames: usize, channels: usize) -> Self {
        let channels = channels.max(1);
        let rb = HeapRb::<f32>::new(frames * channels);
        let (producer, consumer) = rb.split();

        Self {
            producer,
            consumer,
            channels,
        }
    }

    /// Split into producer and consumer ends
    pub fn split(self) -> (AudioProducer, AudioConsumer) {
        (
            AudioProducer {
                producer: self.producer,
                dropped: 0,
            },
            AudioConsumer {
                consumer: self.consumer,
                channels: self.channels,
            },
        )
    }
}

/// Writing end, owned by the input callback
pub struct AudioProducer {
    producer: HeapProducer<f32>,

    /// Samples lost because the consumer fell behind
    dropped: u64,
}

impl AudioProducer {
    /// Write samples; whatever does not fit is dropped and counted
    pub fn write(&mut self, samples: &[f32]) -> usize {
        let written = self.producer.push_slice(samples);
        self.dropped += (samples.len() - written) as u64;
        written
    }

    pub fn free_len(&self) -> usize {
        self.producer.free_len()
    }

    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

/// Reading end, owned by the output callback
pub struct AudioConsumer {
    consumer: HeapConsumer<f32>,
    channels: usize,
}

impl AudioConsumer {
    /// Read whole frames into `buffer`, zero-filling what is not available
    ///
    /// # Returns
    /// Number of frames actually read
    pub fn read_frames(&mut self, buffer: &mut [f32]) -> usize {
        let whole = buffer.len() - buffer.len() % self.channels;
        let available = self.consumer.len() - self.consumer.len() % self.channels;
        let n = whole.min(available);

        let read = self.consumer.pop_slice(&mut buffer[..n]);
        buffer[read..].fill(0.0);
        read / self.channels
    }

    /// Frames waiting to be read
    pub fn frames_available(&self) -> usize {
        self.consumer.len() / self.channels
    }

    pub fn channels(&self) -> usize {
        self.channels
    }
}
