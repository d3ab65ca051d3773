//! Sound system
//!
//! The runtime only needs the audio device opened, checked once per frame
//! and closed again. Mixing is left to whatever sits behind the trait.
//!
//! - Native: cpal output stream (silence for now)
//! - Tests and headless runs: [`NullSound`]

use crate::error::CoreError;

pub trait SoundSystem {
    fn init(&mut self) -> Result<(), CoreError>;

    /// Called once per frame; an error here stops the frame loop.
    fn update(&mut self) -> Result<(), CoreError>;

    fn shutdown(&mut self) -> Result<(), CoreError>;
}

/// Does nothing and never fails.
#[derive(Debug, Default)]
pub struct NullSound {
    pub updates: u32,
}

impl SoundSystem for NullSound {
    fn init(&mut self) -> Result<(), CoreError> {
        Ok(())
    }

    fn update(&mut self) -> Result<(), CoreError> {
        self.updates += 1;
        Ok(())
    }

    fn shutdown(&mut self) -> Result<(), CoreError> {
        Ok(())
    }
}

// =============================================================================
// Native audio output using cpal
// =============================================================================

#[cfg(not(target_arch = "wasm32"))]
pub use native::DeviceSound;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
    use cpal::{SampleRate, Stream, StreamConfig};
    use log::{error, info};

    use super::SoundSystem;
    use crate::error::CoreError;

    const SAMPLE_RATE: u32 = 44100;

    /// Default output device playing a silent stereo stream. Errors raised
    /// on the audio thread set a shared flag that `update` reports.
    #[derive(Default)]
    pub struct DeviceSound {
        stream: Option<Stream>,
        failed: Arc<AtomicBool>,
    }

    impl DeviceSound {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl SoundSystem for DeviceSound {
        fn init(&mut self) -> Result<(), CoreError> {
            let host = cpal::default_host();
            let device = host
                .default_output_device()
                .ok_or_else(|| CoreError::Sound("no audio output device".to_string()))?;

            let config = StreamConfig {
                channels: 2,
                sample_rate: SampleRate(SAMPLE_RATE),
                buffer_size: cpal::BufferSize::Default,
            };

            let failed = Arc::clone(&self.failed);
            let stream = device
                .build_output_stream(
                    &config,
                    move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                        data.fill(0.0);
                    },
                    move |err| {
                        error!("audio stream error: {}", err);
                        failed.store(true, Ordering::Relaxed);
                    },
                    None,
                )
                .map_err(|e| CoreError::Sound(e.to_string()))?;
            stream.play().map_err(|e| CoreError::Sound(e.to_string()))?;

            info!(
                "audio: {} at {} Hz",
                device.name().unwrap_or_else(|_| "unknown device".to_string()),
                SAMPLE_RATE
            );
            self.stream = Some(stream);
            Ok(())
        }

        fn update(&mut self) -> Result<(), CoreError> {
            if self.failed.load(Ordering::Relaxed) {
                return Err(CoreError::Sound("audio stream reported an error".to_string()));
            }
            Ok(())
        }

        fn shutdown(&mut self) -> Result<(), CoreError> {
            if let Some(stream) = self.stream.take() {
                stream.pause().map_err(|e| CoreError::Sound(e.to_string()))?;
            }
            Ok(())
        }
    }
}
