//! Sound player implementation using rodio.
//!
//! This module provides the `RodioSoundPlayer` which uses the rodio v0.20
//! audio library for cross-platform sound playback.

use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamHandle, Sink};
use tracing::{debug, info, warn};

use super::error::SoundError;
use super::tone::{Tone, TONE_SAMPLE_RATE};

/// A sound player that uses rodio for audio playback.
///
/// The output stream is not `Send`; the player lives on the thread that
/// created it. Playback is non-blocking: tones continue playing in the
/// background after `play_tone` returns.
pub struct RodioSoundPlayer {
    /// The audio output stream (must be kept alive for playback).
    _stream: OutputStream,
    /// Handle to the output stream for creating sinks.
    stream_handle: OutputStreamHandle,
}

impl RodioSoundPlayer {
    /// Opens the default audio output device.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::DeviceNotAvailable` if no audio output device
    /// is available.
    pub fn new() -> Result<Self, SoundError> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| SoundError::DeviceNotAvailable(e.to_string()))?;

        debug!("Audio output stream initialized");

        Ok(Self {
            _stream: stream,
            stream_handle,
        })
    }

    /// Plays `tone` without waiting for it to finish.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::StreamError` if no sink can be attached to the
    /// output stream.
    pub fn play_tone(&self, tone: &Tone) -> Result<(), SoundError> {
        let sink = Sink::try_new(&self.stream_handle)
            .map_err(|e| SoundError::StreamError(e.to_string()))?;

        sink.append(SamplesBuffer::new(1, TONE_SAMPLE_RATE, tone.render()));
        sink.detach(); // Non-blocking: sound continues after function returns

        debug!("Tone playback started ({} Hz)", tone.frequency);
        Ok(())
    }
}

impl std::fmt::Debug for RodioSoundPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioSoundPlayer").finish_non_exhaustive()
    }
}

/// Creates a sound player, returning None if audio is unavailable.
///
/// A missing output device is expected on headless machines and is logged
/// at `info`; any other failure is logged as a warning.
#[must_use]
pub fn try_create_player() -> Option<RodioSoundPlayer> {
    player_or_log(RodioSoundPlayer::new())
}

fn player_or_log(result: Result<RodioSoundPlayer, SoundError>) -> Option<RodioSoundPlayer> {
    match result {
        Ok(player) => Some(player),
        Err(e) if e.is_device_error() => {
            info!("No audio output, sound disabled: {} ({})", e, e.suggestion());
            None
        }
        Err(e) => {
            warn!("Audio not available, sound disabled: {} ({})", e, e.suggestion());
            None
        }
    }
}
