/// Audio output for background music
///
/// Track bytes arrive from the API client, are decoded with rodio and queued
/// on a single sink that stays paused until asked to play.

use std::io::Cursor;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};
use tracing::{debug, info, warn};

use crate::error::AudioError;
use crate::state::audio::AudioSink;

struct Output {
    // Dropping the stream silences the sink, so it lives as long as we do
    _stream: OutputStream,
    sink: Sink,
}

pub struct RodioSink {
    output: Option<Output>,
    source: Option<String>,
    /// Whether decoded audio for `source` is queued
    loaded: bool,
    looping: bool,
}

impl RodioSink {
    /// Opens the default output device. Without one the sink still works,
    /// it just refuses to play.
    pub fn open() -> Self {
        let output = match OutputStream::try_default() {
            Ok((stream, handle)) => match Sink::try_new(&handle) {
                Ok(sink) => {
                    sink.pause();
                    info!("🎵 Audio output ready");
                    Some(Output { _stream: stream, sink })
                }
                Err(e) => {
                    warn!("Could not create audio sink: {e}");
                    None
                }
            },
            Err(e) => {
                warn!("No audio output device: {e}");
                None
            }
        };

        Self {
            output,
            source: None,
            loaded: false,
            looping: false,
        }
    }
}

impl AudioSink for RodioSink {
    fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    fn set_source(&mut self, url: String) {
        if let Some(output) = &self.output {
            output.sink.clear();
        }
        self.source = Some(url);
        self.loaded = false;
    }

    fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn load(&mut self, bytes: Vec<u8>) -> Result<(), AudioError> {
        let output = self.output.as_ref().ok_or(AudioError::NoOutputDevice)?;
        let decoder =
            Decoder::new(Cursor::new(bytes)).map_err(|e| AudioError::Stream(e.to_string()))?;

        // clear() also pauses, so the queued track waits for play()
        output.sink.clear();
        if self.looping {
            output.sink.append(decoder.repeat_infinite());
        } else {
            output.sink.append(decoder);
        }
        self.loaded = true;

        debug!("Queued {}", self.source.as_deref().unwrap_or("track"));
        Ok(())
    }

    fn play(&mut self) -> Result<(), AudioError> {
        let output = self.output.as_ref().ok_or(AudioError::NoOutputDevice)?;
        if self.source.is_none() {
            return Err(AudioError::NoSource);
        }
        if !self.loaded {
            return Err(AudioError::NotLoaded);
        }

        output.sink.play();
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(output) = &self.output {
            output.sink.pause();
        }
    }

    fn rewind(&mut self) {
        if let Some(output) = &self.output {
            if let Err(e) = output.sink.try_seek(Duration::ZERO) {
                debug!("Rewind not supported for current track: {e}");
            }
        }
    }

    fn set_volume(&mut self, volume: f32) {
        if let Some(output) = &self.output {
            output.sink.set_volume(volume);
        }
    }

    fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }
}
