/// Background music controller
///
/// One controller is built at startup and owned by the application. It
/// tracks what the user asked for (playing or not, which track) and drives
/// an `AudioSink` that does the actual output. Track bytes are fetched by the
/// caller: starting playback of a track that is not loaded yet hands back the
/// track name, and the bytes come back through `track_fetched`.

use tracing::{debug, warn};

use crate::error::{ApiError, AudioError};

/// The audio output the controller drives
pub trait AudioSink {
    /// Currently assigned source URL, if any
    fn source(&self) -> Option<&str>;
    /// Assign a new source, dropping anything queued for the old one
    fn set_source(&mut self, url: String);
    /// Whether decoded audio for the current source is queued
    fn is_loaded(&self) -> bool;
    /// Decode track bytes for the current source and queue them, paused
    fn load(&mut self, bytes: Vec<u8>) -> Result<(), AudioError>;
    fn play(&mut self) -> Result<(), AudioError>;
    fn pause(&mut self);
    /// Seek back to the start of the current source
    fn rewind(&mut self);
    fn set_volume(&mut self, volume: f32);
    fn set_looping(&mut self, looping: bool);
}

pub struct AudioController<S: AudioSink> {
    sink: S,
    /// Base URL tracks are served from ("{api}/api/images")
    track_base: String,
    is_playing: bool,
    track_list: Vec<String>,
    current_track: Option<String>,
    /// Track whose bytes are being fetched
    pending: Option<String>,
}

impl<S: AudioSink> AudioController<S> {
    pub fn new(mut sink: S, api_url: &str, volume: f32) -> Self {
        sink.set_looping(true);
        sink.set_volume(volume);

        Self {
            sink,
            track_base: format!("{}/api/images", api_url.trim_end_matches('/')),
            is_playing: false,
            track_list: Vec::new(),
            current_track: None,
            pending: None,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn track_list(&self) -> &[String] {
        &self.track_list
    }

    pub fn current_track(&self) -> Option<&String> {
        self.current_track.as_ref()
    }

    #[cfg(test)]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Store a freshly fetched track list. The first track becomes current
    /// unless a still-listed track is already selected.
    pub fn tracks_loaded(&mut self, tracks: Vec<String>) {
        debug!("Loaded {} music tracks", tracks.len());

        let keep_current = self
            .current_track
            .as_ref()
            .is_some_and(|current| tracks.contains(current));
        if !keep_current {
            self.current_track = tracks.first().cloned();
        }
        self.track_list = tracks;
    }

    /// Pause when playing, start otherwise. Returns the track to fetch when
    /// its audio is not loaded yet.
    #[must_use]
    pub fn toggle_music(&mut self) -> Option<String> {
        if self.is_playing {
            self.sink.pause();
            self.is_playing = false;
            return None;
        }

        if let Some(url) = self.current_track.as_deref().map(|t| self.track_url(t)) {
            if self.sink.source() != Some(url.as_str()) {
                self.sink.set_source(url);
                self.pending = None;
            }
        }

        self.is_playing = true;
        self.start()
    }

    /// Switch tracks, resuming only if music was playing. Returns the track
    /// to fetch when playback has to wait for it.
    #[must_use]
    pub fn change_music(&mut self, track: String) -> Option<String> {
        let was_playing = self.is_playing;
        if was_playing {
            self.sink.pause();
        }

        let url = self.track_url(&track);
        self.current_track = Some(track);
        self.sink.set_source(url);
        self.pending = None;

        if was_playing {
            self.start()
        } else {
            None
        }
    }

    /// Bytes (or the failure) of a fetch handed out by `toggle_music` or
    /// `change_music`. Results for a track that is no longer wanted are
    /// dropped.
    pub fn track_fetched(&mut self, track: &str, result: Result<Vec<u8>, ApiError>) {
        if self.pending.as_deref() != Some(track) {
            debug!("Dropping superseded track {track}");
            return;
        }
        self.pending = None;

        let loaded = result
            .map_err(|e| AudioError::Stream(e.to_string()))
            .and_then(|bytes| self.sink.load(bytes));

        match loaded {
            Ok(()) if self.is_playing => self.play_now(),
            Ok(()) => debug!("Track {track} loaded while paused"),
            Err(e) => {
                warn!("Could not load track {track}: {e}");
                self.is_playing = false;
            }
        }
    }

    /// Pause, rewind and mark stopped, whatever the current state
    pub fn stop_music(&mut self) {
        self.sink.pause();
        self.sink.rewind();
        self.is_playing = false;
    }

    /// Play right away if the audio is queued, otherwise ask for it
    fn start(&mut self) -> Option<String> {
        let Some(track) = self.current_track.clone() else {
            self.play_now();
            return None;
        };
        if self.sink.is_loaded() {
            self.play_now();
            return None;
        }
        if self.pending.as_ref() == Some(&track) {
            return None;
        }

        self.pending = Some(track.clone());
        Some(track)
    }

    fn play_now(&mut self) {
        if let Err(e) = self.sink.play() {
            warn!("Playback did not start: {e}");
            self.is_playing = false;
        }
    }

    fn track_url(&self, track: &str) -> String {
        format!("{}/{}", self.track_base, urlencoding::encode(track))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Records every call so tests can assert on what reached the output
    #[derive(Debug, Default)]
    pub struct FakeSink {
        pub source: Option<String>,
        pub calls: Vec<String>,
        pub fail_play: bool,
        pub fail_load: bool,
        pub loaded: bool,
        pub playing: bool,
        pub volume: f32,
        pub looping: bool,
    }

    impl AudioSink for FakeSink {
        fn source(&self) -> Option<&str> {
            self.source.as_deref()
        }

        fn set_source(&mut self, url: String) {
            self.calls.push(format!("source {url}"));
            self.source = Some(url);
            self.loaded = false;
            self.playing = false;
        }

        fn is_loaded(&self) -> bool {
            self.loaded
        }

        fn load(&mut self, bytes: Vec<u8>) -> Result<(), AudioError> {
            self.calls.push(format!("load {}", bytes.len()));
            if self.fail_load {
                return Err(AudioError::Stream("not audio".into()));
            }
            self.loaded = true;
            Ok(())
        }

        fn play(&mut self) -> Result<(), AudioError> {
            self.calls.push("play".into());
            if self.fail_play {
                return Err(AudioError::NoOutputDevice);
            }
            self.playing = true;
            Ok(())
        }

        fn pause(&mut self) {
            self.calls.push("pause".into());
            self.playing = false;
        }

        fn rewind(&mut self) {
            self.calls.push("rewind".into());
        }

        fn set_volume(&mut self, volume: f32) {
            self.volume = volume;
        }

        fn set_looping(&mut self, looping: bool) {
            self.looping = looping;
        }
    }

    pub fn controller() -> AudioController<FakeSink> {
        AudioController::new(FakeSink::default(), "http://localhost:8080", 0.3)
    }

    /// Start playback and deliver the requested track
    pub fn playing(audio: &mut AudioController<FakeSink>) {
        if let Some(track) = audio.toggle_music() {
            audio.track_fetched(&track, Ok(vec![0; 8]));
        }
    }

    #[test]
    fn test_new_sets_loop_and_volume() {
        let audio = controller();
        assert!(audio.sink().looping);
        assert_eq!(audio.sink().volume, 0.3);
        assert!(!audio.is_playing());
    }

    #[test]
    fn test_first_track_becomes_current() {
        let mut audio = controller();
        audio.tracks_loaded(vec!["song_1.mp3".into(), "song_2.mp3".into()]);
        assert_eq!(audio.current_track().map(String::as_str), Some("song_1.mp3"));
    }

    #[test]
    fn test_reload_keeps_selected_track_if_still_listed() {
        let mut audio = controller();
        audio.tracks_loaded(vec!["a.mp3".into(), "b.mp3".into()]);
        assert_eq!(audio.change_music("b.mp3".into()), None);

        audio.tracks_loaded(vec!["a.mp3".into(), "b.mp3".into()]);
        assert_eq!(audio.current_track().map(String::as_str), Some("b.mp3"));

        audio.tracks_loaded(vec!["c.mp3".into()]);
        assert_eq!(audio.current_track().map(String::as_str), Some("c.mp3"));
    }

    #[test]
    fn test_toggle_fetches_then_plays() {
        let mut audio = controller();
        audio.tracks_loaded(vec!["our song.mp3".into()]);

        assert_eq!(audio.toggle_music().as_deref(), Some("our song.mp3"));
        assert!(audio.is_playing());
        assert!(!audio.sink().playing);
        assert_eq!(
            audio.sink().source.as_deref(),
            Some("http://localhost:8080/api/images/our%20song.mp3")
        );

        audio.track_fetched("our song.mp3", Ok(vec![1, 2, 3]));
        assert!(audio.sink().playing);
        assert!(audio.is_playing());
    }

    #[test]
    fn test_loaded_track_is_not_fetched_again() {
        let mut audio = controller();
        audio.tracks_loaded(vec!["a.mp3".into()]);
        playing(&mut audio);

        assert_eq!(audio.toggle_music(), None);
        assert!(!audio.is_playing());

        assert_eq!(audio.toggle_music(), None);
        assert!(audio.sink().playing);
        let source_sets = audio
            .sink()
            .calls
            .iter()
            .filter(|c| c.starts_with("source"))
            .count();
        assert_eq!(source_sets, 1);
    }

    #[test]
    fn test_failed_play_reverts_state() {
        let mut audio = AudioController::new(
            FakeSink { fail_play: true, ..FakeSink::default() },
            "http://localhost:8080",
            0.3,
        );
        audio.tracks_loaded(vec!["a.mp3".into()]);

        playing(&mut audio);
        assert!(!audio.is_playing());
    }

    #[test]
    fn test_failed_fetch_reverts_and_next_toggle_retries() {
        let mut audio = controller();
        audio.tracks_loaded(vec!["a.mp3".into()]);

        let track = audio.toggle_music();
        assert_eq!(track.as_deref(), Some("a.mp3"));
        audio.track_fetched("a.mp3", Err(ApiError::Transport("connection reset".into())));
        assert!(!audio.is_playing());
        assert!(!audio.sink().calls.contains(&"play".to_string()));

        assert_eq!(audio.toggle_music().as_deref(), Some("a.mp3"));
        audio.track_fetched("a.mp3", Ok(vec![0; 4]));
        assert!(audio.is_playing());
        assert!(audio.sink().playing);
    }

    #[test]
    fn test_undecodable_track_reverts_and_retries() {
        let mut audio = AudioController::new(
            FakeSink { fail_load: true, ..FakeSink::default() },
            "http://localhost:8080",
            0.3,
        );
        audio.tracks_loaded(vec!["a.mp3".into()]);

        playing(&mut audio);
        assert!(!audio.is_playing());
        assert_eq!(audio.toggle_music().as_deref(), Some("a.mp3"));
    }

    #[test]
    fn test_toggle_while_fetching_does_not_refetch() {
        let mut audio = controller();
        audio.tracks_loaded(vec!["a.mp3".into()]);

        assert!(audio.toggle_music().is_some());
        assert_eq!(audio.toggle_music(), None);
        assert_eq!(audio.toggle_music(), None);

        audio.track_fetched("a.mp3", Ok(vec![0; 4]));
        assert!(audio.sink().playing);
    }

    #[test]
    fn test_track_arriving_after_pause_stays_paused() {
        let mut audio = controller();
        audio.tracks_loaded(vec!["a.mp3".into()]);

        assert!(audio.toggle_music().is_some());
        audio.stop_music();
        audio.track_fetched("a.mp3", Ok(vec![0; 4]));

        assert!(!audio.is_playing());
        assert!(!audio.sink().playing);
        assert!(audio.sink().loaded);
    }

    #[test]
    fn test_superseded_fetch_is_dropped() {
        let mut audio = controller();
        audio.tracks_loaded(vec!["a.mp3".into(), "b.mp3".into()]);

        assert_eq!(audio.toggle_music().as_deref(), Some("a.mp3"));
        assert_eq!(audio.change_music("b.mp3".into()).as_deref(), Some("b.mp3"));

        audio.track_fetched("a.mp3", Ok(vec![0; 4]));
        assert!(!audio.sink().loaded);

        audio.track_fetched("b.mp3", Ok(vec![0; 4]));
        assert!(audio.sink().playing);
        assert_eq!(
            audio.sink().source.as_deref(),
            Some("http://localhost:8080/api/images/b.mp3")
        );
    }

    #[test]
    fn test_change_music_while_paused_stays_paused() {
        let mut audio = controller();
        audio.tracks_loaded(vec!["a.mp3".into(), "b.mp3".into()]);

        assert_eq!(audio.change_music("b.mp3".into()), None);
        assert!(!audio.is_playing());
        assert!(!audio.sink().calls.contains(&"play".to_string()));
        assert_eq!(audio.current_track().map(String::as_str), Some("b.mp3"));
    }

    #[test]
    fn test_stop_is_unconditional() {
        let mut audio = controller();
        audio.stop_music();
        assert!(!audio.is_playing());
        assert_eq!(audio.sink().calls, vec!["pause", "rewind"]);

        audio.tracks_loaded(vec!["a.mp3".into()]);
        playing(&mut audio);
        audio.stop_music();
        assert!(!audio.is_playing());
        assert!(!audio.sink().playing);
    }

    #[test]
    fn test_toggle_without_tracks_still_asks_sink() {
        let mut audio = controller();
        assert_eq!(audio.toggle_music(), None);
        assert_eq!(audio.sink().calls, vec!["play"]);
        assert!(audio.sink().source.is_none());
    }
}
