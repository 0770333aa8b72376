//! Audio transport for the selected call: play/pause, volume and seek.
//!
//! Without a [`PlaybackEngine`] the controller is purely cosmetic: state
//! flips and clamps exactly the same way, nothing is played. With an engine,
//! every change is pushed to it and engine failures are logged, never raised.

use advisor_proto::config::TransportConfig;
use advisor_proto::playback::{PlaybackEngine, PlaybackHandle};
use tracing::{debug, warn};

pub const UNAVAILABLE_NOTICE: &str = "Audio playback is not available for this earnings call.";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransportState {
    pub is_playing: bool,
    pub volume: f32,
    pub position_secs: u32,
}

pub struct TransportController {
    state: TransportState,
    duration_secs: u32,
    visible: bool,
    resource: Option<String>,
    engine: Option<Box<dyn PlaybackEngine>>,
    handle: Option<PlaybackHandle>,
}

impl TransportController {
    pub fn new(cfg: &TransportConfig) -> Self {
        Self {
            state: TransportState {
                is_playing: false,
                volume: clamp_volume(cfg.default_volume).unwrap_or(0.5),
                position_secs: 0,
            },
            duration_secs: cfg.duration_secs,
            visible: false,
            resource: None,
            engine: None,
            handle: None,
        }
    }

    pub fn with_engine(mut self, engine: Option<Box<dyn PlaybackEngine>>) -> Self {
        self.engine = engine;
        self
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    pub fn volume(&self) -> f32 {
        self.state.volume
    }

    pub fn position_secs(&self) -> u32 {
        self.state.position_secs
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn has_engine(&self) -> bool {
        self.engine.is_some()
    }

    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    /// Returns true when `is_playing` flipped.
    pub fn toggle_play(&mut self) -> bool {
        let Some(engine) = self.engine.as_mut() else {
            self.state.is_playing = !self.state.is_playing;
            return true;
        };
        let Some(handle) = self.handle else {
            debug!("transport: no playable resource bound, play ignored");
            return false;
        };

        let playing = !self.state.is_playing;
        let result = if playing {
            engine.play(handle)
        } else {
            engine.pause(handle)
        };
        if let Err(e) = result {
            warn!("transport: engine refused play/pause: {}", e);
        }
        self.state.is_playing = playing;
        true
    }

    /// Clamps to 0.0..=1.0. NaN leaves the volume unchanged.
    pub fn set_volume(&mut self, volume: f32) {
        let Some(volume) = clamp_volume(volume) else {
            debug!("transport: NaN volume ignored");
            return;
        };
        self.state.volume = volume;
        self.push(|engine, handle, state| engine.set_volume(handle, state.volume));
    }

    pub fn seek(&mut self, position_secs: i64) {
        let clamped = position_secs.clamp(0, self.duration_secs as i64) as u32;
        self.state.position_secs = clamped;
        self.push(|engine, handle, state| engine.seek(handle, state.position_secs));
    }

    pub fn seek_relative(&mut self, delta_secs: i64) {
        self.seek(self.state.position_secs as i64 + delta_secs);
    }

    /// Show/hide the panel. Playback state is untouched.
    pub fn toggle_visible(&mut self) {
        self.visible = !self.visible;
    }

    /// Point the transport at another call's audio. Play state, volume and
    /// position carry over.
    pub fn bind_resource(&mut self, resource: Option<String>) {
        if self.resource == resource {
            return;
        }
        debug!("transport: bind {:?}", resource);
        self.resource = resource;
        self.handle = None;

        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        let Some(resource) = self.resource.as_deref() else {
            return;
        };
        match engine.load(resource) {
            Ok(handle) => {
                self.handle = Some(handle);
                self.push(|engine, handle, state| {
                    engine.set_volume(handle, state.volume)?;
                    engine.seek(handle, state.position_secs)?;
                    if state.is_playing {
                        engine.play(handle)?;
                    }
                    Ok(())
                });
            }
            Err(e) => warn!("transport: {}", e),
        }
    }

    fn push(
        &mut self,
        f: impl FnOnce(
            &mut dyn PlaybackEngine,
            PlaybackHandle,
            TransportState,
        ) -> Result<(), advisor_proto::playback::PlaybackError>,
    ) {
        if let (Some(engine), Some(handle)) = (self.engine.as_mut(), self.handle) {
            if let Err(e) = f(engine.as_mut(), handle, self.state) {
                warn!("transport: engine error: {}", e);
            }
        }
    }
}

fn clamp_volume(volume: f32) -> Option<f32> {
    if volume.is_nan() {
        None
    } else {
        Some(volume.clamp(0.0, 1.0))
    }
}

/// Icon for the play/pause button: the action a press performs.
pub fn play_button_icon(is_playing: bool) -> &'static str {
    if is_playing {
        "⏸"
    } else {
        "▶"
    }
}

/// `M:SS`, minutes are not rolled into hours.
pub fn format_elapsed(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_proto::playback::PlaybackError;
    use std::sync::{Arc, Mutex};

    fn cosmetic() -> TransportController {
        TransportController::new(&TransportConfig::default())
    }

    /// Engine double that records every call it receives.
    #[derive(Clone, Default)]
    struct RecordingEngine {
        calls: Arc<Mutex<Vec<String>>>,
        fail_load: bool,
        fail_ops: bool,
    }

    impl RecordingEngine {
        fn log(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: String) -> Result<(), PlaybackError> {
            self.calls.lock().unwrap().push(call);
            if self.fail_ops {
                return Err(PlaybackError::Engine("device lost".into()));
            }
            Ok(())
        }
    }

    impl PlaybackEngine for RecordingEngine {
        fn load(&mut self, resource: &str) -> Result<PlaybackHandle, PlaybackError> {
            self.calls.lock().unwrap().push(format!("load {}", resource));
            if self.fail_load {
                return Err(PlaybackError::Load(resource.to_string()));
            }
            Ok(PlaybackHandle(7))
        }
        fn play(&mut self, _handle: PlaybackHandle) -> Result<(), PlaybackError> {
            self.record("play".into())
        }
        fn pause(&mut self, _handle: PlaybackHandle) -> Result<(), PlaybackError> {
            self.record("pause".into())
        }
        fn seek(&mut self, _handle: PlaybackHandle, secs: u32) -> Result<(), PlaybackError> {
            self.record(format!("seek {}", secs))
        }
        fn set_volume(&mut self, _handle: PlaybackHandle, volume: f32) -> Result<(), PlaybackError> {
            self.record(format!("volume {:.2}", volume))
        }
    }

    #[test]
    fn test_defaults() {
        let t = cosmetic();
        assert_eq!(
            t.state(),
            TransportState {
                is_playing: false,
                volume: 0.5,
                position_secs: 0
            }
        );
        assert_eq!(t.duration_secs(), 3600);
        assert!(!t.visible());
        assert!(!t.has_engine());
    }

    #[test]
    fn test_volume_is_clamped() {
        let mut t = cosmetic();
        t.set_volume(-1.0);
        assert_eq!(t.volume(), 0.0);
        t.set_volume(2.0);
        assert_eq!(t.volume(), 1.0);
        t.set_volume(0.3);
        assert_eq!(t.volume(), 0.3);
        t.set_volume(f32::NAN);
        assert_eq!(t.volume(), 0.3);
    }

    #[test]
    fn test_seek_is_clamped() {
        let mut t = cosmetic();
        t.seek(-5);
        assert_eq!(t.position_secs(), 0);
        t.seek(10_000);
        assert_eq!(t.position_secs(), 3600);
        t.seek(65);
        t.seek_relative(-30);
        assert_eq!(t.position_secs(), 35);
        t.seek_relative(-300);
        assert_eq!(t.position_secs(), 0);
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(0), "0:00");
        assert_eq!(format_elapsed(65), "1:05");
        assert_eq!(format_elapsed(125), "2:05");
        assert_eq!(format_elapsed(3600), "60:00");
    }

    #[test]
    fn test_visibility_leaves_playback_alone() {
        let mut t = cosmetic();
        t.toggle_play();
        t.set_volume(0.8);
        t.seek(120);
        let before = t.state();
        t.toggle_visible();
        assert!(t.visible());
        t.toggle_visible();
        assert!(!t.visible());
        assert_eq!(t.state(), before);
    }

    #[test]
    fn test_cosmetic_toggle_flips() {
        let mut t = cosmetic();
        assert!(t.toggle_play());
        assert!(t.is_playing());
        assert!(t.toggle_play());
        assert!(!t.is_playing());
    }

    #[test]
    fn test_rebinding_keeps_state() {
        let mut t = cosmetic();
        t.toggle_play();
        t.seek(300);
        let before = t.state();
        t.bind_resource(Some("Tech Corp.mp3".into()));
        assert_eq!(t.state(), before);
        assert_eq!(t.resource(), Some("Tech Corp.mp3"));
    }

    #[test]
    fn test_play_button_shows_next_action() {
        let mut t = cosmetic();
        assert_eq!(play_button_icon(t.is_playing()), "▶");
        t.toggle_play();
        assert_eq!(play_button_icon(t.is_playing()), "⏸");
    }

    #[test]
    fn test_engine_without_resource_ignores_play() {
        let engine = RecordingEngine::default();
        let mut t = cosmetic().with_engine(Some(Box::new(engine.clone())));
        assert!(!t.toggle_play());
        assert!(!t.is_playing());
        assert!(engine.log().is_empty());
    }

    #[test]
    fn test_engine_receives_state_on_bind() {
        let engine = RecordingEngine::default();
        let mut t = cosmetic().with_engine(Some(Box::new(engine.clone())));
        t.seek(90);
        t.bind_resource(Some("Innovation Labs.mp3".into()));
        assert!(t.toggle_play());
        t.set_volume(0.25);
        assert_eq!(
            engine.log(),
            vec![
                "load Innovation Labs.mp3",
                "volume 0.50",
                "seek 90",
                "play",
                "volume 0.25",
            ]
        );
    }

    #[test]
    fn test_engine_load_failure_is_not_fatal() {
        let engine = RecordingEngine {
            fail_load: true,
            ..Default::default()
        };
        let mut t = cosmetic().with_engine(Some(Box::new(engine.clone())));
        t.bind_resource(Some("Global Industries.mp3".into()));
        assert!(!t.toggle_play());
        assert_eq!(engine.log(), vec!["load Global Industries.mp3"]);
    }

    #[test]
    fn test_engine_errors_keep_view_state() {
        let engine = RecordingEngine {
            fail_ops: true,
            ..Default::default()
        };
        let mut t = cosmetic().with_engine(Some(Box::new(engine.clone())));
        t.bind_resource(Some("Tech Corp.mp3".into()));
        assert!(t.toggle_play());
        assert!(t.is_playing());
        t.set_volume(0.8);
        t.seek(30);
        assert_eq!(t.volume(), 0.8);
        assert_eq!(t.position_secs(), 30);
        // The bind-time push stops at the first refused call.
        assert_eq!(
            engine.log(),
            vec!["load Tech Corp.mp3", "volume 0.50", "play", "volume 0.80", "seek 30"]
        );
    }
}
