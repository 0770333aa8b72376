//! Playback engine interface.
//!
//! Decoding and output are somebody else's job; the dashboard only drives an
//! engine through this trait when one is installed. Without an engine the
//! transport is purely cosmetic.

use thiserror::Error;

/// Opaque handle to a loaded resource, issued by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlaybackHandle(pub u64);

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("failed to load {0:?}")]
    Load(String),
    #[error("engine error: {0}")]
    Engine(String),
}

pub trait PlaybackEngine: Send {
    fn load(&mut self, resource: &str) -> Result<PlaybackHandle, PlaybackError>;
    fn play(&mut self, handle: PlaybackHandle) -> Result<(), PlaybackError>;
    fn pause(&mut self, handle: PlaybackHandle) -> Result<(), PlaybackError>;
    fn seek(&mut self, handle: PlaybackHandle, secs: u32) -> Result<(), PlaybackError>;
    fn set_volume(&mut self, handle: PlaybackHandle, volume: f32) -> Result<(), PlaybackError>;
}
