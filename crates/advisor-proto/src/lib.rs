pub mod config;
pub mod feed;
pub mod model;
pub mod platform;
pub mod playback;
pub mod provider;
