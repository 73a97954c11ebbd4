//! Playback engine: the controller state machine, track-list navigation,
//! the session minute meter, and the browser media-element binding.
//!
//! Everything here is plain state driven by events from the viewer shell;
//! the shell applies the returned commands to the media element and forwards
//! reports to the backend client.

pub mod media;
pub mod meter;
pub mod navigator;
pub mod session;

pub use meter::SessionMeter;
pub use session::{PlayerCommand, PlayerEvent, PlayerSession, PlayerState};

#[cfg(test)]
mod tests;
