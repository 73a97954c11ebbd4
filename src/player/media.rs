//! Browser media-element binding.
//!
//! Audio tracks share one hidden element appended to the document body;
//! video tracks use the element rendered by the player view. Either way the
//! controller only ever sees an `HtmlMediaElement`, and the shell applies
//! the controller's commands through [`apply`].

use crate::api::models::TrackKind;
use crate::player::session::PlayerCommand;

#[cfg(target_arch = "wasm32")]
use dioxus::prelude::spawn;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;
#[cfg(target_arch = "wasm32")]
use web_sys::{window, HtmlMediaElement};

pub const AUDIO_ELEMENT_ID: &str = "hygge-audio";
pub const VIDEO_ELEMENT_ID: &str = "hygge-video";

/// Initialize the shared audio element once.
#[cfg(target_arch = "wasm32")]
pub fn get_or_create_audio_element() -> Option<HtmlMediaElement> {
    let document = window()?.document()?;

    if let Some(existing) = document.get_element_by_id(AUDIO_ELEMENT_ID) {
        return existing.dyn_into::<HtmlMediaElement>().ok();
    }

    let audio: HtmlMediaElement = document.create_element("audio").ok()?.dyn_into().ok()?;
    audio.set_id(AUDIO_ELEMENT_ID);
    audio.set_attribute("preload", "metadata").ok()?;
    document.body()?.append_child(&audio).ok()?;

    Some(audio)
}

/// The element currently bound to playback for this track kind.
#[cfg(target_arch = "wasm32")]
pub fn media_element(kind: TrackKind) -> Option<HtmlMediaElement> {
    match kind {
        TrackKind::Audio => get_or_create_audio_element(),
        TrackKind::Video => window()?
            .document()?
            .get_element_by_id(VIDEO_ELEMENT_ID)?
            .dyn_into::<HtmlMediaElement>()
            .ok(),
    }
}

#[cfg(target_arch = "wasm32")]
fn try_play(element: &HtmlMediaElement) {
    if let Ok(promise) = element.play() {
        spawn(async move {
            let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
        });
    }
}

/// Apply one controller command to the element. Report commands are handled
/// by the shell, not here.
#[cfg(target_arch = "wasm32")]
pub fn apply(element: &HtmlMediaElement, command: &PlayerCommand) {
    match command {
        PlayerCommand::LoadSource { url } => {
            element.set_src(url);
            element.load();
        }
        PlayerCommand::Play => try_play(element),
        PlayerCommand::Pause => {
            let _ = element.pause();
        }
        PlayerCommand::SeekTo { seconds } => element.set_current_time(seconds.max(0.0)),
        PlayerCommand::SetRate { rate } => element.set_playback_rate(*rate),
        PlayerCommand::SetVolume { volume } => element.set_volume(volume.clamp(0.0, 1.0)),
        PlayerCommand::ReportPlay { .. } => {}
    }
}

#[cfg(target_arch = "wasm32")]
pub fn current_time(kind: TrackKind) -> f64 {
    media_element(kind).map(|e| e.current_time()).unwrap_or(0.0)
}

#[cfg(target_arch = "wasm32")]
pub fn duration(kind: TrackKind) -> f64 {
    media_element(kind)
        .map(|e| {
            let d = e.duration();
            if d.is_nan() {
                0.0
            } else {
                d
            }
        })
        .unwrap_or(0.0)
}

#[cfg(target_arch = "wasm32")]
pub fn has_ended(kind: TrackKind) -> bool {
    media_element(kind).map(|e| e.ended()).unwrap_or(false)
}

/// Human-readable message for the element's current error, if any.
#[cfg(target_arch = "wasm32")]
pub fn error_message(kind: TrackKind) -> Option<String> {
    let error = media_element(kind)?.error()?;
    Some(match error.code() {
        web_sys::MediaError::MEDIA_ERR_ABORTED => {
            "Playback was aborted before the media loaded.".to_string()
        }
        web_sys::MediaError::MEDIA_ERR_NETWORK => {
            "Network error while loading this media.".to_string()
        }
        web_sys::MediaError::MEDIA_ERR_DECODE => {
            "Playback failed due to a decode error.".to_string()
        }
        web_sys::MediaError::MEDIA_ERR_SRC_NOT_SUPPORTED => {
            "No supported media source was found.".to_string()
        }
        _ => "Unable to load this media source.".to_string(),
    })
}

/// Detach the element from its source when the player closes.
#[cfg(target_arch = "wasm32")]
pub fn release(kind: TrackKind) {
    if let Some(element) = media_element(kind) {
        let _ = element.pause();
        element.set_src("");
        let _ = element.remove_attribute("src");
        element.load();
    }
}

// Native builds have no media element; the engine still compiles so its
// logic can be tested off-browser.

#[cfg(not(target_arch = "wasm32"))]
pub fn apply_command(_kind: TrackKind, _command: &PlayerCommand) {}

#[cfg(target_arch = "wasm32")]
pub fn apply_command(kind: TrackKind, command: &PlayerCommand) {
    if let Some(element) = media_element(kind) {
        apply(&element, command);
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn current_time(_kind: TrackKind) -> f64 {
    0.0
}

#[cfg(not(target_arch = "wasm32"))]
pub fn duration(_kind: TrackKind) -> f64 {
    0.0
}

#[cfg(not(target_arch = "wasm32"))]
pub fn has_ended(_kind: TrackKind) -> bool {
    false
}

#[cfg(not(target_arch = "wasm32"))]
pub fn error_message(_kind: TrackKind) -> Option<String> {
    None
}

#[cfg(not(target_arch = "wasm32"))]
pub fn release(_kind: TrackKind) {}
