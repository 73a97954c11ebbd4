use super::*;

#[test]
fn position_round_trip() {
    let store = MemoryPositionStore::default();
    store.set("track-a", 42.5);
    assert_eq!(store.get("track-a"), 42.5);

    store.clear("track-a");
    assert_eq!(store.get("track-a"), 0.0);
}

#[test]
fn position_missing_reads_as_zero() {
    let store = MemoryPositionStore::default();
    assert_eq!(store.get("never-played"), 0.0);
}

#[test]
fn position_set_overwrites_unconditionally() {
    let store = MemoryPositionStore::default();
    store.set("track-b", 10.0);
    store.set("track-b", 3.0);
    assert_eq!(store.get("track-b"), 3.0);
}

#[test]
fn position_keys_are_per_track() {
    let store = MemoryPositionStore::default();
    store.set("track-a", 12.0);
    store.set("track-b", 90.0);
    store.clear("track-a");
    assert_eq!(store.get("track-a"), 0.0);
    assert_eq!(store.get("track-b"), 90.0);
}

#[test]
fn position_key_uses_stable_prefix() {
    assert_eq!(position_key("abc"), "audio_position_abc");
}

#[test]
fn settings_default_round_trips_through_json() {
    let settings = AppSettings::default();
    let encoded = serde_json::to_string(&settings).unwrap();
    let decoded: AppSettings = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, settings);
}

#[test]
fn settings_missing_fields_fall_back_to_defaults() {
    // Settings written by older builds carry only the volume.
    let decoded: AppSettings = serde_json::from_str(r#"{"volume":0.5}"#).unwrap();
    assert_eq!(decoded.volume, 0.5);
    assert_eq!(decoded.playback_speed, 1.0);
    assert!(!decoded.shuffle_enabled);
    assert_eq!(decoded.repeat_mode, RepeatMode::Off);
}
