//! Playback controller: a single tagged state machine for the player.
//!
//! The session owns the play/pause/shuffle/repeat/speed state and the track
//! list, and reduces every UI or media event through [`PlayerSession::handle`].
//! Each transition returns the commands the shell must apply to the media
//! element, so the element can never drift from the session's own state.

use crate::api::models::Track;
use crate::db::{PositionStore, RepeatMode};
use crate::player::navigator::{self, Advance, Direction};
use rand::rngs::StdRng;
use std::rc::Rc;

/// Fixed playback-speed steps, cycled in order and wrapping after 2x.
pub const SPEED_STEPS: [f64; 4] = [0.5, 1.0, 1.5, 2.0];

/// Playback offsets are written through on every fifth heartbeat second.
const POSITION_SAVE_INTERVAL_SECS: u32 = 5;

pub fn next_speed(current: f64) -> f64 {
    let position = SPEED_STEPS
        .iter()
        .position(|step| (step - current).abs() < 1e-9)
        .unwrap_or(1);
    SPEED_STEPS[(position + 1) % SPEED_STEPS.len()]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    /// No track bound to the media element.
    Idle,
    /// Track bound and paused; position possibly restored.
    Loaded,
    Playing,
    Paused,
    /// The track ran out and nothing else is queued to play.
    Ended,
}

/// Everything the shell may need to do after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerCommand {
    LoadSource { url: String },
    Play,
    Pause,
    SeekTo { seconds: f64 },
    SetRate { rate: f64 },
    SetVolume { volume: f64 },
    /// One-shot play/view-count signal for the catalog.
    ReportPlay { track_id: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// Bind the track at this index of the active list.
    Load { index: usize },
    TogglePlayPause,
    /// The element learned the real duration of the bound source.
    MetadataReady { duration: f64 },
    /// One wall-clock second passed with the player mounted.
    Heartbeat { media_time: f64 },
    /// The bound source played to its natural end.
    Ended,
    /// Jump to this fraction of the known duration.
    Seek { fraction: f64 },
    CycleSpeed,
    SetVolume { volume: f64 },
    Next,
    Previous { media_time: f64 },
    ToggleShuffle,
    CycleRepeat,
    /// The player view is going away.
    Close { media_time: f64 },
}

pub struct PlayerSession {
    state: PlayerState,
    tracks: Vec<Track>,
    index: usize,
    shuffle: bool,
    repeat: RepeatMode,
    speed: f64,
    duration: f64,
    media_time: f64,
    pending_resume: Option<f64>,
    play_counted: bool,
    save_ticks: u32,
    positions: Rc<dyn PositionStore>,
    rng: StdRng,
}

impl PlayerSession {
    pub fn new(positions: Rc<dyn PositionStore>, rng: StdRng) -> Self {
        Self {
            state: PlayerState::Idle,
            tracks: Vec::new(),
            index: 0,
            shuffle: false,
            repeat: RepeatMode::Off,
            speed: 1.0,
            duration: 0.0,
            media_time: 0.0,
            pending_resume: None,
            play_counted: false,
            save_ticks: 0,
            positions,
            rng,
        }
    }

    /// Replace the active track list. Media URLs must already be absolute.
    pub fn set_tracks(&mut self, tracks: Vec<Track>) {
        self.tracks = tracks;
        self.index = 0;
        self.state = PlayerState::Idle;
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlayerState::Playing
    }

    pub fn current_track(&self) -> Option<&Track> {
        if self.state == PlayerState::Idle {
            return None;
        }
        self.tracks.get(self.index)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn set_shuffle(&mut self, shuffle: bool) {
        self.shuffle = shuffle;
    }

    pub fn set_repeat(&mut self, repeat: RepeatMode) {
        self.repeat = repeat;
    }

    /// Restore a persisted speed; values outside the step set fall back to 1x.
    pub fn set_speed(&mut self, speed: f64) {
        if SPEED_STEPS.iter().any(|step| (step - speed).abs() < 1e-9) {
            self.speed = speed;
        } else {
            self.speed = 1.0;
        }
    }

    pub fn handle(&mut self, event: PlayerEvent) -> Vec<PlayerCommand> {
        match event {
            PlayerEvent::Load { index } => self.load(index, false),

            PlayerEvent::TogglePlayPause => match self.state {
                PlayerState::Playing => {
                    self.state = PlayerState::Paused;
                    if let Some(track) = self.tracks.get(self.index) {
                        if self.media_time > 0.0 {
                            self.positions.set(&track.id, self.media_time);
                        }
                    }
                    vec![PlayerCommand::Pause]
                }
                PlayerState::Loaded | PlayerState::Paused | PlayerState::Ended => {
                    self.state = PlayerState::Playing;
                    let mut commands = vec![PlayerCommand::Play];
                    if !self.play_counted {
                        self.play_counted = true;
                        if let Some(track) = self.tracks.get(self.index) {
                            commands.push(PlayerCommand::ReportPlay {
                                track_id: track.id.clone(),
                            });
                        }
                    }
                    commands
                }
                PlayerState::Idle => Vec::new(),
            },

            PlayerEvent::MetadataReady { duration } => {
                self.duration = duration;
                match self.pending_resume.take() {
                    Some(seconds) => vec![PlayerCommand::SeekTo { seconds }],
                    None => Vec::new(),
                }
            }

            PlayerEvent::Heartbeat { media_time } => {
                self.media_time = media_time;
                if self.state == PlayerState::Playing {
                    self.save_ticks += 1;
                    if self.save_ticks % POSITION_SAVE_INTERVAL_SECS == 0 {
                        if let Some(track) = self.tracks.get(self.index) {
                            self.positions.set(&track.id, media_time);
                        }
                    }
                }
                Vec::new()
            }

            PlayerEvent::Ended => {
                let was_playing = self.state == PlayerState::Playing;
                // The offset record is only meaningful for unfinished tracks.
                if let Some(track) = self.tracks.get(self.index) {
                    self.positions.clear(&track.id);
                }
                self.media_time = 0.0;
                match self.advance(Direction::Forward, 0.0) {
                    Advance::Restart => self.restart(was_playing),
                    Advance::Jump(target) => self.load(target, was_playing),
                    Advance::Stop => {
                        self.state = PlayerState::Ended;
                        Vec::new()
                    }
                }
            }

            PlayerEvent::Seek { fraction } => {
                if self.state == PlayerState::Idle || self.duration <= 0.0 {
                    return Vec::new();
                }
                let target = fraction.clamp(0.0, 1.0) * self.duration;
                self.media_time = target;
                if let Some(track) = self.tracks.get(self.index) {
                    self.positions.set(&track.id, target);
                }
                vec![PlayerCommand::SeekTo { seconds: target }]
            }

            PlayerEvent::CycleSpeed => {
                self.speed = next_speed(self.speed);
                vec![PlayerCommand::SetRate { rate: self.speed }]
            }

            PlayerEvent::SetVolume { volume } => {
                vec![PlayerCommand::SetVolume {
                    volume: volume.clamp(0.0, 1.0),
                }]
            }

            PlayerEvent::Next => {
                if self.state == PlayerState::Idle {
                    return Vec::new();
                }
                let was_playing = self.is_playing();
                match self.advance(Direction::Forward, 0.0) {
                    Advance::Restart => self.restart(was_playing),
                    Advance::Jump(target) => {
                        self.save_current_offset();
                        self.load(target, was_playing)
                    }
                    Advance::Stop => Vec::new(),
                }
            }

            PlayerEvent::Previous { media_time } => {
                if self.state == PlayerState::Idle {
                    return Vec::new();
                }
                let was_playing = self.is_playing();
                match self.advance(Direction::Backward, media_time) {
                    Advance::Restart => {
                        self.media_time = 0.0;
                        vec![PlayerCommand::SeekTo { seconds: 0.0 }]
                    }
                    Advance::Jump(target) => {
                        self.save_current_offset();
                        self.load(target, was_playing)
                    }
                    Advance::Stop => Vec::new(),
                }
            }

            PlayerEvent::ToggleShuffle => {
                self.shuffle = !self.shuffle;
                Vec::new()
            }

            PlayerEvent::CycleRepeat => {
                self.repeat = match self.repeat {
                    RepeatMode::Off => RepeatMode::All,
                    RepeatMode::All => RepeatMode::One,
                    RepeatMode::One => RepeatMode::Off,
                };
                Vec::new()
            }

            PlayerEvent::Close { media_time } => {
                if self.state != PlayerState::Idle && self.state != PlayerState::Ended {
                    if let Some(track) = self.tracks.get(self.index) {
                        if media_time > 0.0 {
                            self.positions.set(&track.id, media_time);
                        }
                    }
                }
                self.state = PlayerState::Idle;
                vec![PlayerCommand::Pause]
            }
        }
    }

    fn advance(&mut self, direction: Direction, elapsed_secs: f64) -> Advance {
        navigator::advance(
            self.index,
            self.tracks.len(),
            self.shuffle,
            self.repeat,
            direction,
            elapsed_secs,
            &mut self.rng,
        )
    }

    fn save_current_offset(&self) {
        if let Some(track) = self.tracks.get(self.index) {
            if self.media_time > 0.0 {
                self.positions.set(&track.id, self.media_time);
            }
        }
    }

    /// Same track from the top, preserving the playing flag.
    fn restart(&mut self, was_playing: bool) -> Vec<PlayerCommand> {
        self.media_time = 0.0;
        self.state = if was_playing {
            PlayerState::Playing
        } else {
            PlayerState::Paused
        };
        let mut commands = vec![PlayerCommand::SeekTo { seconds: 0.0 }];
        if was_playing {
            commands.push(PlayerCommand::Play);
        }
        commands
    }

    /// Bind the track at `index`, restoring its saved offset and the
    /// selected speed. With `autoplay` the new track starts immediately and
    /// counts as played.
    fn load(&mut self, index: usize, autoplay: bool) -> Vec<PlayerCommand> {
        let Some(track) = self.tracks.get(index) else {
            return Vec::new();
        };
        let track_id = track.id.clone();
        let url = track.media_url.clone();

        self.index = index;
        self.duration = 0.0;
        self.media_time = 0.0;
        self.save_ticks = 0;
        self.play_counted = false;
        let saved = self.positions.get(&track_id);
        self.pending_resume = (saved > 0.0).then_some(saved);
        self.state = PlayerState::Loaded;

        let mut commands = vec![
            PlayerCommand::LoadSource { url },
            PlayerCommand::SetRate { rate: self.speed },
        ];
        if autoplay {
            self.state = PlayerState::Playing;
            self.play_counted = true;
            commands.push(PlayerCommand::Play);
            commands.push(PlayerCommand::ReportPlay { track_id });
        }
        commands
    }
}
