//! Track-list navigation under shuffle and repeat policies.
//!
//! Pure decision logic: given where we are and the active policy, decide
//! whether to jump to another index, restart the current track, or stay put.
//! The player session applies the decision and owns all side effects.

use crate::db::RepeatMode;
use rand::Rng;

/// Tapping "previous" after this much playback restarts the track instead
/// of moving back.
const RESTART_THRESHOLD_SECS: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Move to this index in the current list.
    Jump(usize),
    /// Stay on the current track and start it over from 0.
    Restart,
    /// No further track; leave playback where it is.
    Stop,
}

pub fn advance<R: Rng>(
    current: usize,
    len: usize,
    shuffle: bool,
    repeat: RepeatMode,
    direction: Direction,
    elapsed_secs: f64,
    rng: &mut R,
) -> Advance {
    if len == 0 {
        return Advance::Stop;
    }

    match direction {
        Direction::Forward => {
            // Repeat-one never advances, including at a natural end.
            if repeat == RepeatMode::One {
                return Advance::Restart;
            }
            if shuffle && len > 1 {
                // Uniform over every other index. No play history is kept, so
                // a track can come around again soon after it played.
                let mut pick = rng.gen_range(0..len - 1);
                if pick >= current {
                    pick += 1;
                }
                return Advance::Jump(pick);
            }
            if current + 1 < len {
                Advance::Jump(current + 1)
            } else if repeat == RepeatMode::All {
                Advance::Jump(0)
            } else {
                Advance::Stop
            }
        }
        Direction::Backward => {
            if elapsed_secs > RESTART_THRESHOLD_SECS {
                return Advance::Restart;
            }
            if current > 0 {
                Advance::Jump(current - 1)
            } else if repeat == RepeatMode::All {
                Advance::Jump(len - 1)
            } else {
                Advance::Stop
            }
        }
    }
}
