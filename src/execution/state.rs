use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle of a per-symbol position. `Armed` and `ScaleOut` are
/// reserved for staged entries and partial exits and are not produced
/// by the current transition logic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionState {
    #[default]
    Init,
    Armed,
    Filled,
    Managed,
    ScaleOut,
    Exited,
}

impl PositionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PositionState::Init => "INIT",
            PositionState::Armed => "ARMED",
            PositionState::Filled => "FILLED",
            PositionState::Managed => "MANAGED",
            PositionState::ScaleOut => "SCALE_OUT",
            PositionState::Exited => "EXITED",
        }
    }
}

impl fmt::Display for PositionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Advance a position one step in response to fill/exit events.
///
/// Rules are checked in order: a fresh fill, the automatic promotion
/// out of `Filled`, then the exit event. A single call can therefore
/// never both fill and exit; callers acknowledge those events with
/// separate, sequential calls.
pub fn next_state(state: PositionState, filled: bool, exited: bool) -> PositionState {
    match state {
        PositionState::Init if filled => PositionState::Filled,
        PositionState::Filled => PositionState::Managed,
        _ if exited => PositionState::Exited,
        other => other,
    }
}
