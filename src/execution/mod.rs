// Order construction and position lifecycle module
pub mod orders;
pub mod state;

pub use orders::{build_bracket, BracketOrder};
pub use state::{next_state, PositionState};
