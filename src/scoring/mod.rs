// Signal scoring module
pub mod entry;
pub mod exit;

pub use entry::{EntryComponents, EntryScorer, EntryWeights, RegimeMultipliers};
pub use exit::{compute_exit_score, ExitComponents};
