//! Core game module - states, events, and kill tally.
//!
//! This module provides the foundation that all other game systems build upon.

mod events;
mod plugin;
mod states;
mod tally;

pub use events::*;
pub use plugin::CorePlugin;
pub use states::*;
pub use tally::KillTally;
