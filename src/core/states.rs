//! Game state definitions that control the overall flow of the game.
//!
//! NPC systems only run while the game is `InGame`.

use bevy::prelude::*;

/// Main game states - controls overall game flow.
///
/// - Start in `Loading` while NPC definitions are read
/// - Enter `InGame` once loading is done
/// - `GameOver` when the player dies
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum GameState {
    /// Initial state - loading data files
    #[default]
    Loading,
    /// Active gameplay
    InGame,
    /// Player has died
    GameOver,
}
