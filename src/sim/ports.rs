//! Collaborator interfaces
//!
//! The engine never simulates motion, draws, or plays sound. It talks to
//! the outside world only through these traits.

use super::state::{Color, EffectHandle, Outcome, Piece};

/// Moves launched pieces and reports their collisions back
pub trait MotionSystem {
    /// Start `piece` moving along `angle` (radians). The system must later
    /// report exactly one contact for it.
    fn launch(&mut self, piece: &Piece, angle: f32);
}

/// Uniform color picker over the active palette
pub trait ColorSource {
    fn next_color(&mut self) -> Color;
}

/// Fire-and-forget visual effects
pub trait EffectsSink {
    /// Pop animation for a matched piece
    fn play_removal(&mut self, piece: &Piece) -> EffectHandle;
    /// Fall animation for a disconnected piece
    fn play_fall(&mut self, piece: &Piece) -> EffectHandle;
}

/// Board state notifications, delivered synchronously
pub trait BoardListener {
    fn on_score_changed(&mut self, _score: u64) {}
    fn on_game_over(&mut self, _outcome: Outcome) {}
}

/// Everything a board needs from its host
pub trait Collaborators: MotionSystem + ColorSource + EffectsSink + BoardListener {}

impl<T: MotionSystem + ColorSource + EffectsSink + BoardListener> Collaborators for T {}
