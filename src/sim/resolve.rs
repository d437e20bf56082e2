//! Collision-to-cell resolution
//!
//! Turns a contact signal from the motion system into the empty cell the
//! flying piece snaps into.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::coords::neighbors;
use super::error::EngineError;
use super::registry::Registry;
use super::state::{CellPos, PieceId};

/// Collision signal for a piece in flight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Contact {
    /// Touched an attached piece while at `at`
    Piece { id: PieceId, at: Vec2 },
    /// Reached the upper boundary at `at` without touching anything
    TopBoundary { at: Vec2 },
}

impl Contact {
    /// Flying piece position at the moment of contact
    #[inline]
    pub fn position(&self) -> Vec2 {
        match *self {
            Contact::Piece { at, .. } | Contact::TopBoundary { at } => at,
        }
    }
}

/// Cell among `candidates` whose center is nearest `at`. Ties go to the
/// first candidate.
fn nearest(
    registry: &Registry,
    at: Vec2,
    candidates: impl IntoIterator<Item = CellPos>,
) -> Option<CellPos> {
    let g = registry.geometry();
    candidates
        .into_iter()
        .map(|pos| (pos, g.cell_to_point(pos).distance_squared(at)))
        .fold(None, |best: Option<(CellPos, f32)>, (pos, d)| match best {
            Some((_, best_d)) if best_d <= d => best,
            _ => Some((pos, d)),
        })
        .map(|(pos, _)| pos)
}

/// Pick the empty cell a flying piece attaches to.
///
/// Boundary contacts snap to the nearest free cell of row 0. Piece contacts
/// snap to the contacted piece's nearest empty neighbor, falling back to
/// the row above it and then to the whole board.
pub fn resolve(registry: &Registry, contact: &Contact) -> Result<CellPos, EngineError> {
    let at = contact.position();
    let g = registry.geometry();

    let target = match *contact {
        Contact::TopBoundary { .. } => nearest(registry, at, registry.empty_in_row(0)),
        Contact::Piece { id, .. } => {
            let hit = registry.locate(id).ok_or(EngineError::UnknownPiece(id))?;
            let open = neighbors(hit).filter(|n| registry.get(*n).is_empty());
            nearest(registry, at, open).or_else(|| {
                let above = (hit.row - 1).max(0);
                log::debug!("piece {id} at {hit} has no empty neighbor, trying row {above}");
                nearest(registry, at, registry.empty_in_row(above))
            })
        }
    };

    let target = match target {
        Some(pos) => pos,
        None => {
            log::warn!("no local free cell for contact at {at}, searching whole board");
            nearest(registry, at, registry.empty_cells()).ok_or(EngineError::NoFreeCell)?
        }
    };

    // Candidates are valid by construction; clamp guards the lateral walls anyway
    let clamped = g.clamp(target);
    if clamped != target {
        log::warn!("resolved cell {target} clamped to {clamped}");
    }
    Ok(clamped)
}
