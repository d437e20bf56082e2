//! Shot lifecycle
//!
//! Ready -> InFlight -> Resolving -> Ready | GameOver. Requests that arrive
//! in the wrong phase are ignored; at most one piece is ever in flight.

use glam::Vec2;

use super::cluster::{cluster_at, floating};
use super::error::EngineError;
use super::registry::Registry;
use super::resolve::{Contact, resolve};
use super::state::{CellPos, Piece, PieceId, ShotPhase};
use crate::config::BoardConfig;
use crate::{angle_toward, normalize_angle};

/// The piece currently launched
#[derive(Debug, Clone, PartialEq)]
pub struct ShotSession {
    pub piece: Piece,
    pub angle: f32,
}

/// What one resolved shot did to the grid
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// The shot piece
    pub piece: PieceId,
    /// Where it attached
    pub cell: CellPos,
    /// Matched cluster members, already detached
    pub popped: Vec<Piece>,
    /// Pieces cut off from row 0, already detached
    pub dropped: Vec<Piece>,
    /// Attached in the overflow row
    pub overflow: bool,
}

impl Resolution {
    /// Pieces removed by this shot
    #[inline]
    pub fn removed(&self) -> usize {
        self.popped.len() + self.dropped.len()
    }
}

/// Phase machine for the on-deck and in-flight piece
#[derive(Debug, Clone)]
pub struct ShotLifecycle {
    phase: ShotPhase,
    on_deck: Option<Piece>,
    session: Option<ShotSession>,
}

impl Default for ShotLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl ShotLifecycle {
    /// Lifecycle with nothing loaded yet
    pub fn new() -> Self {
        Self {
            phase: ShotPhase::Ready,
            on_deck: None,
            session: None,
        }
    }

    #[inline]
    pub fn phase(&self) -> ShotPhase {
        self.phase
    }

    #[inline]
    pub fn on_deck(&self) -> Option<&Piece> {
        self.on_deck.as_ref()
    }

    #[inline]
    pub fn session(&self) -> Option<&ShotSession> {
        self.session.as_ref()
    }

    /// Drop all pending state and return to Ready
    pub fn clear(&mut self) {
        self.phase = ShotPhase::Ready;
        self.on_deck = None;
        self.session = None;
    }

    /// Put the next piece on deck and return to Ready
    pub fn load(&mut self, piece: Piece) {
        if self.phase == ShotPhase::GameOver {
            return;
        }
        self.on_deck = Some(piece);
        self.session = None;
        self.phase = ShotPhase::Ready;
    }

    /// Enter the terminal phase
    pub fn end(&mut self) {
        self.phase = ShotPhase::GameOver;
        self.on_deck = None;
        self.session = None;
    }

    /// Launch the on-deck piece. Returns `None` (and changes nothing) unless
    /// Ready with a piece loaded.
    pub fn launch(&mut self, angle: f32) -> Option<&ShotSession> {
        if self.phase != ShotPhase::Ready {
            log::debug!("launch ignored in phase {:?}", self.phase);
            return None;
        }
        let piece = self.on_deck.take()?;
        self.phase = ShotPhase::InFlight;
        self.session = Some(ShotSession { piece, angle });
        self.session.as_ref()
    }

    /// Attach the in-flight piece for `contact`, then remove its cluster
    /// (if at least `min_cluster` strong) and every piece left floating.
    ///
    /// Leaves the phase at Resolving; the caller decides between `load` and
    /// `end`. Returns `Ok(None)` when no piece is in flight.
    pub fn resolve(
        &mut self,
        registry: &mut Registry,
        contact: &Contact,
        min_cluster: usize,
    ) -> Result<Option<Resolution>, EngineError> {
        if self.phase != ShotPhase::InFlight || self.session.is_none() {
            log::warn!("contact {:?} ignored in phase {:?}", contact, self.phase);
            return Ok(None);
        }
        self.phase = ShotPhase::Resolving;

        let cell = resolve(registry, contact)?;
        let Some(session) = self.session.take() else {
            return Ok(None);
        };
        let piece = session.piece.id;
        registry.register(Some(session.piece), cell)?;
        log::debug!("piece {piece} attached at {cell}");

        let cluster = cluster_at(registry, cell);
        let mut popped = Vec::new();
        if cluster.len() >= min_cluster {
            for pos in cluster {
                if let Some(p) = registry.register(None, pos)? {
                    popped.push(p);
                }
            }
            log::debug!("popped {} pieces", popped.len());
        }

        let mut dropped = Vec::new();
        for pos in floating(registry) {
            if let Some(p) = registry.register(None, pos)? {
                dropped.push(p);
            }
        }
        if !dropped.is_empty() {
            log::debug!("dropped {} floating pieces", dropped.len());
        }

        Ok(Some(Resolution {
            piece,
            cell,
            popped,
            dropped,
            overflow: registry.geometry().is_overflow_row(cell.row),
        }))
    }
}

/// Launch angle from `origin` toward a pointer at `target`, clamped into the
/// configured aim arc. Pointers outside the arc snap to the nearer bound.
pub fn aim_angle(origin: Vec2, target: Vec2, config: &BoardConfig) -> f32 {
    let angle = normalize_angle(angle_toward(origin, target));
    if (config.aim_min..=config.aim_max).contains(&angle) {
        return angle;
    }
    let gap = |bound: f32| {
        let d = (angle - bound).abs();
        d.min(std::f32::consts::TAU - d)
    };
    if gap(config.aim_min) <= gap(config.aim_max) {
        config.aim_min
    } else {
        config.aim_max
    }
}
