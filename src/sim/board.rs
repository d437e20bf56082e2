//! Board controller
//!
//! Owns the registry, score and terminal outcome, and wires the shot
//! lifecycle to the host's motion, effects and notification hooks.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::coords::Geometry;
use super::error::EngineError;
use super::ports::Collaborators;
use super::registry::{Cell, Registry};
use super::resolve::Contact;
use super::shot::{Resolution, ShotLifecycle};
use super::state::{CellPos, Color, EffectHandle, Outcome, Piece, PieceId, ShotPhase};
use crate::config::BoardConfig;

/// Serializable view of the board for renderers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    /// Colors per row, `None` for empty cells
    pub rows: Vec<Vec<Option<Color>>>,
    pub on_deck: Option<Color>,
    pub score: u64,
    pub phase: ShotPhase,
    pub outcome: Option<Outcome>,
}

/// A complete game board bound to its host
#[derive(Debug)]
pub struct Board<H: Collaborators> {
    config: BoardConfig,
    registry: Registry,
    shot: ShotLifecycle,
    /// Pieces removed since the last reset
    score: u64,
    outcome: Option<Outcome>,
    /// Effects dispatched and not yet reported finished
    pending_effects: HashSet<EffectHandle>,
    next_id: u32,
    host: H,
}

impl<H: Collaborators> Board<H> {
    /// Validate `config`, then build and reset a board
    pub fn new(config: BoardConfig, host: H) -> Result<Self, EngineError> {
        config
            .validate()
            .map_err(|e| EngineError::InvalidConfig(e.to_string()))?;
        let mut board = Self {
            registry: Registry::new(Geometry::new(&config)),
            config,
            shot: ShotLifecycle::new(),
            score: 0,
            outcome: None,
            pending_effects: HashSet::new(),
            next_id: 1,
            host,
        };
        board.reset()?;
        Ok(board)
    }

    /// Clear the grid, refill the initial rows, zero the score and load a
    /// fresh on-deck piece. Valid in any phase.
    pub fn reset(&mut self) -> Result<(), EngineError> {
        self.registry.reset();
        self.shot.clear();
        self.pending_effects.clear();
        self.outcome = None;
        if self.score != 0 {
            self.score = 0;
            self.host.on_score_changed(0);
        }

        for row in 0..self.config.initial_rows as i32 {
            for col in 0..self.registry.geometry().row_len(row) {
                let piece = self.spawn_piece();
                self.registry.register(Some(piece), CellPos::new(col, row))?;
            }
        }
        self.load_next();
        log::info!(
            "Board reset: {}x{} cells, {} pieces",
            self.config.cols,
            self.config.rows,
            self.registry.len()
        );
        Ok(())
    }

    /// Place a piece directly (scenario setup). Only allowed while Ready;
    /// returns `Ok(None)` in any other phase.
    pub fn add_piece(&mut self, pos: CellPos, color: Color) -> Result<Option<PieceId>, EngineError> {
        if self.shot.phase() != ShotPhase::Ready {
            return Ok(None);
        }
        let id = self.allocate_id();
        self.registry.register(Some(Piece::new(id, color)), pos)?;
        Ok(Some(id))
    }

    /// Launch the on-deck piece. Returns false (a no-op) unless Ready.
    pub fn launch(&mut self, angle: f32) -> bool {
        match self.shot.launch(angle) {
            Some(session) => {
                self.host.launch(&session.piece, angle);
                true
            }
            None => false,
        }
    }

    /// Handle the motion system's contact signal for the in-flight piece.
    /// Returns `Ok(None)` if nothing was in flight.
    pub fn on_contact(&mut self, contact: Contact) -> Result<Option<Resolution>, EngineError> {
        let Some(resolution) =
            self.shot
                .resolve(&mut self.registry, &contact, self.config.min_cluster)?
        else {
            return Ok(None);
        };

        for piece in &resolution.popped {
            let handle = self.host.play_removal(piece);
            self.pending_effects.insert(handle);
        }
        for piece in &resolution.dropped {
            let handle = self.host.play_fall(piece);
            self.pending_effects.insert(handle);
        }

        let removed = resolution.removed() as u64;
        if removed > 0 {
            self.score += removed;
            self.host.on_score_changed(self.score);
        }

        if resolution.overflow {
            self.finish(Outcome::Overflow);
        } else if self.config.win_on_clear && self.registry.is_empty() {
            self.finish(Outcome::Cleared);
        } else {
            self.load_next();
        }
        Ok(Some(resolution))
    }

    /// Forget a finished effect. Returns false for unknown handles.
    pub fn effect_finished(&mut self, handle: EffectHandle) -> bool {
        let known = self.pending_effects.remove(&handle);
        log::trace!("effect {:?} finished (known: {known})", handle);
        known
    }

    #[inline]
    pub fn cell_at(&self, pos: CellPos) -> Cell<'_> {
        self.registry.get(pos)
    }

    #[inline]
    pub fn score(&self) -> u64 {
        self.score
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.outcome.is_some()
    }

    #[inline]
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    #[inline]
    pub fn phase(&self) -> ShotPhase {
        self.shot.phase()
    }

    #[inline]
    pub fn on_deck(&self) -> Option<&Piece> {
        self.shot.on_deck()
    }

    #[inline]
    pub fn pending_effects(&self) -> usize {
        self.pending_effects.len()
    }

    #[inline]
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    #[inline]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    #[inline]
    pub fn host(&self) -> &H {
        &self.host
    }

    #[inline]
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        let g = self.registry.geometry();
        let rows = (0..g.row_count() as i32)
            .map(|row| {
                (0..g.row_len(row))
                    .map(|col| self.registry.get(CellPos::new(col, row)).piece().map(|p| p.color))
                    .collect()
            })
            .collect();
        BoardSnapshot {
            rows,
            on_deck: self.shot.on_deck().map(|p| p.color),
            score: self.score,
            phase: self.shot.phase(),
            outcome: self.outcome,
        }
    }

    fn allocate_id(&mut self) -> PieceId {
        let id = PieceId(self.next_id);
        self.next_id += 1;
        id
    }

    fn spawn_piece(&mut self) -> Piece {
        let color = self.host.next_color();
        Piece::new(self.allocate_id(), color)
    }

    fn load_next(&mut self) {
        let piece = self.spawn_piece();
        log::debug!("on deck: {} {:?}", piece.id, piece.color);
        self.shot.load(piece);
    }

    fn finish(&mut self, outcome: Outcome) {
        self.shot.end();
        self.outcome = Some(outcome);
        log::info!("Game over ({:?}) with score {}", outcome, self.score);
        self.host.on_game_over(outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::headless::Headless;
    use glam::Vec2;

    /// 4 cols, 3 playable rows, 10-unit cells with cell (0,0) at the origin
    fn small_config() -> BoardConfig {
        BoardConfig {
            x_offset: 0.0,
            y_offset: 0.0,
            initial_rows: 0,
            ..BoardConfig::with_size(4, 3, 10.0)
        }
    }

    fn board(colors: &[Color], pieces: &[(i32, i32, Color)]) -> (Board<Headless>, Vec<PieceId>) {
        let mut board = Board::new(small_config(), Headless::with_colors(colors.iter().copied()))
            .expect("valid config");
        let ids = pieces
            .iter()
            .map(|&(col, row, color)| {
                board
                    .add_piece(CellPos::new(col, row), color)
                    .unwrap()
                    .unwrap()
            })
            .collect();
        (board, ids)
    }

    #[test]
    fn test_new_fills_initial_rows() {
        let config = BoardConfig::default();
        let board = Board::new(config, Headless::new(7, 7)).unwrap();
        // 5 rows: 8 + 7 + 8 + 7 + 8
        assert_eq!(board.registry().len(), 38);
        assert_eq!(board.phase(), ShotPhase::Ready);
        assert!(board.on_deck().is_some());
        assert_eq!(board.score(), 0);
        assert!(!board.is_game_over());
    }

    #[test]
    fn test_new_rejects_bad_config() {
        let config = BoardConfig {
            min_cluster: 0,
            ..small_config()
        };
        assert!(matches!(
            Board::new(config, Headless::new(0, 7)),
            Err(EngineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_launch_forwards_once() {
        let (mut board, _) = board(&[Color::Red], &[(0, 0, Color::Blue)]);
        assert!(board.launch(4.5));
        assert!(!board.launch(4.6));
        assert_eq!(board.host().launches.len(), 1);
        assert_eq!(
            board.host().last_launch(),
            board.shot.session().map(|s| s.piece.id)
        );
        assert_eq!(board.phase(), ShotPhase::InFlight);
        assert!(board.on_deck().is_none());
    }

    #[test]
    fn test_threshold_two_stays() {
        let (mut board, ids) = board(
            &[Color::Red, Color::Green],
            &[(0, 0, Color::Red), (3, 0, Color::Blue)],
        );
        board.launch(4.5);
        let res = board
            .on_contact(Contact::Piece {
                id: ids[0],
                at: Vec2::new(10.0, 1.0),
            })
            .unwrap()
            .unwrap();
        assert!(res.popped.is_empty());
        assert_eq!(board.score(), 0);
        assert!(board.host().scores.is_empty());
        assert!(board.host().removals.is_empty());
        assert_eq!(board.phase(), ShotPhase::Ready);
        assert_eq!(board.on_deck().map(|p| p.color), Some(Color::Green));
    }

    #[test]
    fn test_threshold_three_removed() {
        let (mut board, ids) = board(
            &[Color::Red],
            &[(0, 0, Color::Red), (1, 0, Color::Red), (3, 0, Color::Blue)],
        );
        board.launch(4.5);
        board
            .on_contact(Contact::Piece {
                id: ids[1],
                at: Vec2::new(20.0, 2.0),
            })
            .unwrap();
        assert_eq!(board.score(), 3);
        assert_eq!(board.host().scores, vec![3]);
        assert_eq!(board.host().removals.len(), 3);
        assert_eq!(board.pending_effects(), 3);
        // Cells are logically free before any effect completes
        assert!(board.cell_at(CellPos::new(0, 0)).is_empty());
        assert!(board.cell_at(CellPos::new(2, 0)).is_empty());
        assert_eq!(board.phase(), ShotPhase::Ready);
    }

    #[test]
    fn test_floating_pieces_fall_and_score() {
        let (mut board, ids) = board(
            &[Color::Red],
            &[
                (0, 0, Color::Red),
                (1, 0, Color::Red),
                (1, 1, Color::Blue),
                (3, 0, Color::Green),
            ],
        );
        board.launch(4.5);
        board
            .on_contact(Contact::Piece {
                id: ids[1],
                at: Vec2::new(20.0, 0.0),
            })
            .unwrap();
        assert_eq!(board.host().falls, vec![ids[2]]);
        assert_eq!(board.score(), 4);
        assert_eq!(board.pending_effects(), 4);
    }

    #[test]
    fn test_effect_finished_bookkeeping() {
        let (mut board, ids) = board(
            &[Color::Red],
            &[(0, 0, Color::Red), (1, 0, Color::Red), (3, 0, Color::Blue)],
        );
        board.launch(4.5);
        board
            .on_contact(Contact::Piece {
                id: ids[1],
                at: Vec2::new(20.0, 2.0),
            })
            .unwrap();
        assert!(board.effect_finished(EffectHandle(1)));
        assert!(!board.effect_finished(EffectHandle(1)));
        assert_eq!(board.pending_effects(), 2);
    }

    #[test]
    fn test_overflow_ends_game() {
        let (mut board, ids) = board(
            &[Color::Yellow],
            &[(0, 0, Color::Red), (0, 1, Color::Green), (0, 2, Color::Blue)],
        );
        assert!(board.launch(1.5 * std::f32::consts::PI));
        let res = board
            .on_contact(Contact::Piece {
                id: ids[2],
                at: Vec2::new(0.0, 30.0),
            })
            .unwrap()
            .unwrap();
        assert_eq!(res.cell, CellPos::new(0, 3));
        assert!(board.is_game_over());
        assert_eq!(board.outcome(), Some(Outcome::Overflow));
        assert_eq!(board.phase(), ShotPhase::GameOver);
        assert_eq!(board.host().outcomes, vec![Outcome::Overflow]);
        // Terminal: launches and setup are ignored
        assert!(!board.launch(4.5));
        assert_eq!(board.host().launches.len(), 1);
        assert_eq!(board.add_piece(CellPos::new(3, 0), Color::Red).unwrap(), None);
    }

    #[test]
    fn test_clearing_board_wins() {
        let (mut board, ids) = board(&[Color::Red], &[(0, 0, Color::Red), (1, 0, Color::Red)]);
        board.launch(4.5);
        board
            .on_contact(Contact::Piece {
                id: ids[1],
                at: Vec2::new(20.0, 0.0),
            })
            .unwrap();
        assert_eq!(board.outcome(), Some(Outcome::Cleared));
        assert!(board.is_game_over());
    }

    #[test]
    fn test_clearing_board_without_win_rule() {
        let config = BoardConfig {
            win_on_clear: false,
            ..small_config()
        };
        let mut board = Board::new(config, Headless::with_colors([Color::Red])).unwrap();
        board.add_piece(CellPos::new(0, 0), Color::Red).unwrap();
        board.add_piece(CellPos::new(1, 0), Color::Red).unwrap();
        board.launch(4.5);
        board
            .on_contact(Contact::TopBoundary {
                at: Vec2::new(20.0, -5.0),
            })
            .unwrap();
        assert!(!board.is_game_over());
        assert_eq!(board.phase(), ShotPhase::Ready);
        assert!(board.registry().is_empty());
    }

    #[test]
    fn test_top_boundary_contact() {
        let (mut board, _) = board(&[Color::Green], &[(3, 0, Color::Blue)]);
        board.launch(4.5);
        let res = board
            .on_contact(Contact::TopBoundary {
                at: Vec2::new(1.0, -5.0),
            })
            .unwrap()
            .unwrap();
        assert_eq!(res.cell, CellPos::new(0, 0));
        assert_eq!(board.phase(), ShotPhase::Ready);
    }

    #[test]
    fn test_contact_without_launch_is_noop() {
        let (mut board, ids) = board(&[Color::Red], &[(0, 0, Color::Red)]);
        let res = board
            .on_contact(Contact::Piece {
                id: ids[0],
                at: Vec2::new(10.0, 0.0),
            })
            .unwrap();
        assert!(res.is_none());
        assert_eq!(board.registry().len(), 1);
    }

    #[test]
    fn test_placement_error_propagates() {
        let (mut board, _) = board(&[Color::Red], &[(0, 0, Color::Red)]);
        let err = board.add_piece(CellPos::new(0, 0), Color::Blue).unwrap_err();
        assert!(matches!(err, EngineError::Placement(_)));
        let err = board.add_piece(CellPos::new(3, 1), Color::Blue).unwrap_err();
        assert!(matches!(err, EngineError::Placement(_)));
    }

    #[test]
    fn test_reset_is_idempotent() {
        let occupancy = |b: &Board<Headless>| {
            b.snapshot()
                .rows
                .iter()
                .map(|r| r.iter().map(Option::is_some).collect::<Vec<_>>())
                .collect::<Vec<_>>()
        };
        let mut board = Board::new(BoardConfig::default(), Headless::new(3, 7)).unwrap();
        board.reset().unwrap();
        let once = (occupancy(&board), board.score());
        board.reset().unwrap();
        let twice = (occupancy(&board), board.score());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_reset_after_game_over() {
        let (mut board, ids) = board(
            &[Color::Yellow],
            &[(0, 0, Color::Red), (0, 1, Color::Green), (0, 2, Color::Blue)],
        );
        board.launch(4.5);
        board
            .on_contact(Contact::Piece {
                id: ids[2],
                at: Vec2::new(0.0, 30.0),
            })
            .unwrap();
        assert!(board.is_game_over());
        board.reset().unwrap();
        assert!(!board.is_game_over());
        assert_eq!(board.phase(), ShotPhase::Ready);
        assert!(board.registry().is_empty());
        assert!(board.launch(4.5));
    }

    #[test]
    fn test_reset_reports_score_drop() {
        let (mut board, ids) = board(
            &[Color::Red],
            &[(0, 0, Color::Red), (1, 0, Color::Red), (3, 0, Color::Blue)],
        );
        board.launch(4.5);
        board
            .on_contact(Contact::Piece {
                id: ids[1],
                at: Vec2::new(20.0, 2.0),
            })
            .unwrap();
        board.reset().unwrap();
        assert_eq!(board.host().scores, vec![3, 0]);
        assert_eq!(board.pending_effects(), 0);
    }

    #[test]
    fn test_snapshot_shape() {
        let (board, _) = board(&[Color::Cyan], &[(2, 1, Color::Purple)]);
        let snap = board.snapshot();
        assert_eq!(snap.rows.len(), 4);
        assert_eq!(snap.rows[1].len(), 3);
        assert_eq!(snap.rows[1][2], Some(Color::Purple));
        assert_eq!(snap.on_deck, Some(Color::Cyan));
        let json = serde_json::to_string(&snap).unwrap();
        let back: BoardSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
    }
}
