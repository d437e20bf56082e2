//! Occupancy registry
//!
//! Cell storage for the grid. Owns every attached piece; a piece's `cell`
//! field and the slot holding it always agree.

use std::collections::HashMap;

use super::coords::Geometry;
use super::error::PlacementError;
use super::state::{CellPos, Piece, PieceId};

/// Result of a cell query
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell<'a> {
    /// Address is not on the board
    OutOfBounds,
    Empty,
    Occupied(&'a Piece),
}

impl<'a> Cell<'a> {
    #[inline]
    pub fn piece(self) -> Option<&'a Piece> {
        match self {
            Cell::Occupied(piece) => Some(piece),
            _ => None,
        }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }
}

/// Grid cell storage
#[derive(Debug, Clone)]
pub struct Registry {
    geometry: Geometry,
    /// Row-major slots, `row_count * max_cols`; slots past a short row's end stay empty
    slots: Vec<Option<Piece>>,
    /// Reverse index from piece to its address
    locations: HashMap<PieceId, CellPos>,
}

impl Registry {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            slots: vec![None; geometry.row_count() * geometry.max_cols()],
            geometry,
            locations: HashMap::new(),
        }
    }

    #[inline]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Query a cell. Never fails; invalid addresses report `OutOfBounds`.
    pub fn get(&self, pos: CellPos) -> Cell<'_> {
        if !self.geometry.contains(pos) {
            return Cell::OutOfBounds;
        }
        match &self.slots[self.geometry.index(pos)] {
            Some(piece) => Cell::Occupied(piece),
            None => Cell::Empty,
        }
    }

    /// Write a cell.
    ///
    /// `Some(piece)` attaches the piece at `pos` (updating its address) and
    /// fails if the cell is occupied. `None` frees the cell unconditionally
    /// and hands back whatever piece was there, detached.
    pub fn register(
        &mut self,
        piece: Option<Piece>,
        pos: CellPos,
    ) -> Result<Option<Piece>, PlacementError> {
        if !self.geometry.contains(pos) {
            return Err(PlacementError::OutOfBounds {
                col: pos.col,
                row: pos.row,
            });
        }
        let index = self.geometry.index(pos);

        match piece {
            Some(mut piece) => {
                if let Some(existing) = &self.slots[index] {
                    return Err(PlacementError::Occupied {
                        col: pos.col,
                        row: pos.row,
                        existing: existing.id,
                    });
                }
                // A piece lives in exactly one cell
                if let Some(old) = self.locations.get(&piece.id).copied() {
                    let old_index = self.geometry.index(old);
                    self.slots[old_index] = None;
                }
                piece.cell = Some(pos);
                self.locations.insert(piece.id, pos);
                self.slots[index] = Some(piece);
                Ok(None)
            }
            None => {
                let freed = self.slots[index].take().map(|mut piece| {
                    self.locations.remove(&piece.id);
                    piece.cell = None;
                    piece
                });
                Ok(freed)
            }
        }
    }

    /// Free every cell
    pub fn reset(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.locations.clear();
    }

    /// Address of an attached piece
    #[inline]
    pub fn locate(&self, id: PieceId) -> Option<CellPos> {
        self.locations.get(&id).copied()
    }

    /// Number of attached pieces
    #[inline]
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Attached pieces, row-major
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.slots.iter().flatten()
    }

    /// Empty cells of one row, left to right
    pub fn empty_in_row(&self, row: i32) -> impl Iterator<Item = CellPos> + '_ {
        (0..self.geometry.row_len(row))
            .map(move |col| CellPos::new(col, row))
            .filter(move |pos| self.get(*pos).is_empty())
    }

    /// Every empty cell, row-major
    pub fn empty_cells(&self) -> impl Iterator<Item = CellPos> + '_ {
        self.geometry.cells().filter(move |pos| self.get(*pos).is_empty())
    }
}
