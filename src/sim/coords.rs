//! Offset-hex coordinate system
//!
//! Maps grid cells to placement coordinates and back. Odd rows are shifted
//! right by half a cell and hold one fewer cell than even rows.

use glam::Vec2;

use super::state::CellPos;
use crate::config::BoardConfig;

/// Neighbor offsets (dcol, drow) for a cell in an odd row
pub const ODD_ROW_NEIGHBORS: [(i32, i32); 6] = [(0, -1), (1, -1), (1, 0), (-1, 0), (0, 1), (1, 1)];
/// Neighbor offsets (dcol, drow) for a cell in an even row
pub const EVEN_ROW_NEIGHBORS: [(i32, i32); 6] =
    [(-1, -1), (0, -1), (1, 0), (-1, 0), (-1, 1), (0, 1)];

/// Grid dimensions plus placement geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    cols: i32,
    /// Highest valid row index (the overflow row)
    last_row: i32,
    cell_size: f32,
    offset: Vec2,
}

impl Geometry {
    pub fn new(config: &BoardConfig) -> Self {
        Self {
            cols: config.cols as i32,
            last_row: config.rows as i32,
            cell_size: config.cell_size,
            offset: Vec2::new(config.x_offset, config.y_offset),
        }
    }

    /// Number of rows including the overflow row
    #[inline]
    pub fn row_count(&self) -> usize {
        (self.last_row + 1) as usize
    }

    /// Widest row length
    #[inline]
    pub fn max_cols(&self) -> usize {
        self.cols as usize
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Cells in `row`, or 0 for a row off the board
    #[inline]
    pub fn row_len(&self, row: i32) -> i32 {
        if row < 0 || row > self.last_row {
            0
        } else if row % 2 == 1 {
            self.cols - 1
        } else {
            self.cols
        }
    }

    /// Whether `pos` is a valid address
    #[inline]
    pub fn contains(&self, pos: CellPos) -> bool {
        pos.col >= 0 && pos.col < self.row_len(pos.row)
    }

    /// Placement coordinate of a cell center
    pub fn cell_to_point(&self, pos: CellPos) -> Vec2 {
        let shift = if pos.is_odd_row() { self.cell_size / 2.0 } else { 0.0 };
        Vec2::new(
            pos.col as f32 * self.cell_size + shift,
            pos.row as f32 * self.cell_size,
        ) + self.offset
    }

    /// Nearest cell address to a point. Row is rounded first, then the column
    /// is rounded within that row's parity shift. The result may be invalid.
    pub fn point_to_cell(&self, point: Vec2) -> CellPos {
        let local = point - self.offset;
        let row = round_half_up(local.y / self.cell_size);
        let shift = if row.rem_euclid(2) == 1 { self.cell_size / 2.0 } else { 0.0 };
        let col = round_half_up((local.x - shift) / self.cell_size);
        CellPos::new(col, row)
    }

    /// Whether `row` is the overflow row (or past it)
    #[inline]
    pub fn is_overflow_row(&self, row: i32) -> bool {
        row >= self.last_row
    }

    /// Pull `pos` onto the board: row into `[0, last_row]`, then column into
    /// that row's range.
    pub fn clamp(&self, pos: CellPos) -> CellPos {
        let row = pos.row.clamp(0, self.last_row);
        let col = pos.col.clamp(0, self.row_len(row) - 1);
        CellPos::new(col, row)
    }

    /// All valid addresses, row-major
    pub fn cells(&self) -> impl Iterator<Item = CellPos> + '_ {
        (0..=self.last_row)
            .flat_map(move |row| (0..self.row_len(row)).map(move |col| CellPos::new(col, row)))
    }

    /// Flat index into a `row_count * max_cols` mask. Caller guarantees validity.
    #[inline]
    pub fn index(&self, pos: CellPos) -> usize {
        pos.row as usize * self.cols as usize + pos.col as usize
    }
}

/// Offset table for a cell's row parity
#[inline]
pub fn neighbor_offsets(pos: CellPos) -> &'static [(i32, i32); 6] {
    if pos.is_odd_row() {
        &ODD_ROW_NEIGHBORS
    } else {
        &EVEN_ROW_NEIGHBORS
    }
}

/// The six adjacent addresses of `pos`, valid or not
pub fn neighbors(pos: CellPos) -> impl Iterator<Item = CellPos> {
    neighbor_offsets(pos)
        .iter()
        .map(move |&(dc, dr)| CellPos::new(pos.col + dc, pos.row + dr))
}

/// Rounds .5 toward +∞, matching screen-space snapping
#[inline]
fn round_half_up(v: f32) -> i32 {
    (v + 0.5).floor() as i32
}
