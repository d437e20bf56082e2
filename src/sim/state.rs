//! Core data types shared by the engine
//!
//! Plain data only: pieces, addresses, colors and lifecycle phases. Nothing
//! here knows about rendering.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Piece colors, in palette order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Red,
    Green,
    Blue,
    Yellow,
    Purple,
    Cyan,
    Orange,
}

impl Color {
    pub const ALL: [Self; 7] = [
        Self::Red,
        Self::Green,
        Self::Blue,
        Self::Yellow,
        Self::Purple,
        Self::Cyan,
        Self::Orange,
    ];

    /// 0xRRGGBB tint for renderers
    pub fn rgb(self) -> u32 {
        match self {
            Color::Red => 0xff0000,
            Color::Green => 0x00ff00,
            Color::Blue => 0x0000ff,
            Color::Yellow => 0xffff00,
            Color::Purple => 0xff00ff,
            Color::Cyan => 0x00ffff,
            Color::Orange => 0xffa500,
        }
    }

    /// First `size` colors of the palette
    pub fn palette(size: usize) -> &'static [Color] {
        &Self::ALL[..size.clamp(1, Self::ALL.len())]
    }
}

/// Stable piece identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceId(pub u32);

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Grid address. Signed so neighbor offsets can step off the board;
/// validity is decided by `Geometry::contains`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellPos {
    pub col: i32,
    pub row: i32,
}

impl CellPos {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    #[inline]
    pub fn is_odd_row(self) -> bool {
        self.row.rem_euclid(2) == 1
    }
}

impl fmt::Display for CellPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// A colored piece. `cell` is `Some` only while attached to the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Piece {
    pub id: PieceId,
    pub color: Color,
    pub cell: Option<CellPos>,
}

impl Piece {
    /// A free (unattached) piece
    pub fn new(id: PieceId, color: Color) -> Self {
        Self {
            id,
            color,
            cell: None,
        }
    }

    #[inline]
    pub fn is_attached(&self) -> bool {
        self.cell.is_some()
    }
}

/// Shot lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotPhase {
    /// On-deck piece loaded, waiting for launch
    Ready,
    /// Launched, waiting for a collision signal
    InFlight,
    /// Attaching the piece and removing clusters/floaters
    Resolving,
    /// Terminal until reset
    GameOver,
}

/// Why the game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// A piece attached in the overflow row
    Overflow,
    /// Every attached piece was removed
    Cleared,
}

/// Opaque handle to a fire-and-forget visual effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EffectHandle(pub u64);
