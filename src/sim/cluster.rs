//! Connected-component search over the registry
//!
//! One iterative flood fill serves both color clustering (same-color
//! neighbors only) and anchor reachability (any occupied neighbor, seeded
//! from the whole top row). Scratch state is local to each call.

use super::coords::neighbors;
use super::registry::{Cell, Registry};
use super::state::{CellPos, Color};

/// Visited flags over every grid address
struct VisitedMask {
    bits: Vec<bool>,
}

impl VisitedMask {
    fn new(registry: &Registry) -> Self {
        let g = registry.geometry();
        Self {
            bits: vec![false; g.row_count() * g.max_cols()],
        }
    }

    /// Mark `pos`; returns false if it was already marked
    fn mark(&mut self, registry: &Registry, pos: CellPos) -> bool {
        let slot = &mut self.bits[registry.geometry().index(pos)];
        !std::mem::replace(slot, true)
    }

    fn is_marked(&self, registry: &Registry, pos: CellPos) -> bool {
        self.bits[registry.geometry().index(pos)]
    }
}

/// Which occupied neighbors a search may step into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admit {
    /// Only pieces of this color
    SameColor(Color),
    /// Any piece
    AnyColor,
}

impl Admit {
    #[inline]
    fn allows(self, color: Color) -> bool {
        match self {
            Admit::SameColor(c) => c == color,
            Admit::AnyColor => true,
        }
    }
}

/// Flood from `seeds`, returning every reached occupied cell in visit order.
/// Seeds that are empty, off-board or inadmissible are skipped.
fn flood(
    registry: &Registry,
    seeds: impl IntoIterator<Item = CellPos>,
    admit: Admit,
    visited: &mut VisitedMask,
) -> Vec<CellPos> {
    let admissible = |pos: CellPos| match registry.get(pos) {
        Cell::Occupied(piece) => admit.allows(piece.color),
        _ => false,
    };

    let mut stack: Vec<CellPos> = Vec::new();
    for seed in seeds {
        if admissible(seed) && visited.mark(registry, seed) {
            stack.push(seed);
        }
    }

    let mut reached = Vec::new();
    while let Some(pos) = stack.pop() {
        reached.push(pos);
        for n in neighbors(pos) {
            if admissible(n) && visited.mark(registry, n) {
                stack.push(n);
            }
        }
    }
    reached
}

/// Same-color cluster containing `pos`. Empty if `pos` holds no piece.
pub fn cluster_at(registry: &Registry, pos: CellPos) -> Vec<CellPos> {
    let Some(piece) = registry.get(pos).piece() else {
        return Vec::new();
    };
    let mut visited = VisitedMask::new(registry);
    flood(registry, [pos], Admit::SameColor(piece.color), &mut visited)
}

/// Every occupied cell connected to `pos` regardless of color
pub fn group_at(registry: &Registry, pos: CellPos) -> Vec<CellPos> {
    let mut visited = VisitedMask::new(registry);
    flood(registry, [pos], Admit::AnyColor, &mut visited)
}

/// Occupied cells with no any-color path to row 0, row-major
pub fn floating(registry: &Registry) -> Vec<CellPos> {
    let mut visited = VisitedMask::new(registry);
    let top_row = (0..registry.geometry().row_len(0)).map(|col| CellPos::new(col, 0));
    flood(registry, top_row, Admit::AnyColor, &mut visited);

    registry
        .pieces()
        .filter_map(|piece| piece.cell)
        .filter(|pos| !visited.is_marked(registry, *pos))
        .collect()
}
