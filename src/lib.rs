//! Bubble Grid - matching and placement engine for a bubble-shooter puzzle
//!
//! Core modules:
//! - `sim`: Deterministic engine (grid, clusters, shot resolution, scoring)
//! - `config`: Immutable board configuration

pub mod config;
pub mod sim;

pub use config::{BoardConfig, ConfigError};

use glam::Vec2;

/// Default board constants
pub mod consts {
    /// Cells in an even row
    pub const DEFAULT_COLS: u32 = 8;
    /// Playable rows (one overflow row sits below them)
    pub const DEFAULT_ROWS: u32 = 12;
    /// Cell pitch in placement units
    pub const DEFAULT_CELL_SIZE: f32 = 80.0;
    /// Rows filled at reset
    pub const DEFAULT_INITIAL_ROWS: u32 = 5;
    /// Largest accepted column or row count
    pub const MAX_GRID_DIM: u32 = 4096;

    /// Smallest removable same-color cluster
    pub const MIN_CLUSTER: usize = 3;
    /// Colors in the full palette
    pub const PALETTE_SIZE: usize = 7;

    /// Aim arc, measured like screen-space atan2 (y grows downward):
    /// 10 degrees above horizontal on either side
    pub const MIN_AIM_ANGLE: f32 = (180.0 + 10.0) * std::f32::consts::PI / 180.0;
    pub const MAX_AIM_ANGLE: f32 = (360.0 - 10.0) * std::f32::consts::PI / 180.0;
}

/// Normalized angle to [0, 2π)
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    angle.rem_euclid(std::f32::consts::TAU)
}

/// Angle of the vector from `origin` toward `target`
#[inline]
pub fn angle_toward(origin: Vec2, target: Vec2) -> f32 {
    let d = target - origin;
    d.y.atan2(d.x)
}
