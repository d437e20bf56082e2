//! Board configuration
//!
//! One immutable value describing grid dimensions, placement geometry and
//! matching rules. Loaded from JSON or built from defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Configuration loading/validation failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Grid dimensions, placement geometry and matching rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Cells in even rows (odd rows hold one fewer)
    pub cols: u32,
    /// Playable rows; row index `rows` is the overflow row
    pub rows: u32,
    /// Distance between neighboring cell centers along a row
    pub cell_size: f32,
    /// Horizontal placement offset of column 0
    pub x_offset: f32,
    /// Vertical placement offset of row 0
    pub y_offset: f32,
    /// Smallest same-color cluster that gets removed
    pub min_cluster: usize,
    /// Rows filled with random pieces at reset
    pub initial_rows: u32,
    /// Number of palette colors in play (prefix of `Color::ALL`)
    pub palette_size: usize,
    /// Emptying the board ends the game as a win
    pub win_on_clear: bool,
    /// Lower bound of the permitted aim arc (radians)
    pub aim_min: f32,
    /// Upper bound of the permitted aim arc (radians)
    pub aim_max: f32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::with_size(DEFAULT_COLS, DEFAULT_ROWS, DEFAULT_CELL_SIZE)
    }
}

impl BoardConfig {
    /// Config for a board of the given size, centered horizontally with the
    /// overflow row's bottom edge at y = 0.
    pub fn with_size(cols: u32, rows: u32, cell_size: f32) -> Self {
        let half = cell_size / 2.0;
        Self {
            cols,
            rows,
            cell_size,
            x_offset: -(cols as f32 * cell_size) / 2.0 + half,
            y_offset: -((rows + 1) as f32 * cell_size) + half,
            min_cluster: MIN_CLUSTER,
            initial_rows: DEFAULT_INITIAL_ROWS.min(rows),
            palette_size: PALETTE_SIZE,
            win_on_clear: true,
            aim_min: MIN_AIM_ANGLE,
            aim_max: MAX_AIM_ANGLE,
        }
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        log::info!(
            "Loaded board config: {}x{} cells, min cluster {}",
            config.cols,
            config.rows,
            config.min_cluster
        );
        Ok(config)
    }

    /// Reject configurations the engine cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fail = |msg: String| Err(ConfigError::Invalid(msg));
        if !(2..=MAX_GRID_DIM).contains(&self.cols) {
            return fail(format!("cols must be in 2..={MAX_GRID_DIM}, got {}", self.cols));
        }
        if !(1..=MAX_GRID_DIM).contains(&self.rows) {
            return fail(format!("rows must be in 1..={MAX_GRID_DIM}, got {}", self.rows));
        }
        let floats = [
            ("cell_size", self.cell_size),
            ("x_offset", self.x_offset),
            ("y_offset", self.y_offset),
            ("aim_min", self.aim_min),
            ("aim_max", self.aim_max),
        ];
        if let Some((name, value)) = floats.iter().find(|(_, v)| !v.is_finite()) {
            return fail(format!("{name} must be finite, got {value}"));
        }
        if self.cell_size <= 0.0 {
            return fail(format!("cell_size must be positive, got {}", self.cell_size));
        }
        if self.min_cluster == 0 {
            return fail("min_cluster must be at least 1".to_string());
        }
        if self.initial_rows > self.rows {
            return fail(format!(
                "initial_rows ({}) exceeds rows ({})",
                self.initial_rows, self.rows
            ));
        }
        if !(1..=PALETTE_SIZE).contains(&self.palette_size) {
            return fail(format!(
                "palette_size must be in 1..={PALETTE_SIZE}, got {}",
                self.palette_size
            ));
        }
        if self.aim_min >= self.aim_max {
            return fail("aim_min must be below aim_max".to_string());
        }
        Ok(())
    }
}
