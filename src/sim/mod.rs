//! Deterministic engine module
//!
//! All grid logic lives here. This module must stay pure:
//! - No rendering, physics or audio; collaborators are reached through `ports`
//! - Seeded RNG only
//! - Stable iteration order (row-major)

pub mod board;
pub mod cluster;
pub mod coords;
pub mod error;
pub mod headless;
pub mod ports;
pub mod registry;
pub mod resolve;
pub mod shot;
pub mod state;

pub use board::{Board, BoardSnapshot};
pub use cluster::{cluster_at, floating, group_at};
pub use coords::{Geometry, neighbors};
pub use error::{EngineError, PlacementError};
pub use headless::{Headless, RandomColors};
pub use ports::{BoardListener, Collaborators, ColorSource, EffectsSink, MotionSystem};
pub use registry::{Cell, Registry};
pub use resolve::{Contact, resolve};
pub use shot::{Resolution, ShotLifecycle, ShotSession, aim_angle};
pub use state::{CellPos, Color, EffectHandle, Outcome, Piece, PieceId, ShotPhase};
