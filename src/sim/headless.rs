//! In-process collaborators
//!
//! A seeded color source and a host that records every command it
//! receives. Drives the native demo and the engine tests.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::ports::{BoardListener, ColorSource, EffectsSink, MotionSystem};
use super::state::{Color, EffectHandle, Outcome, Piece, PieceId};

/// Uniform colors from a seeded PCG stream
#[derive(Debug, Clone)]
pub struct RandomColors {
    rng: Pcg32,
    palette: &'static [Color],
}

impl RandomColors {
    pub fn new(seed: u64, palette_size: usize) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            palette: Color::palette(palette_size),
        }
    }
}

impl ColorSource for RandomColors {
    fn next_color(&mut self) -> Color {
        self.palette[self.rng.random_range(0..self.palette.len())]
    }
}

/// Host that applies no physics or rendering, only bookkeeping
#[derive(Debug, Clone)]
pub struct Headless {
    colors: RandomColors,
    /// Colors handed out before falling back to the RNG
    pub queued: VecDeque<Color>,
    /// (piece, angle) per launch request
    pub launches: Vec<(PieceId, f32)>,
    pub removals: Vec<PieceId>,
    pub falls: Vec<PieceId>,
    pub scores: Vec<u64>,
    pub outcomes: Vec<Outcome>,
    next_handle: u64,
}

impl Headless {
    pub fn new(seed: u64, palette_size: usize) -> Self {
        Self {
            colors: RandomColors::new(seed, palette_size),
            queued: VecDeque::new(),
            launches: Vec::new(),
            removals: Vec::new(),
            falls: Vec::new(),
            scores: Vec::new(),
            outcomes: Vec::new(),
            next_handle: 1,
        }
    }

    /// Host whose first colors are `colors`, in order
    pub fn with_colors(colors: impl IntoIterator<Item = Color>) -> Self {
        let mut host = Self::new(0, Color::ALL.len());
        host.queued.extend(colors);
        host
    }

    /// Piece id of the most recent launch
    pub fn last_launch(&self) -> Option<PieceId> {
        self.launches.last().map(|&(id, _)| id)
    }

    fn handle(&mut self) -> EffectHandle {
        let handle = EffectHandle(self.next_handle);
        self.next_handle += 1;
        handle
    }
}

impl MotionSystem for Headless {
    fn launch(&mut self, piece: &Piece, angle: f32) {
        log::debug!("launch {} at {:.3} rad", piece.id, angle);
        self.launches.push((piece.id, angle));
    }
}

impl ColorSource for Headless {
    fn next_color(&mut self) -> Color {
        self.queued
            .pop_front()
            .unwrap_or_else(|| self.colors.next_color())
    }
}

impl EffectsSink for Headless {
    fn play_removal(&mut self, piece: &Piece) -> EffectHandle {
        self.removals.push(piece.id);
        self.handle()
    }

    fn play_fall(&mut self, piece: &Piece) -> EffectHandle {
        self.falls.push(piece.id);
        self.handle()
    }
}

impl BoardListener for Headless {
    fn on_score_changed(&mut self, score: u64) {
        self.scores.push(score);
    }

    fn on_game_over(&mut self, outcome: Outcome) {
        self.outcomes.push(outcome);
    }
}
