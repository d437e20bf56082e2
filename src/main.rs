//! Bubble Grid entry point
//!
//! Headless native demo: plays seeded shots against the engine with a
//! straight-line stand-in for the motion system and prints the final board.
//!
//! Usage: `bubble-grid [CONFIG.json] [SEED] [SHOTS]`

mod native {
    use glam::Vec2;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use bubble_grid::BoardConfig;
    use bubble_grid::sim::{Board, Contact, Headless, aim_angle};

    /// Marching steps before a shot is forced onto the top boundary
    const MAX_TRACE_STEPS: usize = 10_000;

    pub fn run() -> Result<(), Box<dyn std::error::Error>> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        log::info!("Bubble Grid starting...");

        let mut args = std::env::args().skip(1);
        let config = match args.next() {
            Some(path) => BoardConfig::from_json(&std::fs::read_to_string(path)?)?,
            None => BoardConfig::default(),
        };
        let seed: u64 = args.next().map(|s| s.parse()).transpose()?.unwrap_or(12345);
        let shots: u32 = args.next().map(|s| s.parse()).transpose()?.unwrap_or(60);
        log::info!("Seed {seed}, up to {shots} shots");

        let mut board = Board::new(config.clone(), Headless::new(seed, config.palette_size))?;
        let mut aim_rng = Pcg32::seed_from_u64(seed.wrapping_add(1));

        let (left, right) = walls(&config);
        // Launcher sits one cell below the overflow row
        let origin = Vec2::new(
            (left + right) / 2.0,
            config.y_offset + (config.rows + 1) as f32 * config.cell_size,
        );

        for n in 0..shots {
            if board.is_game_over() {
                break;
            }
            let pointer = Vec2::new(aim_rng.random_range(left..right), config.y_offset);
            let angle = aim_angle(origin, pointer, &config);
            if !board.launch(angle) {
                break;
            }
            let contact = trace(&board, origin, angle);
            if let Some(res) = board.on_contact(contact)? {
                log::info!(
                    "shot {}: attached at {}, popped {}, dropped {}, score {}",
                    n + 1,
                    res.cell,
                    res.popped.len(),
                    res.dropped.len(),
                    board.score()
                );
            }
        }

        if let Some(outcome) = board.outcome() {
            log::info!("Finished: {outcome:?}");
        }
        println!("{}", serde_json::to_string_pretty(&board.snapshot())?);
        Ok(())
    }

    /// Horizontal limits a piece center can reach
    fn walls(config: &BoardConfig) -> (f32, f32) {
        let left = config.x_offset;
        let right = config.x_offset + (config.cols - 1) as f32 * config.cell_size;
        (left, right)
    }

    /// March a shot from `origin` along `angle`, bouncing off the side walls,
    /// until it touches an attached piece or the top boundary.
    fn trace(board: &Board<Headless>, origin: Vec2, angle: f32) -> Contact {
        let config = board.config();
        let geometry = board.registry().geometry();
        let (left, right) = walls(config);
        let step = config.cell_size / 8.0;
        let reach = config.cell_size * 0.9;

        let mut pos = origin;
        let mut dir = Vec2::new(angle.cos(), angle.sin());
        for _ in 0..MAX_TRACE_STEPS {
            pos += dir * step;
            if pos.x < left || pos.x > right {
                pos.x = pos.x.clamp(left, right);
                dir.x = -dir.x;
            }
            if pos.y <= config.y_offset {
                return Contact::TopBoundary { at: pos };
            }
            let hit = board
                .registry()
                .pieces()
                .filter_map(|p| p.cell.map(|cell| (p.id, cell)))
                .find(|&(_, cell)| geometry.cell_to_point(cell).distance(pos) < reach);
            if let Some((id, _)) = hit {
                return Contact::Piece { id, at: pos };
            }
        }
        Contact::TopBoundary { at: pos }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    native::run()
}
