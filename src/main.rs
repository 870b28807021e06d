//! Tile Runner entry point
//!
//! Headless demo: plays each level of a level set with a simple autopilot and
//! logs the outcome. Usage: `tile-runner [tuning.json] [levels.json]`.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use tile_runner::{LevelSet, Tuning};

    env_logger::init();
    log::info!("Tile Runner (headless) starting...");

    let mut args = std::env::args().skip(1);
    let tuning = match args.next() {
        Some(path) => Tuning::load_or_default(path),
        None => Tuning::default(),
    };
    let levels = match args.next() {
        Some(path) => match LevelSet::load(&path) {
            Ok(set) => set,
            Err(e) => {
                log::error!("Failed to load levels from {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => LevelSet::builtin(),
    };

    let mut won = 0;
    for (n, plan) in levels.levels.iter().enumerate() {
        let status = demo::play(plan, &tuning, n as u64);
        match status {
            Some(status) => log::info!("Level {}: {:?}", n + 1, status),
            None => log::info!("Level {}: out of time", n + 1),
        }
        if status == Some(tile_runner::Status::Won) {
            won += 1;
        }
    }
    println!("Autopilot cleared {}/{} levels", won, levels.len());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosts drive `tile_runner::Runner` directly on the web
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use tile_runner::runner::Frame;
    use tile_runner::{ActorKind, Keys, Level, LevelPlan, Runner, Status, Tuning};

    /// 60 Hz frames
    const FRAME_DT: f32 = 1.0 / 60.0;
    /// Give up after this many frames (one minute)
    const MAX_FRAMES: u32 = 60 * 60;

    /// Play one level to completion, returning its status
    pub fn play(plan: &LevelPlan, tuning: &Tuning, seed: u64) -> Option<Status> {
        let level = Level::new(plan, tuning.clone(), seed);
        let mut outcome = None;
        {
            let mut runner = Runner::new(level, |status| outcome = Some(status));
            for _ in 0..MAX_FRAMES {
                let keys = autopilot(runner.level());
                if let Frame::Finished(_) = runner.frame(FRAME_DT, &keys) {
                    break;
                }
            }
        }
        outcome
    }

    /// Walk toward the nearest coin, hopping whenever possible
    fn autopilot(level: &Level) -> Keys {
        let Some(player) = level.player() else {
            return Keys::default();
        };
        let target = level
            .actors()
            .iter()
            .filter(|a| a.kind() == ActorKind::Coin)
            .min_by(|a, b| {
                let da = a.pos.distance_squared(player.pos);
                let db = b.pos.distance_squared(player.pos);
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            });

        match target {
            Some(coin) => Keys {
                left: coin.pos.x + coin.size.x < player.pos.x,
                right: coin.pos.x > player.pos.x + player.size.x,
                up: true,
            },
            None => Keys::default(),
        }
    }
}
