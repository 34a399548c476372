//! Flappy Core headless runner
//!
//! Plays the game unattended on the headless host with the autopilot, then
//! records the finished runs in the high score table.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use flappy_core::consts::SIM_DT;
use flappy_core::sim::{Autopilot, GameController, GamePhase, HeadlessWorld, RunLog};
use flappy_core::{FlapError, HighScores, Settings};

#[derive(Debug, Parser)]
#[command(name = "flappy-core", version, about = "Headless tap-to-flap runner")]
struct Args {
    /// Settings JSON file (defaults used when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Obstacle seed (overrides the settings file)
    #[arg(long)]
    seed: Option<u64>,

    /// Number of runs to play
    #[arg(long, default_value_t = 3)]
    runs: u32,

    /// Autopilot stops flapping at this score
    #[arg(long, default_value_t = 5)]
    give_up_at: u32,

    /// Simulated seconds allowed per run
    #[arg(long, default_value_t = 120.0)]
    max_seconds: f32,

    /// High score JSON file to update
    #[arg(long)]
    scores: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), FlapError> {
    let mut settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if args.seed.is_some() {
        settings.seed = args.seed;
    }

    let high_scores = match &args.scores {
        Some(path) => HighScores::load(path)?,
        None => HighScores::new(),
    };

    let world = HeadlessWorld::new(settings.gravity);
    let mut game = GameController::new(world, settings, (RunLog::new(), high_scores))?;
    let pilot = Autopilot::new(Some(args.give_up_at));
    let max_ticks = (args.max_seconds / SIM_DT) as u64;

    log::info!("Flappy Core (headless) starting, seed {}", game.seed());

    for _ in 0..args.runs {
        let mut ticks = 0u64;
        while game.phase() != GamePhase::Over && ticks < max_ticks {
            if pilot.should_tap(&game) {
                game.on_input()?;
            }
            game.step(SIM_DT)?;
            ticks += 1;
        }
        if game.phase() != GamePhase::Over {
            log::warn!("Run hit the {}s limit at score {}", args.max_seconds, game.current_score());
            break;
        }
        println!(
            "run {}: score {} after {:.1}s",
            game.run().runs,
            game.current_score(),
            ticks as f32 * SIM_DT
        );
        // Over -> Idle
        game.on_input()?;
    }

    let (_, (run_log, high_scores)) = game.into_parts();
    let best = run_log.scores().max().unwrap_or(0);
    println!("best this session: {best}");
    if let Some(top) = high_scores.top_score() {
        println!("all-time best: {top}");
    }

    if let Some(path) = &args.scores {
        high_scores.save(path)?;
    }
    Ok(())
}
