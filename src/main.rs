//! Orb Flap headless driver
//!
//! Plays runs back to back with a simulated frame clock, either on
//! autopilot or with a fixed flap cadence, and prints how each run ended.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, ensure};
use clap::Parser;

use orb_flap::EngineConfig;
use orb_flap::sim::{EndCause, FixedStep, GameEvent, GamePhase, GameState, RenderSlots, TickInput};

/// Fastest simulated frame rate; beyond this a frame is too short to ever
/// add up to a simulation step
const MAX_FPS: f32 = 1000.0;

#[derive(Parser, Debug)]
#[command(version, about = "Run the Orb Flap simulation without a renderer")]
struct Args {
    /// RNG seed (defaults to the current time)
    #[arg(long)]
    seed: Option<u64>,

    /// JSON engine config; missing fields use defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// number of runs to play
    #[arg(long, default_value_t = 3)]
    runs: u32,

    /// give up on a run after this many simulated seconds
    #[arg(long, default_value_t = 60.0)]
    max_seconds: f32,

    /// simulated frame rate of the driver (at most 1000)
    #[arg(long, default_value_t = 60.0)]
    fps: f32,

    /// flap every N frames instead of using the autopilot
    #[arg(long)]
    manual_flap_every: Option<u32>,

    /// print the effective config as JSON and exit
    #[arg(long)]
    dump_config: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    if args.dump_config {
        println!("{}", config.to_json_pretty()?);
        return Ok(());
    }

    check_args(&args)?;

    let seed = match args.seed {
        Some(seed) => seed,
        None => SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .context("system clock is before the Unix epoch")?
            .as_nanos() as u64,
    };
    log::info!("Orb Flap (headless) starting with seed {}", seed);

    let mut state = GameState::new(config, seed);
    let mut slots = RenderSlots::new(state.config().render_slots);

    for _ in 0..args.runs {
        let cause = play_run(&mut state, &mut slots, &args);
        let (run, score, elapsed) = (state.runs(), state.score(), state.elapsed());
        match cause {
            Some(EndCause::OutOfBounds) => {
                println!("run {run}: {score} pillars in {elapsed:.1}s, left the screen")
            }
            Some(EndCause::HitPillar { pillar_id }) => {
                println!("run {run}: {score} pillars in {elapsed:.1}s, hit pillar {pillar_id}")
            }
            None => {
                // A run still in progress cannot be restarted; stop ticking instead
                println!("run {run}: {score} pillars, still alive after {elapsed:.0}s, stopping");
                break;
            }
        }
    }

    println!("best: {}", state.best_score().max(state.score()));
    Ok(())
}

/// Reject argument values the driver cannot play with
fn check_args(args: &Args) -> Result<()> {
    ensure!(
        args.fps.is_finite() && args.fps > 0.0 && args.fps <= MAX_FPS,
        "--fps must be in (0, {MAX_FPS}], got {}",
        args.fps
    );
    ensure!(
        args.max_seconds.is_finite() && args.max_seconds > 0.0,
        "--max-seconds must be positive"
    );
    if let Some(every) = args.manual_flap_every {
        ensure!(every > 0, "--manual-flap-every must be at least 1");
    }
    Ok(())
}

/// Play one run to its end (or the time limit); returns why it ended
fn play_run(state: &mut GameState, slots: &mut RenderSlots, args: &Args) -> Option<EndCause> {
    let frame_dt = 1.0 / args.fps;
    let mut stepper = FixedStep::new();
    let mut frame: u32 = 0;
    let mut ended = None;

    let mut input = TickInput {
        start: true,
        autopilot: args.manual_flap_every.is_none(),
        ..Default::default()
    };

    loop {
        input.flap = args
            .manual_flap_every
            .is_some_and(|every| frame > 0 && frame % every == 0);
        stepper.advance(state, &input, frame_dt);
        input.start = false;
        frame += 1;

        let occupied = slots.assign(state.pillars()).iter().flatten().count();
        log::trace!("frame {}: y={:.2}, {} pillar slots in use", frame, state.orb().pos.y, occupied);

        for event in state.drain_events() {
            match event {
                GameEvent::ScoreChanged { score } => log::debug!("score {}", score),
                GameEvent::Ended {
                    final_score, cause, ..
                } => {
                    log::info!("run over ({:?}) with {}", cause, final_score);
                    ended = Some(cause);
                }
            }
        }

        if state.phase() != GamePhase::Running {
            break;
        }
        if state.elapsed() >= args.max_seconds {
            log::info!("run {} hit the {}s limit", state.runs(), args.max_seconds);
            break;
        }
    }

    ended
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("orb-flap").chain(extra.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults_pass() {
        check_args(&args(&[])).unwrap();
        check_args(&args(&["--fps", "1000"])).unwrap();
    }

    #[test]
    fn test_rejects_frame_rates_that_never_step() {
        for fps in ["1e10", "1001", "0", "inf", "NaN"] {
            let err = check_args(&args(&["--fps", fps])).unwrap_err();
            assert!(err.to_string().contains("--fps"), "{fps}: {err}");
        }
    }

    #[test]
    fn test_rejects_zero_flap_cadence() {
        assert!(check_args(&args(&["--manual-flap-every", "0"])).is_err());
    }

    #[test]
    fn test_fastest_frame_rate_still_advances() {
        let mut state = GameState::new(EngineConfig::default(), 1);
        let args = args(&["--fps", "1000", "--max-seconds", "0.5", "--manual-flap-every", "20"]);
        let mut slots = RenderSlots::new(state.config().render_slots);

        let cause = play_run(&mut state, &mut slots, &args);
        assert!(cause.is_some() || state.elapsed() >= 0.5);
        assert!(state.elapsed() > 0.0);
    }
}
