use std::{path::PathBuf, time::Duration};

use anyhow::ensure;
use stackfall_engine::{
    EngineConfig, GameEngine, PieceSeed, PieceSpawner, SequenceRandomizer,
};

use crate::{
    schema::{
        script::{Script, Step},
        summary::SimulationReport,
    },
    util,
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Script file (JSON) with the steps to run
    script: PathBuf,
    /// Seed for random pieces (32 hex digits); random if omitted
    #[clap(long)]
    seed: Option<PieceSeed>,
    /// Engine config file (JSON); defaults are used if omitted
    #[clap(long)]
    config: Option<PathBuf>,
    /// Output file for the summary; stdout if omitted
    #[clap(long)]
    output: Option<PathBuf>,
    /// Print every engine event to stderr
    #[clap(long)]
    verbose: bool,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        script,
        seed,
        config,
        output,
        verbose,
    } = arg;

    let config = util::load_engine_config(config.as_deref())?;
    let script: Script = util::read_json_file("script", script)?;
    let seed = util::seed_or_random(*seed);

    eprintln!("Running {} script steps...", script.steps.len());
    let report = simulate(&script, config, seed, *verbose)?;
    eprintln!(
        "Finished after {} ms: score {}, lines {}, level {}{}",
        report.elapsed_ms,
        report.summary.score,
        report.summary.lines_cleared,
        report.summary.level,
        if report.game_over { " (game over)" } else { "" }
    );

    util::write_json(&report, output.as_deref())
}

fn simulate(
    script: &Script,
    config: EngineConfig,
    seed: PieceSeed,
    verbose: bool,
) -> anyhow::Result<SimulationReport> {
    let (mut engine, seed) = match &script.sequence {
        Some(sequence) => {
            ensure!(!sequence.is_empty(), "Script sequence must not be empty");
            let randomizer = SequenceRandomizer::new(sequence.clone());
            let spawner = PieceSpawner::new(Box::new(randomizer));
            (GameEngine::with_spawner(config, spawner)?, None)
        }
        None => (GameEngine::new(config, seed)?, Some(seed)),
    };

    let mut clock = Duration::ZERO;
    engine.start_game_with_board(script.start_board()?);
    report_events(&mut engine, clock, verbose);

    for step in &script.steps {
        match *step {
            Step::WaitMs(ms) => {
                let elapsed = Duration::from_millis(ms);
                engine.advance(elapsed);
                clock += elapsed;
            }
            Step::Input(input) => engine.apply(input),
        }
        report_events(&mut engine, clock, verbose);
    }

    Ok(SimulationReport {
        seed,
        game_over: engine.state().is_game_over(),
        elapsed_ms: u64::try_from(clock.as_millis()).unwrap_or(u64::MAX),
        summary: engine.last_summary().unwrap_or_else(|| engine.summary()),
    })
}

fn report_events(engine: &mut GameEngine, clock: Duration, verbose: bool) {
    for event in engine.drain_events() {
        if verbose {
            eprintln!("[{:>8} ms] {event:?}", clock.as_millis());
        }
    }
}
