use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use ratatui_runtime::Runtime;
use stackfall_engine::{GameEngine, PieceSeed};

use self::app::PlayApp;
use crate::{schema::summary::SavedSummary, util};

mod app;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Seed for the piece randomizer (32 hex digits); random if omitted
    #[clap(long)]
    seed: Option<PieceSeed>,
    /// Engine config file (JSON); defaults are used if omitted
    #[clap(long)]
    config: Option<PathBuf>,
    /// Save the summary of every finished game when the program exits
    #[clap(long)]
    save_summary: bool,
    /// Directory to save summary files
    #[clap(long, default_value = "./data/summaries/")]
    summary_dir: PathBuf,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            seed: None,
            config: None,
            save_summary: false,
            summary_dir: PathBuf::from("./data/summaries/"),
        }
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        seed,
        config,
        save_summary,
        summary_dir,
    } = arg;

    let config = util::load_engine_config(config.as_deref())?;
    let seed = util::seed_or_random(*seed);
    let engine = GameEngine::new(config, seed)?;

    let mut app = PlayApp::new(engine, seed);
    Runtime::new().run(&mut app)?;

    let summaries = app.into_summaries();
    if *save_summary {
        for summary in &summaries {
            let path = save(summary_dir, summary)?;
            eprintln!("Saved summary to {}", path.display());
        }
    }
    Ok(())
}

/// Writes `summary` to a new `summary_YYYYMMDD_HHMMSS.json` file in `dir`.
fn save(dir: &Path, summary: &SavedSummary) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory {}", dir.display()))?;

    let stem = format!("summary_{}", summary.recorded_at.format("%Y%m%d_%H%M%S"));
    let mut path = dir.join(format!("{stem}.json"));
    for n in 1.. {
        if !path.exists() {
            break;
        }
        path = dir.join(format!("{stem}_{n}.json"));
    }

    util::write_json(summary, Some(&path))?;
    Ok(path)
}
