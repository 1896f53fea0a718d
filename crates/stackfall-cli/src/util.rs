use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use anyhow::Context;
use rand::Rng as _;
use serde::{Serialize, de::DeserializeOwned};
use stackfall_engine::{EngineConfig, PieceSeed};

/// Writes `value` as pretty JSON to `path`, or to stdout when no path is given.
pub fn write_json<T>(value: &T, path: Option<&Path>) -> anyhow::Result<()>
where
    T: Serialize,
{
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            write_json_to(BufWriter::new(file), value)
                .with_context(|| format!("Failed to write JSON to {}", path.display()))
        }
        None => write_json_to(io::stdout().lock(), value).context("Failed to write JSON to stdout"),
    }
}

fn write_json_to<W, T>(mut writer: W, value: &T) -> anyhow::Result<()>
where
    W: Write,
    T: Serialize,
{
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;
    serde_json::from_reader(io::BufReader::new(file))
        .with_context(|| format!("Failed to parse {} file: {}", file_kind, path.display()))
}

/// Loads and validates the engine configuration, or the defaults when no
/// file is given.
pub fn load_engine_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let config: EngineConfig = read_json_file("engine config", path)?;
    config
        .validate()
        .with_context(|| format!("Invalid engine config: {}", path.display()))?;
    Ok(config)
}

/// Uses the given seed or draws a fresh one.
pub fn seed_or_random(seed: Option<PieceSeed>) -> PieceSeed {
    seed.unwrap_or_else(|| rand::rng().random())
}
