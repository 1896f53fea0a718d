use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stackfall_engine::{PieceSeed, SessionSummary};

/// A finished game's summary as written by `play --save-summary`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSummary {
    /// When the game ended (ISO 8601)
    pub recorded_at: DateTime<Utc>,
    /// Seed of the piece randomizer for the whole play session
    pub seed: PieceSeed,
    #[serde(flatten)]
    pub summary: SessionSummary,
}

/// Result of `simulate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationReport {
    /// Seed used for random pieces; absent when the script fixed the sequence
    pub seed: Option<PieceSeed>,
    /// Whether the game ended before the script did
    pub game_over: bool,
    /// Elapsed virtual time in milliseconds
    pub elapsed_ms: u64,
    #[serde(flatten)]
    pub summary: SessionSummary,
}
