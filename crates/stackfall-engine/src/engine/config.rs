use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

use super::scheduler::TickTier;

/// Which [`Randomizer`](super::Randomizer) feeds the upcoming queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RandomizerKind {
    /// Independent uniform draws.
    #[default]
    Uniform,
    /// Shuffled bags of all seven kinds.
    Bag,
}

/// Timing and randomizer settings for a [`GameEngine`](super::GameEngine).
///
/// Every field has a default, so a JSON config only needs the fields it
/// overrides:
///
/// ```
/// use stackfall_engine::EngineConfig;
///
/// let config: EngineConfig = serde_json::from_str(r#"{ "fast_tick_ms": 20 }"#).unwrap();
/// assert_eq!(config.fast_tick_ms, 20);
/// assert_eq!(config.normal_tick_ms, 800);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Gravity interval at level 1.
    pub normal_tick_ms: u64,
    /// How much faster gravity gets per level above 1.
    pub level_speedup_ms: u64,
    /// Lower bound of the gravity interval.
    pub min_tick_ms: u64,
    /// Lock grace interval once the piece has landed.
    pub sliding_tick_ms: u64,
    /// Gravity interval while soft drop is held.
    pub fast_tick_ms: u64,
    /// Interval between repeated lateral moves while a direction is held.
    pub move_repeat_ms: u64,
    pub randomizer: RandomizerKind,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            normal_tick_ms: 800,
            level_speedup_ms: 60,
            min_tick_ms: 200,
            sliding_tick_ms: 100,
            fast_tick_ms: 30,
            move_repeat_ms: 300,
            randomizer: RandomizerKind::Uniform,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let durations = [
            ("normal_tick_ms", self.normal_tick_ms),
            ("min_tick_ms", self.min_tick_ms),
            ("sliding_tick_ms", self.sliding_tick_ms),
            ("fast_tick_ms", self.fast_tick_ms),
            ("move_repeat_ms", self.move_repeat_ms),
        ];
        if let Some((field, _)) = durations.into_iter().find(|(_, ms)| *ms == 0) {
            return Err(ConfigError::ZeroDuration { field });
        }
        if self.min_tick_ms > self.normal_tick_ms {
            return Err(ConfigError::MinAboveNormal {
                min: self.min_tick_ms,
                normal: self.normal_tick_ms,
            });
        }
        Ok(())
    }

    /// Gravity interval of the Normal tier at `level`.
    ///
    /// `max(normal - (level - 1) * speedup, min)`.
    #[must_use]
    pub fn normal_tick(&self, level: usize) -> Duration {
        let steps = u64::try_from(level.saturating_sub(1)).unwrap_or(u64::MAX);
        let ms = self
            .normal_tick_ms
            .saturating_sub(steps.saturating_mul(self.level_speedup_ms));
        Duration::from_millis(ms.max(self.min_tick_ms))
    }

    #[must_use]
    pub fn tick_duration(&self, tier: TickTier, level: usize) -> Duration {
        match tier {
            TickTier::Normal => self.normal_tick(level),
            TickTier::Sliding => Duration::from_millis(self.sliding_tick_ms),
            TickTier::Fast => Duration::from_millis(self.fast_tick_ms),
        }
    }

    #[must_use]
    pub fn move_repeat(&self) -> Duration {
        Duration::from_millis(self.move_repeat_ms)
    }
}
