//! Simulation configuration structures.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// How the run deadline interacts with a blocked acquire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadlinePolicy {
    /// Deadline checked only after each dispatch.
    #[default]
    Cooperative,
    /// Deadline also interrupts an acquire that is still waiting.
    Preemptive,
}

/// Fill duration policy for consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillRate {
    /// Every consumer uses the same duration.
    Fixed(Duration),
    /// Each consumer draws once, uniformly from `[0, max)` milliseconds.
    Random {
        /// Exclusive upper bound.
        max: Duration,
    },
}

impl FillRate {
    /// Duration for a newly created consumer.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        match *self {
            Self::Fixed(d) => d,
            Self::Random { max } => {
                let max_ms = u64::try_from(max.as_millis()).unwrap_or(u64::MAX);
                if max_ms == 0 {
                    Duration::ZERO
                } else {
                    Duration::from_millis(rng.random_range(0..max_ms))
                }
            }
        }
    }
}

/// Full simulation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of stations (pumps).
    pub station_count: usize,
    /// Number of consumers (cars).
    pub consumer_count: usize,
    /// Seconds spent pairing before draining.
    pub run_duration_secs: u64,
    /// Fixed fill time in milliseconds; `0` selects a random rate per consumer.
    pub fill_rate_ms: u64,
    /// Exclusive upper bound for random fill rates, in milliseconds.
    pub random_fill_max_ms: u64,
    /// Deadline policy.
    pub deadline: DeadlinePolicy,
    /// Station name prefix, numbered as `<label> #<n>`.
    pub station_label: String,
    /// Consumer name prefix, numbered as `<label> #<n>`.
    pub consumer_label: String,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            station_count: 4,
            consumer_count: 10,
            run_duration_secs: 30,
            fill_rate_ms: 50,
            random_fill_max_ms: 5000,
            deadline: DeadlinePolicy::Cooperative,
            station_label: "Pump".into(),
            consumer_label: "Vehicle".into(),
        }
    }
}

impl SimulationConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.station_count == 0 {
            return Err("station_count must be greater than 0".into());
        }
        if self.consumer_count == 0 {
            return Err("consumer_count must be greater than 0".into());
        }
        if self.run_duration_secs == 0 {
            return Err("run_duration_secs must be greater than 0".into());
        }
        if self.fill_rate_ms == 0 && self.random_fill_max_ms == 0 {
            return Err("random_fill_max_ms must be greater than 0 when fill_rate_ms is 0".into());
        }
        if self.station_label.trim().is_empty() || self.consumer_label.trim().is_empty() {
            return Err("unit labels must not be empty".into());
        }
        Ok(())
    }

    /// Parse configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Wall-clock duration of the pairing phase.
    #[must_use]
    pub const fn run_duration(&self) -> Duration {
        Duration::from_secs(self.run_duration_secs)
    }

    /// Consumer fill policy derived from `fill_rate_ms`.
    #[must_use]
    pub const fn fill_rate(&self) -> FillRate {
        if self.fill_rate_ms == 0 {
            FillRate::Random {
                max: Duration::from_millis(self.random_fill_max_ms),
            }
        } else {
            FillRate::Fixed(Duration::from_millis(self.fill_rate_ms))
        }
    }
}
