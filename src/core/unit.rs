//! Station and consumer units.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Role of a unit, and the work behaviour that goes with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitRole {
    /// A pump. Serves instantly as long as a consumer is present.
    Station,
    /// A vehicle that occupies a station for its fill rate.
    Consumer {
        /// Time one fill takes, fixed when the unit is created.
        fill_rate: Duration,
    },
}

impl UnitRole {
    /// Simulated delay for one unit of work.
    #[must_use]
    pub const fn work_duration(&self) -> Duration {
        match self {
            Self::Station => Duration::ZERO,
            Self::Consumer { fill_rate } => *fill_rate,
        }
    }
}

/// One pooled resource with its usage counter.
///
/// Units are moved in and out of their pool by value, so only the task that
/// currently owns a unit can touch its counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceUnit {
    id: String,
    role: UnitRole,
    usage_count: u64,
}

impl ResourceUnit {
    /// Create a station with a zero counter.
    pub fn station(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: UnitRole::Station,
            usage_count: 0,
        }
    }

    /// Create a consumer with a fixed fill rate and a zero counter.
    pub fn consumer(id: impl Into<String>, fill_rate: Duration) -> Self {
        Self {
            id: id.into(),
            role: UnitRole::Consumer { fill_rate },
            usage_count: 0,
        }
    }

    /// Unit identifier, unique within its pool.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Station or consumer.
    #[must_use]
    pub const fn role(&self) -> UnitRole {
        self.role
    }

    /// Number of completed work tasks this unit took part in.
    #[must_use]
    pub const fn usage_count(&self) -> u64 {
        self.usage_count
    }

    /// Consumer fill rate; `None` for stations.
    #[must_use]
    pub const fn fill_rate(&self) -> Option<Duration> {
        match self.role {
            UnitRole::Station => None,
            UnitRole::Consumer { fill_rate } => Some(fill_rate),
        }
    }

    /// Whether this unit is a station.
    #[must_use]
    pub const fn is_station(&self) -> bool {
        matches!(self.role, UnitRole::Station)
    }

    /// Count one completed unit of work.
    pub(crate) fn record_use(&mut self) {
        self.usage_count += 1;
    }
}
