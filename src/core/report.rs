//! Final usage report collected from quiesced pools.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{ResourcePool, ResourceUnit, StationError, UnitRole};

/// Final counter for one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitReport {
    /// Unit identifier.
    pub id: String,
    /// Station or consumer, with the consumer's fill rate.
    pub role: UnitRole,
    /// Completed work tasks.
    pub usage_count: u64,
}

impl From<ResourceUnit> for UnitReport {
    fn from(unit: ResourceUnit) -> Self {
        Self {
            id: unit.id().to_string(),
            role: unit.role(),
            usage_count: unit.usage_count(),
        }
    }
}

impl fmt::Display for UnitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.role {
            UnitRole::Station => write!(f, "{} pumped {} times.", self.id, self.usage_count),
            UnitRole::Consumer { fill_rate } => write!(
                f,
                "{} filled {} times with a {}ms fill rate.",
                self.id,
                self.usage_count,
                fill_rate.as_millis()
            ),
        }
    }
}

/// Every unit of both pools, in drain order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrainReport {
    /// Station lines, station pool FIFO order.
    pub stations: Vec<UnitReport>,
    /// Consumer lines, consumer pool FIFO order.
    pub consumers: Vec<UnitReport>,
}

impl DrainReport {
    /// Sum of station counters.
    #[must_use]
    pub fn station_total(&self) -> u64 {
        self.stations.iter().map(|u| u.usage_count).sum()
    }

    /// Sum of consumer counters.
    #[must_use]
    pub fn consumer_total(&self) -> u64 {
        self.consumers.iter().map(|u| u.usage_count).sum()
    }

    /// Number of report lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stations.len() + self.consumers.len()
    }

    /// Whether the report holds no units.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stations first, then consumers.
    pub fn iter(&self) -> impl Iterator<Item = &UnitReport> {
        self.stations.iter().chain(self.consumers.iter())
    }
}

impl fmt::Display for DrainReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.iter() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Drains both pools once the engine has stopped.
#[derive(Debug, Clone, Copy, Default)]
pub struct DrainReporter;

impl DrainReporter {
    /// Drain both pools and check that every unit came back.
    pub fn collect(
        stations: &ResourcePool,
        consumers: &ResourcePool,
    ) -> Result<DrainReport, StationError> {
        Ok(DrainReport {
            stations: Self::drain_checked(stations)?,
            consumers: Self::drain_checked(consumers)?,
        })
    }

    fn drain_checked(pool: &ResourcePool) -> Result<Vec<UnitReport>, StationError> {
        let expected = pool.capacity();
        let units = pool.drain_all();
        if units.len() != expected {
            tracing::error!(pool = pool.name(), expected, found = units.len(), "units lost");
            return Err(StationError::IncompleteDrain {
                pool: pool.name().to_string(),
                expected,
                found: units.len(),
            });
        }
        Ok(units.into_iter().map(UnitReport::from).collect())
    }
}
