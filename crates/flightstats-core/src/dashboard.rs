// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::airports::AirportLookup;
use crate::flight::Flight;
use crate::map_routes::{build_map_routes, MapRoute};
use crate::stats::{StatsAggregator, TravelStats};
use crate::DataIssue;
use serde::{Deserialize, Serialize};

/// The combined payload the map/statistics page consumes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub routes: Vec<MapRoute>,
    pub stats: TravelStats,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<DataIssue>,
}

impl Dashboard {
    /// Runs the stats pass and the map pass over the same snapshot.
    pub fn build<L: AirportLookup + ?Sized>(
        flights: &[Flight],
        reference: &L,
        aggregator: &StatsAggregator,
    ) -> Self {
        let mut stats = aggregator.aggregate(flights, reference);
        let issues = std::mem::take(&mut stats.issues);
        Self {
            routes: build_map_routes(flights, reference),
            stats,
            issues,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
