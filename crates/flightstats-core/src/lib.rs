// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

pub mod airports;
pub mod config;
pub mod dashboard;
pub mod flight;
pub mod geo;
pub mod map_routes;
pub mod route;
pub mod stats;

pub use airports::{AirportLookup, AirportRecord, AirportReference, ReferenceError};
pub use config::StatsConfig;
pub use dashboard::Dashboard;
pub use flight::{Flight, FlightError, FlightLogReader};
pub use geo::{haversine_km, Coordinates};
pub use map_routes::{build_map_routes, MapRoute};
pub use route::{canonical_route, RouteKey};
pub use stats::{compute_stats, StatsAggregator, TravelStats};

use serde::{Deserialize, Serialize};
use std::fmt;

/// A data-integrity problem found while aggregating. These never abort a
/// computation; they ride along with the result so the caller can show them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataIssue {
    /// The flight's date is not a valid `YYYY-MM-DD` calendar date. The
    /// flight still counts towards totals but not towards calendar figures.
    MalformedDate { flight_id: u64, value: String },
    /// The code has no entry in the airport reference.
    UnknownAirport { code: String },
}

impl fmt::Display for DataIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataIssue::MalformedDate { flight_id, value } => {
                write!(f, "flight {} has malformed date {:?}", flight_id, value)
            }
            DataIssue::UnknownAirport { code } => {
                write!(f, "airport {} is not in the reference table", code)
            }
        }
    }
}
