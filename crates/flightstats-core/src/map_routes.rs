// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::airports::AirportLookup;
use crate::flight::Flight;
use crate::geo::{great_circle_points, Coordinates};
use crate::route::RouteKey;
use chrono::NaiveDate;
use indexmap::IndexMap;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Base line weight so a route flown once is still visible on the map.
pub const BASE_ROUTE_WEIGHT: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapAirport {
    pub iata: String,
    pub coords: Coordinates,
}

/// One line on the route map, covering both directions of travel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapRoute {
    pub airport1: MapAirport,
    pub airport2: MapAirport,
    pub weight: f64,
    /// `None` when none of the route's flights carries a valid date.
    pub most_recent_year: Option<String>,
}

impl MapRoute {
    pub fn route(&self) -> RouteKey {
        RouteKey::new(&self.airport1.iata, &self.airport2.iata)
    }

    /// Number of flights behind this line.
    pub fn traversals(&self) -> usize {
        (self.weight - BASE_ROUTE_WEIGHT).round() as usize
    }

    /// Polyline along the great circle, for drawing the route curved.
    pub fn arc(&self, segments: usize) -> Vec<Coordinates> {
        great_circle_points(self.airport1.coords, self.airport2.coords, segments)
    }
}

struct RouteAggregate {
    from: MapAirport,
    to: MapAirport,
    count: usize,
    latest: Option<NaiveDate>,
}

/// Deduplicates flights into one weighted line per canonical route.
///
/// Endpoints are resolved once, on the first flight of a route. If either
/// is unknown the route is left off the map for good; later flights on it
/// are not retried. Output follows first-seen order.
pub fn build_map_routes<L: AirportLookup + ?Sized>(
    flights: &[Flight],
    reference: &L,
) -> Vec<MapRoute> {
    let mut routes: IndexMap<RouteKey, Option<RouteAggregate>> = IndexMap::new();

    for flight in flights {
        let key = RouteKey::new(&flight.origin, &flight.destination);
        let slot = routes.entry(key).or_insert_with_key(|key| {
            let (a, b) = key.endpoints();
            match (reference.coords(a), reference.coords(b)) {
                (Some(ca), Some(cb)) => Some(RouteAggregate {
                    from: MapAirport {
                        iata: a.to_string(),
                        coords: ca,
                    },
                    to: MapAirport {
                        iata: b.to_string(),
                        coords: cb,
                    },
                    count: 0,
                    latest: None,
                }),
                _ => {
                    warn!("Route left off the map; endpoint not in reference — route={}", key);
                    None
                }
            }
        });

        if let Some(agg) = slot {
            agg.count += 1;
            if let Some(date) = flight.parsed_date() {
                agg.latest = agg.latest.max(Some(date));
            }
        }
    }

    let excluded = routes.values().filter(|r| r.is_none()).count();
    let map_routes: Vec<MapRoute> = routes
        .into_values()
        .flatten()
        .map(|agg| MapRoute {
            airport1: agg.from,
            airport2: agg.to,
            weight: BASE_ROUTE_WEIGHT + agg.count as f64,
            most_recent_year: agg.latest.map(|d| d.format("%Y").to_string()),
        })
        .collect();

    debug!(
        "Built map routes — flights={} routes={} excluded={}",
        flights.len(),
        map_routes.len(),
        excluded
    );
    map_routes
}

/// Groups map routes by their most recent year, for per-year layer toggles.
/// Undated routes are grouped under `None`.
pub fn routes_by_year(routes: &[MapRoute]) -> IndexMap<Option<String>, Vec<&MapRoute>> {
    let mut grouped: IndexMap<Option<String>, Vec<&MapRoute>> = IndexMap::new();
    for route in routes {
        grouped
            .entry(route.most_recent_year.clone())
            .or_default()
            .push(route);
    }
    grouped
}
