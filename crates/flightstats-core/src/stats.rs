// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::airports::AirportLookup;
use crate::config::StatsConfig;
use crate::flight::Flight;
use crate::geo::{haversine_km, Coordinates};
use crate::route::RouteKey;
use crate::DataIssue;
use chrono::{Datelike, NaiveDate};
use indexmap::{IndexMap, IndexSet};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub const KM_PER_MILE: f64 = 1.60934;
pub const EARTH_CIRCUMFERENCE_KM: f64 = 40_075.0;
pub const EARTH_MOON_DISTANCE_KM: f64 = 384_400.0;
pub const DAYS_PER_MONTH: f64 = 30.44;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeroStats {
    pub total_flights: usize,
    pub total_countries: usize,
    pub total_airports: usize,
    pub total_routes: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DistanceStats {
    pub total_km: f64,
    pub total_miles: f64,
    pub earth_circumnavigations: f64,
    pub percent_to_moon: f64,
}

impl DistanceStats {
    pub fn from_km(total_km: f64) -> Self {
        Self {
            total_km,
            total_miles: total_km / KM_PER_MILE,
            earth_circumnavigations: total_km / EARTH_CIRCUMFERENCE_KM,
            percent_to_moon: total_km / EARTH_MOON_DISTANCE_KM * 100.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeStats {
    pub total_hours: f64,
    pub total_days: f64,
    pub total_weeks: f64,
    pub total_months: f64,
}

impl TimeStats {
    pub fn from_km(total_km: f64, speed_kmh: f64) -> Self {
        let total_hours = if speed_kmh > 0.0 {
            total_km / speed_kmh
        } else {
            0.0
        };
        let total_days = total_hours / 24.0;
        Self {
            total_hours,
            total_days,
            total_weeks: total_days / 7.0,
            total_months: total_days / DAYS_PER_MONTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirportRank {
    pub iata: String,
    pub count: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRank {
    pub route: RouteKey,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearCount {
    pub year: i32,
    pub count: usize,
}

/// First flight (1-based, chronological) at which the running distance
/// reached `distance_km`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub distance_km: f64,
    pub reached_at_flight: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CumulativePoint {
    pub flight_number: usize,
    pub total_km: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightSummary {
    pub flight_id: u64,
    pub origin: String,
    pub destination: String,
    pub distance_km: f64,
}

impl From<&Flight> for FlightSummary {
    fn from(f: &Flight) -> Self {
        Self {
            flight_id: f.id,
            origin: f.origin.clone(),
            destination: f.destination.clone(),
            distance_km: f.distance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityVisits {
    pub city: String,
    pub visits: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryVisits {
    pub country: String,
    pub visits: usize,
    pub cities: Vec<CityVisits>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompassPoint {
    pub iata: String,
    pub city: Option<String>,
    pub coords: Coordinates,
    pub distance_km: f64,
}

/// The furthest airports in each compass direction reached directly from home.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HometownExtremes {
    pub hometown: String,
    pub northernmost: CompassPoint,
    pub southernmost: CompassPoint,
    pub easternmost: CompassPoint,
    pub westernmost: CompassPoint,
}

/// Everything the statistics page shows, from one pass over the flight list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TravelStats {
    pub distance_stats: DistanceStats,
    pub time_stats: TimeStats,
    pub top_airports: Vec<AirportRank>,
    pub top_routes: Vec<RouteRank>,
    /// Most recent first.
    pub unique_years: Vec<i32>,
    pub hero_stats: HeroStats,

    pub yearly_counts: Vec<YearCount>,
    /// January first.
    pub monthly_counts: Vec<usize>,
    /// Monday first.
    pub weekday_counts: Vec<usize>,
    pub milestones: Vec<Milestone>,
    pub cumulative_distance: Vec<CumulativePoint>,
    pub shortest_flight: Option<FlightSummary>,
    pub longest_flight: Option<FlightSummary>,
    pub visited_countries: Vec<String>,
    pub country_breakdown: Vec<CountryVisits>,
    pub hometown: Option<HometownExtremes>,

    #[serde(skip)]
    pub issues: Vec<DataIssue>,
}

#[derive(Debug, Clone, Default)]
pub struct StatsAggregator {
    config: StatsConfig,
}

impl StatsAggregator {
    pub fn new(config: StatsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StatsConfig {
        &self.config
    }

    pub fn aggregate<L: AirportLookup + ?Sized>(
        &self,
        flights: &[Flight],
        reference: &L,
    ) -> TravelStats {
        let mut dates: Vec<Option<NaiveDate>> = Vec::with_capacity(flights.len());
        let mut issues = Vec::new();

        for flight in flights {
            let date = flight.parsed_date();
            if date.is_none() {
                warn!(
                    "Flight date is malformed; excluded from calendar stats — id={} date={:?}",
                    flight.id, flight.date
                );
                issues.push(DataIssue::MalformedDate {
                    flight_id: flight.id,
                    value: flight.date.clone(),
                });
            }
            dates.push(date);
        }

        // Counting oldest first makes ties rank by first appearance in time,
        // whatever order the store handed the flights over in.
        let order = chronological_order(&dates);

        let mut airport_visits: IndexMap<&str, usize> = IndexMap::new();
        let mut route_counts: IndexMap<RouteKey, usize> = IndexMap::new();
        let mut total_km = 0.0;

        for &i in &order {
            let flight = &flights[i];
            *airport_visits.entry(flight.origin.as_str()).or_insert(0) += 1;
            *airport_visits.entry(flight.destination.as_str()).or_insert(0) += 1;
            *route_counts
                .entry(RouteKey::new(&flight.origin, &flight.destination))
                .or_insert(0) += 1;
            total_km += flight.distance;
        }

        for code in airport_visits.keys() {
            if reference.airport(code).is_none() {
                issues.push(DataIssue::UnknownAirport {
                    code: code.to_string(),
                });
            }
        }

        let countries: BTreeSet<&str> = airport_visits
            .keys()
            .filter_map(|code| reference.country(code))
            .collect();

        let hero_stats = HeroStats {
            total_flights: flights.len(),
            total_countries: countries.len(),
            total_airports: airport_visits.len(),
            total_routes: route_counts.len(),
        };

        let (yearly_counts, monthly_counts, weekday_counts) = calendar_breakdown(&dates);
        let unique_years = yearly_counts.iter().rev().map(|y| y.year).collect();

        let (milestones, cumulative_distance) =
            milestones(flights, &order, &self.config.milestones_km);

        let hometown = self
            .config
            .hometown
            .as_deref()
            .and_then(|home| hometown_extremes(flights, reference, home));

        let stats = TravelStats {
            distance_stats: DistanceStats::from_km(total_km),
            time_stats: TimeStats::from_km(total_km, self.config.cruise_speed_kmh),
            top_airports: rank_airports(&airport_visits, self.config.top_n),
            top_routes: rank_routes(&route_counts, self.config.top_n),
            unique_years,
            hero_stats,
            yearly_counts,
            monthly_counts,
            weekday_counts,
            milestones,
            cumulative_distance,
            shortest_flight: shortest_flight(flights).map(FlightSummary::from),
            longest_flight: longest_flight(flights).map(FlightSummary::from),
            visited_countries: countries.iter().map(|c| c.to_string()).collect(),
            country_breakdown: country_breakdown(&airport_visits, reference),
            hometown,
            issues,
        };

        debug!(
            "Aggregated travel stats — flights={} airports={} routes={} total_km={:.1} issues={}",
            stats.hero_stats.total_flights,
            stats.hero_stats.total_airports,
            stats.hero_stats.total_routes,
            total_km,
            stats.issues.len()
        );
        stats
    }
}

/// Aggregates with the default configuration.
pub fn compute_stats<L: AirportLookup + ?Sized>(
    flights: &[Flight],
    reference: &L,
) -> TravelStats {
    StatsAggregator::default().aggregate(flights, reference)
}

/// Orders by count descending. `sort_by` is stable, so equal counts keep
/// the order in which the airports were first seen chronologically.
fn rank_airports(visits: &IndexMap<&str, usize>, top_n: usize) -> Vec<AirportRank> {
    let total: usize = visits.values().sum();
    let mut ranked: Vec<(&str, usize)> = visits.iter().map(|(k, v)| (*k, *v)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
        .into_iter()
        .take(top_n)
        .map(|(iata, count)| AirportRank {
            iata: iata.to_string(),
            count,
            percent: if total > 0 {
                count as f64 / total as f64 * 100.0
            } else {
                0.0
            },
        })
        .collect()
}

fn rank_routes(routes: &IndexMap<RouteKey, usize>, top_n: usize) -> Vec<RouteRank> {
    let mut ranked: Vec<(&RouteKey, usize)> = routes.iter().map(|(k, v)| (k, *v)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
        .into_iter()
        .take(top_n)
        .map(|(route, count)| RouteRank {
            route: route.clone(),
            count,
        })
        .collect()
}

fn calendar_breakdown(dates: &[Option<NaiveDate>]) -> (Vec<YearCount>, Vec<usize>, Vec<usize>) {
    let mut years: BTreeMap<i32, usize> = BTreeMap::new();
    let mut months = vec![0usize; 12];
    let mut weekdays = vec![0usize; 7];

    for date in dates.iter().flatten() {
        *years.entry(date.year()).or_insert(0) += 1;
        months[date.month0() as usize] += 1;
        weekdays[date.weekday().num_days_from_monday() as usize] += 1;
    }

    let yearly = years
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect();
    (yearly, months, weekdays)
}

/// Flight indices oldest first. Undated flights go last; equal dates keep
/// input order.
fn chronological_order(dates: &[Option<NaiveDate>]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..dates.len()).collect();
    order.sort_by_key(|&i| (dates[i].is_none(), dates[i]));
    order
}

/// Walks flights in `order` accumulating stored distances.
fn milestones(
    flights: &[Flight],
    order: &[usize],
    thresholds: &[f64],
) -> (Vec<Milestone>, Vec<CumulativePoint>) {
    let mut reached: Vec<Option<usize>> = vec![None; thresholds.len()];
    let mut series = Vec::with_capacity(flights.len() + 1);
    series.push(CumulativePoint {
        flight_number: 0,
        total_km: 0.0,
    });

    let mut cumulative = 0.0;
    for (n, &i) in order.iter().enumerate() {
        cumulative += flights[i].distance;
        let flight_number = n + 1;
        series.push(CumulativePoint {
            flight_number,
            total_km: cumulative,
        });
        for (slot, threshold) in reached.iter_mut().zip(thresholds) {
            if slot.is_none() && cumulative >= *threshold {
                *slot = Some(flight_number);
            }
        }
    }

    let milestones = thresholds
        .iter()
        .zip(reached)
        .map(|(&distance_km, reached_at_flight)| Milestone {
            distance_km,
            reached_at_flight,
        })
        .collect();
    (milestones, series)
}

fn shortest_flight(flights: &[Flight]) -> Option<&Flight> {
    flights
        .iter()
        .filter(|f| f.distance > 0.0)
        .fold(None, |best: Option<&Flight>, f| match best {
            Some(b) if b.distance <= f.distance => Some(b),
            _ => Some(f),
        })
}

fn longest_flight(flights: &[Flight]) -> Option<&Flight> {
    flights
        .iter()
        .filter(|f| f.distance > 0.0)
        .fold(None, |best: Option<&Flight>, f| match best {
            Some(b) if b.distance >= f.distance => Some(b),
            _ => Some(f),
        })
}

fn country_breakdown<L: AirportLookup + ?Sized>(
    visits: &IndexMap<&str, usize>,
    reference: &L,
) -> Vec<CountryVisits> {
    let mut countries: IndexMap<&str, IndexMap<&str, usize>> = IndexMap::new();

    for (code, count) in visits {
        let Some(airport) = reference.airport(code) else {
            continue;
        };
        let Some(city) = airport.city.as_deref() else {
            continue;
        };
        if airport.country.is_empty() {
            continue;
        }
        *countries
            .entry(airport.country.as_str())
            .or_default()
            .entry(city)
            .or_insert(0) += count;
    }

    let mut breakdown: Vec<CountryVisits> = countries
        .into_iter()
        .map(|(country, cities)| {
            let mut cities: Vec<CityVisits> = cities
                .into_iter()
                .map(|(city, visits)| CityVisits {
                    city: city.to_string(),
                    visits,
                })
                .collect();
            cities.sort_by(|a, b| b.visits.cmp(&a.visits));
            CountryVisits {
                country: country.to_string(),
                visits: cities.iter().map(|c| c.visits).sum(),
                cities,
            }
        })
        .collect();
    breakdown.sort_by(|a, b| b.visits.cmp(&a.visits));
    breakdown
}

/// Compass extremes among the distinct destinations flown to from `home`.
/// Returns `None` when `home` cannot be resolved.
pub fn hometown_extremes<L: AirportLookup + ?Sized>(
    flights: &[Flight],
    reference: &L,
    home: &str,
) -> Option<HometownExtremes> {
    let home_airport = reference.airport(home)?;
    let home_coords = home_airport.coords();

    let point = |iata: &str, city: Option<&String>, coords: Coordinates| CompassPoint {
        iata: iata.to_string(),
        city: city.cloned(),
        coords,
        distance_km: haversine_km(home_coords, coords),
    };
    let start = point(&home_airport.code, home_airport.city.as_ref(), home_coords);
    let mut north = start.clone();
    let mut south = start.clone();
    let mut east = start.clone();
    let mut west = start;

    let destinations: IndexSet<&str> = flights
        .iter()
        .filter(|f| f.origin == home_airport.code)
        .map(|f| f.destination.as_str())
        .collect();

    for code in destinations {
        let Some(airport) = reference.airport(code) else {
            continue;
        };
        let c = airport.coords();
        if c.lat > north.coords.lat {
            north = point(&airport.code, airport.city.as_ref(), c);
        }
        if c.lat < south.coords.lat {
            south = point(&airport.code, airport.city.as_ref(), c);
        }
        if c.lon > east.coords.lon {
            east = point(&airport.code, airport.city.as_ref(), c);
        }
        if c.lon < west.coords.lon {
            west = point(&airport.code, airport.city.as_ref(), c);
        }
    }

    Some(HometownExtremes {
        hometown: home_airport.code.clone(),
        northernmost: north,
        southernmost: south,
        easternmost: east,
        westernmost: west,
    })
}
