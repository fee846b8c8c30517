// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz
//
// End-to-end checks of the combined stats + map payload.

use flightstats_core::stats::StatsAggregator;
use flightstats_core::{
    build_map_routes, compute_stats, AirportRecord, AirportReference, Dashboard, DataIssue, Flight,
};
use simplelog::{Config, LevelFilter, TestLogger};

fn init_logging() {
    let _ = TestLogger::init(LevelFilter::Debug, Config::default());
}

fn us_reference() -> AirportReference {
    vec![
        AirportRecord::new("LAX", 33.9425, -118.4081, "US").with_city("Los Angeles"),
        AirportRecord::new("JFK", 40.6398, -73.7789, "US").with_city("New York"),
        AirportRecord::new("ORD", 41.9786, -87.9048, "US").with_city("Chicago"),
        AirportRecord::new("YYZ", 43.6772, -79.6306, "CA").with_city("Toronto"),
    ]
    .into_iter()
    .collect()
}

fn add(id: u64, origin: &str, destination: &str, date: &str, r: &AirportReference) -> Flight {
    Flight::new(id, origin, destination, date, r).unwrap()
}

#[test]
fn test_round_trip_and_return_leg_merge() {
    init_logging();
    let r = us_reference();
    let flights = vec![
        add(1, "LAX", "JFK", "2023-01-01", &r),
        add(2, "JFK", "LAX", "2023-06-01", &r),
        add(3, "LAX", "ORD", "2023-02-01", &r),
    ];

    let dash = Dashboard::build(&flights, &r, &StatsAggregator::default());

    let hero = &dash.stats.hero_stats;
    assert_eq!(hero.total_flights, 3);
    assert_eq!(hero.total_routes, 2);
    assert_eq!(hero.total_airports, 3);
    assert_eq!(hero.total_countries, 1);

    assert_eq!(dash.routes.len(), 2);
    let jfk_lax = &dash.routes[0];
    assert_eq!(jfk_lax.route().as_str(), "JFK-LAX");
    assert_eq!(jfk_lax.traversals(), 2);
    assert_eq!(jfk_lax.weight, 2.5);
    assert_eq!(jfk_lax.most_recent_year.as_deref(), Some("2023"));

    let lax_ord = &dash.routes[1];
    assert_eq!(lax_ord.route().as_str(), "LAX-ORD");
    assert_eq!(lax_ord.traversals(), 1);

    assert_eq!(dash.stats.top_routes[0].route.as_str(), "JFK-LAX");
    assert_eq!(dash.stats.top_routes[0].count, 2);
    assert_eq!(dash.stats.top_airports[0].iata, "LAX");
    assert_eq!(dash.stats.top_airports[0].count, 3);
    assert_eq!(dash.stats.unique_years, vec![2023]);
    assert!(dash.issues.is_empty());
}

#[test]
fn test_unknown_destination() {
    init_logging();
    let r = us_reference();
    let flights = vec![
        add(1, "LAX", "JFK", "2022-01-01", &r),
        add(2, "JFK", "XXX", "2022-02-01", &r),
    ];

    let dash = Dashboard::build(&flights, &r, &StatsAggregator::default());

    assert_eq!(dash.routes.len(), 1);
    assert!(dash
        .routes
        .iter()
        .all(|m| m.airport1.iata != "XXX" && m.airport2.iata != "XXX"));
    assert_eq!(dash.stats.hero_stats.total_airports, 3);
    assert_eq!(dash.stats.hero_stats.total_countries, 1);
    assert_eq!(dash.stats.hero_stats.total_routes, 2);
    assert_eq!(flights[1].distance, 0.0);
    assert_eq!(
        dash.issues,
        vec![DataIssue::UnknownAirport {
            code: "XXX".to_string()
        }]
    );
}

#[test]
fn test_empty_input_is_zeroed() {
    let r = us_reference();
    let dash = Dashboard::build(&[], &r, &StatsAggregator::default());

    let hero = &dash.stats.hero_stats;
    assert_eq!(hero.total_flights, 0);
    assert_eq!(hero.total_countries, 0);
    assert_eq!(hero.total_airports, 0);
    assert_eq!(hero.total_routes, 0);
    assert!(dash.routes.is_empty());
    assert!(dash.stats.top_airports.is_empty());
    assert!(dash.stats.top_routes.is_empty());
    assert!(dash.stats.unique_years.is_empty());
    assert_eq!(dash.stats.distance_stats.total_km, 0.0);
    assert_eq!(dash.stats.time_stats.total_hours, 0.0);
    assert!(dash.stats.shortest_flight.is_none());
    assert!(dash.stats.milestones.iter().all(|m| m.reached_at_flight.is_none()));
    assert!(dash.issues.is_empty());
}

#[test]
fn test_repeat_runs_are_byte_identical() {
    let r = us_reference();
    let flights = vec![
        add(1, "YYZ", "ORD", "2020-05-05", &r),
        add(2, "ORD", "LAX", "2021-05-05", &r),
        add(3, "LAX", "YYZ", "2019-05-05", &r),
        add(4, "ORD", "YYZ", "2022-05-05", &r),
        add(5, "JFK", "ORD", "2022-07-05", &r),
    ];

    let first = serde_json::to_string(&build_map_routes(&flights, &r)).unwrap();
    let second = serde_json::to_string(&build_map_routes(&flights, &r)).unwrap();
    assert_eq!(first, second);

    let agg = StatsAggregator::default();
    let a = Dashboard::build(&flights, &r, &agg).to_json().unwrap();
    let b = Dashboard::build(&flights, &r, &agg).to_json().unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_json_shape() {
    let r = us_reference();
    let flights = vec![add(1, "LAX", "JFK", "2023-01-01", &r)];
    let dash = Dashboard::build(&flights, &r, &StatsAggregator::default());
    let value: serde_json::Value = serde_json::from_str(&dash.to_json().unwrap()).unwrap();

    let route = &value["routes"][0];
    assert_eq!(route["airport1"]["iata"], "JFK");
    assert_eq!(route["airport1"]["coords"][0], 40.6398);
    assert_eq!(route["airport2"]["coords"][1], -118.4081);
    assert_eq!(route["weight"], 1.5);
    assert_eq!(route["most_recent_year"], "2023");

    let stats = &value["stats"];
    for key in ["total_km", "total_miles", "earth_circumnavigations", "percent_to_moon"] {
        assert!(stats["distance_stats"][key].is_number(), "{}", key);
    }
    for key in ["total_hours", "total_days", "total_weeks", "total_months"] {
        assert!(stats["time_stats"][key].is_number(), "{}", key);
    }
    for key in ["total_flights", "total_countries", "total_airports", "total_routes"] {
        assert!(stats["hero_stats"][key].is_u64(), "{}", key);
    }
    assert_eq!(stats["top_airports"][0]["iata"], "LAX");
    assert_eq!(stats["top_airports"][0]["percent"], 50.0);
    assert_eq!(stats["top_routes"][0]["route"], "JFK-LAX");
    assert_eq!(stats["top_routes"][0]["count"], 1);
    assert_eq!(stats["unique_years"][0], 2023);
    // Clean data carries no issues key at all.
    assert!(value.get("issues").is_none());
}

#[test]
fn test_stored_distance_is_authoritative() {
    let r = us_reference();
    let mut f = add(1, "LAX", "JFK", "2023-01-01", &r);
    f.distance = 100.0;
    let stats = compute_stats(&[f], &r);
    assert_eq!(stats.distance_stats.total_km, 100.0);
}
