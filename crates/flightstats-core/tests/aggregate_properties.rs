// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz
//
// Invariants that must hold for any flight list, exercised over a
// deterministic pseudo-random log.

use flightstats_core::{
    build_map_routes, canonical_route, compute_stats, haversine_km, AirportRecord,
    AirportReference, Coordinates, Flight,
};
use std::collections::HashSet;

const CODES: [(&str, f64, f64, &str); 14] = [
    ("LHR", 51.47, -0.45, "GB"),
    ("CDG", 49.01, 2.55, "FR"),
    ("FRA", 50.03, 8.56, "DE"),
    ("AMS", 52.31, 4.76, "NL"),
    ("MAD", 40.47, -3.56, "ES"),
    ("FCO", 41.80, 12.25, "IT"),
    ("ZRH", 47.46, 8.55, "CH"),
    ("VIE", 48.11, 16.57, "AT"),
    ("CPH", 55.62, 12.66, "DK"),
    ("ARN", 59.65, 17.92, "SE"),
    ("HEL", 60.32, 24.96, "FI"),
    ("DUB", 53.42, -6.27, "IE"),
    ("LIS", 38.78, -9.14, "PT"),
    ("ATH", 37.94, 23.94, "GR"),
];

fn reference() -> AirportReference {
    CODES
        .iter()
        .map(|(code, lat, lon, country)| AirportRecord::new(code, *lat, *lon, country))
        .collect()
}

/// Small LCG so the log is varied but identical on every run.
fn synthetic_log(n: usize, extra_codes: &[&str]) -> Vec<Flight> {
    let r = reference();
    let pool: Vec<&str> = CODES
        .iter()
        .map(|c| c.0)
        .chain(extra_codes.iter().copied())
        .collect();
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    let mut next = move || {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (state >> 33) as usize
    };

    (0..n)
        .map(|i| {
            let a = pool[next() % pool.len()];
            let mut b = pool[next() % pool.len()];
            if a == b {
                b = pool[(next() + 1) % pool.len()];
            }
            let date = format!(
                "{}-{:02}-{:02}",
                2015 + next() % 10,
                1 + next() % 12,
                1 + next() % 28
            );
            Flight::new(i as u64 + 1, a, b, &date, &r).unwrap()
        })
        .collect()
}

#[test]
fn test_route_counts_sum_to_flights() {
    let flights = synthetic_log(300, &[]);
    let routes = build_map_routes(&flights, &reference());
    let total: usize = routes.iter().map(|r| r.traversals()).sum();
    assert_eq!(total, flights.len());

    let stats = compute_stats(&flights, &reference());
    assert_eq!(routes.len(), stats.hero_stats.total_routes);
}

#[test]
fn test_airports_cover_map_airports() {
    let flights = synthetic_log(200, &["QQQ", "ZZZ"]);
    let routes = build_map_routes(&flights, &reference());
    let stats = compute_stats(&flights, &reference());

    let on_map: HashSet<&str> = routes
        .iter()
        .flat_map(|r| [r.airport1.iata.as_str(), r.airport2.iata.as_str()])
        .collect();
    assert!(stats.hero_stats.total_airports >= on_map.len());
    assert!(!on_map.contains("QQQ"));
    assert!(!on_map.contains("ZZZ"));
    assert!(stats.hero_stats.total_countries <= CODES.len());
}

#[test]
fn test_top_lists_sorted_and_bounded() {
    let flights = synthetic_log(250, &[]);
    let stats = compute_stats(&flights, &reference());

    assert_eq!(stats.top_airports.len(), 10);
    assert_eq!(stats.top_routes.len(), 10);
    assert!(stats.top_airports.windows(2).all(|w| w[0].count >= w[1].count));
    assert!(stats.top_routes.windows(2).all(|w| w[0].count >= w[1].count));
}

#[test]
fn test_short_lists_return_everything() {
    let r = reference();
    let flights = vec![
        Flight::new(1, "LHR", "CDG", "2020-01-01", &r).unwrap(),
        Flight::new(2, "CDG", "FRA", "2020-01-02", &r).unwrap(),
    ];
    let stats = compute_stats(&flights, &r);
    assert_eq!(stats.top_airports.len(), 3);
    assert_eq!(stats.top_routes.len(), 2);
}

#[test]
fn test_percent_shares() {
    let flights = synthetic_log(120, &[]);
    let stats = compute_stats(&flights, &reference());
    let total_visits = (flights.len() * 2) as f64;

    let sum: f64 = stats.top_airports.iter().map(|a| a.percent).sum();
    assert!(sum <= 100.0 + 1e-9);
    for a in &stats.top_airports {
        assert!((a.percent - 100.0 * a.count as f64 / total_visits).abs() < 1e-9);
    }
}

#[test]
fn test_unique_years_descending() {
    let flights = synthetic_log(150, &[]);
    let stats = compute_stats(&flights, &reference());
    assert!(stats.unique_years.windows(2).all(|w| w[0] > w[1]));
    let counted: usize = stats.yearly_counts.iter().map(|y| y.count).sum();
    assert_eq!(counted, flights.len());
}

#[test]
fn test_canonical_and_distance_symmetry() {
    for (a, lat_a, lon_a, _) in CODES {
        for (b, lat_b, lon_b, _) in CODES {
            assert_eq!(canonical_route(a, b), canonical_route(b, a));
            let p = Coordinates::new(lat_a, lon_a);
            let q = Coordinates::new(lat_b, lon_b);
            assert_eq!(haversine_km(p, q), haversine_km(q, p));
            assert!(haversine_km(p, q) >= 0.0);
        }
        let p = Coordinates::new(lat_a, lon_a);
        assert_eq!(haversine_km(p, p), 0.0);
    }
}
