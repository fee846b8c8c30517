// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use flightstats_core::config::{default_config_path, StatsConfig};
use flightstats_core::map_routes::routes_by_year;
use flightstats_core::{AirportReference, Dashboard, FlightLogReader, StatsAggregator};
use log::info;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Airport reference table (CSV with iata, lat, lon, country and optional city)
    #[arg(short, long, env = "FLIGHTSTATS_AIRPORTS")]
    airports: PathBuf,

    /// Flight log (CSV with id, origin, destination, date, distance)
    #[arg(short, long, env = "FLIGHTSTATS_FLIGHTS")]
    flights: PathBuf,

    /// Config file; defaults to the per-user config directory
    #[arg(short, long, env = "FLIGHTSTATS_CONFIG")]
    config: Option<PathBuf>,

    /// Home airport for the compass extremes (overrides the config file)
    #[arg(long, env = "FLIGHTSTATS_HOMETOWN")]
    hometown: Option<String>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the full dashboard payload (routes + stats) as JSON
    Dashboard {
        #[arg(long)]
        pretty: bool,
    },
    /// Print only the map routes as JSON
    Routes {
        #[arg(long)]
        pretty: bool,
    },
    /// Human-readable summary of the headline numbers
    Summary,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    let _ = TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto);

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let mut config = StatsConfig::load(&config_path)?;
    if let Some(home) = &cli.hometown {
        config.hometown = Some(home.to_uppercase());
    }

    let reference = AirportReference::load(&cli.airports)
        .with_context(|| format!("Failed to load airports from {}", cli.airports.display()))?;
    let flights = FlightLogReader::load(&cli.flights, &reference)?;
    info!(
        "Loaded inputs — airports={} flights={} config={}",
        reference.len(),
        flights.len(),
        config_path.display()
    );

    let dashboard = Dashboard::build(&flights, &reference, &StatsAggregator::new(config));

    match &cli.command {
        Commands::Dashboard { pretty } => {
            let json = if *pretty {
                dashboard.to_json_pretty()?
            } else {
                dashboard.to_json()?
            };
            println!("{}", json);
        }
        Commands::Routes { pretty } => {
            let json = if *pretty {
                serde_json::to_string_pretty(&dashboard.routes)?
            } else {
                serde_json::to_string(&dashboard.routes)?
            };
            println!("{}", json);
        }
        Commands::Summary => print_summary(&dashboard),
    }

    Ok(())
}

fn print_summary(dashboard: &Dashboard) {
    let stats = &dashboard.stats;
    let hero = &stats.hero_stats;
    println!(
        "{} flights, {} airports, {} countries, {} routes",
        hero.total_flights, hero.total_airports, hero.total_countries, hero.total_routes
    );

    let d = &stats.distance_stats;
    println!(
        "{:.0} km ({:.0} mi), {:.2}x around the Earth, {:.2}% of the way to the Moon",
        d.total_km, d.total_miles, d.earth_circumnavigations, d.percent_to_moon
    );
    let t = &stats.time_stats;
    println!(
        "~{:.0} hours in the air ({:.1} days, {:.1} weeks, {:.1} months)",
        t.total_hours, t.total_days, t.total_weeks, t.total_months
    );

    if !stats.top_airports.is_empty() {
        println!("\nTop airports:");
        for a in &stats.top_airports {
            println!("  {}: {} visits ({:.1}%)", a.iata, a.count, a.percent);
        }
    }
    if !stats.top_routes.is_empty() {
        println!("\nTop routes:");
        for r in &stats.top_routes {
            println!("  {}: {} times", r.route, r.count);
        }
    }

    println!("\nMilestones:");
    for m in &stats.milestones {
        match m.reached_at_flight {
            Some(n) => println!("  {:.0} km: {} flights", m.distance_km, n),
            None => println!("  {:.0} km: not yet reached", m.distance_km),
        }
    }

    if let (Some(short), Some(long)) = (&stats.shortest_flight, &stats.longest_flight) {
        println!(
            "\nShortest: {} -> {} ({:.0} km)\nLongest:  {} -> {} ({:.0} km)",
            short.origin,
            short.destination,
            short.distance_km,
            long.origin,
            long.destination,
            long.distance_km
        );
    }

    if let Some(home) = &stats.hometown {
        println!("\nFrom {}:", home.hometown);
        for (label, p) in [
            ("north", &home.northernmost),
            ("south", &home.southernmost),
            ("east", &home.easternmost),
            ("west", &home.westernmost),
        ] {
            let place = p.city.as_deref().unwrap_or(&p.iata);
            println!("  furthest {}: {} ({:.0} km)", label, place, p.distance_km);
        }
    }

    let by_year = routes_by_year(&dashboard.routes);
    if !by_year.is_empty() {
        println!("\nRoutes by most recent year:");
        for year in &stats.unique_years {
            if let Some(routes) = by_year.get(&Some(year.to_string())) {
                println!("  {}: {}", year, routes.len());
            }
        }
    }

    if !dashboard.issues.is_empty() {
        println!("\n{} data issue(s):", dashboard.issues.len());
        for issue in &dashboard.issues {
            println!("  {}", issue);
        }
    }
}
