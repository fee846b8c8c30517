// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::airports::AirportLookup;
use crate::geo::haversine_km;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Error, Debug, PartialEq)]
pub enum FlightError {
    #[error("Invalid airport code: {0:?} (expected three letters)")]
    InvalidCode(String),
    #[error("Invalid flight date: {0:?} (expected YYYY-MM-DD)")]
    InvalidDate(String),
}

/// One recorded flight leg.
///
/// `date` keeps the text it was recorded with so that rows imported from
/// elsewhere can still be aggregated and have bad dates reported instead of
/// being rejected wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    pub id: u64,
    pub origin: String,
    pub destination: String,
    pub date: String,
    /// Great-circle distance in km, fixed when the flight is created or rerouted.
    pub distance: f64,
}

impl Flight {
    /// Validates the leg and derives its distance from `reference`.
    /// Unknown airports give a distance of 0.
    pub fn new<L: AirportLookup + ?Sized>(
        id: u64,
        origin: &str,
        destination: &str,
        date: &str,
        reference: &L,
    ) -> Result<Self, FlightError> {
        let origin = normalize_code(origin)?;
        let destination = normalize_code(destination)?;
        let date = parse_date(date)?.format(DATE_FORMAT).to_string();
        let distance = leg_distance(&origin, &destination, reference);
        Ok(Self {
            id,
            origin,
            destination,
            date,
            distance,
        })
    }

    /// Applies an edit. The distance is only recomputed when an endpoint
    /// actually changes.
    pub fn amend<L: AirportLookup + ?Sized>(
        &mut self,
        origin: &str,
        destination: &str,
        date: &str,
        reference: &L,
    ) -> Result<(), FlightError> {
        let origin = normalize_code(origin)?;
        let destination = normalize_code(destination)?;
        let date = parse_date(date)?.format(DATE_FORMAT).to_string();

        if origin != self.origin || destination != self.destination {
            self.distance = leg_distance(&origin, &destination, reference);
            debug!(
                "Flight rerouted — id={} route={}->{} distance_km={:.1}",
                self.id, origin, destination, self.distance
            );
        }
        self.origin = origin;
        self.destination = destination;
        self.date = date;
        Ok(())
    }

    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date).ok()
    }
}

fn normalize_code(code: &str) -> Result<String, FlightError> {
    let code = code.trim();
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(code.to_ascii_uppercase())
    } else {
        Err(FlightError::InvalidCode(code.to_string()))
    }
}

pub fn parse_date(value: &str) -> Result<NaiveDate, FlightError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| FlightError::InvalidDate(value.to_string()))
}

fn leg_distance<L: AirportLookup + ?Sized>(origin: &str, destination: &str, reference: &L) -> f64 {
    match (reference.coords(origin), reference.coords(destination)) {
        (Some(from), Some(to)) => haversine_km(from, to),
        _ => 0.0,
    }
}

#[derive(Debug, Deserialize)]
struct FlightRow {
    #[serde(default)]
    id: Option<u64>,
    origin: String,
    destination: String,
    date: String,
    #[serde(default)]
    distance: Option<f64>,
}

/// Reads flight lists in the `id,origin,destination,date,distance` layout
/// the flight store exports.
pub struct FlightLogReader;

impl FlightLogReader {
    pub fn load<P: AsRef<Path>, L: AirportLookup + ?Sized>(
        path: P,
        reference: &L,
    ) -> Result<Vec<Flight>> {
        let file = File::open(path).context("Failed to open flight log")?;
        Self::parse_csv(file, reference)
    }

    /// Rows are kept as recorded; a missing distance is derived from the
    /// reference and a missing id is assigned after the highest id seen.
    pub fn parse_csv<R: Read, L: AirportLookup + ?Sized>(
        reader: R,
        reference: &L,
    ) -> Result<Vec<Flight>> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut rows = Vec::new();
        for (line, row) in rdr.deserialize::<FlightRow>().enumerate() {
            // +2: one for the header, one for 1-based numbering.
            rows.push(row.with_context(|| format!("Malformed flight row {}", line + 2))?);
        }

        // `None` once the id space is used up.
        let mut next_id = rows
            .iter()
            .filter_map(|r| r.id)
            .max()
            .map_or(Some(1), |max| max.checked_add(1));

        let mut flights = Vec::with_capacity(rows.len());
        for row in rows {
            let id = match row.id {
                Some(id) => id,
                None => {
                    let id = next_id.context("Flight ids exhausted; cannot number an id-less row")?;
                    next_id = id.checked_add(1);
                    id
                }
            };
            let origin = row.origin.to_uppercase();
            let destination = row.destination.to_uppercase();
            let distance = row
                .distance
                .unwrap_or_else(|| leg_distance(&origin, &destination, reference));
            flights.push(Flight {
                id,
                origin,
                destination,
                date: row.date,
                distance,
            });
        }

        debug!("Parsed flight log: flights={}", flights.len());
        Ok(flights)
    }
}
