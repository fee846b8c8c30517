// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::geo::Coordinates;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirportRecord {
    pub code: String,
    pub lat: f64,
    pub lon: f64,
    /// ISO 3166-1 alpha-2 country code.
    pub country: String,
    #[serde(default)]
    pub city: Option<String>,
}

impl AirportRecord {
    pub fn new(code: &str, lat: f64, lon: f64, country: &str) -> Self {
        Self {
            code: code.trim().to_uppercase(),
            lat,
            lon,
            country: country.trim().to_uppercase(),
            city: None,
        }
    }

    pub fn with_city(mut self, city: &str) -> Self {
        self.city = Some(city.to_string());
        self
    }

    pub fn coords(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lon)
    }
}

/// Anything the engine can resolve airport codes against.
///
/// A miss is an ordinary answer, not an error.
pub trait AirportLookup {
    fn airport(&self, code: &str) -> Option<&AirportRecord>;

    fn coords(&self, code: &str) -> Option<Coordinates> {
        self.airport(code).map(AirportRecord::coords)
    }

    fn country(&self, code: &str) -> Option<&str> {
        self.airport(code)
            .map(|a| a.country.as_str())
            .filter(|c| !c.is_empty())
    }
}

#[derive(Error, Debug)]
pub enum ReferenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Missing column in airport table: {0}")]
    MissingColumn(&'static str),
}

/// Immutable airport table keyed by upper-case code.
#[derive(Debug, Clone, Default)]
pub struct AirportReference {
    airports: HashMap<String, AirportRecord>,
}

impl AirportReference {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.airports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.airport(code).is_some()
    }

    /// Reads a CSV airport table from disk. See [`AirportReference::parse_csv`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ReferenceError> {
        let file = File::open(path)?;
        Self::parse_csv(file)
    }

    /// Parses a CSV airport table with a header row.
    ///
    /// Recognised headers (case-insensitive): `iata`/`code`,
    /// `lat`/`latitude`, `lon`/`lng`/`longitude`, `country` and an optional
    /// `city`. Rows with unparsable coordinates are skipped.
    pub fn parse_csv<R: Read>(reader: R) -> Result<Self, ReferenceError> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let find = |names: &[&str]| {
            headers
                .iter()
                .position(|h| names.iter().any(|n| h.eq_ignore_ascii_case(n)))
        };

        let idx_code = find(&["iata", "code"]).ok_or(ReferenceError::MissingColumn("iata"))?;
        let idx_lat = find(&["lat", "latitude"]).ok_or(ReferenceError::MissingColumn("lat"))?;
        let idx_lon =
            find(&["lon", "lng", "longitude"]).ok_or(ReferenceError::MissingColumn("lon"))?;
        let idx_country = find(&["country"]).ok_or(ReferenceError::MissingColumn("country"))?;
        let idx_city = find(&["city"]);

        let mut airports = Vec::new();
        let mut skipped = 0usize;

        for record in rdr.records() {
            let record = record?;
            let code = record.get(idx_code).unwrap_or("");
            if code.is_empty() {
                skipped += 1;
                continue;
            }

            let lat = record.get(idx_lat).and_then(|s| s.parse::<f64>().ok());
            let lon = record.get(idx_lon).and_then(|s| s.parse::<f64>().ok());
            let (Some(lat), Some(lon)) = (lat, lon) else {
                warn!("Skipping airport with unparsable coordinates — code={}", code);
                skipped += 1;
                continue;
            };

            let mut airport =
                AirportRecord::new(code, lat, lon, record.get(idx_country).unwrap_or(""));
            if let Some(city) = idx_city.and_then(|i| record.get(i)).filter(|c| !c.is_empty()) {
                airport = airport.with_city(city);
            }
            airports.push(airport);
        }

        let reference: Self = airports.into_iter().collect();
        debug!(
            "Loaded airport reference — airports={} skipped_rows={}",
            reference.len(),
            skipped
        );
        Ok(reference)
    }
}

impl AirportLookup for AirportReference {
    fn airport(&self, code: &str) -> Option<&AirportRecord> {
        if let Some(hit) = self.airports.get(code) {
            return Some(hit);
        }
        let normalized = code.trim().to_uppercase();
        if normalized == code {
            return None;
        }
        self.airports.get(&normalized)
    }
}

impl FromIterator<AirportRecord> for AirportReference {
    /// Later records for the same code replace earlier ones.
    fn from_iter<I: IntoIterator<Item = AirportRecord>>(iter: I) -> Self {
        let airports = iter.into_iter().map(|a| (a.code.clone(), a)).collect();
        Self { airports }
    }
}
