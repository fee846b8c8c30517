// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use serde::{Deserialize, Serialize};
use std::fmt;

pub const ROUTE_SEPARATOR: char = '-';

/// Direction-independent identity of a route: `JFK-LAX` covers both
/// JFK→LAX and LAX→JFK.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteKey(String);

impl RouteKey {
    pub fn new(a: &str, b: &str) -> Self {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        Self(format!("{}{}{}", first, ROUTE_SEPARATOR, second))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The two airport codes in canonical (sorted) order.
    pub fn endpoints(&self) -> (&str, &str) {
        // Codes never contain the separator, so the first one splits cleanly.
        self.0
            .split_once(ROUTE_SEPARATOR)
            .unwrap_or((self.0.as_str(), ""))
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn canonical_route(a: &str, b: &str) -> RouteKey {
    RouteKey::new(a, b)
}
