//! In-memory address table geocoder.
//!
//! Lookups ignore case and collapse runs of whitespace, so
//! `"12  Main St"` and `"12 main st"` hit the same entry.

use crate::capability::Geocoder;
use crate::error::ProviderError;
use async_trait::async_trait;
use dealzsta_geo::Coordinate;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// A [`Geocoder`] answering from a fixed address table.
#[derive(Debug, Clone, Default)]
pub struct TableGeocoder {
    entries: HashMap<String, Vec<Coordinate>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TableEntry {
    One(Coordinate),
    Many(Vec<Coordinate>),
}

impl TableGeocoder {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style method adding a single result for `address`.
    #[must_use]
    pub fn with(mut self, address: &str, coordinate: Coordinate) -> Self {
        self.insert(address, vec![coordinate]);
        self
    }

    /// Replace the results for `address`.
    pub fn insert(&mut self, address: &str, coordinates: Vec<Coordinate>) {
        self.entries.insert(normalize(address), coordinates);
    }

    /// Number of known addresses.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no addresses.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse a JSON object mapping addresses to one coordinate or a list.
    ///
    /// ```json
    /// {
    ///   "Alexanderplatz 1, Berlin": {"latitude": 52.5219, "longitude": 13.4132},
    ///   "Springfield": [
    ///     {"latitude": 39.7817, "longitude": -89.6501},
    ///     {"latitude": 42.1015, "longitude": -72.5898}
    ///   ]
    /// }
    /// ```
    pub fn from_json(json: &str) -> Result<Self, ProviderError> {
        let raw: HashMap<String, TableEntry> = serde_json::from_str(json)?;
        let mut table = Self::new();

        for (address, entry) in raw {
            let coordinates = match entry {
                TableEntry::One(coord) => vec![coord],
                TableEntry::Many(coords) => coords,
            };
            if let Some(bad) = coordinates.iter().find(|c| !c.is_valid()) {
                return Err(ProviderError::Parse(format!(
                    "coordinate {bad} for '{address}' is out of range"
                )));
            }
            table.insert(&address, coordinates);
        }

        Ok(table)
    }

    /// Load a table from a JSON file (see [`TableGeocoder::from_json`]).
    pub fn from_json_file(path: &Path) -> Result<Self, ProviderError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

fn normalize(address: &str) -> String {
    address
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

#[async_trait]
impl Geocoder for TableGeocoder {
    async fn geocode(&self, address: &str) -> Result<Vec<Coordinate>, ProviderError> {
        Ok(self
            .entries
            .get(&normalize(address))
            .cloned()
            .unwrap_or_default())
    }
}
