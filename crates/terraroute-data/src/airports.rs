//! Seeded airport directory.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use terraroute_core::{normalize_code, Coordinate, EndpointLookup};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    /// IATA code, always uppercase.
    pub iata: String,
    pub name: String,
    pub city: String,
    pub country: String,
    pub continent: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Airport {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate {
            lat: self.latitude,
            lng: self.longitude,
        }
    }
}

// (iata, name, city, country, continent, lat, lng)
#[rustfmt::skip]
const SEED: &[(&str, &str, &str, &str, &str, f64, f64)] = &[
    ("JFK", "John F. Kennedy International Airport", "New York", "USA", "North America", 40.6413, -73.7781),
    ("LAX", "Los Angeles International Airport", "Los Angeles", "USA", "North America", 33.9416, -118.4085),
    ("CDG", "Charles de Gaulle Airport", "Paris", "France", "Europe", 49.0097, 2.5479),
    ("FRA", "Frankfurt Airport", "Frankfurt", "Germany", "Europe", 50.0333, 8.5706),
    ("PVG", "Shanghai Pudong International Airport", "Shanghai", "China", "Asia", 31.1434, 121.805),
    ("NGO", "Chubu Centrair International Airport", "Nagoya", "Japan", "Asia", 34.8583, 136.805),
    ("AKL", "Auckland Airport", "Auckland", "New Zealand", "Oceania", -37.0081, 174.792),
    ("ADD", "Addis Ababa Bole International Airport", "Addis Ababa", "Ethiopia", "Africa", 8.97789, 38.799301),
    ("CPT", "Cape Town International Airport", "Cape Town", "South Africa", "Africa", -33.965, 18.602),
    ("SCL", "Arturo Merino Benítez International Airport", "Santiago de Chile", "Chile", "South America", -33.393056, -70.785833),
    ("USH", "Ushuaia Malvinas Argentinas International Airport", "Ushuaia", "Argentina", "South America", -54.8433, -68.2944),
    ("GUA", "La Aurora International Airport", "Guatemala City", "Guatemala", "North America", 14.5817, -90.5267),
    ("ANC", "Ted Stevens Anchorage International Airport", "Anchorage", "USA", "North America", 61.1744444, -149.99639),
    ("MNL", "Ninoy Aquino International Airport", "Manila", "Philippines", "Asia", 14.5086, 121.0199966),
    ("CTS", "New Chitose Airport", "Sapporo", "Japan", "Asia", 42.7753, 141.692),
    ("PER", "Perth Airport", "Perth", "Australia", "Oceania", -31.9403, 115.967),
    ("LAG", "Laughtale Grandline International Airport", "One Piece", "Bermuda", "North America", 25.0, -71.0),
];

/// In-memory airport directory keyed by IATA code.
#[derive(Debug, Clone, Default)]
pub struct AirportDirectory {
    airports: BTreeMap<String, Airport>,
}

impl AirportDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory preloaded with the built-in airport list.
    pub fn seeded() -> Self {
        let airports = SEED
            .iter()
            .map(|&(iata, name, city, country, continent, latitude, longitude)| {
                let airport = Airport {
                    iata: iata.to_string(),
                    name: name.to_string(),
                    city: city.to_string(),
                    country: country.to_string(),
                    continent: continent.to_string(),
                    latitude,
                    longitude,
                };
                (airport.iata.clone(), airport)
            })
            .collect();
        Self { airports }
    }

    /// Insert or replace an airport. The IATA code is normalised and the
    /// position must be a valid coordinate.
    pub fn insert(&mut self, mut airport: Airport) -> Result<()> {
        airport.coordinate().validate()?;
        airport.iata = normalize_code(&airport.iata);
        self.airports.insert(airport.iata.clone(), airport);
        Ok(())
    }

    /// Case-insensitive lookup by IATA code.
    pub fn get(&self, iata: &str) -> Option<&Airport> {
        self.airports.get(&normalize_code(iata))
    }

    /// Airports matching every given filter, ordered by IATA code.
    /// Filters compare exactly; `None` matches everything.
    pub fn list(&self, continent: Option<&str>, country: Option<&str>) -> Vec<&Airport> {
        self.airports
            .values()
            .filter(|a| continent.map_or(true, |c| a.continent == c))
            .filter(|a| country.map_or(true, |c| a.country == c))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.airports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }
}

impl EndpointLookup for AirportDirectory {
    fn resolve(&self, code: &str) -> Option<Coordinate> {
        self.get(code).map(Airport::coordinate)
    }
}
