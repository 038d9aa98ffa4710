//! Seeded country directory.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use terraroute_core::normalize_code;

use crate::error::{DataError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    /// Country code, always uppercase. Matches the border file stem.
    pub code: String,
    pub name: String,
    pub continent: String,
}

#[rustfmt::skip]
const SEED: &[(&str, &str, &str)] = &[
    ("US", "United States of America", "North America"),
    ("GER", "Germany", "Europe"),
    ("RU", "Russia", "Europe"),
    ("CN", "China", "Asia"),
];

/// Countries keyed by code.
#[derive(Debug, Clone, Default)]
pub struct CountryDirectory {
    countries: BTreeMap<String, Country>,
}

impl CountryDirectory {
    pub fn seeded() -> Self {
        let countries = SEED
            .iter()
            .map(|&(code, name, continent)| {
                let country = Country {
                    code: code.to_string(),
                    name: name.to_string(),
                    continent: continent.to_string(),
                };
                (country.code.clone(), country)
            })
            .collect();
        Self { countries }
    }

    /// Case-insensitive lookup by code.
    pub fn get(&self, code: &str) -> Option<&Country> {
        self.countries.get(&normalize_code(code))
    }

    /// Countries on `continent` (exact match), ordered by code.
    ///
    /// An empty result is an error so callers can tell a bad filter from a
    /// populated listing.
    pub fn list(&self, continent: Option<&str>) -> Result<Vec<&Country>> {
        let countries: Vec<&Country> = self
            .countries
            .values()
            .filter(|c| continent.map_or(true, |wanted| c.continent == wanted))
            .collect();
        if countries.is_empty() {
            return Err(DataError::CountriesNotFound {
                continent: continent.map(str::to_string),
            });
        }
        Ok(countries)
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }
}
