//! Seeded aircraft catalog.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DataError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AircraftType {
    Ultralight,
    Light,
    Heavy,
    Commercial,
    Cargo,
    Military,
}

impl AircraftType {
    pub const ALL: [AircraftType; 6] = [
        AircraftType::Ultralight,
        AircraftType::Light,
        AircraftType::Heavy,
        AircraftType::Commercial,
        AircraftType::Cargo,
        AircraftType::Military,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AircraftType::Ultralight => "ultralight",
            AircraftType::Light => "light",
            AircraftType::Heavy => "heavy",
            AircraftType::Commercial => "commercial",
            AircraftType::Cargo => "cargo",
            AircraftType::Military => "military",
        }
    }
}

impl fmt::Display for AircraftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for AircraftType {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DataError::UnknownAircraftType(wanted.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aircraft {
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: AircraftType,
    pub name: String,
    pub manufacturer: String,
    /// Range in kilometres.
    pub range: u32,
}

// (id, type, name, manufacturer, range)
#[rustfmt::skip]
const SEED: &[(u32, AircraftType, &str, &str, u32)] = &[
    (1, AircraftType::Commercial, "Boeing 737", "Boeing", 3510),
    (2, AircraftType::Heavy, "Gulfstream G650", "Gulfstream", 7500),
    (3, AircraftType::Cargo, "Antonov An-225", "Antonov", 9700),
    (4, AircraftType::Commercial, "Airbus A320", "Airbus", 3200),
];

/// Aircraft ordered by id.
#[derive(Debug, Clone, Default)]
pub struct AircraftCatalog {
    aircraft: Vec<Aircraft>,
}

impl AircraftCatalog {
    pub fn seeded() -> Self {
        let aircraft = SEED
            .iter()
            .map(|&(id, kind, name, manufacturer, range)| Aircraft {
                id,
                kind,
                name: name.to_string(),
                manufacturer: manufacturer.to_string(),
                range,
            })
            .collect();
        Self { aircraft }
    }

    /// Aircraft matching every given filter. The manufacturer compares
    /// exactly; `None` matches everything.
    pub fn list(&self, manufacturer: Option<&str>, kind: Option<AircraftType>) -> Vec<&Aircraft> {
        self.aircraft
            .iter()
            .filter(|a| manufacturer.map_or(true, |m| a.manufacturer == m))
            .filter(|a| kind.map_or(true, |k| a.kind == k))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.aircraft.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aircraft.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: Vec<&Aircraft>) -> Vec<&str> {
        list.into_iter().map(|a| a.name.as_str()).collect()
    }

    #[test]
    fn filters_combine() {
        let catalog = AircraftCatalog::seeded();
        assert_eq!(catalog.list(None, None).len(), 4);
        assert_eq!(
            names(catalog.list(None, Some(AircraftType::Commercial))),
            vec!["Boeing 737", "Airbus A320"]
        );
        assert_eq!(
            names(catalog.list(Some("Airbus"), Some(AircraftType::Commercial))),
            vec!["Airbus A320"]
        );
        assert!(catalog.list(Some("Airbus"), Some(AircraftType::Cargo)).is_empty());
        // Manufacturer match is exact.
        assert!(catalog.list(Some("boeing"), None).is_empty());
    }

    #[test]
    fn type_parses_case_insensitively() {
        assert_eq!("Cargo".parse::<AircraftType>().unwrap(), AircraftType::Cargo);
        assert_eq!(" heavy ".parse::<AircraftType>().unwrap(), AircraftType::Heavy);
        let err = "blimp".parse::<AircraftType>().unwrap_err();
        assert!(matches!(err, DataError::UnknownAircraftType(ref s) if s == "blimp"));
    }

    #[test]
    fn serializes_type_field_in_lowercase() {
        let catalog = AircraftCatalog::seeded();
        let json = serde_json::to_value(catalog.list(Some("Antonov"), None)[0]).unwrap();
        assert_eq!(json["type"], "cargo");
        assert_eq!(json["range"], 9700);
        for kind in AircraftType::ALL {
            assert_eq!(serde_json::to_value(kind).unwrap(), kind.to_string());
        }
        assert_eq!(format!("[{:<7}]", AircraftType::Cargo), "[cargo  ]");
    }
}
