//! Airport, aircraft, country and border-polygon providers for terraroute.

pub mod aircraft;
pub mod airports;
pub mod borders;
pub mod countries;
pub mod error;
pub mod geojson;

pub use aircraft::{Aircraft, AircraftCatalog, AircraftType};
pub use airports::{Airport, AirportDirectory};
pub use borders::BorderStore;
pub use countries::{Country, CountryDirectory};
pub use error::{DataError, Result};
