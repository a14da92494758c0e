//! Geographic side of the calculation.
//!
//! - `location`: validated observer position and time zone
//! - `solar`: the almanac sunrise/sunset algorithm
//! - `timezone`: UTC offset providers and zone detection from coordinates
//! - `cities`: city name lookup

pub mod cities;
pub mod location;
pub mod solar;
pub mod timezone;

pub use cities::{CityInfo, find_cities_near_coordinate, find_city};
pub use location::{InvalidLocationError, Location};
pub use solar::{EventKind, SolarEventCalculator};
pub use timezone::{UtcOffsetProvider, determine_timezone_from_coordinates, resolve_time_zone};
