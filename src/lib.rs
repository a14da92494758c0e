//! # suncalc
//!
//! Sunrise, sunset and twilight times for any place on Earth.
//!
//! Times come from the U.S. Naval Observatory almanac algorithm and are
//! returned in the observer's own time zone. Events that do not happen on a
//! given day (polar day, polar night, twilight that never ends) come back as
//! `None`.
//!
//! ```
//! use chrono::{FixedOffset, NaiveDate};
//! use std::sync::Arc;
//! use suncalc::{AstronomicalDay, Location};
//!
//! let zone = Arc::new(FixedOffset::east_opt(11 * 3600).unwrap());
//! let melbourne = Location::new("Melbourne", -37.5, 145.01, 0.0, zone).unwrap();
//! let day = AstronomicalDay::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), melbourne);
//!
//! let sunrise = day.sunrise().unwrap();
//! let sunset = day.sunset().unwrap();
//! assert!(sunrise < sunset);
//! ```
//!
//! ## Architecture
//!
//! - **astronomical_day**: Date + location, events converted to local time
//! - **config**: Configuration loading, validation, and default generation
//! - **constants**: Zeniths, algorithm coefficients and defaults
//! - **geo**: Locations, time zones, city lookup and the solar algorithm
//! - **logger**: Structured logging with visual formatting
//! - **utils**: Hour/clock conversions and display helpers

pub mod args;
pub mod astronomical_day;
pub mod config;
pub mod constants;
pub mod geo;
pub mod logger;
pub mod utils;

// Re-export important types for easier access
pub use astronomical_day::{AstronomicalDay, SolarTimes};
pub use config::Config;
pub use geo::{EventKind, InvalidLocationError, Location, SolarEventCalculator, UtcOffsetProvider};
pub use logger::{Log, LogLevel};
