//! Application constants and default values for suncalc.
//!
//! This module contains the zenith angles that define each solar event, the
//! tunable defaults of the almanac calculator, configuration defaults and the
//! validation limits applied when loading user settings.

// ═══ Zenith Angles ═══
// Angle between the vertical and the centre of the sun at each event, in degrees

pub const GEOMETRIC_ZENITH: f64 = 90.0; // Sun centre exactly on the mathematical horizon
pub const CIVIL_ZENITH: f64 = 96.0; // Sun 6° below the horizon
pub const NAUTICAL_ZENITH: f64 = 102.0; // Sun 12° below the horizon
pub const ASTRONOMICAL_ZENITH: f64 = 108.0; // Sun 18° below the horizon

// ═══ Almanac Algorithm Constants ═══

pub const DEFAULT_REFRACTION_ARC_MINUTES: f64 = 34.4788; // Atmospheric refraction at the horizon
pub const DEFAULT_SOLAR_RADIUS_ARC_MINUTES: f64 = 16.0; // Apparent radius of the solar disk
pub const EARTH_RADIUS_KM: f64 = 6356.9; // Polar radius used for the horizon dip
pub const DEG_PER_HOUR: f64 = 360.0 / 24.0; // Degrees of longitude per hour of time
pub const RISE_BASE_HOUR: f64 = 6.0; // Assumed local hour of a rising event
pub const SET_BASE_HOUR: f64 = 18.0; // Assumed local hour of a setting event

// ═══ Application Configuration Defaults ═══
// These values are used when config options are not specified by the user

pub const DEFAULT_LOCATION_NAME: &str = "Melbourne";
pub const DEFAULT_LATITUDE: f64 = -37.50;
pub const DEFAULT_LONGITUDE: f64 = 145.01;
pub const DEFAULT_ELEVATION: f64 = 0.0; // meters above sea level
pub const DEFAULT_TIMEZONE: &str = "auto"; // Derive the zone from the coordinates
pub const DEFAULT_TIME_FORMAT: &str = "%H:%M";

// ═══ Validation Limits ═══
// These limits ensure user inputs are within physically meaningful ranges

pub const MINIMUM_LATITUDE: f64 = -90.0;
pub const MAXIMUM_LATITUDE: f64 = 90.0;
pub const MINIMUM_LONGITUDE: f64 = -180.0;
pub const MAXIMUM_LONGITUDE: f64 = 180.0;
pub const MINIMUM_ELEVATION: f64 = 0.0; // Negative elevations are clamped to this
pub const MAXIMUM_ELEVATION: f64 = 10_000.0; // meters (above any summit)
pub const MINIMUM_REFRACTION: f64 = 0.0; // arcminutes
pub const MAXIMUM_REFRACTION: f64 = 120.0; // arcminutes
pub const MINIMUM_SOLAR_RADIUS: f64 = 0.0; // arcminutes
pub const MAXIMUM_SOLAR_RADIUS: f64 = 60.0; // arcminutes

// ═══ Exit Codes ═══
// Standard exit codes for process termination

pub const EXIT_FAILURE: i32 = 1; // General failure

// ═══ Test Constants ═══
// Common values used in tests for consistency
#[cfg(test)]
pub mod test_constants {
    pub const TEST_MELBOURNE_LATITUDE: f64 = -37.50;
    pub const TEST_MELBOURNE_LONGITUDE: f64 = 145.01;
    pub const TEST_NEW_YORK_LATITUDE: f64 = 40.7128;
    pub const TEST_NEW_YORK_LONGITUDE: f64 = -74.0060;
    pub const TEST_ARCTIC_LATITUDE: f64 = 70.0;
    pub const TEST_ARCTIC_LONGITUDE: f64 = 25.0;
    pub const TEST_OFFICIAL_ZENITH: f64 = 90.0 + 50.0 / 60.0; // Conventional sunrise/sunset zenith
}
