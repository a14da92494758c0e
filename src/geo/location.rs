//! Observer location.
//!
//! A [`Location`] is validated once at construction and is immutable after
//! that. The time zone is held behind an `Arc`, so clones are cheap and a
//! single location can be shared between many [`AstronomicalDay`] values and
//! threads.
//!
//! [`AstronomicalDay`]: crate::astronomical_day::AstronomicalDay

use chrono::{DateTime, FixedOffset, Utc};
use std::sync::Arc;
use thiserror::Error;

use crate::constants::*;
use crate::geo::timezone::{UtcOffsetProvider, determine_timezone_from_coordinates};

/// Rejected location input.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum InvalidLocationError {
    #[error("invalid latitude {0}: must be a finite value between -90 and 90 degrees")]
    Latitude(f64),
    #[error("invalid longitude {0}: must be a finite value between -180 and 180 degrees")]
    Longitude(f64),
    #[error("invalid elevation {0}: must be a finite number of meters")]
    Elevation(f64),
}

/// Where the observer stands.
#[derive(Debug, Clone)]
pub struct Location {
    name: String,
    latitude: f64,
    longitude: f64,
    elevation: f64,
    time_zone: Arc<dyn UtcOffsetProvider>,
}

impl Location {
    /// Create a location after validating its coordinates.
    ///
    /// # Arguments
    /// * `name` - Free-text label, not used in any calculation
    /// * `latitude` - Degrees, south negative
    /// * `longitude` - Degrees, west negative
    /// * `elevation` - Meters above sea level; negative values are clamped to 0
    /// * `time_zone` - Source of the local UTC offset at any instant
    ///
    /// # Returns
    /// * `Err(InvalidLocationError)` - If a coordinate is out of range or the
    ///   elevation is NaN or infinite
    pub fn new(
        name: impl Into<String>,
        latitude: f64,
        longitude: f64,
        elevation: f64,
        time_zone: Arc<dyn UtcOffsetProvider>,
    ) -> Result<Self, InvalidLocationError> {
        validate_coordinates(latitude, longitude)?;
        if !elevation.is_finite() {
            return Err(InvalidLocationError::Elevation(elevation));
        }

        Ok(Self {
            name: name.into(),
            latitude,
            longitude,
            elevation: clamp_elevation(elevation),
            time_zone,
        })
    }

    /// Create a location whose time zone is looked up from its coordinates.
    pub fn with_detected_time_zone(
        name: impl Into<String>,
        latitude: f64,
        longitude: f64,
        elevation: f64,
    ) -> Result<Self, InvalidLocationError> {
        validate_coordinates(latitude, longitude)?;
        let tz = determine_timezone_from_coordinates(latitude, longitude);
        Self::new(name, latitude, longitude, elevation, Arc::new(tz))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Elevation in meters, never negative.
    pub fn elevation(&self) -> f64 {
        self.elevation
    }

    pub fn time_zone(&self) -> &Arc<dyn UtcOffsetProvider> {
        &self.time_zone
    }

    /// Local UTC offset in effect at `instant`.
    pub fn offset_at(&self, instant: &DateTime<Utc>) -> FixedOffset {
        self.time_zone.offset_at(instant)
    }

    /// Coordinates formatted as `37.5000°S, 145.0100°E`.
    pub fn coordinates_for_display(&self) -> String {
        crate::utils::format_coordinates(self.latitude, self.longitude)
    }
}

fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), InvalidLocationError> {
    // NaN and infinities fail the range checks as well
    if !(MINIMUM_LATITUDE..=MAXIMUM_LATITUDE).contains(&latitude) {
        return Err(InvalidLocationError::Latitude(latitude));
    }
    if !(MINIMUM_LONGITUDE..=MAXIMUM_LONGITUDE).contains(&longitude) {
        return Err(InvalidLocationError::Longitude(longitude));
    }
    Ok(())
}

/// Clamp an elevation to the horizon-dip model's domain.
///
/// The dip formula takes the arc cosine of `R / (R + h)`, which is undefined
/// for points below the reference surface.
pub fn clamp_elevation(elevation: f64) -> f64 {
    if elevation < MINIMUM_ELEVATION {
        MINIMUM_ELEVATION
    } else {
        elevation
    }
}
