//! Sunrise and sunset calculation using the US Naval Observatory almanac method.
//!
//! The algorithm works on a single calendar date and yields the UTC time of day,
//! as fractional hours, at which the centre of the sun crosses a given zenith
//! angle. It is an approximation good to about a minute at moderate latitudes.
//!
//! Nothing here depends on time zones or stored state: every intermediate value
//! is recomputed from the inputs on each call, so a [`SolarEventCalculator`] can
//! be copied freely and shared between threads.
//!
//! An event that does not happen on the requested date (polar day or polar
//! night, or a twilight depression the sun never reaches) is reported as `None`,
//! never as NaN, so it cannot be confused with an event at 00:00 UTC.

use chrono::{Datelike, NaiveDate};

use crate::constants::*;
use crate::geo::location::Location;

/// Whether the sun is crossing the zenith angle on the way up or down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Morning crossing (sunrise, dawn)
    Rise,
    /// Evening crossing (sunset, dusk)
    Set,
}

impl EventKind {
    /// Local hour the event is assumed to happen at for the first approximation.
    fn base_hour(self) -> f64 {
        match self {
            EventKind::Rise => RISE_BASE_HOUR,
            EventKind::Set => SET_BASE_HOUR,
        }
    }
}

/// Almanac solar event calculator.
///
/// The two tunables only affect events computed at the geometric zenith, see
/// [`SolarEventCalculator::adjust_zenith`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarEventCalculator {
    refraction_arc_minutes: f64,
    solar_radius_arc_minutes: f64,
}

impl Default for SolarEventCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl SolarEventCalculator {
    pub const fn new() -> Self {
        Self {
            refraction_arc_minutes: DEFAULT_REFRACTION_ARC_MINUTES,
            solar_radius_arc_minutes: DEFAULT_SOLAR_RADIUS_ARC_MINUTES,
        }
    }

    /// Use a different atmospheric refraction at the horizon, in arcminutes.
    pub fn with_refraction(mut self, arc_minutes: f64) -> Self {
        self.refraction_arc_minutes = arc_minutes;
        self
    }

    /// Use a different apparent solar radius, in arcminutes.
    pub fn with_solar_radius(mut self, arc_minutes: f64) -> Self {
        self.solar_radius_arc_minutes = arc_minutes;
        self
    }

    pub fn refraction(&self) -> f64 {
        self.refraction_arc_minutes
    }

    pub fn solar_radius(&self) -> f64 {
        self.solar_radius_arc_minutes
    }

    /// UTC hour of a rising event at `zenith` for `location` on `date`.
    ///
    /// With `adjust_for_elevation` the observer's elevation widens a geometric
    /// zenith by the horizon dip; otherwise the location is treated as being at
    /// sea level.
    pub fn utc_sunrise(
        &self,
        date: NaiveDate,
        location: &Location,
        zenith: f64,
        adjust_for_elevation: bool,
    ) -> Option<f64> {
        self.utc_event(date, location, zenith, adjust_for_elevation, EventKind::Rise)
    }

    /// UTC hour of a setting event at `zenith` for `location` on `date`.
    pub fn utc_sunset(
        &self,
        date: NaiveDate,
        location: &Location,
        zenith: f64,
        adjust_for_elevation: bool,
    ) -> Option<f64> {
        self.utc_event(date, location, zenith, adjust_for_elevation, EventKind::Set)
    }

    fn utc_event(
        &self,
        date: NaiveDate,
        location: &Location,
        zenith: f64,
        adjust_for_elevation: bool,
        kind: EventKind,
    ) -> Option<f64> {
        let elevation = if adjust_for_elevation {
            location.elevation()
        } else {
            0.0
        };
        let zenith = self.adjust_zenith(zenith, elevation);

        Self::compute_utc_event_hour(
            date.year(),
            date.month() as i32,
            date.day() as i32,
            location.longitude(),
            location.latitude(),
            zenith,
            kind,
        )
    }

    /// Core almanac computation.
    ///
    /// # Arguments
    /// * `year`, `month` (1-12), `day` - Calendar date. Out-of-range fields are
    ///   not checked and give meaningless results.
    /// * `longitude` - Degrees, west negative
    /// * `latitude` - Degrees, south negative
    /// * `zenith` - Zenith angle of the sun centre at the event, in degrees
    /// * `kind` - Rising or setting crossing
    ///
    /// # Returns
    /// * `Some(hour)` - UTC time of day in `[0, 24)`
    /// * `None` - The sun does not cross `zenith` on this date
    pub fn compute_utc_event_hour(
        year: i32,
        month: i32,
        day: i32,
        longitude: f64,
        latitude: f64,
        zenith: f64,
        kind: EventKind,
    ) -> Option<f64> {
        let day_of_year = day_of_year(year, month, day);
        let hours_from_meridian = longitude / DEG_PER_HOUR;
        let approx_time_days =
            day_of_year as f64 + (kind.base_hour() - hours_from_meridian) / 24.0;

        let mean_anomaly = 0.9856 * approx_time_days - 3.289;
        let true_longitude = sun_true_longitude(mean_anomaly);
        let right_ascension_hours = sun_right_ascension_hours(true_longitude);
        let cos_local_hour_angle = cos_local_hour_angle(true_longitude, latitude, zenith);

        // > 1: the sun stays below the zenith all day; < -1: it stays above
        if !(-1.0..=1.0).contains(&cos_local_hour_angle) {
            return None;
        }

        let local_hour_angle = match kind {
            EventKind::Rise => 360.0 - acos_deg(cos_local_hour_angle),
            EventKind::Set => acos_deg(cos_local_hour_angle),
        };
        let local_hour = local_hour_angle / DEG_PER_HOUR;

        let local_mean_time =
            local_hour + right_ascension_hours - 0.06571 * approx_time_days - 6.622;

        let utc_hour = local_mean_time - hours_from_meridian;
        if !utc_hour.is_finite() {
            return None;
        }
        Some(normalize_hour(utc_hour))
    }

    /// Widen a geometric zenith for the visible sunrise/sunset.
    ///
    /// Only a zenith of exactly 90° is adjusted: the solar radius and refraction
    /// are added, plus the horizon dip seen from `elevation` meters. Twilight
    /// zeniths are defined by light level and are returned unchanged.
    pub fn adjust_zenith(&self, zenith: f64, elevation: f64) -> f64 {
        if zenith == GEOMETRIC_ZENITH {
            zenith
                + self.solar_radius_arc_minutes / 60.0
                + self.refraction_arc_minutes / 60.0
                + elevation_adjustment(elevation)
        } else {
            zenith
        }
    }
}

/// Horizon dip in degrees for an observer `elevation` meters above sea level.
pub fn elevation_adjustment(elevation: f64) -> f64 {
    acos_deg(EARTH_RADIUS_KM / (EARTH_RADIUS_KM + elevation / 1000.0))
}

/// Closed-form day of the year, with January 1st as day 1.
///
/// Uses truncating integer division throughout.
pub fn day_of_year(year: i32, month: i32, day: i32) -> i32 {
    let n1 = 275 * month / 9;
    let n2 = (month + 9) / 12;
    let n3 = 1 + (year - 4 * (year / 4) + 2) / 3;
    n1 - n2 * n3 + day - 30
}

/// Sun's true longitude in degrees, in `[0, 360)`.
fn sun_true_longitude(mean_anomaly: f64) -> f64 {
    let l = mean_anomaly
        + 1.916 * sin_deg(mean_anomaly)
        + 0.020 * sin_deg(2.0 * mean_anomaly)
        + 282.634;

    if l >= 360.0 {
        l - 360.0
    } else if l < 0.0 {
        l + 360.0
    } else {
        l
    }
}

/// Sun's right ascension in hours.
fn sun_right_ascension_hours(true_longitude: f64) -> f64 {
    let ra = atan_deg(0.91764 * tan_deg(true_longitude));

    // atan only covers (-90, 90); move ra into the same quadrant as the longitude
    let l_quadrant = (true_longitude / 90.0).floor() * 90.0;
    let ra_quadrant = (ra / 90.0).floor() * 90.0;

    (ra + (l_quadrant - ra_quadrant)) / DEG_PER_HOUR
}

fn cos_local_hour_angle(true_longitude: f64, latitude: f64, zenith: f64) -> f64 {
    let sin_dec = 0.39782 * sin_deg(true_longitude);
    let cos_dec = cos_deg(asin_deg(sin_dec));

    (cos_deg(zenith) - sin_dec * sin_deg(latitude)) / (cos_dec * cos_deg(latitude))
}

fn normalize_hour(hour: f64) -> f64 {
    let hour = hour.rem_euclid(24.0);
    // rem_euclid rounds up to 24.0 for tiny negative inputs
    if hour >= 24.0 { 0.0 } else { hour }
}

fn sin_deg(deg: f64) -> f64 {
    deg.to_radians().sin()
}

fn cos_deg(deg: f64) -> f64 {
    deg.to_radians().cos()
}

fn tan_deg(deg: f64) -> f64 {
    deg.to_radians().tan()
}

fn asin_deg(x: f64) -> f64 {
    x.asin().to_degrees()
}

fn acos_deg(x: f64) -> f64 {
    x.acos().to_degrees()
}

fn atan_deg(x: f64) -> f64 {
    x.atan().to_degrees()
}
