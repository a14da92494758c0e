use chrono::{FixedOffset, NaiveDate, Utc};
use chrono_tz::Tz;
use proptest::prelude::*;
use std::sync::Arc;
use suncalc::geo::timezone::determine_timezone_from_coordinates;
use suncalc::{AstronomicalDay, Location};

/// Generate valid latitude values
fn latitude_strategy() -> impl Strategy<Value = f64> {
    -90.0..=90.0
}

/// Generate valid longitude values
fn longitude_strategy() -> impl Strategy<Value = f64> {
    -180.0..=180.0
}

/// Latitudes where the sun rises and sets every day of the year
fn mid_latitude_strategy() -> impl Strategy<Value = f64> {
    -59.9..59.9
}

/// Any date over two centuries of the proleptic Gregorian calendar
fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (1900..2100i32, 1..=365u32)
        .prop_map(|(year, ordinal)| NaiveDate::from_yo_opt(year, ordinal).unwrap())
}

/// Location with a whole-hour offset close to local solar time
fn mean_time_location(latitude: f64, longitude: f64, elevation: f64) -> Location {
    let offset_hours = (longitude / 15.0).round() as i32;
    let zone = FixedOffset::east_opt(offset_hours * 3600).unwrap();
    Location::new("Test", latitude, longitude, elevation, Arc::new(zone)).unwrap()
}

/// Property tests for the sunrise/sunset results
#[cfg(test)]
mod solar_event_tests {
    use super::*;

    proptest! {
        /// Below 60° both events exist and fall on the requested date
        #[test]
        fn test_events_defined_at_mid_latitudes(
            lat in mid_latitude_strategy(),
            lon in longitude_strategy(),
            date in date_strategy()
        ) {
            let day = AstronomicalDay::new(date, mean_time_location(lat, lon, 0.0));

            let sunrise = day.sunrise();
            let sunset = day.sunset();
            prop_assert!(sunrise.is_some(), "no sunrise at ({}, {}) on {}", lat, lon, date);
            prop_assert!(sunset.is_some(), "no sunset at ({}, {}) on {}", lat, lon, date);

            let sunrise = sunrise.unwrap();
            let sunset = sunset.unwrap();
            prop_assert_eq!(sunrise.date_naive(), date);
            prop_assert_eq!(sunset.date_naive(), date);
            prop_assert!(sunrise < sunset);
        }

        /// Converting a local event back to a UTC hour reproduces the computed hour
        #[test]
        fn test_utc_hour_round_trip(
            lat in mid_latitude_strategy(),
            lon in longitude_strategy(),
            date in date_strategy()
        ) {
            let day = AstronomicalDay::new(date, mean_time_location(lat, lon, 0.0));

            let utc_hour = day.utc_sunrise(90.0).unwrap();
            let round_trip = AstronomicalDay::utc_hour_of(&day.sunrise().unwrap());

            // Compare on the 24-hour circle
            let diff = (utc_hour - round_trip).abs();
            prop_assert!(diff.min(24.0 - diff) < 1e-6,
                "round trip {} -> {}", utc_hour, round_trip);
        }

        /// Higher observers see the sun earlier in the morning and later at night
        #[test]
        fn test_elevation_monotonicity(
            lat in mid_latitude_strategy(),
            lon in longitude_strategy(),
            date in date_strategy(),
            low in 0.0..2000.0f64,
            extra in 0.0..3000.0f64
        ) {
            let low_day = AstronomicalDay::new(date, mean_time_location(lat, lon, low));
            let high_day = AstronomicalDay::new(date, mean_time_location(lat, lon, low + extra));

            prop_assert!(high_day.sunrise().unwrap() <= low_day.sunrise().unwrap());
            prop_assert!(high_day.sunset().unwrap() >= low_day.sunset().unwrap());
        }

        /// Repeated queries give identical answers
        #[test]
        fn test_idempotence(
            lat in latitude_strategy(),
            lon in longitude_strategy(),
            date in date_strategy()
        ) {
            let day = AstronomicalDay::new(date, mean_time_location(lat, lon, 0.0));
            prop_assert_eq!(day.solar_times(), day.solar_times());
        }

        /// Out-of-range coordinates never produce a location
        #[test]
        fn test_invalid_latitude_rejected(
            lat in prop_oneof![90.0001..1000.0f64, -1000.0..-90.0001f64],
            lon in longitude_strategy()
        ) {
            prop_assert!(Location::new("Nowhere", lat, lon, 0.0, Arc::new(Utc)).is_err());
        }
    }
}

/// Property tests for timezone detection functionality
#[cfg(test)]
mod timezone_detection_tests {
    use super::*;

    /// Generate coordinates that are likely to be on land (not in oceans)
    fn land_coordinates_strategy() -> impl Strategy<Value = (f64, f64)> {
        prop_oneof![
            // North America
            (25.0..50.0, -130.0..-65.0),
            // South America
            (-55.0..15.0, -85.0..-35.0),
            // Europe
            (35.0..70.0, -10.0..40.0),
            // Africa
            (-35.0..35.0, -20.0..50.0),
            // Asia
            (0.0..75.0, 25.0..180.0),
            // Australia
            (-45.0..-10.0, 110.0..155.0),
        ]
    }

    proptest! {
        /// Known major cities resolve to their zone
        #[test]
        fn test_major_cities_timezones(
            city_index in 0..8usize
        ) {
            let cities = [
                (40.7128, -74.0060, "America/New_York"),
                (51.5074, -0.1278, "Europe/London"),
                (35.6762, 139.6503, "Asia/Tokyo"),
                (-33.8688, 151.2093, "Australia/Sydney"),
                (-37.8136, 144.9631, "Australia/Melbourne"),
                (34.0522, -118.2437, "America/Los_Angeles"),
                (48.8566, 2.3522, "Europe/Paris"),
                (28.6139, 77.2090, "Asia/Kolkata"),
            ];

            let (lat, lon, expected_tz_str) = cities[city_index];
            let result = determine_timezone_from_coordinates(lat, lon);
            let expected = expected_tz_str.parse::<Tz>().unwrap();

            prop_assert_eq!(result, expected,
                "Incorrect timezone for city at ({}, {})", lat, lon);
        }

        /// Test that the function handles extreme coordinates gracefully
        #[test]
        fn test_extreme_coordinates(
            lat_sign in prop::bool::ANY,
            lon_sign in prop::bool::ANY
        ) {
            let lat = if lat_sign { 90.0 } else { -90.0 };
            let lon = if lon_sign { 180.0 } else { -180.0 };

            // Should not panic on extreme coordinates
            let _result = determine_timezone_from_coordinates(lat, lon);
        }

        /// Detected zones have UTC offsets between -12 and +14 hours
        #[test]
        fn test_timezone_offset_bounds(
            (lat, lon) in land_coordinates_strategy()
        ) {
            use chrono::{Offset, TimeZone};

            let tz = determine_timezone_from_coordinates(lat, lon);
            let now = Utc::now();

            let offset_hours =
                tz.offset_from_utc_datetime(&now.naive_utc()).fix().local_minus_utc() as f64 / 3600.0;

            prop_assert!((-12.0..=14.0).contains(&offset_hours),
                "Unreasonable timezone offset {} hours for coordinates ({}, {})",
                offset_hours, lat, lon);
        }

        /// A location with a detected zone still yields events on its own date
        #[test]
        fn test_detected_zone_keeps_calendar_date(
            (lat, lon) in land_coordinates_strategy(),
            date in date_strategy()
        ) {
            prop_assume!(lat.abs() < 59.0);
            let location = Location::with_detected_time_zone("Land", lat, lon, 0.0).unwrap();
            let day = AstronomicalDay::new(date, location);

            prop_assert_eq!(day.sunrise().unwrap().date_naive(), date);
            prop_assert_eq!(day.sunset().unwrap().date_naive(), date);
        }
    }
}
