//! Solar events for one calendar date at one location.
//!
//! [`AstronomicalDay`] binds a date and a shared [`Location`] and turns the UTC
//! fractional hours produced by [`SolarEventCalculator`] into timestamps in the
//! location's time zone. Every query returns `None` when the event does not
//! happen on that date, which is a normal outcome inside the polar circles and
//! for the deeper twilights at high latitudes in summer.
//!
//! Local timestamps always fall on the configured calendar date: an event whose
//! UTC time of day lands on the neighbouring UTC date (Melbourne's sunrise is the
//! previous evening in UTC) is shifted by a day before the offset is applied.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone, Utc};
use std::sync::Arc;

use crate::constants::*;
use crate::geo::location::Location;
use crate::geo::solar::SolarEventCalculator;
use crate::utils::fractional_hour;

const MICROS_PER_HOUR: f64 = 3_600_000_000.0;

/// All events of one day, in the location's time zone.
#[derive(Debug, Clone, PartialEq)]
pub struct SolarTimes {
    pub date: NaiveDate,
    pub begin_astronomical_twilight: Option<DateTime<FixedOffset>>,
    pub begin_nautical_twilight: Option<DateTime<FixedOffset>>,
    pub begin_civil_twilight: Option<DateTime<FixedOffset>>,
    pub sunrise: Option<DateTime<FixedOffset>>,
    pub solar_noon: Option<DateTime<FixedOffset>>,
    pub sunset: Option<DateTime<FixedOffset>>,
    pub end_civil_twilight: Option<DateTime<FixedOffset>>,
    pub end_nautical_twilight: Option<DateTime<FixedOffset>>,
    pub end_astronomical_twilight: Option<DateTime<FixedOffset>>,
    pub day_length: Option<Duration>,
}

/// A calendar date at a location.
///
/// Mutating the date or location needs `&mut self`; share one instance across
/// threads only behind a lock, or give each session its own instance.
#[derive(Debug, Clone)]
pub struct AstronomicalDay {
    date: NaiveDate,
    location: Arc<Location>,
    calculator: SolarEventCalculator,
}

impl AstronomicalDay {
    pub fn new(date: NaiveDate, location: impl Into<Arc<Location>>) -> Self {
        Self {
            date,
            location: location.into(),
            calculator: SolarEventCalculator::new(),
        }
    }

    /// Create a day from calendar fields, `None` if they do not form a valid date.
    pub fn from_ymd(
        year: i32,
        month: u32,
        day: u32,
        location: impl Into<Arc<Location>>,
    ) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(|date| Self::new(date, location))
    }

    /// Use a calculator with non-default refraction or solar radius.
    pub fn with_calculator(mut self, calculator: SolarEventCalculator) -> Self {
        self.calculator = calculator;
        self
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn location(&self) -> &Arc<Location> {
        &self.location
    }

    pub fn calculator(&self) -> &SolarEventCalculator {
        &self.calculator
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = date;
    }

    pub fn set_location(&mut self, location: impl Into<Arc<Location>>) {
        self.location = location.into();
    }

    // ═══ Sunrise and Sunset ═══

    /// Visible sunrise, accounting for refraction, solar radius and elevation.
    pub fn sunrise(&self) -> Option<DateTime<FixedOffset>> {
        self.to_local(self.utc_sunrise(GEOMETRIC_ZENITH))
    }

    /// Visible sunset, accounting for refraction, solar radius and elevation.
    pub fn sunset(&self) -> Option<DateTime<FixedOffset>> {
        self.to_local(self.utc_sunset(GEOMETRIC_ZENITH))
    }

    /// Sunrise as seen from sea level, ignoring the location's elevation.
    pub fn sea_level_sunrise(&self) -> Option<DateTime<FixedOffset>> {
        self.to_local(self.calculator.utc_sunrise(
            self.date,
            &self.location,
            GEOMETRIC_ZENITH,
            false,
        ))
    }

    /// Sunset as seen from sea level, ignoring the location's elevation.
    pub fn sea_level_sunset(&self) -> Option<DateTime<FixedOffset>> {
        self.to_local(self.calculator.utc_sunset(
            self.date,
            &self.location,
            GEOMETRIC_ZENITH,
            false,
        ))
    }

    // ═══ Twilight ═══

    pub fn begin_civil_twilight(&self) -> Option<DateTime<FixedOffset>> {
        self.sunrise_offset_by_degrees(CIVIL_ZENITH)
    }

    pub fn end_civil_twilight(&self) -> Option<DateTime<FixedOffset>> {
        self.sunset_offset_by_degrees(CIVIL_ZENITH)
    }

    pub fn begin_nautical_twilight(&self) -> Option<DateTime<FixedOffset>> {
        self.sunrise_offset_by_degrees(NAUTICAL_ZENITH)
    }

    pub fn end_nautical_twilight(&self) -> Option<DateTime<FixedOffset>> {
        self.sunset_offset_by_degrees(NAUTICAL_ZENITH)
    }

    pub fn begin_astronomical_twilight(&self) -> Option<DateTime<FixedOffset>> {
        self.sunrise_offset_by_degrees(ASTRONOMICAL_ZENITH)
    }

    pub fn end_astronomical_twilight(&self) -> Option<DateTime<FixedOffset>> {
        self.sunset_offset_by_degrees(ASTRONOMICAL_ZENITH)
    }

    /// Morning time at which the sun centre reaches `zenith` degrees.
    pub fn sunrise_offset_by_degrees(&self, zenith: f64) -> Option<DateTime<FixedOffset>> {
        self.to_local(self.utc_sunrise(zenith))
    }

    /// Evening time at which the sun centre reaches `zenith` degrees.
    pub fn sunset_offset_by_degrees(&self, zenith: f64) -> Option<DateTime<FixedOffset>> {
        self.to_local(self.utc_sunset(zenith))
    }

    // ═══ Derived Values ═══

    /// Midpoint between sunrise and sunset.
    pub fn solar_noon(&self) -> Option<DateTime<FixedOffset>> {
        let sunrise = self.sunrise()?;
        let length = self.day_length()?;
        Some(sunrise + length / 2)
    }

    /// Time from sunrise to sunset, `None` unless both happen and sunset is later.
    pub fn day_length(&self) -> Option<Duration> {
        let length = self.sunset()? - self.sunrise()?;
        (length > Duration::zero()).then_some(length)
    }

    /// Every event of the day in one pass.
    pub fn solar_times(&self) -> SolarTimes {
        SolarTimes {
            date: self.date,
            begin_astronomical_twilight: self.begin_astronomical_twilight(),
            begin_nautical_twilight: self.begin_nautical_twilight(),
            begin_civil_twilight: self.begin_civil_twilight(),
            sunrise: self.sunrise(),
            solar_noon: self.solar_noon(),
            sunset: self.sunset(),
            end_civil_twilight: self.end_civil_twilight(),
            end_nautical_twilight: self.end_nautical_twilight(),
            end_astronomical_twilight: self.end_astronomical_twilight(),
            day_length: self.day_length(),
        }
    }

    // ═══ UTC Hours ═══

    /// UTC hour of the morning crossing of `zenith`, elevation-adjusted.
    pub fn utc_sunrise(&self, zenith: f64) -> Option<f64> {
        self.calculator
            .utc_sunrise(self.date, &self.location, zenith, true)
    }

    /// UTC hour of the evening crossing of `zenith`, elevation-adjusted.
    pub fn utc_sunset(&self, zenith: f64) -> Option<f64> {
        self.calculator
            .utc_sunset(self.date, &self.location, zenith, true)
    }

    /// UTC time of day of `timestamp` as fractional hours.
    pub fn utc_hour_of<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> f64 {
        fractional_hour(timestamp.with_timezone(&Utc).time())
    }

    /// Place a UTC hour on this day's date in the location's time zone.
    fn to_local(&self, utc_hour: Option<f64>) -> Option<DateTime<FixedOffset>> {
        let utc_hour = utc_hour?;
        let midnight = Utc.from_utc_datetime(&self.date.and_hms_opt(0, 0, 0)?);
        let mut instant =
            midnight + Duration::microseconds((utc_hour * MICROS_PER_HOUR).round() as i64);

        // Keep the local wall-clock date equal to self.date
        let offset_hours = self.location.offset_at(&instant).local_minus_utc() as f64 / 3600.0;
        let local_hour = utc_hour + offset_hours;
        if local_hour >= 24.0 {
            instant = instant - Duration::days(1);
        } else if local_hour < 0.0 {
            instant = instant + Duration::days(1);
        }

        let offset = self.location.offset_at(&instant);
        Some(instant.with_timezone(&offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::test_constants::*;
    use crate::geo::timezone::UtcOffsetProvider;
    use chrono::{NaiveTime, Timelike};

    fn melbourne(elevation: f64) -> Location {
        Location::new(
            "Melbourne",
            TEST_MELBOURNE_LATITUDE,
            TEST_MELBOURNE_LONGITUDE,
            elevation,
            Arc::new(chrono_tz::Australia::Melbourne),
        )
        .unwrap()
    }

    fn hm(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn test_melbourne_summer() {
        let day = AstronomicalDay::from_ymd(2024, 1, 1, melbourne(0.0)).unwrap();
        let sunrise = day.sunrise().unwrap();
        let sunset = day.sunset().unwrap();

        assert_eq!(sunrise.date_naive(), day.date());
        assert_eq!(sunset.date_naive(), day.date());
        assert!(sunrise.time() < hm(7, 0), "sunrise {}", sunrise);
        assert!(sunset.time() > hm(20, 0), "sunset {}", sunset);
        assert_eq!(sunrise.offset().local_minus_utc(), 11 * 3600);
    }

    #[test]
    fn test_melbourne_winter() {
        let day = AstronomicalDay::from_ymd(2024, 6, 21, melbourne(0.0)).unwrap();
        let sunrise = day.sunrise().unwrap();
        let sunset = day.sunset().unwrap();

        assert!(sunrise.time() > hm(7, 0), "sunrise {}", sunrise);
        assert!(sunset.time() < hm(17, 30), "sunset {}", sunset);
        assert_eq!(sunrise.offset().local_minus_utc(), 10 * 3600);
    }

    #[test]
    fn test_daylight_saving_end() {
        // Clocks go back from +11 to +10 at 03:00 on 2024-04-07
        let mut day = AstronomicalDay::from_ymd(2024, 4, 6, melbourne(0.0)).unwrap();
        let before = day.sunrise().unwrap();
        assert_eq!(before.date_naive(), day.date());
        assert_eq!(before.offset().local_minus_utc(), 11 * 3600);
        assert_eq!(day.sunset().unwrap().offset().local_minus_utc(), 11 * 3600);

        day.set_date(NaiveDate::from_ymd_opt(2024, 4, 7).unwrap());
        let after = day.sunrise().unwrap();
        assert_eq!(after.date_naive(), day.date());
        assert_eq!(after.offset().local_minus_utc(), 10 * 3600);
        assert_eq!(day.sunset().unwrap().offset().local_minus_utc(), 10 * 3600);

        // The wall clock jumps back by about an hour
        let shift = (before.time() - after.time()).num_minutes();
        assert!((50..=70).contains(&shift), "shift {} minutes", shift);
    }

    #[test]
    fn test_daylight_saving_start() {
        // Clocks go forward from +10 to +11 at 02:00 on 2024-10-06
        let mut day = AstronomicalDay::from_ymd(2024, 10, 5, melbourne(0.0)).unwrap();
        let before = day.sunrise().unwrap();
        assert_eq!(before.date_naive(), day.date());
        assert_eq!(before.offset().local_minus_utc(), 10 * 3600);

        day.set_date(NaiveDate::from_ymd_opt(2024, 10, 6).unwrap());
        let after = day.sunrise().unwrap();
        let sunset = day.sunset().unwrap();
        assert_eq!(after.date_naive(), day.date());
        assert_eq!(after.offset().local_minus_utc(), 11 * 3600);
        assert_eq!(sunset.date_naive(), day.date());
        assert_eq!(sunset.offset().local_minus_utc(), 11 * 3600);

        let shift = (after.time() - before.time()).num_minutes();
        assert!((50..=70).contains(&shift), "shift {} minutes", shift);
    }

    #[test]
    fn test_invalid_date_rejected() {
        assert!(AstronomicalDay::from_ymd(2023, 2, 29, melbourne(0.0)).is_none());
        assert!(AstronomicalDay::from_ymd(2024, 13, 1, melbourne(0.0)).is_none());
    }

    #[test]
    fn test_event_order() {
        let day = AstronomicalDay::from_ymd(2024, 3, 15, melbourne(0.0)).unwrap();
        let times = day.solar_times();

        let ordered = [
            times.begin_astronomical_twilight,
            times.begin_nautical_twilight,
            times.begin_civil_twilight,
            times.sunrise,
            times.solar_noon,
            times.sunset,
            times.end_civil_twilight,
            times.end_nautical_twilight,
            times.end_astronomical_twilight,
        ]
        .map(|t| t.unwrap());

        assert!(ordered.windows(2).all(|w| w[0] < w[1]), "{:?}", ordered);
        assert_eq!(times.date, day.date());
    }

    #[test]
    fn test_solar_noon_and_day_length() {
        let day = AstronomicalDay::from_ymd(2024, 1, 1, melbourne(0.0)).unwrap();

        let noon = day.solar_noon().unwrap();
        assert!(noon.time() > hm(13, 0) && noon.time() < hm(13, 45), "noon {}", noon);

        let length = day.day_length().unwrap();
        assert!(length > Duration::hours(14) && length < Duration::hours(15));
    }

    #[test]
    fn test_round_trip_utc_hour() {
        for month in 1..=12 {
            let day = AstronomicalDay::from_ymd(2024, month, 10, melbourne(0.0)).unwrap();
            let utc_hour = day.utc_sunrise(GEOMETRIC_ZENITH).unwrap();
            let sunrise = day.sunrise().unwrap();
            let back = AstronomicalDay::utc_hour_of(&sunrise);
            assert!((utc_hour - back).abs() < 1e-6, "{} vs {}", utc_hour, back);
        }
    }

    #[test]
    fn test_elevation_extends_daylight() {
        let sea = AstronomicalDay::from_ymd(2024, 4, 1, melbourne(0.0)).unwrap();
        let hill = AstronomicalDay::from_ymd(2024, 4, 1, melbourne(1500.0)).unwrap();

        assert!(hill.sunrise().unwrap() < sea.sunrise().unwrap());
        assert!(hill.sunset().unwrap() > sea.sunset().unwrap());

        // Sea-level variants ignore the elevation
        assert_eq!(hill.sea_level_sunrise(), sea.sunrise());
        assert_eq!(hill.sea_level_sunset(), sea.sunset());

        // Twilight does not depend on elevation
        assert_eq!(hill.begin_civil_twilight(), sea.begin_civil_twilight());
        assert_eq!(hill.end_nautical_twilight(), sea.end_nautical_twilight());
    }

    #[test]
    fn test_polar_no_event() {
        let tromso = Location::new(
            "Tromsø",
            TEST_ARCTIC_LATITUDE,
            TEST_ARCTIC_LONGITUDE,
            0.0,
            Arc::new(chrono_tz::Europe::Oslo),
        )
        .unwrap();

        let winter = AstronomicalDay::from_ymd(2024, 12, 21, tromso.clone()).unwrap();
        assert_eq!(winter.sunrise(), None);
        assert_eq!(winter.sunset(), None);
        assert_eq!(winter.solar_noon(), None);
        assert_eq!(winter.day_length(), None);
        // Civil twilight still happens in polar night at 70°
        assert!(winter.begin_civil_twilight().is_some());

        let summer = AstronomicalDay::from_ymd(2024, 6, 21, tromso).unwrap();
        assert_eq!(summer.sunrise(), None);
        assert_eq!(summer.sunset(), None);
        assert_eq!(summer.end_astronomical_twilight(), None);
    }

    #[test]
    fn test_midnight_utc_is_an_event() {
        // A zone whose offset pushes the UTC event to the previous day must
        // still produce a timestamp on the requested local date
        let east = Location::new(
            "Far east",
            0.0,
            179.0,
            0.0,
            Arc::new(FixedOffset::east_opt(12 * 3600).unwrap()),
        )
        .unwrap();
        let day = AstronomicalDay::from_ymd(2024, 3, 20, east).unwrap();

        let sunrise = day.sunrise().unwrap();
        assert_eq!(sunrise.date_naive(), day.date());
        assert!(sunrise.hour() >= 5 && sunrise.hour() <= 6, "sunrise {}", sunrise);
    }

    #[test]
    fn test_swapping_location_and_date() {
        let mut day = AstronomicalDay::from_ymd(2024, 1, 1, melbourne(0.0)).unwrap();
        let first = day.sunrise();

        day.set_date(NaiveDate::from_ymd_opt(2024, 6, 21).unwrap());
        assert_ne!(day.sunrise(), first);

        let utc: Arc<dyn UtcOffsetProvider> = Arc::new(Utc);
        let greenwich = Location::new("Greenwich", 51.4769, 0.0, 0.0, utc).unwrap();
        day.set_location(greenwich);
        assert_eq!(day.location().name(), "Greenwich");
        assert_eq!(day.sunrise().unwrap().offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_idempotent_queries() {
        let day = AstronomicalDay::from_ymd(2024, 9, 9, melbourne(120.0)).unwrap();
        assert_eq!(day.solar_times(), day.solar_times());
    }

    #[test]
    fn test_custom_calculator() {
        let no_refraction = SolarEventCalculator::new().with_refraction(0.0);
        let plain = AstronomicalDay::from_ymd(2024, 5, 5, melbourne(0.0)).unwrap();
        let adjusted = plain.clone().with_calculator(no_refraction);

        // Without refraction the sun is seen later in the morning
        assert!(adjusted.sunrise().unwrap() > plain.sunrise().unwrap());
        assert_eq!(adjusted.calculator().refraction(), 0.0);
    }
}
