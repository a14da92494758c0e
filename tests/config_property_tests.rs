use proptest::prelude::*;
use suncalc::config::{Config, validate_config};
use suncalc::constants::*;

fn base_config() -> Config {
    Config {
        name: Some("Test".to_string()),
        latitude: Some(0.0),
        longitude: Some(0.0),
        elevation: Some(0.0),
        timezone: Some("UTC".to_string()),
        refraction: Some(DEFAULT_REFRACTION_ARC_MINUTES),
        solar_radius: Some(DEFAULT_SOLAR_RADIUS_ARC_MINUTES),
        time_format: Some(DEFAULT_TIME_FORMAT.to_string()),
    }
}

/// Generate fixed offsets in the accepted `±HH:MM` form
fn fixed_offset_strategy() -> impl Strategy<Value = String> {
    (prop::bool::ANY, 0..=14u32, 0..60u32).prop_map(|(east, hours, minutes)| {
        format!("{}{:02}:{:02}", if east { '+' } else { '-' }, hours, minutes)
    })
}

proptest! {
    /// Every in-range combination of numeric settings validates
    #[test]
    fn test_valid_ranges_accepted(
        latitude in MINIMUM_LATITUDE..=MAXIMUM_LATITUDE,
        longitude in MINIMUM_LONGITUDE..=MAXIMUM_LONGITUDE,
        elevation in MINIMUM_ELEVATION..=MAXIMUM_ELEVATION,
        refraction in MINIMUM_REFRACTION..=MAXIMUM_REFRACTION,
        solar_radius in MINIMUM_SOLAR_RADIUS..=MAXIMUM_SOLAR_RADIUS
    ) {
        let config = Config {
            latitude: Some(latitude),
            longitude: Some(longitude),
            elevation: Some(elevation),
            refraction: Some(refraction),
            solar_radius: Some(solar_radius),
            ..base_config()
        };
        prop_assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_latitude_out_of_range_rejected(
        latitude in prop_oneof![-1000.0..MINIMUM_LATITUDE, (MAXIMUM_LATITUDE + 1e-9)..1000.0]
    ) {
        let config = Config { latitude: Some(latitude), ..base_config() };
        prop_assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_longitude_out_of_range_rejected(
        longitude in prop_oneof![-1000.0..MINIMUM_LONGITUDE, (MAXIMUM_LONGITUDE + 1e-9)..1000.0]
    ) {
        let config = Config { longitude: Some(longitude), ..base_config() };
        prop_assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_refraction_out_of_range_rejected(
        refraction in prop_oneof![-100.0..-0.001f64, (MAXIMUM_REFRACTION + 0.001)..1000.0]
    ) {
        let config = Config { refraction: Some(refraction), ..base_config() };
        prop_assert!(validate_config(&config).is_err());
    }

    /// Fixed offsets within ±14:59 resolve and build a location
    #[test]
    fn test_fixed_offsets_accepted(zone in fixed_offset_strategy()) {
        let config = Config { timezone: Some(zone.clone()), ..base_config() };
        prop_assert!(validate_config(&config).is_ok(), "rejected {}", zone);
        prop_assert!(config.to_location().is_ok());
    }

    /// The calculator carries the configured tuning through unchanged
    #[test]
    fn test_calculator_reflects_config(
        refraction in MINIMUM_REFRACTION..=MAXIMUM_REFRACTION,
        solar_radius in MINIMUM_SOLAR_RADIUS..=MAXIMUM_SOLAR_RADIUS
    ) {
        let config = Config {
            refraction: Some(refraction),
            solar_radius: Some(solar_radius),
            ..base_config()
        };
        let calculator = config.calculator();
        prop_assert_eq!(calculator.refraction(), refraction);
        prop_assert_eq!(calculator.solar_radius(), solar_radius);
    }
}
