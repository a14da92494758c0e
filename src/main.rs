use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use std::path::PathBuf;

use suncalc::args::{CliAction, ParsedArgs, RunOptions, display_help, display_version_info};
use suncalc::constants::*;
use suncalc::geo::{find_cities_near_coordinate, find_city};
use suncalc::geo::location::clamp_elevation;
use suncalc::utils::{clock_time, format_duration, format_event};
use suncalc::{AstronomicalDay, Config, Location, Log};

fn main() {
    let parsed = ParsedArgs::from_env();

    match parsed.action {
        CliAction::ShowVersion => display_version_info(),
        CliAction::ShowHelp => display_help(),
        CliAction::ShowHelpDueToError => {
            display_help();
            std::process::exit(EXIT_FAILURE);
        }
        CliAction::Run {
            debug_enabled,
            options,
        } => {
            Log::set_debug(debug_enabled);
            Log::log_version();

            if let Err(e) = run(&options) {
                Log::log_pipe();
                Log::log_error(&format!("{:#}", e));
                Log::log_end();
                std::process::exit(EXIT_FAILURE);
            }
        }
    }
}

/// Load settings, apply command-line overrides and print the day's events.
fn run(options: &RunOptions) -> Result<()> {
    let (mut config, config_path): (Config, Option<PathBuf>) = match &options.config_path {
        Some(path) => (Config::load_from_path(path)?, Some(path.clone())),
        None => (Config::load()?, Config::get_config_path().ok()),
    };

    apply_overrides(&mut config, options)?;
    config.log_config(config_path.as_deref());

    let location = config
        .to_location()
        .context("Failed to build location from configuration")?;
    let date = options.date.unwrap_or_else(|| today_at(&location));

    let day = AstronomicalDay::new(date, location).with_calculator(config.calculator());
    log_calculation_details(&day);
    print_solar_times(&day, config.time_format(), options.show_all);

    Log::log_end();
    Ok(())
}

/// Layer command-line values over the loaded configuration.
fn apply_overrides(config: &mut Config, options: &RunOptions) -> Result<()> {
    if let Some(query) = &options.city {
        let city = find_city(query).with_context(|| format!("Unknown city '{}'", query))?;
        Log::log_debug(&format!("Matched city {}", city.label()));

        config.name = Some(city.label());
        config.latitude = Some(city.latitude);
        config.longitude = Some(city.longitude);
        // The configured zone belongs to the configured place
        config.timezone = Some(DEFAULT_TIMEZONE.to_string());
    }

    if let (Some(latitude), Some(longitude)) = (options.latitude, options.longitude) {
        config.name = Some(
            find_cities_near_coordinate(latitude, longitude, 1)
                .first()
                .map(|city| format!("Near {}", city.label()))
                .unwrap_or_else(|| "Custom location".to_string()),
        );
        config.latitude = Some(latitude);
        config.longitude = Some(longitude);
        config.timezone = Some(DEFAULT_TIMEZONE.to_string());
    }

    if let Some(elevation) = options.elevation {
        if elevation < MINIMUM_ELEVATION {
            Log::log_warning(&format!(
                "Elevation {} m is below sea level, using {} m",
                elevation, MINIMUM_ELEVATION
            ));
        }
        config.elevation = Some(clamp_elevation(elevation));
    }

    if let Some(timezone) = &options.timezone {
        config.timezone = Some(timezone.clone());
    }

    suncalc::config::validate_config(config).context("Invalid command-line override")
}

/// Today's calendar date in the location's time zone.
fn today_at(location: &Location) -> NaiveDate {
    let now = Utc::now();
    now.with_timezone(&location.offset_at(&now)).date_naive()
}

fn log_calculation_details(day: &AstronomicalDay) {
    if !Log::is_debug() {
        return;
    }

    let describe = |hour: Option<f64>| match hour {
        Some(hour) => match clock_time(hour) {
            Some(time) => format!("{:.4} h ({} UTC)", hour, time),
            None => format!("{:.4} h", hour),
        },
        None => "no event".to_string(),
    };

    let calculator = day.calculator();
    Log::log_debug(&format!(
        "Refraction {}′, solar radius {}′, elevation {} m",
        calculator.refraction(),
        calculator.solar_radius(),
        day.location().elevation()
    ));
    Log::log_debug(&format!(
        "Sunrise zenith: {:.4}°",
        calculator.adjust_zenith(GEOMETRIC_ZENITH, day.location().elevation())
    ));
    Log::log_debug(&format!("UTC sunrise: {}", describe(day.utc_sunrise(GEOMETRIC_ZENITH))));
    Log::log_debug(&format!("UTC sunset: {}", describe(day.utc_sunset(GEOMETRIC_ZENITH))));
}

fn print_solar_times(day: &AstronomicalDay, time_format: &str, show_all: bool) {
    let location = day.location();
    let times = day.solar_times();

    Log::log_block_start(&format!(
        "{} on {}",
        location.name(),
        times.date.format("%A %-d %B %Y")
    ));
    Log::log_indented(&format!(
        "{}, {} m",
        location.coordinates_for_display(),
        location.elevation()
    ));
    Log::log_pipe();

    let mut rows: Vec<(&str, String)> = Vec::new();
    if show_all {
        rows.push((
            "Astronomical dawn",
            format_event(times.begin_astronomical_twilight.as_ref(), time_format),
        ));
        rows.push((
            "Nautical dawn",
            format_event(times.begin_nautical_twilight.as_ref(), time_format),
        ));
        rows.push((
            "Civil dawn",
            format_event(times.begin_civil_twilight.as_ref(), time_format),
        ));
    }
    rows.push(("Sunrise", format_event(times.sunrise.as_ref(), time_format)));
    rows.push(("Solar noon", format_event(times.solar_noon.as_ref(), time_format)));
    rows.push(("Sunset", format_event(times.sunset.as_ref(), time_format)));
    if show_all {
        rows.push((
            "Civil dusk",
            format_event(times.end_civil_twilight.as_ref(), time_format),
        ));
        rows.push((
            "Nautical dusk",
            format_event(times.end_nautical_twilight.as_ref(), time_format),
        ));
        rows.push((
            "Astronomical dusk",
            format_event(times.end_astronomical_twilight.as_ref(), time_format),
        ));
    }
    rows.push((
        "Day length",
        times
            .day_length
            .map(format_duration)
            .unwrap_or_else(|| "--".to_string()),
    ));

    let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    for (label, value) in &rows {
        Log::log_field(label, value, width);
    }

    if times.sunrise.is_none() && times.sunset.is_none() {
        Log::log_pipe();
        Log::log_info("The sun does not cross the horizon on this date.");
    }
}
