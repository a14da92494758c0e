//! Configuration system for suncalc.
//!
//! Settings live in `suncalc.toml` under the user's config directory
//! (`$XDG_CONFIG_HOME/suncalc/suncalc.toml` on Linux). A commented default file
//! is written on first use.
//!
//! ```toml
//! #[suncalc configuration]
//! name = "Melbourne"       # Label shown with the results
//! timezone = "auto"        # "auto", "local", "UTC", IANA name or "+10:00"
//! time_format = "%H:%M"    # strftime format for printed times
//!
//! #[Almanac tuning]
//! refraction = 34.4788     # arcminutes
//! solar_radius = 16.0      # arcminutes
//!
//! #[Location]
//! latitude = -37.5
//! longitude = 145.01
//! elevation = 0.0          # meters
//! ```
//!
//! ## Private coordinates
//!
//! An optional `geo.toml` next to the main file may hold `latitude`,
//! `longitude` and `elevation`. Values found there override the main file, so
//! the main settings can be shared without revealing where the user lives. A
//! malformed `geo.toml` is reported and ignored.
//!
//! ## Validation
//!
//! Coordinates, refraction and solar radius are range-checked, the time zone
//! must resolve and the time format must be a valid strftime string. A negative
//! elevation is not an error: it is clamped to sea level with a warning.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::*;
use crate::geo::location::{Location, clamp_elevation};
use crate::geo::solar::SolarEventCalculator;
use crate::geo::timezone::resolve_time_zone;
use crate::logger::Log;

/// Optional geo.toml holding private coordinates.
#[derive(Debug, Deserialize, Clone)]
struct GeoConfig {
    latitude: Option<f64>,
    longitude: Option<f64>,
    elevation: Option<f64>,
}

/// Configuration structure for suncalc settings.
///
/// Every field is optional in the file; loading fills in the defaults from
/// [`crate::constants`] before validating.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    /// Label for the location, not used in the calculation.
    pub name: Option<String>,
    pub latitude: Option<f64>,  // degrees, south negative
    pub longitude: Option<f64>, // degrees, west negative
    pub elevation: Option<f64>, // meters above sea level

    /// Time zone of the printed times.
    ///
    /// `auto` looks the zone up from the coordinates, `local` uses the system
    /// zone; IANA names and fixed `±HH:MM` offsets are accepted too.
    pub timezone: Option<String>,

    pub refraction: Option<f64>,   // arcminutes
    pub solar_radius: Option<f64>, // arcminutes
    pub time_format: Option<String>,
}

impl Config {
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(config_dir.join("suncalc").join("suncalc.toml"))
    }

    /// Path of the geo.toml belonging to a config file.
    pub fn geo_path_for(config_path: &Path) -> Option<PathBuf> {
        config_path.parent().map(|parent| parent.join("geo.toml"))
    }

    /// Write a commented default configuration to `path`.
    ///
    /// Parent directories are created. When a geo.toml already exists next to
    /// `path` it is left untouched and the location keys are omitted from the
    /// new file, so the private coordinates keep taking effect.
    pub fn create_default_config(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let geo_path = Self::geo_path_for(path).filter(|geo_path| geo_path.exists());
        if let Some(geo_path) = &geo_path {
            Log::log_indented(&format!(
                "Keeping coordinates from {}",
                crate::utils::path_for_display(geo_path)
            ));
        }

        let builder = ConfigBuilder::new()
            .add_section("suncalc configuration")
            .add_setting(
                "name",
                &format!("\"{}\"", DEFAULT_LOCATION_NAME),
                "Label shown with the results",
            )
            .add_setting(
                "timezone",
                &format!("\"{}\"", DEFAULT_TIMEZONE),
                "\"auto\", \"local\", \"UTC\", an IANA name or an offset like \"+10:00\"",
            )
            .add_setting(
                "time_format",
                &format!("\"{}\"", DEFAULT_TIME_FORMAT),
                "strftime format for printed times",
            )
            .add_section("Almanac tuning")
            .add_setting(
                "refraction",
                &DEFAULT_REFRACTION_ARC_MINUTES.to_string(),
                &format!(
                    "Atmospheric refraction in arcminutes ({}-{})",
                    MINIMUM_REFRACTION, MAXIMUM_REFRACTION
                ),
            )
            .add_setting(
                "solar_radius",
                &format!("{:.1}", DEFAULT_SOLAR_RADIUS_ARC_MINUTES),
                &format!(
                    "Apparent solar radius in arcminutes ({}-{})",
                    MINIMUM_SOLAR_RADIUS, MAXIMUM_SOLAR_RADIUS
                ),
            )
            .add_section("Location");

        let builder = if geo_path.is_none() {
            builder
                .add_setting(
                    "latitude",
                    &format!("{:.6}", DEFAULT_LATITUDE),
                    "Degrees, south negative",
                )
                .add_setting(
                    "longitude",
                    &format!("{:.6}", DEFAULT_LONGITUDE),
                    "Degrees, west negative",
                )
                .add_setting(
                    "elevation",
                    &format!("{:.1}", DEFAULT_ELEVATION),
                    "Meters above sea level (negative values count as 0)",
                )
        } else {
            builder
        };

        fs::write(path, builder.build()).context("Failed to write default config file")?;
        Ok(())
    }

    /// Fill in defaults and clamp the elevation.
    fn apply_defaults_and_validate_fields(config: &mut Config) -> Result<()> {
        if config.name.is_none() {
            config.name = Some(DEFAULT_LOCATION_NAME.to_string());
        }
        if config.latitude.is_none() {
            config.latitude = Some(DEFAULT_LATITUDE);
        }
        if config.longitude.is_none() {
            config.longitude = Some(DEFAULT_LONGITUDE);
        }
        if config.timezone.is_none() {
            config.timezone = Some(DEFAULT_TIMEZONE.to_string());
        }
        if config.refraction.is_none() {
            config.refraction = Some(DEFAULT_REFRACTION_ARC_MINUTES);
        }
        if config.solar_radius.is_none() {
            config.solar_radius = Some(DEFAULT_SOLAR_RADIUS_ARC_MINUTES);
        }
        if config.time_format.is_none() {
            config.time_format = Some(DEFAULT_TIME_FORMAT.to_string());
        }

        match config.elevation {
            None => config.elevation = Some(DEFAULT_ELEVATION),
            Some(elevation) if !elevation.is_finite() => {
                anyhow::bail!("Elevation must be a finite number of meters (got {})", elevation)
            }
            Some(elevation) if elevation < MINIMUM_ELEVATION => {
                Log::log_pipe();
                Log::log_warning(&format!(
                    "Elevation {} m is below sea level, using {} m",
                    elevation, MINIMUM_ELEVATION
                ));
                Log::log_indented("The horizon dip model only covers observers above sea level.");
                config.elevation = Some(clamp_elevation(elevation));
            }
            Some(_) => {}
        }

        Ok(())
    }

    /// Load and validate a configuration file.
    ///
    /// Unlike [`Config::load`], this never creates a file.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "Configuration file not found at specified path: {}",
                path.display()
            );
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        Self::load_geo_override_from_path(&mut config, path)?;
        Self::apply_defaults_and_validate_fields(&mut config)?;
        validate_config(&config)?;

        Ok(config)
    }

    /// Apply geo.toml next to `config_path`, if any.
    fn load_geo_override_from_path(config: &mut Config, config_path: &Path) -> Result<()> {
        let Some(geo_path) = Self::geo_path_for(config_path) else {
            return Ok(());
        };
        if !geo_path.exists() {
            return Ok(());
        }

        match fs::read_to_string(&geo_path) {
            Ok(content) => match toml::from_str::<GeoConfig>(&content) {
                Ok(geo_config) => {
                    if let Some(lat) = geo_config.latitude {
                        config.latitude = Some(lat);
                    }
                    if let Some(lon) = geo_config.longitude {
                        config.longitude = Some(lon);
                    }
                    if let Some(elevation) = geo_config.elevation {
                        config.elevation = Some(elevation);
                    }
                    Log::log_debug(&format!(
                        "Loaded geographic overrides from {}",
                        crate::utils::path_for_display(&geo_path)
                    ));
                }
                Err(e) => {
                    Log::log_warning(&format!(
                        "Failed to parse geo.toml: {}. Using coordinates from main config.",
                        e
                    ));
                }
            },
            Err(e) => {
                Log::log_warning(&format!(
                    "Failed to read geo.toml: {}. Using coordinates from main config.",
                    e
                ));
            }
        }

        Ok(())
    }

    /// Load the user's configuration, creating a default file if none exists.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)
                .context("Failed to create default config during load")?;
            Log::log_block_start(&format!(
                "Created default configuration at {}",
                crate::utils::path_for_display(&config_path)
            ));
        }

        Self::load_from_path(&config_path).with_context(|| {
            format!(
                "Failed to load configuration from {}",
                config_path.display()
            )
        })
    }

    /// Build the observer location described by this configuration.
    pub fn to_location(&self) -> Result<Location> {
        let latitude = self.latitude.unwrap_or(DEFAULT_LATITUDE);
        let longitude = self.longitude.unwrap_or(DEFAULT_LONGITUDE);
        let timezone = self.timezone.as_deref().unwrap_or(DEFAULT_TIMEZONE);

        let time_zone = resolve_time_zone(timezone, latitude, longitude)?;
        let location = Location::new(
            self.name.as_deref().unwrap_or(DEFAULT_LOCATION_NAME),
            latitude,
            longitude,
            self.elevation.unwrap_or(DEFAULT_ELEVATION),
            time_zone,
        )?;
        Ok(location)
    }

    /// Build a calculator with the configured refraction and solar radius.
    pub fn calculator(&self) -> SolarEventCalculator {
        SolarEventCalculator::new()
            .with_refraction(self.refraction.unwrap_or(DEFAULT_REFRACTION_ARC_MINUTES))
            .with_solar_radius(self.solar_radius.unwrap_or(DEFAULT_SOLAR_RADIUS_ARC_MINUTES))
    }

    pub fn time_format(&self) -> &str {
        self.time_format.as_deref().unwrap_or(DEFAULT_TIME_FORMAT)
    }

    pub fn log_config(&self, config_path: Option<&Path>) {
        match config_path {
            Some(path) => Log::log_block_start(&format!(
                "Loaded configuration from {}",
                crate::utils::path_for_display(path)
            )),
            None => Log::log_block_start("Using built-in defaults"),
        }

        if let Some(geo_path) = config_path
            .and_then(Self::geo_path_for)
            .filter(|geo_path| geo_path.exists())
        {
            Log::log_indented(&format!(
                "Loaded geo coordinates from {}",
                crate::utils::path_for_display(&geo_path)
            ));
        }

        Log::log_indented(&format!(
            "Location: {} ({})",
            self.name.as_deref().unwrap_or(DEFAULT_LOCATION_NAME),
            crate::utils::format_coordinates(
                self.latitude.unwrap_or(DEFAULT_LATITUDE),
                self.longitude.unwrap_or(DEFAULT_LONGITUDE)
            )
        ));
        Log::log_indented(&format!(
            "Elevation: {} m",
            self.elevation.unwrap_or(DEFAULT_ELEVATION)
        ));
        Log::log_indented(&format!(
            "Time zone: {}",
            self.timezone.as_deref().unwrap_or(DEFAULT_TIMEZONE)
        ));
        Log::log_indented(&format!(
            "Refraction: {}′, solar radius: {}′",
            self.refraction.unwrap_or(DEFAULT_REFRACTION_ARC_MINUTES),
            self.solar_radius.unwrap_or(DEFAULT_SOLAR_RADIUS_ARC_MINUTES)
        ));
    }
}

/// Check a configuration for values the calculation cannot use.
pub fn validate_config(config: &Config) -> Result<()> {
    let latitude = config.latitude.unwrap_or(DEFAULT_LATITUDE);
    if !(MINIMUM_LATITUDE..=MAXIMUM_LATITUDE).contains(&latitude) {
        anyhow::bail!(
            "Latitude must be between {} and {} degrees (got {})",
            MINIMUM_LATITUDE,
            MAXIMUM_LATITUDE,
            latitude
        );
    }

    let longitude = config.longitude.unwrap_or(DEFAULT_LONGITUDE);
    if !(MINIMUM_LONGITUDE..=MAXIMUM_LONGITUDE).contains(&longitude) {
        anyhow::bail!(
            "Longitude must be between {} and {} degrees (got {})",
            MINIMUM_LONGITUDE,
            MAXIMUM_LONGITUDE,
            longitude
        );
    }

    let elevation = config.elevation.unwrap_or(DEFAULT_ELEVATION);
    if !elevation.is_finite() || elevation > MAXIMUM_ELEVATION {
        anyhow::bail!(
            "Elevation must be at most {} meters (got {})",
            MAXIMUM_ELEVATION,
            elevation
        );
    }

    let refraction = config.refraction.unwrap_or(DEFAULT_REFRACTION_ARC_MINUTES);
    if !(MINIMUM_REFRACTION..=MAXIMUM_REFRACTION).contains(&refraction) {
        anyhow::bail!(
            "Refraction must be between {} and {} arcminutes (got {})",
            MINIMUM_REFRACTION,
            MAXIMUM_REFRACTION,
            refraction
        );
    }

    let solar_radius = config.solar_radius.unwrap_or(DEFAULT_SOLAR_RADIUS_ARC_MINUTES);
    if !(MINIMUM_SOLAR_RADIUS..=MAXIMUM_SOLAR_RADIUS).contains(&solar_radius) {
        anyhow::bail!(
            "Solar radius must be between {} and {} arcminutes (got {})",
            MINIMUM_SOLAR_RADIUS,
            MAXIMUM_SOLAR_RADIUS,
            solar_radius
        );
    }

    let timezone = config.timezone.as_deref().unwrap_or(DEFAULT_TIMEZONE);
    resolve_time_zone(timezone, latitude, longitude).context("Invalid timezone in config")?;

    validate_time_format(config.time_format.as_deref().unwrap_or(DEFAULT_TIME_FORMAT))?;

    Ok(())
}

fn validate_time_format(format_str: &str) -> Result<()> {
    use chrono::format::{Item, StrftimeItems};

    if format_str.trim().is_empty() {
        anyhow::bail!("Time format must not be empty");
    }
    if StrftimeItems::new(format_str).any(|item| matches!(item, Item::Error)) {
        anyhow::bail!("Invalid time format '{}'. Use strftime syntax like %H:%M", format_str);
    }
    Ok(())
}

/// Builds the default config file with comments aligned in one column.
struct ConfigBuilder {
    entries: Vec<ConfigEntry>,
}

enum ConfigEntry {
    Section(String),
    Setting { line: String, comment: String },
}

impl ConfigBuilder {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn add_section(mut self, title: &str) -> Self {
        self.entries.push(ConfigEntry::Section(format!("#[{}]", title)));
        self
    }

    fn add_setting(mut self, key: &str, value: &str, comment: &str) -> Self {
        self.entries.push(ConfigEntry::Setting {
            line: format!("{} = {}", key, value),
            comment: format!("# {}", comment),
        });
        self
    }

    fn build(self) -> String {
        let comment_column = self
            .entries
            .iter()
            .filter_map(|entry| match entry {
                ConfigEntry::Setting { line, .. } => Some(line.len()),
                ConfigEntry::Section(_) => None,
            })
            .max()
            .unwrap_or(0)
            + 1;

        let mut lines = Vec::new();
        for entry in self.entries {
            match entry {
                ConfigEntry::Section(title) => {
                    if !lines.is_empty() {
                        lines.push(String::new());
                    }
                    lines.push(title);
                }
                ConfigEntry::Setting { line, comment } => {
                    let padding = " ".repeat(comment_column - line.len());
                    lines.push(format!("{}{}{}", line, padding, comment));
                }
            }
        }

        lines.push(String::new());
        lines.join("\n")
    }
}
