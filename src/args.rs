//! Command-line argument parsing and processing.
//!
//! This module handles parsing of command-line arguments and provides a clean
//! interface for the main application logic. Options that take a value accept
//! both `--lat -37.5` and `--lat=-37.5`, so negative coordinates need no
//! quoting.

use chrono::NaiveDate;
use std::path::PathBuf;

use crate::logger::Log;

/// Overrides collected from the command line for a normal run.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RunOptions {
    /// Date to calculate for, today in the location's zone when absent.
    pub date: Option<NaiveDate>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub elevation: Option<f64>,
    pub timezone: Option<String>,
    pub city: Option<String>,
    pub config_path: Option<PathBuf>,
    /// Print every twilight, not just sunrise, noon and sunset.
    pub show_all: bool,
}

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Calculate and print the solar events
    Run {
        debug_enabled: bool,
        options: RunOptions,
    },
    /// Display help information and exit
    ShowHelp,
    /// Display version information and exit
    ShowVersion,
    /// Show help due to unknown or malformed arguments and exit
    ShowHelpDueToError,
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

impl ParsedArgs {
    /// Parse command-line arguments into a structured result.
    ///
    /// # Arguments
    /// * `args` - Iterator over command-line arguments (typically from std::env::args())
    ///
    /// # Returns
    /// ParsedArgs containing the determined action
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut debug_enabled = false;
        let mut display_help = false;
        let mut display_version = false;
        let mut unknown_arg_found = false;
        let mut options = RunOptions::default();

        // Convert to vector for easier indexed access
        let args_vec: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|s| s.as_ref().to_string())
            .collect();

        let mut i = 0;
        while i < args_vec.len() {
            let (flag, inline_value) = match args_vec[i].split_once('=') {
                Some((flag, value)) if flag.starts_with("--") => {
                    (flag.to_string(), Some(value.to_string()))
                }
                _ => (args_vec[i].clone(), None),
            };

            match flag.as_str() {
                "--help" | "-h" => display_help = true,
                "--version" | "-V" | "-v" => display_version = true,
                "--debug" => debug_enabled = true,
                "--all" | "-a" => options.show_all = true,
                "--date" | "-d" | "--lat" | "--lon" | "--elevation" | "-e" | "--tz" | "-z"
                | "--city" | "-c" | "--config" => {
                    let value = match inline_value {
                        Some(value) => Some(value),
                        None => {
                            i += 1;
                            args_vec.get(i).cloned()
                        }
                    };

                    match value {
                        Some(value) => {
                            if let Err(message) = apply_option(&mut options, &flag, &value) {
                                Log::log_warning(&message);
                                unknown_arg_found = true;
                            }
                        }
                        None => {
                            Log::log_warning(&format!("Missing value for {}", flag));
                            unknown_arg_found = true;
                        }
                    }
                }
                _ => {
                    // Check if the argument starts with a dash, indicating it's an option
                    if flag.starts_with('-') {
                        Log::log_warning(&format!("Unknown option: {}", flag));
                        unknown_arg_found = true;
                    }
                    // Non-option arguments are currently ignored
                }
            }
            i += 1;
        }

        if options.latitude.is_some() != options.longitude.is_some() {
            Log::log_warning("--lat and --lon must be given together");
            unknown_arg_found = true;
        }
        if options.city.is_some() && options.latitude.is_some() {
            Log::log_warning("--city cannot be combined with --lat/--lon");
            unknown_arg_found = true;
        }

        // Determine the action based on parsed flags
        let action = if display_version {
            CliAction::ShowVersion
        } else if unknown_arg_found {
            CliAction::ShowHelpDueToError
        } else if display_help {
            CliAction::ShowHelp
        } else {
            CliAction::Run {
                debug_enabled,
                options,
            }
        };

        ParsedArgs { action }
    }

    /// Convenience method to parse from std::env::args()
    pub fn from_env() -> ParsedArgs {
        Self::parse(std::env::args())
    }
}

/// Store one option value, returning a message when it does not parse.
fn apply_option(options: &mut RunOptions, flag: &str, value: &str) -> Result<(), String> {
    let parse_number = |what: &str| {
        value
            .parse::<f64>()
            .ok()
            .filter(|number| number.is_finite())
            .ok_or_else(|| format!("Invalid {} value: {}", what, value))
    };

    match flag {
        "--date" | "-d" => {
            let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map_err(|_| format!("Invalid date: {} (expected YYYY-MM-DD)", value))?;
            options.date = Some(date);
        }
        "--lat" => options.latitude = Some(parse_number("latitude")?),
        "--lon" => options.longitude = Some(parse_number("longitude")?),
        "--elevation" | "-e" => options.elevation = Some(parse_number("elevation")?),
        "--tz" | "-z" => options.timezone = Some(value.to_string()),
        "--city" | "-c" => options.city = Some(value.to_string()),
        "--config" => options.config_path = Some(PathBuf::from(value)),
        _ => return Err(format!("Unknown option: {}", flag)),
    }
    Ok(())
}

/// Displays version information using custom logging style.
pub fn display_version_info() {
    Log::log_version();
    Log::log_pipe();
    println!("┗ {}", env!("CARGO_PKG_DESCRIPTION"));
}

/// Displays custom help message using logger methods.
pub fn display_help() {
    Log::log_version();
    Log::log_block_start(env!("CARGO_PKG_DESCRIPTION"));
    Log::log_block_start("Usage: suncalc [OPTIONS]");
    Log::log_block_start("Options:");
    Log::log_indented("-d, --date <YYYY-MM-DD>   Date to calculate for (default: today)");
    Log::log_indented("    --lat <degrees>       Latitude, south negative");
    Log::log_indented("    --lon <degrees>       Longitude, west negative");
    Log::log_indented("-e, --elevation <meters>  Observer elevation above sea level");
    Log::log_indented("-z, --tz <zone>           auto, local, UTC, IANA name or +HH:MM");
    Log::log_indented("-c, --city <name>         Use a city from the built-in database");
    Log::log_indented("    --config <path>       Read settings from this file");
    Log::log_indented("-a, --all                 Include civil, nautical and astronomical twilight");
    Log::log_indented("    --debug               Enable detailed debug output");
    Log::log_indented("-h, --help                Print help information");
    Log::log_indented("-V, --version             Print version information");
    Log::log_end();
}
