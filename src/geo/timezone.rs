//! Time zone handling for observer locations.
//!
//! The calculator only ever needs one thing from a time zone: the UTC offset
//! in effect at a given instant. [`UtcOffsetProvider`] captures that, and is
//! implemented for the chrono zone types so callers can pass an IANA zone, the
//! system zone, UTC or a fixed offset.

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Local, Offset, TimeZone, Utc};
use std::fmt::Debug;
use std::sync::Arc;

/// Yields the local UTC offset at an instant, including daylight-saving shifts.
pub trait UtcOffsetProvider: Debug + Send + Sync {
    fn offset_at(&self, instant: &DateTime<Utc>) -> FixedOffset;
}

impl UtcOffsetProvider for chrono_tz::Tz {
    fn offset_at(&self, instant: &DateTime<Utc>) -> FixedOffset {
        self.offset_from_utc_datetime(&instant.naive_utc()).fix()
    }
}

impl UtcOffsetProvider for FixedOffset {
    fn offset_at(&self, _instant: &DateTime<Utc>) -> FixedOffset {
        *self
    }
}

impl UtcOffsetProvider for Utc {
    fn offset_at(&self, _instant: &DateTime<Utc>) -> FixedOffset {
        Utc.fix()
    }
}

impl UtcOffsetProvider for Local {
    fn offset_at(&self, instant: &DateTime<Utc>) -> FixedOffset {
        Local.offset_from_utc_datetime(&instant.naive_utc()).fix()
    }
}

/// Determine the timezone for given coordinates using precise timezone boundary data.
///
/// Uses the tzf-rs crate for timezone detection based on geographic boundaries.
/// Falls back to `$TZ`, then UTC, when the boundary data yields a name chrono-tz
/// does not know.
pub fn determine_timezone_from_coordinates(latitude: f64, longitude: f64) -> chrono_tz::Tz {
    use chrono_tz::Tz;
    use std::sync::OnceLock;
    use tzf_rs::DefaultFinder;

    static FINDER: OnceLock<DefaultFinder> = OnceLock::new();
    let finder = FINDER.get_or_init(DefaultFinder::new);

    // tzf-rs takes (longitude, latitude)
    let tz_name = finder.get_tz_name(longitude, latitude);

    match tz_name.parse::<Tz>() {
        Ok(tz) => tz,
        Err(_) => match std::env::var("TZ") {
            Ok(tz_str) => tz_str.parse().unwrap_or(Tz::UTC),
            Err(_) => Tz::UTC,
        },
    }
}

/// Resolve a time zone setting into an offset provider.
///
/// Accepted forms:
/// * `auto` - look the zone up from `latitude`/`longitude`
/// * `local` - the system time zone
/// * `UTC`, `Z` - Coordinated Universal Time
/// * `+10:00`, `-03:30`, `+0530` - a fixed offset from UTC
/// * anything else is parsed as an IANA name such as `Australia/Melbourne`
pub fn resolve_time_zone(
    spec: &str,
    latitude: f64,
    longitude: f64,
) -> Result<Arc<dyn UtcOffsetProvider>> {
    let spec = spec.trim();
    match spec.to_ascii_lowercase().as_str() {
        "auto" => return Ok(Arc::new(determine_timezone_from_coordinates(latitude, longitude))),
        "local" => return Ok(Arc::new(Local)),
        "utc" | "z" => return Ok(Arc::new(Utc)),
        _ => {}
    }

    if spec.starts_with('+') || spec.starts_with('-') {
        let offset = parse_fixed_offset(spec)
            .with_context(|| format!("Invalid fixed UTC offset '{}'. Use ±HH:MM", spec))?;
        return Ok(Arc::new(offset));
    }

    let tz = spec
        .parse::<chrono_tz::Tz>()
        .map_err(|e| anyhow::anyhow!("{}", e))
        .with_context(|| format!("Unknown time zone '{}'", spec))?;
    Ok(Arc::new(tz))
}

/// Parse `±HH:MM`, `±HHMM` or `±HH` into a fixed offset.
fn parse_fixed_offset(spec: &str) -> Result<FixedOffset> {
    let (sign, rest) = match spec.split_at(1) {
        ("+", rest) => (1, rest),
        ("-", rest) => (-1, rest),
        _ => anyhow::bail!("Offset must start with '+' or '-'"),
    };

    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.is_empty() || digits.len() > 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        anyhow::bail!("Offset must be written as ±HH:MM");
    }

    let (hours, minutes) = if digits.len() <= 2 {
        (digits.parse::<i32>()?, 0)
    } else {
        let split = digits.len() - 2;
        (digits[..split].parse::<i32>()?, digits[split..].parse::<i32>()?)
    };

    if hours > 14 || minutes > 59 {
        anyhow::bail!("Offset {} is outside -14:00..=+14:00", spec);
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .context("Offset out of range")
}
