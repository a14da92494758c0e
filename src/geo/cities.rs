//! City lookup for naming and locating observers.
//!
//! Uses the `cities` crate, a database of 10,000+ cities worldwide, to turn a
//! name such as `Melbourne` or `Melbourne, Australia` into coordinates, and to
//! find the closest named city to a pair of coordinates.

/// Represents a city with its geographic information
#[derive(Debug, Clone, PartialEq)]
pub struct CityInfo {
    pub name: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl CityInfo {
    /// `Name, Country` label.
    pub fn label(&self) -> String {
        format!("{}, {}", self.name, self.country)
    }
}

/// Get all cities with non-empty names, in database order.
fn all_cities() -> impl Iterator<Item = CityInfo> {
    IntoIterator::into_iter(cities::all()).filter_map(|city| {
        if city.city.trim().is_empty() {
            return None;
        }

        Some(CityInfo {
            name: city.city.to_string(),
            country: city.country.to_string(),
            latitude: city.latitude,
            longitude: city.longitude,
        })
    })
}

/// Look up a city by name, case-insensitively.
///
/// The query may carry a country after a comma (`Melbourne, Australia`) to pick
/// between cities of the same name. An exact name match wins over a prefix
/// match; among equal matches the first in the database is returned.
pub fn find_city(query: &str) -> Option<CityInfo> {
    let (name, country) = match query.split_once(',') {
        Some((name, country)) => (name.trim().to_lowercase(), Some(country.trim().to_lowercase())),
        None => (query.trim().to_lowercase(), None),
    };
    if name.is_empty() {
        return None;
    }

    let candidates: Vec<CityInfo> = all_cities()
        .filter(|city| match &country {
            Some(country) => city.country.to_lowercase().starts_with(country.as_str()),
            None => true,
        })
        .filter(|city| city.name.to_lowercase().starts_with(name.as_str()))
        .collect();

    candidates
        .iter()
        .find(|city| city.name.to_lowercase() == name)
        .or_else(|| candidates.first())
        .cloned()
}

/// Find cities near a given coordinate, closest first.
///
/// # Arguments
/// * `target_lat` - Target latitude
/// * `target_lon` - Target longitude
/// * `max_results` - Maximum number of cities to return
pub fn find_cities_near_coordinate(
    target_lat: f64,
    target_lon: f64,
    max_results: usize,
) -> Vec<CityInfo> {
    let mut cities_with_distance: Vec<(CityInfo, f64)> = all_cities()
        .map(|city| {
            let distance =
                calculate_distance(target_lat, target_lon, city.latitude, city.longitude);
            (city, distance)
        })
        .collect();

    cities_with_distance
        .sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    cities_with_distance
        .into_iter()
        .take(max_results)
        .map(|(city, _)| city)
        .collect()
}

/// Great-circle distance between two coordinates in kilometers (haversine).
fn calculate_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    const MEAN_EARTH_RADIUS_KM: f64 = 6371.0;

    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);

    2.0 * MEAN_EARTH_RADIUS_KM * a.sqrt().min(1.0).asin()
}
