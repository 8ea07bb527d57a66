use tracing::debug;

use crate::{
    error::{Result, WeatherError},
    model::ResolvedLocation,
    provider::{GeoMatch, Geocoder},
};

/// Resolve free text (city, postal code, "lat,lon", landmark) to coordinates.
///
/// The first match is authoritative; no disambiguation is attempted.
pub async fn resolve(geocoder: &dyn Geocoder, query: &str) -> Result<ResolvedLocation> {
    let query = query.trim();
    if query.is_empty() {
        return Err(WeatherError::validation("Please enter a location"));
    }

    let found = geocoder.search(query).await?.ok_or_else(|| {
        WeatherError::not_found(
            "Location not found. Try: a city (New York), a zip code (10001), or a landmark (Eiffel Tower)",
        )
    })?;

    let resolved = ResolvedLocation {
        latitude: found.latitude,
        longitude: found.longitude,
        display_name: display_name(&found),
    };
    debug!(
        "Resolved '{}' to {} ({}, {})",
        query, resolved.display_name, resolved.latitude, resolved.longitude
    );

    Ok(resolved)
}

fn display_name(found: &GeoMatch) -> String {
    let mut name = found.name.clone();
    for part in [&found.admin1, &found.country].into_iter().flatten() {
        if !part.is_empty() {
            name.push_str(", ");
            name.push_str(part);
        }
    }
    name
}
