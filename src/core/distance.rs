use crate::domain::model::Coordinate;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometers (haversine, spherical Earth).
pub fn haversine_km(from: Coordinate, to: Coordinate) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Rounds to one decimal place, halves rounding up. Display only.
///
/// Scales before rounding, so a decimal half stored just below itself still
/// rounds up: 1.15 (held as 1.1499...) scales to exactly 11.5 and gives 1.2.
/// Formatting the raw value with `{:.1}` would print "1.1" instead.
pub fn round_km(distance_km: f64) -> f64 {
    (distance_km * 10.0).round() / 10.0
}

pub fn format_km(distance_km: f64) -> String {
    format!("{:.1}", round_km(distance_km))
}
