/// Mean Earth radius used by the geofence, in metres.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Great-circle distance in metres between two WGS84 points.
pub fn haversine(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let phi1 = lat1 * std::f64::consts::PI / 180.0;
    let phi2 = lat2 * std::f64::consts::PI / 180.0;
    let d_phi = (lat2 - lat1) * std::f64::consts::PI / 180.0;
    let d_lambda = (lng2 - lng1) * std::f64::consts::PI / 180.0;

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}
