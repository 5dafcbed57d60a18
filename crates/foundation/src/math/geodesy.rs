use crate::geo::LatLng;

/// WGS84 semi-major axis (meters).
pub const WGS84_A: f64 = 6_378_137.0;
/// WGS84 flattening.
pub const WGS84_F: f64 = 1.0 / 298.257_223_563;
/// WGS84 semi-minor axis (meters).
pub const WGS84_B: f64 = WGS84_A * (1.0 - WGS84_F);

/// Square meters per hectare.
pub const M2_PER_HECTARE: f64 = 10_000.0;

/// Geodesic area of a closed ring in square meters.
///
/// Spherical-excess accumulation over the WGS84 semi-major radius. The ring
/// may or may not repeat its first vertex; the closing segment is implicit.
/// Rings with fewer than 3 vertices have zero area by contract.
pub fn geodesic_area_m2(ring: &[LatLng]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    for i in 0..ring.len() {
        let p1 = ring[i];
        let p2 = ring[(i + 1) % ring.len()];
        area += (p2.lng - p1.lng).to_radians()
            * (2.0 + p1.lat.to_radians().sin() + p2.lat.to_radians().sin());
    }

    (area * WGS84_A * WGS84_A / 2.0).abs()
}

/// Geodesic area of a closed ring in hectares.
pub fn geodesic_area_ha(ring: &[LatLng]) -> f64 {
    geodesic_area_m2(ring) / M2_PER_HECTARE
}
