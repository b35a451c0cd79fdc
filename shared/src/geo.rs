use std::f64::consts::{FRAC_PI_4, PI};

/// Flat-earth conversion constant: one degree of great-circle arc is
/// treated as 111 km everywhere. This is a deliberate simplification —
/// it loses accuracy near the poles and for very large radii — and it is
/// part of the visual output contract, so it must not be replaced with an
/// exact geodesic formula.
pub const KM_PER_DEGREE: f64 = 111.0;

/// Latitude band the Mercator projection can represent (Web Mercator clip).
pub const MAX_LATITUDE: f64 = 85.051_128_78;

/// Convert a sphere-of-influence radius in kilometres to an angular radius
/// in degrees using the fixed approximation constant.
pub fn km_to_angular_radius(km: f64) -> f64 {
    km / KM_PER_DEGREE
}

/// Mercator projection fitted to a viewport. World space is the projected
/// pixel plane at zoom 1; the pan/zoom transform is applied on top of it.
///
/// Re-derive with [`MapProjection::fit`] whenever the canvas size changes —
/// nothing here assumes a fixed canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapProjection {
    scale: f64,
    translate: (f64, f64),
}

impl MapProjection {
    /// Scale and translate chosen so the world roughly fills the viewport,
    /// biased a little south of center so Antarctica's clip band stays
    /// mostly off-screen.
    pub fn fit(width: f64, height: f64) -> Self {
        Self {
            scale: width / 6.5,
            translate: (width / 2.0, height / 1.5),
        }
    }

    /// Project a lon/lat (degrees) to world pixels. Returns `None` for
    /// latitudes outside the representable Mercator band; such points are
    /// simply not drawn.
    ///
    /// Longitudes are not range-checked: circle rings are generated with
    /// longitudes unwrapped around their center, and the projection is
    /// linear in longitude, so out-of-range values are meaningful.
    pub fn project(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        if lat.abs() > MAX_LATITUDE {
            return None;
        }
        Some(self.project_clamped(lon, lat))
    }

    /// Project with the latitude clamped into the representable band.
    /// Used for tracing polygon rings, where dropping a vertex would tear
    /// the outline.
    pub fn project_clamped(&self, lon: f64, lat: f64) -> (f64, f64) {
        let lam = lon.to_radians();
        let phi = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
        let x = self.scale * lam + self.translate.0;
        let y = -self.scale * (FRAC_PI_4 + phi / 2.0).tan().ln() + self.translate.1;
        (x, y)
    }

    /// Inverse projection: world pixels back to lon/lat degrees.
    pub fn unproject(&self, x: f64, y: f64) -> (f64, f64) {
        let lam = (x - self.translate.0) / self.scale;
        let mercator_y = -(y - self.translate.1) / self.scale;
        let phi = 2.0 * mercator_y.exp().atan() - PI / 2.0;
        (lam.to_degrees(), phi.to_degrees())
    }
}

/// Great-circle angular distance between two lon/lat points, in degrees.
pub fn angular_distance(lon_a: f64, lat_a: f64, lon_b: f64, lat_b: f64) -> f64 {
    let phi_a = lat_a.to_radians();
    let phi_b = lat_b.to_radians();
    let d_phi = (lat_b - lat_a).to_radians();
    let d_lam = (lon_b - lon_a).to_radians();

    let h = (d_phi / 2.0).sin().powi(2)
        + phi_a.cos() * phi_b.cos() * (d_lam / 2.0).sin().powi(2);
    (2.0 * h.sqrt().asin()).to_degrees()
}

/// Generate a small-circle polygon on the sphere: all points at angular
/// distance `radius_deg` from the center, as lon/lat degrees.
///
/// Longitudes are kept continuous around the center (not normalized into
/// [-180, 180]) so the projected ring never tears at the antimeridian.
pub fn geodesic_circle(
    center_lon: f64,
    center_lat: f64,
    radius_deg: f64,
    segments: usize,
) -> Vec<(f64, f64)> {
    let phi0 = center_lat.to_radians();
    let r = radius_deg.to_radians();
    let (sin_phi0, cos_phi0) = phi0.sin_cos();
    let (sin_r, cos_r) = r.sin_cos();

    let mut ring = Vec::with_capacity(segments);
    for i in 0..segments {
        let bearing = 2.0 * PI * i as f64 / segments as f64;
        let sin_phi = sin_phi0 * cos_r + cos_phi0 * sin_r * bearing.cos();
        let phi = sin_phi.clamp(-1.0, 1.0).asin();
        let d_lam = (bearing.sin() * sin_r * cos_phi0).atan2(cos_r - sin_phi0 * sin_phi);
        ring.push((center_lon + d_lam.to_degrees(), phi.to_degrees()));
    }
    ring
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, tol: f64) {
        let diff = (actual - expected).abs();
        assert!(
            diff < tol,
            "expected {expected}, got {actual} (diff: {diff})"
        );
    }

    #[test]
    fn km_conversion_uses_fixed_constant() {
        assert_close(km_to_angular_radius(111.0), 1.0, 1e-12);
        assert_close(km_to_angular_radius(2220.0), 20.0, 1e-12);
    }

    #[test]
    fn origin_projects_to_translate_point() {
        let proj = MapProjection::fit(1300.0, 900.0);
        let (x, y) = proj.project(0.0, 0.0).unwrap();
        assert_close(x, 650.0, 1e-9);
        assert_close(y, 600.0, 1e-9);
    }

    #[test]
    fn project_unproject_roundtrip() {
        let proj = MapProjection::fit(1280.0, 800.0);
        let samples = [
            (0.0, 0.0),
            (12.5, 41.9),
            (-77.0, 38.9),
            (139.7, 35.7),
            (-179.5, -45.0),
            (30.0, 84.0),
        ];
        for (lon, lat) in samples {
            let (x, y) = proj.project(lon, lat).unwrap();
            let (lon2, lat2) = proj.unproject(x, y);
            assert_close(lon2, lon, 1e-9);
            assert_close(lat2, lat, 1e-9);
        }
    }

    #[test]
    fn poles_are_not_representable() {
        let proj = MapProjection::fit(1280.0, 800.0);
        assert!(proj.project(0.0, 90.0).is_none());
        assert!(proj.project(0.0, -88.0).is_none());
        // Clamped variant still yields a finite point for ring tracing.
        let (_, y) = proj.project_clamped(0.0, 90.0);
        assert!(y.is_finite());
    }

    #[test]
    fn angular_distance_matches_known_arcs() {
        // Quarter of the equator.
        assert_close(angular_distance(0.0, 0.0, 90.0, 0.0), 90.0, 1e-9);
        // Along a meridian.
        assert_close(angular_distance(10.0, 0.0, 10.0, 45.0), 45.0, 1e-9);
        assert_close(angular_distance(5.0, 5.0, 5.0, 5.0), 0.0, 1e-9);
    }

    #[test]
    fn geodesic_circle_points_sit_at_radius() {
        let ring = geodesic_circle(12.5, 41.9, 18.0, 64);
        assert_eq!(ring.len(), 64);
        for (lon, lat) in ring {
            assert_close(angular_distance(12.5, 41.9, lon, lat), 18.0, 1e-6);
        }
    }

    #[test]
    fn geodesic_circle_stays_continuous_across_antimeridian() {
        let ring = geodesic_circle(179.0, 10.0, 15.0, 64);
        for pair in ring.windows(2) {
            let jump = (pair[1].0 - pair[0].0).abs();
            assert!(jump < 90.0, "longitude tear of {jump} degrees");
        }
        // Some longitudes extend past 180 rather than wrapping.
        assert!(ring.iter().any(|&(lon, _)| lon > 180.0));
    }
}
