//! Great-circle distance between coordinates.

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometers between two points given in degrees.
///
/// The haversine term is clamped into `[0, 1]` so rounding at antipodal
/// points cannot push `sqrt` or `atan2` into NaN territory.
pub fn distance_km(lat_a: f64, lng_a: f64, lat_b: f64, lng_b: f64) -> f64 {
    let d_lat = (lat_b - lat_a).to_radians();
    let d_lng = (lng_b - lng_a).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat_a.to_radians().cos() * lat_b.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn symmetric(
            lat_a in -90.0f64..=90.0, lng_a in -180.0f64..=180.0,
            lat_b in -90.0f64..=90.0, lng_b in -180.0f64..=180.0,
        ) {
            let ab = distance_km(lat_a, lng_a, lat_b, lng_b);
            let ba = distance_km(lat_b, lng_b, lat_a, lng_a);
            prop_assert!((ab - ba).abs() < 1e-9);
        }

        #[test]
        fn bounded_and_finite(
            lat_a in -90.0f64..=90.0, lng_a in -180.0f64..=180.0,
            lat_b in -90.0f64..=90.0, lng_b in -180.0f64..=180.0,
        ) {
            let d = distance_km(lat_a, lng_a, lat_b, lng_b);
            prop_assert!(d.is_finite());
            prop_assert!(d >= 0.0);
            prop_assert!(d <= std::f64::consts::PI * EARTH_RADIUS_KM + 1e-6);
        }
    }
}
