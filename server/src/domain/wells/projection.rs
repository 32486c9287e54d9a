//! Row to coordinate projection
//!
//! Datasets store positions either as decimal degrees or as UTM
//! easting/northing. Every row is reduced to a `[lat, lng]` pair of `f32`.

use serde::Serialize;

use crate::data::Record;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Projection {
    /// Columns already hold WGS84 decimal degrees
    LatLng { lat: String, lng: String },
    /// Columns hold UTM easting and northing in metres
    Utm {
        easting: String,
        northing: String,
        zone: UtmZone,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum UtmZone {
    Fixed { number: u8, letter: char },
    /// Zone number and latitude band read per row; the band is the first
    /// character of `letter_column`
    Columns {
        number_column: String,
        letter_column: String,
    },
}

impl Projection {
    pub fn lat_lng(lat: impl Into<String>, lng: impl Into<String>) -> Self {
        Projection::LatLng {
            lat: lat.into(),
            lng: lng.into(),
        }
    }

    pub fn utm(easting: impl Into<String>, northing: impl Into<String>, zone: UtmZone) -> Self {
        Projection::Utm {
            easting: easting.into(),
            northing: northing.into(),
            zone,
        }
    }

    /// Project one row, `None` when its coordinates are missing or unusable
    pub fn project(&self, record: &Record) -> Option<[f32; 2]> {
        match self {
            Projection::LatLng { lat, lng } => {
                Some([record.get_f64(lat)? as f32, record.get_f64(lng)? as f32])
            }
            Projection::Utm {
                easting,
                northing,
                zone,
            } => {
                let (number, north) = zone.resolve(record)?;
                let (lat, lng) =
                    utm_to_lat_lng(record.get_f64(easting)?, record.get_f64(northing)?, number, north);
                (lat.is_finite() && lng.is_finite()).then_some([lat as f32, lng as f32])
            }
        }
    }

    pub fn project_all(&self, records: &[Record]) -> Vec<[f32; 2]> {
        let mut points = Vec::with_capacity(records.len());
        let mut skipped = 0usize;
        for record in records {
            match self.project(record) {
                Some(point) => points.push(point),
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            tracing::debug!(skipped, "Skipped rows without usable coordinates");
        }
        points
    }
}

impl UtmZone {
    /// Zone number and hemisphere for a row
    fn resolve(&self, record: &Record) -> Option<(u8, bool)> {
        match self {
            UtmZone::Fixed { number, letter } => Some((*number, is_northern(*letter))),
            UtmZone::Columns {
                number_column,
                letter_column,
            } => {
                let number = u8::try_from(record.get_i64(number_column)?).ok()?;
                if !(1..=60).contains(&number) {
                    return None;
                }
                let north = record
                    .get(letter_column)
                    .and_then(|v| v.as_str())
                    .and_then(|s| s.trim().chars().next())
                    .is_none_or(is_northern);
                Some((number, north))
            }
        }
    }
}

/// Latitude bands N through X lie north of the equator
fn is_northern(letter: char) -> bool {
    letter.to_ascii_uppercase() >= 'N'
}

/// Inverse transverse Mercator on WGS84 (Krüger series to third order)
///
/// Returns `(latitude, longitude)` in degrees.
pub fn utm_to_lat_lng(easting: f64, northing: f64, zone: u8, north: bool) -> (f64, f64) {
    const A_AXIS: f64 = 6_378_137.0;
    const FLATTENING: f64 = 1.0 / 298.257_223_563;
    const K0: f64 = 0.9996;
    const FALSE_EASTING: f64 = 500_000.0;
    const FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

    let n = FLATTENING / (2.0 - FLATTENING);
    let (n2, n3, n4) = (n * n, n * n * n, n * n * n * n);
    let rectifying_radius = A_AXIS / (1.0 + n) * (1.0 + n2 / 4.0 + n4 / 64.0);

    let beta = [
        n / 2.0 - 2.0 * n2 / 3.0 + 37.0 * n3 / 96.0,
        n2 / 48.0 + n3 / 15.0,
        17.0 * n3 / 480.0,
    ];
    let delta = [
        2.0 * n - 2.0 * n2 / 3.0 - 2.0 * n3,
        7.0 * n2 / 3.0 - 8.0 * n3 / 5.0,
        56.0 * n3 / 15.0,
    ];

    let false_northing = if north { 0.0 } else { FALSE_NORTHING_SOUTH };
    let xi = (northing - false_northing) / (K0 * rectifying_radius);
    let eta = (easting - FALSE_EASTING) / (K0 * rectifying_radius);

    let mut xi_prime = xi;
    let mut eta_prime = eta;
    for (j, b) in beta.iter().enumerate() {
        let k = 2.0 * (j as f64 + 1.0);
        xi_prime -= b * (k * xi).sin() * (k * eta).cosh();
        eta_prime -= b * (k * xi).cos() * (k * eta).sinh();
    }

    let chi = (xi_prime.sin() / eta_prime.cosh()).asin();
    let mut phi = chi;
    for (j, d) in delta.iter().enumerate() {
        phi += d * (2.0 * (j as f64 + 1.0) * chi).sin();
    }

    let central_meridian = (f64::from(zone) * 6.0 - 183.0).to_radians();
    let lambda = central_meridian + eta_prime.sinh().atan2(xi_prime.cos());

    (phi.to_degrees(), lambda.to_degrees())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SqlValue;

    fn close(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() < tolerance
    }

    #[test]
    fn test_utm_inverse_reference_point() {
        let (lat, lng) = utm_to_lat_lng(340_000.0, 5_710_000.0, 32, true);
        assert!(close(lat, 51.518_429_6, 1e-6), "lat {}", lat);
        assert!(close(lng, 6.693_877_5, 1e-6), "lng {}", lng);
    }

    #[test]
    fn test_utm_inverse_toronto() {
        // CN Tower, 17T 630084 4833438
        let (lat, lng) = utm_to_lat_lng(630_084.0, 4_833_438.0, 17, true);
        assert!(close(lat, 43.642_56, 1e-4), "lat {}", lat);
        assert!(close(lng, -79.387_14, 1e-4), "lng {}", lng);
    }

    #[test]
    fn test_central_meridian() {
        let (lat, lng) = utm_to_lat_lng(500_000.0, 4_950_000.0, 20, true);
        assert!(close(lng, -63.0, 1e-9));
        assert!(close(lat, 44.703_375, 1e-5));
    }

    #[test]
    fn test_southern_hemisphere() {
        let (lat, lng) = utm_to_lat_lng(500_000.0, 7_000_000.0, 33, false);
        assert!(close(lat, -27.122_470, 1e-5));
        assert!(close(lng, 15.0, 1e-9));
    }

    #[test]
    fn test_lat_lng_passthrough() {
        let projection = Projection::lat_lng("Latitude", "Longitude");
        let record = Record::new().with("Latitude", 53.5).with("Longitude", -113.25);
        assert_eq!(projection.project(&record), Some([53.5, -113.25]));
    }

    #[test]
    fn test_utm_columns_zone() {
        let projection = Projection::utm(
            "easting",
            "northing",
            UtmZone::Columns {
                number_column: "ZONE".into(),
                letter_column: "code".into(),
            },
        );
        let record = Record::new()
            .with("northing", 4_830_000.0)
            .with("easting", 630_000.0)
            .with("ZONE", 17)
            .with("code", "T");
        let [lat, lng] = projection.project(&record).unwrap();
        assert!(close(f64::from(lat), 43.611_63, 1e-4));
        assert!(close(f64::from(lng), -79.389_01, 1e-4));
    }

    #[test]
    fn test_unusable_rows_are_skipped() {
        let projection = Projection::utm(
            "Easting",
            "Northing",
            UtmZone::Fixed {
                number: 20,
                letter: 'T',
            },
        );
        let good = Record::new()
            .with("Easting", 500_000)
            .with("Northing", 4_950_000);
        let missing = Record::new().with("Easting", 500_000);
        let null = Record::new()
            .with("Easting", SqlValue::Null)
            .with("Northing", 4_950_000);
        let points = projection.project_all(&[good, missing, null]);
        assert_eq!(points.len(), 1);
        assert!(close(f64::from(points[0][1]), -63.0, 1e-4));
    }

    #[test]
    fn test_zone_out_of_range() {
        let zone = UtmZone::Columns {
            number_column: "ZONE".into(),
            letter_column: "code".into(),
        };
        assert_eq!(zone.resolve(&Record::new().with("ZONE", 0)), None);
        assert_eq!(zone.resolve(&Record::new().with("ZONE", 61)), None);
        assert_eq!(zone.resolve(&Record::new().with("ZONE", 18)), Some((18, true)));
        assert_eq!(
            zone.resolve(&Record::new().with("ZONE", 18).with("code", "L")),
            Some((18, false))
        );
    }
}
