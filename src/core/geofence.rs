use serde::Serialize;
use utoipa::ToSchema;

use crate::model::attendance::GeoPoint;
use crate::model::settings::OfficeSettings;

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Outcome of scoring a claimed location against the office geofence.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct GeofenceCheck {
    /// Unrounded great-circle distance; the radius comparison uses this.
    #[schema(example = 15.6)]
    pub distance_meters: f64,
    #[schema(example = true)]
    pub within_range: bool,
}

impl GeofenceCheck {
    /// Distance rounded to the nearest meter, for display only.
    pub fn display_distance(&self) -> u64 {
        self.distance_meters.round() as u64
    }
}

/// Great-circle distance between two points via the Haversine formula.
pub fn haversine_meters(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_METERS * h.sqrt().asin()
}

/// Scores `claimed` against the configured office geofence. Pure and
/// deterministic; the caller handles the missing-location case before
/// getting here.
pub fn is_within_geofence(claimed: GeoPoint, settings: &OfficeSettings) -> GeofenceCheck {
    let office = GeoPoint {
        latitude: settings.office_latitude,
        longitude: settings.office_longitude,
    };
    let distance_meters = haversine_meters(claimed, office);

    GeofenceCheck {
        distance_meters,
        within_range: distance_meters <= settings.radius_meters,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn settings(radius_meters: f64) -> OfficeSettings {
        OfficeSettings {
            office_latitude: -6.2088,
            office_longitude: 106.8456,
            radius_meters,
            require_location: true,
            work_start_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            late_threshold_minutes: 15,
            qr_validity_minutes: 5,
        }
    }

    #[test]
    fn nearby_point_is_within_default_radius() {
        let claimed = GeoPoint {
            latitude: -6.2089,
            longitude: 106.8457,
        };
        let check = is_within_geofence(claimed, &settings(100.0));

        // ~15 m away from the office fixture
        assert!(check.within_range);
        assert!(check.distance_meters > 10.0 && check.distance_meters < 20.0);
    }

    #[test]
    fn radius_below_distance_fails() {
        let claimed = GeoPoint {
            latitude: -6.2089,
            longitude: 106.8457,
        };
        let check = is_within_geofence(claimed, &settings(10.0));
        assert!(!check.within_range);
    }

    #[test]
    fn zero_radius_passes_only_at_exact_office_point() {
        let office = GeoPoint {
            latitude: -6.2088,
            longitude: 106.8456,
        };
        let at_office = is_within_geofence(office, &settings(0.0));
        assert!(at_office.within_range);
        assert_eq!(at_office.distance_meters, 0.0);

        let next_door = is_within_geofence(
            GeoPoint {
                latitude: -6.20881,
                longitude: 106.8456,
            },
            &settings(0.0),
        );
        assert!(!next_door.within_range);
    }

    #[test]
    fn antipodal_distance_is_half_circumference() {
        let a = GeoPoint {
            latitude: 0.0,
            longitude: 0.0,
        };
        let b = GeoPoint {
            latitude: 0.0,
            longitude: 180.0,
        };
        let d = haversine_meters(a, b);
        let half_circumference = std::f64::consts::PI * EARTH_RADIUS_METERS;
        assert!((d - half_circumference).abs() < 1.0);
    }

    #[test]
    fn display_distance_rounds_to_nearest_meter() {
        let check = GeofenceCheck {
            distance_meters: 15.6,
            within_range: true,
        };
        assert_eq!(check.display_distance(), 16);
    }
}
