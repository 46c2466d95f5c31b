use chrono::NaiveTime;
use dotenvy::dotenv;
use std::env;

use crate::model::settings::OfficeSettings;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub server_addr: String,
    pub api_prefix: String,

    // Geofence + timing defaults, used until an admin writes the settings row
    pub office_latitude: f64,
    pub office_longitude: f64,
    pub radius_meters: f64,
    pub require_location: bool,
    pub work_start_time: NaiveTime,
    pub late_threshold_minutes: i64,
    pub qr_validity_minutes: i64,
    pub default_location_tag: String,

    // Rate limiting
    pub rate_scan_per_min: u32,
    pub rate_admin_per_min: u32,
    pub rate_protected_per_min: u32,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api/v1".to_string()),

            office_latitude: env::var("OFFICE_LATITUDE")
                .unwrap_or_else(|_| "-6.2088".to_string())
                .parse()
                .unwrap(),
            office_longitude: env::var("OFFICE_LONGITUDE")
                .unwrap_or_else(|_| "106.8456".to_string())
                .parse()
                .unwrap(),
            radius_meters: env::var("GEOFENCE_RADIUS_METERS")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .unwrap(),
            require_location: env::var("REQUIRE_LOCATION")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap(),
            work_start_time: NaiveTime::parse_from_str(
                &env::var("WORK_START_TIME").unwrap_or_else(|_| "08:00".to_string()),
                "%H:%M",
            )
            .expect("WORK_START_TIME must be HH:MM"),
            late_threshold_minutes: env::var("LATE_THRESHOLD_MINUTES")
                .unwrap_or_else(|_| "15".to_string())
                .parse()
                .unwrap(),
            qr_validity_minutes: env::var("QR_VALIDITY_MINUTES")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .unwrap(),
            default_location_tag: env::var("DEFAULT_LOCATION_TAG")
                .unwrap_or_else(|_| "kantor-pusat".to_string()),

            rate_scan_per_min: env::var("RATE_SCAN_PER_MIN")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap(),
            rate_admin_per_min: env::var("RATE_ADMIN_PER_MIN")
                .unwrap_or_else(|_| "120".to_string())
                .parse()
                .unwrap(),
            rate_protected_per_min: env::var("RATE_PROTECTED_PER_MIN")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .unwrap(),
        }
    }

    pub fn default_settings(&self) -> OfficeSettings {
        OfficeSettings {
            office_latitude: self.office_latitude,
            office_longitude: self.office_longitude,
            radius_meters: self.radius_meters,
            require_location: self.require_location,
            work_start_time: self.work_start_time,
            late_threshold_minutes: self.late_threshold_minutes,
            qr_validity_minutes: self.qr_validity_minutes,
        }
    }
}
