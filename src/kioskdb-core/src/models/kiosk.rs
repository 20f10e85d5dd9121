use serde::{Deserialize, Serialize};

use super::{KioskModel, Model};

/// Kiosk row (`kiosks`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Kiosk {
    pub kiosk_id: i64,
    pub name: String,
    pub location_name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub marker_id: Option<i64>,
    pub background_image: Option<String>,
    pub logo_image: Option<String>,
    pub video: Option<String>,
    pub assistant_id: Option<i64>,
    pub weather_api_key: Option<String>,
    pub weather_location_id: Option<String>,
    pub is_active: bool,
    pub created_at: String,
    pub created_by: i64,
    pub updated_at: Option<String>,
    pub updated_by: Option<i64>,
    pub security_code: Option<String>,
}

/// Editable kiosk fields
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KioskFormData {
    pub name: String,
    pub location_name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub marker_id: Option<i64>,
    pub background_image: Option<String>,
    pub logo_image: Option<String>,
    pub video: Option<String>,
    pub assistant_id: Option<i64>,
    pub weather_api_key: Option<String>,
    pub weather_location_id: Option<String>,
    pub is_active: bool,
    pub security_code: Option<String>,
}

impl From<&Kiosk> for KioskFormData {
    fn from(kiosk: &Kiosk) -> Self {
        Self {
            name: kiosk.name.clone(),
            location_name: kiosk.location_name.clone(),
            address: kiosk.address.clone(),
            latitude: kiosk.latitude,
            longitude: kiosk.longitude,
            marker_id: kiosk.marker_id,
            background_image: kiosk.background_image.clone(),
            logo_image: kiosk.logo_image.clone(),
            video: kiosk.video.clone(),
            assistant_id: kiosk.assistant_id,
            weather_api_key: kiosk.weather_api_key.clone(),
            weather_location_id: kiosk.weather_location_id.clone(),
            is_active: kiosk.is_active,
            security_code: kiosk.security_code.clone(),
        }
    }
}

impl Model for Kiosk {
    const NAME: &'static str = "kiosks";
    type FormData = KioskFormData;
}

impl KioskModel for Kiosk {}
