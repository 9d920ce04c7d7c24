use serde::{Deserialize, Serialize};

use crate::{Error, backend::string_or_number, operating_state::OperatingState};

/// The vehicle brands a charger can support.
pub const SUPPORTED_BRANDS: [&str; 5] = ["Vinfast", "BYD", "MG", "Wuling", "Hyundai"];

/// The backend's identifier for a charger.
pub type ChargerId = String;

/// A charger (charging post) as returned by the backend.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Charger {
    #[serde(rename = "_id", alias = "id", deserialize_with = "string_or_number")]
    pub id: ChargerId,
    #[serde(rename = "stationId", default, deserialize_with = "string_or_number")]
    pub station_id: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub name: String,
    /// The power rating in kW.
    #[serde(default, deserialize_with = "string_or_number")]
    pub power: String,
    #[serde(rename = "supportBrands", default)]
    pub support_brands: Vec<String>,
    #[serde(default)]
    pub state: OperatingState,
}

impl Charger {
    /// Whether the charger supports vehicles of `brand`.
    pub fn supports(&self, brand: &str) -> bool {
        self.support_brands
            .iter()
            .any(|supported| supported.eq_ignore_ascii_case(brand))
    }
}

/// The form data for creating or editing a charger.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChargerFormData {
    pub station_id: String,
    pub name: String,
    pub power: String,
    #[serde(default)]
    pub brands: Vec<String>,
    /// The state to keep when editing. New chargers are always available.
    #[serde(default)]
    pub state: OperatingState,
}

/// The JSON body of a charger create or update request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChargerPayload {
    #[serde(rename = "stationId")]
    pub station_id: String,
    pub name: String,
    pub power: String,
    #[serde(rename = "supportBrands")]
    pub support_brands: Vec<String>,
    pub state: OperatingState,
}

impl ChargerFormData {
    /// Check the form and build the backend request body.
    ///
    /// Brands outside [SUPPORTED_BRANDS] are dropped.
    ///
    /// # Errors
    /// Returns [Error::InvalidForm] for the first invalid field.
    pub fn into_payload(self) -> Result<ChargerPayload, Error> {
        let station_id = self.station_id.trim().to_owned();
        let name = self.name.trim().to_owned();
        let power = self.power.trim().to_owned();

        if station_id.is_empty() {
            return Err(Error::InvalidForm("Please choose a station".to_owned()));
        }

        if name.is_empty() {
            return Err(Error::InvalidForm("Charger name cannot be empty".to_owned()));
        }

        match power.parse::<f64>() {
            Ok(kilowatts) if kilowatts > 0.0 => {}
            _ => {
                return Err(Error::InvalidForm(
                    "Power must be a positive number of kW".to_owned(),
                ));
            }
        }

        let support_brands = SUPPORTED_BRANDS
            .iter()
            .filter(|brand| self.brands.iter().any(|chosen| chosen == *brand))
            .map(|brand| (*brand).to_owned())
            .collect();

        Ok(ChargerPayload {
            station_id,
            name,
            power,
            support_brands,
            state: self.state,
        })
    }
}
