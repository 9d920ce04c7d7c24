use serde::{Deserialize, Serialize};

use crate::{backend::string_or_number, operating_state::OperatingState};

const MAPS_SEARCH_URL: &str = "https://www.google.com/maps/search/";

/// The backend's identifier for a station.
pub type StationId = String;

/// Where a station is located.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Address {
    /// Street number and name.
    #[serde(default, deserialize_with = "string_or_number")]
    pub detail: String,
    /// The ward, stored under the backend's older "district" name.
    #[serde(default, deserialize_with = "string_or_number")]
    pub district: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub city: String,
}

impl Address {
    /// The non-empty address parts joined with commas.
    pub fn full(&self) -> String {
        [&self.detail, &self.district, &self.city]
            .into_iter()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// A Google Maps search link for the address.
    pub fn maps_url(&self) -> String {
        let query = self.full();
        let query_string = serde_urlencoded::to_string([("api", "1"), ("query", query.as_str())])
            .unwrap_or_else(|error| {
                tracing::error!("Could not encode address {query:?}: {error}");
                "api=1".to_owned()
            });

        format!("{MAPS_SEARCH_URL}?{query_string}")
    }
}

/// A charging station as returned by the backend.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Station {
    #[serde(rename = "_id", alias = "id", deserialize_with = "string_or_number")]
    pub id: StationId,
    #[serde(default, deserialize_with = "string_or_number")]
    pub name: String,
    #[serde(default)]
    pub address: Address,
    /// The number of charging slots.
    #[serde(default, deserialize_with = "string_or_number")]
    pub slots: String,
    /// The highest power rating of the station's chargers.
    #[serde(default, deserialize_with = "string_or_number")]
    pub power: String,
    #[serde(default)]
    pub state: OperatingState,
    #[serde(default)]
    pub image: Option<String>,
}

impl Station {
    /// The image URL, if the station has a non-empty one.
    pub fn image_url(&self) -> Option<&str> {
        self.image
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

/// The form data for editing a station.
#[derive(Debug, Clone, Deserialize)]
pub struct StationFormData {
    pub name: String,
    pub detail: String,
    pub district: String,
    pub city: String,
    #[serde(default)]
    pub state: OperatingState,
}

/// The JSON body of a station update request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationUpdate {
    pub name: String,
    pub address: Address,
    pub state: OperatingState,
}

impl StationFormData {
    /// Trim the fields and check that the required ones are present.
    ///
    /// # Errors
    /// Returns [crate::Error::InvalidForm] naming the first missing field.
    pub fn into_update(self) -> Result<StationUpdate, crate::Error> {
        let name = self.name.trim().to_owned();
        let detail = self.detail.trim().to_owned();
        let district = self.district.trim().to_owned();
        let city = self.city.trim().to_owned();

        if name.is_empty() {
            return Err(crate::Error::InvalidForm(
                "Station name cannot be empty".to_owned(),
            ));
        }

        if city.is_empty() {
            return Err(crate::Error::InvalidForm("City cannot be empty".to_owned()));
        }

        Ok(StationUpdate {
            name,
            address: Address {
                detail,
                district,
                city,
            },
            state: self.state,
        })
    }
}
