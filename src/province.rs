//! Client for the public Vietnamese administrative-division API, used to
//! fill the city and ward selects on the station form.

use std::time::Duration;

use serde::Deserialize;

use crate::Error;

/// A province or centrally governed city.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Province {
    pub code: u32,
    pub name: String,
}

/// A ward within a province.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Ward {
    pub code: u32,
    pub name: String,
}

#[derive(Deserialize)]
struct ProvinceWithWards {
    #[serde(default)]
    wards: Vec<Ward>,
}

/// A client for the administrative-division API.
#[derive(Debug, Clone)]
pub struct ProvinceClient {
    http: reqwest::Client,
    base_url: String,
}

impl ProvinceClient {
    /// Create a client for the API at `base_url`, e.g.
    /// "https://provinces.open-api.vn/api/v2".
    ///
    /// # Errors
    /// Returns [Error::HttpClientError] if the HTTP client cannot be initialised.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| Error::HttpClientError(error.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .map_err(|error| Error::BackendUnavailable(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::BackendStatus(status.as_u16()));
        }

        response.json().await.map_err(Error::from)
    }

    /// Get all provinces.
    pub async fn get_provinces(&self) -> Result<Vec<Province>, Error> {
        self.get_json("/p/").await
    }

    /// Get the wards of the province with `province_code`.
    pub async fn get_wards(&self, province_code: u32) -> Result<Vec<Ward>, Error> {
        self.get_json::<ProvinceWithWards>(&format!("/p/{province_code}?depth=2"))
            .await
            .map(|province| province.wards)
    }

    /// Get the wards of the province named `city`.
    ///
    /// Returns an empty list if no province has that name.
    pub async fn get_wards_for_city(&self, city: &str) -> Result<Vec<Ward>, Error> {
        let provinces = self.get_provinces().await?;

        match provinces.iter().find(|province| province.name == city) {
            Some(province) => self.get_wards(province.code).await,
            None => {
                tracing::warn!("No province named {city:?}");
                Ok(Vec::new())
            }
        }
    }

    /// Get all provinces, logging and returning an empty list on failure.
    pub async fn get_provinces_or_empty(&self) -> Vec<Province> {
        self.get_provinces()
            .await
            .inspect_err(|error| tracing::error!("Could not get provinces: {error}"))
            .unwrap_or_default()
    }
}
