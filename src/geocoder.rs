//! Reverse geocoding of coordinates into postal addresses.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT_LANGUAGE;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GeocoderConfig;
use crate::error::GeocodeError;
use crate::geo::GeoCoordinate;

/// Structured address. Any field may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub formatted_address: String,
    pub street: String,
    pub house_number: String,
    pub suburb: String,
    pub postcode: String,
    pub state: String,
    pub state_code: String,
    pub state_district: String,
    pub county: String,
    pub country: String,
    pub country_code: String,
    pub city: String,
}

/// Trait for services that turn a coordinate into an address.
///
/// Implementations must be thread-safe; the router holds one behind an `Arc`.
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    async fn reverse(&self, coordinate: GeoCoordinate) -> Result<Address, GeocodeError>;

    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Reverse geocoder backed by an OpenStreetMap Nominatim endpoint.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: reqwest::Client,
    endpoint: String,
    language: Option<String>,
    zoom: u8,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocoderConfig) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            language: config.language.clone(),
            zoom: config.zoom,
        })
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimGeocoder {
    async fn reverse(&self, coordinate: GeoCoordinate) -> Result<Address, GeocodeError> {
        debug!("[GEOCODE] Looking up {} at {}", coordinate, self.endpoint);

        let mut request = self.client.get(&self.endpoint).query(&[
            ("format", "jsonv2".to_string()),
            ("lat", coordinate.latitude.to_string()),
            ("lon", coordinate.longitude.to_string()),
            ("addressdetails", "1".to_string()),
            ("zoom", self.zoom.to_string()),
        ]);
        if let Some(language) = &self.language {
            request = request.header(ACCEPT_LANGUAGE, language.as_str());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Service {
                status: status.as_u16(),
            });
        }

        let body: NominatimResponse = response.json().await?;
        body.into_address()
    }

    fn name(&self) -> &str {
        "nominatim"
    }
}

/// Subset of the Nominatim `jsonv2` reverse response.
#[derive(Debug, Default, Deserialize)]
struct NominatimResponse {
    error: Option<String>,
    #[serde(default)]
    display_name: String,
    address: Option<NominatimAddress>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NominatimAddress {
    road: String,
    house_number: String,
    suburb: String,
    postcode: String,
    state: String,
    #[serde(rename = "ISO3166-2-lvl4")]
    state_code: String,
    state_district: String,
    county: String,
    country: String,
    country_code: String,
    city: String,
    town: String,
    village: String,
}

impl NominatimResponse {
    fn into_address(self) -> Result<Address, GeocodeError> {
        if let Some(error) = self.error {
            return Err(GeocodeError::NoResult(error));
        }
        let Some(addr) = self.address else {
            return Err(GeocodeError::NoResult("response has no address".to_string()));
        };

        // Nominatim reports the locality under whichever key matches its size.
        let city = [addr.city, addr.town, addr.village]
            .into_iter()
            .find(|s| !s.is_empty())
            .unwrap_or_default();

        Ok(Address {
            formatted_address: self.display_name,
            street: addr.road,
            house_number: addr.house_number,
            suburb: addr.suburb,
            postcode: addr.postcode,
            state: addr.state,
            state_code: addr.state_code,
            state_district: addr.state_district,
            county: addr.county,
            country: addr.country,
            country_code: addr.country_code.to_uppercase(),
            city,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locality_falls_back_to_town() {
        let body: NominatimResponse = serde_json::from_str(
            r#"{"display_name":"Skagen","address":{"town":"Skagen","country_code":"dk"}}"#,
        )
        .unwrap();
        let address = body.into_address().unwrap();
        assert_eq!(address.city, "Skagen");
        assert_eq!(address.country_code, "DK");
        assert_eq!(address.street, "");
    }

    #[test]
    fn test_error_body_is_no_result() {
        let body: NominatimResponse =
            serde_json::from_str(r#"{"error":"Unable to geocode"}"#).unwrap();
        assert!(matches!(
            body.into_address(),
            Err(GeocodeError::NoResult(msg)) if msg == "Unable to geocode"
        ));
    }

    #[test]
    fn test_name_through_trait_object() {
        let geocoder: Box<dyn ReverseGeocoder> =
            Box::new(NominatimGeocoder::new(&GeocoderConfig::default()).unwrap());
        assert_eq!(geocoder.name(), "nominatim");
    }
}
