//! Physical pizzeria locations (`locales`).

use serde::{Deserialize, Serialize};

use super::Resource;
use crate::types::{LocationId, lenient};

/// A pizzeria location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    #[serde(rename = "id_local", skip_serializing_if = "Option::is_none")]
    pub location_id: Option<LocationId>,
    #[serde(rename = "id", skip_serializing_if = "Option::is_none")]
    pub legacy_id: Option<LocationId>,
    #[serde(rename = "nombre", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "direccion", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(
        rename = "capacidad",
        deserialize_with = "lenient::count",
        skip_serializing_if = "Option::is_none"
    )]
    pub capacity: Option<u32>,
    #[serde(flatten)]
    pub details: LocationDetails,
    #[serde(rename = "activo", skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

impl Location {
    /// Location identifier from whichever field the backend filled.
    #[must_use]
    pub fn id(&self) -> Option<LocationId> {
        self.location_id.or(self.legacy_id)
    }
}

/// Optional contact and schedule fields shared by records and payloads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationDetails {
    #[serde(rename = "ubicacion", skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(rename = "ciudad", skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(rename = "telefono", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "horario", skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
    #[serde(rename = "horarioApertura", skip_serializing_if = "Option::is_none")]
    pub opens_at: Option<String>,
    #[serde(rename = "horarioCierre", skip_serializing_if = "Option::is_none")]
    pub closes_at: Option<String>,
}

impl Resource for Location {
    const PATH: &'static str = "locales";
    const COLLECTION_KEY: &'static str = "locales";
    type Id = LocationId;
    type Create = LocationInput;
    type Update = LocationInput;
}

/// Payload for creating or updating a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationInput {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "direccion")]
    pub address: String,
    #[serde(rename = "capacidad")]
    pub capacity: u32,
    #[serde(flatten)]
    pub details: LocationDetails,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_location_decode_with_details() {
        let location: Location = serde_json::from_str(
            r#"{"id_local":1,"nombre":"Centro","capacidad":40,"ciudad":"Lima","horarioApertura":"12:00","activo":true}"#,
        )
        .unwrap();
        assert_eq!(location.id(), Some(LocationId::new(1)));
        assert_eq!(location.capacity, Some(40));
        assert_eq!(location.details.city.as_deref(), Some("Lima"));
        assert_eq!(location.details.opens_at.as_deref(), Some("12:00"));
        assert_eq!(location.active, Some(true));
    }

    #[test]
    fn test_location_input_omits_empty_details() {
        let input = LocationInput {
            name: "Miraflores".to_string(),
            address: "Av. Larco 123".to_string(),
            capacity: 25,
            details: LocationDetails::default(),
        };
        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(value["capacidad"], 25);
        assert!(value.get("ciudad").is_none());
    }
}
