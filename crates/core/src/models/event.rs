//! Bookable events (`eventos`).

use serde::{Deserialize, Serialize};

use super::Resource;
use crate::types::{EventId, Price};

/// An event that customers can reserve.
///
/// Some endpoints still send the older `id`/`titulo` fields instead of (or
/// alongside) `id_evento`/`nombre_evento`; both are kept and resolved by the
/// accessors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Event {
    #[serde(rename = "id_evento", skip_serializing_if = "Option::is_none")]
    pub event_id: Option<EventId>,
    #[serde(rename = "id", skip_serializing_if = "Option::is_none")]
    pub legacy_id: Option<EventId>,
    #[serde(rename = "nombre_evento", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "titulo", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "descripcion", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "precio_base", skip_serializing_if = "Option::is_none")]
    pub base_price: Option<Price>,
}

impl Event {
    /// Event identifier from whichever field the backend filled.
    #[must_use]
    pub fn id(&self) -> Option<EventId> {
        self.event_id.or(self.legacy_id)
    }

    /// Event name from whichever field the backend filled.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().or(self.title.as_deref())
    }
}

impl Resource for Event {
    const PATH: &'static str = "eventos";
    const COLLECTION_KEY: &'static str = "eventos";
    type Id = EventId;
    type Create = EventInput;
    type Update = EventUpdate;
}

/// Payload for creating an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventInput {
    #[serde(rename = "nombre_evento")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "precio_base")]
    pub base_price: Price,
}

/// Payload for updating an event; the backend wants the id in the body too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventUpdate {
    #[serde(rename = "id_evento")]
    pub id: EventId,
    #[serde(flatten)]
    pub fields: EventInput,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_both_id_fields_decode() {
        let event: Event =
            serde_json::from_str(r#"{"id_evento":4,"id":4,"nombre_evento":"Noche de jazz"}"#)
                .unwrap();
        assert_eq!(event.id(), Some(EventId::new(4)));
        assert_eq!(event.display_name(), Some("Noche de jazz"));
    }

    #[test]
    fn test_legacy_fields_fallback() {
        let event: Event = serde_json::from_str(r#"{"id":9,"titulo":"Cata"}"#).unwrap();
        assert_eq!(event.id(), Some(EventId::new(9)));
        assert_eq!(event.display_name(), Some("Cata"));
    }

    #[test]
    fn test_update_flattens_fields() {
        let update = EventUpdate {
            id: EventId::new(2),
            fields: EventInput {
                name: "Karaoke".to_string(),
                description: "Viernes".to_string(),
                base_price: Price::from_units(30),
            },
        };
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value["id_evento"], 2);
        assert_eq!(value["nombre_evento"], "Karaoke");
    }
}
