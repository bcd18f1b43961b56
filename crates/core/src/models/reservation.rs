//! Event reservations (`reservas`).

use serde::{Deserialize, Serialize};

use super::Resource;
use crate::types::{EventId, LocationId, ReservationId, ReservationStatus, UserId, lenient};

/// A customer's reservation for an event at a location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reservation {
    #[serde(rename = "id_reserva", skip_serializing_if = "Option::is_none")]
    pub id: Option<ReservationId>,
    #[serde(rename = "fk_id_usuario", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    #[serde(rename = "fk_id_evento", skip_serializing_if = "Option::is_none")]
    pub event_id: Option<EventId>,
    #[serde(rename = "fk_id_local", skip_serializing_if = "Option::is_none")]
    pub location_id: Option<LocationId>,
    #[serde(rename = "fecha_reserva", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(rename = "hora_reserva", skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(
        rename = "cant_personas",
        deserialize_with = "lenient::count",
        skip_serializing_if = "Option::is_none"
    )]
    pub party_size: Option<u32>,
    #[serde(rename = "estado", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Reservation {
    /// Parsed status, if the backend sent a known value.
    #[must_use]
    pub fn status(&self) -> Option<ReservationStatus> {
        self.status.as_deref().and_then(|s| s.parse().ok())
    }
}

impl Resource for Reservation {
    const PATH: &'static str = "reservas";
    const COLLECTION_KEY: &'static str = "reservas";
    type Id = ReservationId;
    type Create = ReservationInput;
    type Update = ReservationInput;
}

/// Payload for creating or updating a reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReservationInput {
    #[serde(rename = "fk_id_usuario")]
    pub user_id: UserId,
    #[serde(rename = "fk_id_evento")]
    pub event_id: EventId,
    #[serde(rename = "fk_id_local")]
    pub location_id: LocationId,
    #[serde(rename = "fecha_reserva")]
    pub date: String,
    #[serde(rename = "hora_reserva")]
    pub time: String,
    #[serde(rename = "cant_personas")]
    pub party_size: u32,
    #[serde(rename = "estado")]
    pub status: ReservationStatus,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parsing_is_lenient() {
        let known: Reservation = serde_json::from_str(r#"{"estado":"confirmada"}"#).unwrap();
        assert_eq!(known.status(), Some(ReservationStatus::Confirmed));

        let unknown: Reservation = serde_json::from_str(r#"{"estado":"en espera"}"#).unwrap();
        assert_eq!(unknown.status(), None);
    }

    #[test]
    fn test_input_wire_names() {
        let input = ReservationInput {
            user_id: UserId::new(7),
            event_id: EventId::new(2),
            location_id: LocationId::new(1),
            date: "2026-10-31".to_string(),
            time: "20:00".to_string(),
            party_size: 4,
            status: ReservationStatus::Pending,
        };
        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(value["fk_id_usuario"], 7);
        assert_eq!(value["cant_personas"], 4);
        assert_eq!(value["estado"], "pendiente");
    }
}
