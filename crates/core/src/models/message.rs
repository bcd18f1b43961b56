//! Contact messages (`mensajes`).

use serde::{Deserialize, Serialize};

use super::Resource;
use crate::types::{MessageId, UserId};

/// An inbound message from the contact form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Message {
    #[serde(rename = "id_mensaje", skip_serializing_if = "Option::is_none")]
    pub id: Option<MessageId>,
    #[serde(rename = "fk_id_usuario", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    #[serde(rename = "asunto", skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(rename = "contenido", skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(rename = "fecha_envio", skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<String>,
    #[serde(rename = "remitente", skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    #[serde(rename = "destinatario", skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    #[serde(rename = "leido", skip_serializing_if = "Option::is_none")]
    pub read: Option<bool>,
}

impl Resource for Message {
    const PATH: &'static str = "mensajes";
    const COLLECTION_KEY: &'static str = "mensajes";
    type Id = MessageId;
    type Create = MessageInput;
    type Update = MessageUpdate;
}

/// Payload for sending a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MessageInput {
    #[serde(rename = "fk_id_usuario", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    #[serde(rename = "asunto")]
    pub subject: String,
    #[serde(rename = "contenido")]
    pub content: String,
    #[serde(rename = "fecha_envio", skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<String>,
    #[serde(rename = "remitente", skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    #[serde(rename = "destinatario", skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
}

/// Payload for editing a message, typically to mark it read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MessageUpdate {
    #[serde(rename = "fk_id_usuario", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    #[serde(rename = "asunto")]
    pub subject: String,
    #[serde(rename = "contenido")]
    pub content: String,
    #[serde(rename = "remitente", skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    #[serde(rename = "destinatario", skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    #[serde(rename = "leido", skip_serializing_if = "Option::is_none")]
    pub read: Option<bool>,
}

impl MessageUpdate {
    /// Update that keeps the message content and flips its read flag.
    #[must_use]
    pub fn mark_read(message: &Message) -> Self {
        Self {
            user_id: message.user_id,
            subject: message.subject.clone().unwrap_or_default(),
            content: message.content.clone().unwrap_or_default(),
            sender: message.sender.clone(),
            recipient: message.recipient.clone(),
            read: Some(true),
        }
    }
}
