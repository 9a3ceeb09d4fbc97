/**
 * Wire Protocol
 *
 * JSON frames exchanged over the WebSocket.
 *
 * # Client → Server
 *
 * ```json
 * {"type":"sendMessage","content":"**hi**","author":"Alice","date":"2024-01-01T00:00:00Z"}
 * {"type":"getMessages"}
 * ```
 *
 * # Server → Client
 *
 * ```json
 * {"type":"message","content":"<p><strong>hi</strong></p>","author":"Alice","date":"2024-01-01T00:00:00.000Z"}
 * {"response":[ ...messages ]}
 * {"type":"error","response":"Please send a valid JSON data."}
 * ```
 */
use serde::{Deserialize, Serialize};

use crate::shared::error::SharedError;
use crate::shared::message::Message;

/// Reply text sent to a client whose frame could not be decoded
pub const INVALID_INPUT_RESPONSE: &str = "Please send a valid JSON data.";

/// Fields that must be strings when present
const STRING_FIELDS: &[&str] = &["type", "content", "author"];

/// A decoded client request
///
/// Every field is optional on the wire. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ClientFrame {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub date: Option<serde_json::Value>,
}

/// What a client frame asks the hub to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    SendMessage,
    GetMessages,
    /// Missing or unrecognized `type`; ignored by the hub
    Other,
}

impl ClientFrame {
    /// Decode a raw text frame
    ///
    /// The payload must be a JSON object whose known fields have the
    /// expected types.
    ///
    /// # Errors
    ///
    /// * `SerializationError` - The text is not JSON
    /// * `FrameError` - The JSON value is not an object
    /// * `ValidationError` - A known field has the wrong type
    pub fn parse(raw: &str) -> Result<Self, SharedError> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        let Some(object) = value.as_object() else {
            return Err(SharedError::frame("expected a JSON object"));
        };
        for field in STRING_FIELDS {
            if object.get(*field).is_some_and(|v| !v.is_string() && !v.is_null()) {
                return Err(SharedError::validation(*field, "expected a string"));
            }
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn request_kind(&self) -> RequestKind {
        match self.kind.as_deref() {
            Some("sendMessage") => RequestKind::SendMessage,
            Some("getMessages") => RequestKind::GetMessages,
            _ => RequestKind::Other,
        }
    }
}

/// Discriminator for the error frame
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Error,
}

/// Frames the server pushes to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ServerFrame {
    /// A newly accepted message, fanned out to everyone
    Message(Message),
    /// The full history, sent to the requester only
    History { response: Vec<Message> },
    /// Malformed input, sent to the offending client only
    Error {
        #[serde(rename = "type")]
        kind: ErrorKind,
        response: String,
    },
}

impl ServerFrame {
    pub fn invalid_input() -> Self {
        Self::Error {
            kind: ErrorKind::Error,
            response: INVALID_INPUT_RESPONSE.to_string(),
        }
    }

    pub fn to_json(&self) -> Result<String, SharedError> {
        Ok(serde_json::to_string(self)?)
    }
}
