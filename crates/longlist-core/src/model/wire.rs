//! Request and response bodies of the HTTP API that are not state itself.

use serde::{Deserialize, Serialize};

use super::item::ItemId;

/// Body of `POST /api/selection`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRequest {
    pub id: ItemId,
    pub selected: bool,
}

/// Body of `POST /api/order/move`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    pub source_id: ItemId,
    pub target_id: ItemId,
}

/// Body of `POST /api/notes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteRequest {
    pub id: ItemId,
    #[serde(default)]
    pub note: String,
}

/// Acknowledgement returned by every successful write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteAck {
    pub success: bool,
    pub version: u64,
}

impl WriteAck {
    #[must_use]
    pub const fn ok(version: u64) -> Self {
        Self {
            success: true,
            version,
        }
    }
}

/// Response of `POST /api/order/move`. `moved` is false for no-op drops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveAck {
    pub success: bool,
    pub moved: bool,
    pub version: u64,
}

/// Response of `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    pub universe: u32,
    pub version: u64,
}

/// JSON error body for every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}
