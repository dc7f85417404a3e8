//! Message board model matching the frontend ChatMessage interface.

use serde::{Deserialize, Serialize};

/// A message on the student board. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BoardMessage {
    pub id: String,
    pub sender: String,
    pub text: String,
    /// Time of day, `HH:MM`
    pub time: String,
}

/// Request body for posting on the board.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendBoardMessageRequest {
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub text: String,
}
