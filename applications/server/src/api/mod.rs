//! API route modules
pub mod auth;
pub mod health;
pub mod playlists;
pub mod songs;

use serde::{Deserialize, Serialize};

/// Plain acknowledgement body used by logout and the delete endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
