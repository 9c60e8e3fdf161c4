//! Song domain types
use crate::types::{SongId, UserId, UserSummary};
use serde::{Deserialize, Serialize};

/// Catalog song
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    /// Unique song identifier
    pub id: SongId,

    /// Song title
    pub title: String,

    /// Performing artist
    pub artist: String,

    /// Album name, if known
    pub album: Option<String>,

    /// Genre label, if known
    pub genre: Option<String>,

    /// Duration in seconds
    pub duration: i64,

    /// Release year, if known
    pub year: Option<i64>,

    /// Stored cover image, relative to the media root
    pub cover_image: Option<String>,

    /// Stored audio file, relative to the media root
    pub audio_file: String,

    /// User who uploaded the song (its owner)
    pub uploaded_by: UserId,

    /// Uploader identity, populated when the row is joined with its user
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploader: Option<UserSummary>,

    /// Creation timestamp (unix seconds)
    pub created_at: i64,

    /// Last modification timestamp (unix seconds)
    pub updated_at: i64,
}

/// Payload for inserting a new song row
///
/// Field validation happens before this is built; the storage layer treats
/// the values as already checked.
#[derive(Debug, Clone)]
pub struct CreateSong {
    /// Song title
    pub title: String,
    /// Performing artist
    pub artist: String,
    /// Album name
    pub album: Option<String>,
    /// Genre label
    pub genre: Option<String>,
    /// Duration in seconds
    pub duration: i64,
    /// Release year
    pub year: Option<i64>,
    /// Stored cover image path
    pub cover_image: Option<String>,
    /// Stored audio file path
    pub audio_file: String,
    /// Uploading user
    pub uploaded_by: UserId,
}

/// Partial update for an existing song; `None` fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct UpdateSong {
    /// New title
    pub title: Option<String>,
    /// New artist
    pub artist: Option<String>,
    /// New album name
    pub album: Option<String>,
    /// New genre label
    pub genre: Option<String>,
    /// New duration in seconds
    pub duration: Option<i64>,
    /// New release year
    pub year: Option<i64>,
    /// Replacement cover image path
    pub cover_image: Option<String>,
}
