//! Playlist domain types
use crate::types::{PlaylistId, SongId, UserId, UserSummary};
use serde::{Deserialize, Serialize};

/// Playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    /// Unique playlist identifier
    pub id: PlaylistId,

    /// Playlist name
    pub name: String,

    /// Free-form description
    pub description: Option<String>,

    /// Whether anyone may view the playlist
    pub is_public: bool,

    /// Owner user ID
    pub owner_id: UserId,

    /// Owner identity, populated when the row is joined with its user
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<UserSummary>,

    /// Member songs ordered by position, when loaded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub songs: Option<Vec<PlaylistSong>>,

    /// Creation timestamp (unix seconds)
    pub created_at: i64,

    /// Last modification timestamp (unix seconds)
    pub updated_at: i64,
}

/// Song membership in a playlist
///
/// Carries the join row's position plus enough song metadata to render a
/// playlist without another catalog round trip. Entries whose song has been
/// deleted are filtered out at read time, so these fields are always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistSong {
    /// Member song ID
    pub song_id: SongId,

    /// Position within the playlist (0-indexed, gaps allowed)
    pub position: i64,

    /// Song title
    pub title: String,

    /// Performing artist
    pub artist: String,

    /// Duration in seconds
    pub duration: i64,

    /// Stored audio file, relative to the media root
    pub audio_file: String,

    /// When the song was added to the playlist (unix seconds)
    pub added_at: i64,
}

/// Payload for inserting a new playlist row
#[derive(Debug, Clone)]
pub struct CreatePlaylist {
    /// Playlist name
    pub name: String,
    /// Free-form description
    pub description: Option<String>,
    /// Whether anyone may view the playlist
    pub is_public: bool,
    /// Owner user ID
    pub owner_id: UserId,
}

/// Partial update for an existing playlist; `None` fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct UpdatePlaylist {
    /// New name
    pub name: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New visibility
    pub is_public: Option<bool>,
}
