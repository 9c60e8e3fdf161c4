//! Chorus Core
//!
//! Platform-agnostic domain types and access-control rules for Chorus.
//!
//! This crate is the foundation shared by the storage layer and the HTTP
//! server. It has no I/O of its own.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `User`, `Song`, `Playlist`, `PlaylistSong`, `Page`
//! - **Typed IDs**: `UserId`, `SongId`, `PlaylistId`
//! - **Access Control**: the pure [`policy::can`] decision function
//!
//! # Example
//!
//! ```rust
//! use chorus_core::policy::{can, Action, Actor, Resource};
//! use chorus_core::types::{Role, UserId};
//!
//! let uploader = Actor::User { id: UserId::new(1), role: Role::User };
//! let song = Resource::Song { uploaded_by: UserId::new(1) };
//!
//! assert!(can(&uploader, Action::Update, &song));
//! assert!(can(&Actor::Anonymous, Action::Read, &song));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod policy;
pub mod types;

// Re-export commonly used types
pub use policy::{can, Action, Actor, Resource};
pub use types::{
    // User
    Role, User, UserSummary,
    // Catalog
    CreateSong, Song, UpdateSong,
    // Playlists
    CreatePlaylist, Playlist, PlaylistSong, UpdatePlaylist,
    // Pagination
    Page,
    // IDs
    PlaylistId, SongId, UserId,
};
