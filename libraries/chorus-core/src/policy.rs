//! Access-control policy
//!
//! A single pure decision function shared by the catalog and playlist
//! services. Callers load the target resource first, build a [`Resource`]
//! view of it, and ask [`can`] whether the acting identity may proceed.
//! The function has no side effects and no storage access, so it is
//! unit-testable with synthetic inputs.

use crate::types::{Playlist, Role, Song, User, UserId};

/// The requester's resolved identity context
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Actor {
    /// No (valid) bearer token was presented
    Anonymous,
    /// An authenticated user
    User {
        /// The user's ID
        id: UserId,
        /// The user's role
        role: Role,
    },
}

impl Actor {
    /// Whether this actor holds the admin role
    pub fn is_admin(&self) -> bool {
        matches!(self, Actor::User { role: Role::Admin, .. })
    }

    /// The authenticated user ID, if any
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Actor::Anonymous => None,
            Actor::User { id, .. } => Some(*id),
        }
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Actor::User {
            id: user.id,
            role: user.role,
        }
    }
}

/// Operation the actor wants to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// View a resource
    Read,
    /// Create a new resource in a collection
    Create,
    /// Modify an existing resource
    Update,
    /// Remove an existing resource
    Delete,
    /// Attach a song to a playlist
    AddEntry,
    /// Detach a song from a playlist
    RemoveEntry,
}

/// The policy's view of the target resource
///
/// Only the ownership attributes the rules consult are carried, so a
/// decision can be evaluated without a live record in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// A catalog song
    Song {
        /// The uploading user (the song's owner)
        uploaded_by: UserId,
    },
    /// A playlist
    Playlist {
        /// The owning user
        owner_id: UserId,
        /// Whether the playlist is publicly visible
        is_public: bool,
    },
    /// A whole collection, the target of create/list actions
    Collection,
}

impl From<&Song> for Resource {
    fn from(song: &Song) -> Self {
        Resource::Song {
            uploaded_by: song.uploaded_by,
        }
    }
}

impl From<&Playlist> for Resource {
    fn from(playlist: &Playlist) -> Self {
        Resource::Playlist {
            owner_id: playlist.owner_id,
            is_public: playlist.is_public,
        }
    }
}

/// Decide whether `actor` may perform `action` on `resource`.
///
/// Rules, in precedence order:
/// 1. admins may do anything;
/// 2. the song catalog is publicly readable;
/// 3. a playlist is readable when public or owned by the actor;
/// 4. creating requires an authenticated, non-guest account;
/// 5. every other mutation requires ownership;
/// 6. anything else is denied.
pub fn can(actor: &Actor, action: Action, resource: &Resource) -> bool {
    if actor.is_admin() {
        return true;
    }

    match (action, resource) {
        (Action::Read, Resource::Song { .. }) => true,
        (Action::Read, Resource::Playlist { owner_id, is_public }) => {
            *is_public || owns(actor, *owner_id)
        }
        (Action::Create, _) => {
            matches!(actor, Actor::User { role, .. } if *role != Role::Guest)
        }
        (
            Action::Update | Action::Delete | Action::AddEntry | Action::RemoveEntry,
            Resource::Song { uploaded_by },
        ) => owns(actor, *uploaded_by),
        (
            Action::Update | Action::Delete | Action::AddEntry | Action::RemoveEntry,
            Resource::Playlist { owner_id, .. },
        ) => owns(actor, *owner_id),
        _ => false,
    }
}

fn owns(actor: &Actor, owner_id: UserId) -> bool {
    actor.user_id() == Some(owner_id)
}
