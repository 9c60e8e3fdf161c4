//! Playlists API routes
use crate::{
    api::MessageResponse,
    error::{Result, ServerError},
    middleware::{AuthenticatedUser, OptionalUser},
    state::AppState,
    validation::{self, ValidationErrors},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chorus_core::{
    policy::{can, Action, Resource},
    types::{CreatePlaylist, Page, Playlist, PlaylistId, SongId, UpdatePlaylist},
};
use chorus_storage::playlists::{self, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct PlaylistListQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_per_page")]
    pub per_page: i64,
}

fn default_page() -> i64 {
    1
}

fn default_per_page() -> i64 {
    DEFAULT_PAGE_SIZE
}

#[derive(Debug, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePlaylistRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct AddSongRequest {
    pub song_id: Option<i64>,
    pub order: Option<i64>,
}

/// GET /api/playlists
///
/// Admins see everything; everyone else sees public playlists plus their own.
pub async fn list_playlists(
    State(state): State<AppState>,
    viewer: OptionalUser,
    Query(query): Query<PlaylistListQuery>,
) -> Result<Json<Page<Playlist>>> {
    let actor = viewer.actor();
    let page = query.page.max(1);
    let per_page = query.per_page.clamp(1, MAX_PAGE_SIZE);

    let (data, total) = playlists::list_visible(
        &state.pool,
        actor.user_id(),
        actor.is_admin(),
        page,
        per_page,
    )
    .await?;

    Ok(Json(Page::new(data, total, page, per_page)))
}

/// GET /api/playlists/:id
pub async fn get_playlist(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    viewer: OptionalUser,
) -> Result<Json<Playlist>> {
    let playlist = playlists::get_with_songs(&state.pool, PlaylistId::new(id))
        .await?
        .ok_or_else(|| ServerError::NotFound("Playlist not found".to_string()))?;

    if !can(&viewer.actor(), Action::Read, &Resource::from(&playlist)) {
        return Err(ServerError::Forbidden);
    }

    Ok(Json(playlist))
}

/// POST /api/playlists
pub async fn create_playlist(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(req): Json<CreatePlaylistRequest>,
) -> Result<(StatusCode, Json<Playlist>)> {
    if !can(&user.actor(), Action::Create, &Resource::Collection) {
        return Err(ServerError::Forbidden);
    }

    let mut errors = ValidationErrors::new();
    validation::required_string(&mut errors, "name", req.name.as_deref(), 1, 255);
    errors.into_result()?;

    let Some(name) = req.name else {
        return Err(ServerError::Internal("validated field missing".to_string()));
    };

    let playlist = playlists::create(
        &state.pool,
        &CreatePlaylist {
            name,
            description: req.description,
            is_public: req.is_public.unwrap_or(false),
            owner_id: user.user().id,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(playlist)))
}

/// PUT /api/playlists/:id
pub async fn update_playlist(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(req): Json<UpdatePlaylistRequest>,
) -> Result<Json<Playlist>> {
    // Load before any ownership check
    let playlist = playlists::get_by_id(&state.pool, PlaylistId::new(id))
        .await?
        .ok_or_else(|| ServerError::NotFound("Playlist not found".to_string()))?;

    if !can(&user.actor(), Action::Update, &Resource::from(&playlist)) {
        return Err(ServerError::Forbidden);
    }

    let mut errors = ValidationErrors::new();
    if req.name.is_some() {
        validation::required_string(&mut errors, "name", req.name.as_deref(), 1, 255);
    }
    errors.into_result()?;

    let updated = playlists::update(
        &state.pool,
        playlist.id,
        &UpdatePlaylist {
            name: req.name,
            description: req.description,
            is_public: req.is_public,
        },
    )
    .await?;

    Ok(Json(updated))
}

/// DELETE /api/playlists/:id
pub async fn delete_playlist(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<MessageResponse>> {
    let playlist = playlists::get_by_id(&state.pool, PlaylistId::new(id))
        .await?
        .ok_or_else(|| ServerError::NotFound("Playlist not found".to_string()))?;

    if !can(&user.actor(), Action::Delete, &Resource::from(&playlist)) {
        return Err(ServerError::Forbidden);
    }

    // Membership entries cascade with the row
    playlists::delete(&state.pool, playlist.id).await?;

    Ok(Json(MessageResponse::new("Playlist deleted successfully")))
}

/// POST /api/playlists/:id/songs
///
/// Appends by default; re-adding a member song moves it instead of
/// duplicating it.
pub async fn add_song(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(req): Json<AddSongRequest>,
) -> Result<Json<Playlist>> {
    let playlist = playlists::get_by_id(&state.pool, PlaylistId::new(id))
        .await?
        .ok_or_else(|| ServerError::NotFound("Playlist not found".to_string()))?;

    if !can(&user.actor(), Action::AddEntry, &Resource::from(&playlist)) {
        return Err(ServerError::Forbidden);
    }

    let mut errors = ValidationErrors::new();
    if req.song_id.is_none() {
        errors.add("song_id", "The song_id field is required.");
    }
    validation::optional_int_min(&mut errors, "order", req.order, 0);
    errors.into_result()?;

    let Some(song_id) = req.song_id.map(SongId::new) else {
        return Err(ServerError::Internal("validated field missing".to_string()));
    };

    if !chorus_storage::songs::exists(&state.pool, song_id).await? {
        return Err(ServerError::NotFound("Song not found".to_string()));
    }

    let position = match req.order {
        Some(order) => order,
        None => playlists::count_songs(&state.pool, playlist.id).await?,
    };

    playlists::add_song(&state.pool, playlist.id, song_id, position).await?;

    let playlist = playlists::get_with_songs(&state.pool, playlist.id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Playlist not found".to_string()))?;

    Ok(Json(playlist))
}

/// DELETE /api/playlists/:id/songs/:song_id
///
/// Removing a song that is not a member is a no-op.
pub async fn remove_song(
    Path((id, song_id)): Path<(i64, i64)>,
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Playlist>> {
    let playlist = playlists::get_by_id(&state.pool, PlaylistId::new(id))
        .await?
        .ok_or_else(|| ServerError::NotFound("Playlist not found".to_string()))?;

    if !can(&user.actor(), Action::RemoveEntry, &Resource::from(&playlist)) {
        return Err(ServerError::Forbidden);
    }

    playlists::remove_song(&state.pool, playlist.id, SongId::new(song_id)).await?;

    let playlist = playlists::get_with_songs(&state.pool, playlist.id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Playlist not found".to_string()))?;

    Ok(Json(playlist))
}
