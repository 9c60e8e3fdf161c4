//! Playlist queries: visibility-filtered listing, ordered membership, CRUD

use crate::error::{Result, StorageError};
use chorus_core::types::{
    CreatePlaylist, Playlist, PlaylistId, PlaylistSong, SongId, UpdatePlaylist, UserId,
    UserSummary,
};
use sqlx::{Row, SqlitePool};

/// Default page size for playlist listings
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Hard cap on page size
pub const MAX_PAGE_SIZE: i64 = 100;

const PLAYLIST_COLUMNS: &str = "p.id, p.name, p.description, p.is_public, p.owner_id, \
     p.created_at, p.updated_at, u.name AS owner_name, u.email AS owner_email";

/// List playlists a viewer may see, with owner identity and ordered songs.
///
/// `see_all` (admin) lifts the visibility filter entirely; otherwise the
/// listing is public playlists plus the viewer's own.
pub async fn list_visible(
    pool: &SqlitePool,
    viewer: Option<UserId>,
    see_all: bool,
    page: i64,
    per_page: i64,
) -> Result<(Vec<Playlist>, i64)> {
    let where_clause = if see_all {
        ""
    } else if viewer.is_some() {
        "WHERE (p.is_public = 1 OR p.owner_id = ?)"
    } else {
        "WHERE p.is_public = 1"
    };

    let count_sql = format!("SELECT COUNT(*) AS count FROM playlists p {}", where_clause);
    let mut count_query = sqlx::query(&count_sql);
    if let (false, Some(viewer)) = (see_all, viewer) {
        count_query = count_query.bind(viewer);
    }
    let total: i64 = count_query.fetch_one(pool).await?.get("count");

    let page = page.max(1);
    let per_page = per_page.clamp(1, MAX_PAGE_SIZE);

    let list_sql = format!(
        "SELECT {PLAYLIST_COLUMNS}
         FROM playlists p
         INNER JOIN users u ON p.owner_id = u.id
         {where_clause}
         ORDER BY p.created_at DESC, p.id DESC
         LIMIT ? OFFSET ?"
    );

    let mut list_query = sqlx::query(&list_sql);
    if let (false, Some(viewer)) = (see_all, viewer) {
        list_query = list_query.bind(viewer);
    }
    let rows = list_query
        .bind(per_page)
        .bind((page - 1) * per_page)
        .fetch_all(pool)
        .await?;

    let mut playlists: Vec<Playlist> = rows.iter().map(playlist_from_row).collect();
    for playlist in &mut playlists {
        playlist.songs = Some(songs_for(pool, playlist.id).await?);
    }

    Ok((playlists, total))
}

/// Get a playlist with its owner (membership not loaded)
pub async fn get_by_id(pool: &SqlitePool, id: PlaylistId) -> Result<Option<Playlist>> {
    let sql = format!(
        "SELECT {PLAYLIST_COLUMNS}
         FROM playlists p
         INNER JOIN users u ON p.owner_id = u.id
         WHERE p.id = ?"
    );

    let row = sqlx::query(&sql).bind(id).fetch_optional(pool).await?;

    Ok(row.as_ref().map(playlist_from_row))
}

/// Get a playlist with its owner and ordered songs
pub async fn get_with_songs(pool: &SqlitePool, id: PlaylistId) -> Result<Option<Playlist>> {
    let Some(mut playlist) = get_by_id(pool, id).await? else {
        return Ok(None);
    };

    playlist.songs = Some(songs_for(pool, id).await?);

    Ok(Some(playlist))
}

/// Ordered songs of a playlist.
///
/// The inner join drops entries whose song has since been deleted.
async fn songs_for(pool: &SqlitePool, id: PlaylistId) -> Result<Vec<PlaylistSong>> {
    let rows = sqlx::query(
        "SELECT ps.song_id, ps.position, ps.added_at,
                s.title, s.artist, s.duration, s.audio_file
         FROM playlist_songs ps
         INNER JOIN songs s ON ps.song_id = s.id
         WHERE ps.playlist_id = ?
         ORDER BY ps.position ASC, ps.song_id ASC",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| PlaylistSong {
            song_id: row.get("song_id"),
            position: row.get("position"),
            title: row.get("title"),
            artist: row.get("artist"),
            duration: row.get("duration"),
            audio_file: row.get("audio_file"),
            added_at: row.get("added_at"),
        })
        .collect())
}

/// Insert a new playlist row
pub async fn create(pool: &SqlitePool, playlist: &CreatePlaylist) -> Result<Playlist> {
    let result = sqlx::query(
        "INSERT INTO playlists (name, description, is_public, owner_id) VALUES (?, ?, ?, ?)",
    )
    .bind(&playlist.name)
    .bind(&playlist.description)
    .bind(playlist.is_public)
    .bind(playlist.owner_id)
    .execute(pool)
    .await?;

    let id = PlaylistId::new(result.last_insert_rowid());

    get_with_songs(pool, id)
        .await?
        .ok_or_else(|| StorageError::not_found("playlist", id))
}

/// Apply a partial update to a playlist row
pub async fn update(
    pool: &SqlitePool,
    id: PlaylistId,
    update: &UpdatePlaylist,
) -> Result<Playlist> {
    let mut sets: Vec<&str> = Vec::new();

    if update.name.is_some() {
        sets.push("name = ?");
    }
    if update.description.is_some() {
        sets.push("description = ?");
    }
    if update.is_public.is_some() {
        sets.push("is_public = ?");
    }
    sets.push("updated_at = strftime('%s', 'now')");

    let sql = format!("UPDATE playlists SET {} WHERE id = ?", sets.join(", "));
    let mut query = sqlx::query(&sql);

    if let Some(v) = &update.name {
        query = query.bind(v);
    }
    if let Some(v) = &update.description {
        query = query.bind(v);
    }
    if let Some(v) = update.is_public {
        query = query.bind(v);
    }

    query.bind(id).execute(pool).await?;

    get_with_songs(pool, id)
        .await?
        .ok_or_else(|| StorageError::not_found("playlist", id))
}

/// Delete a playlist row; membership entries cascade with it
pub async fn delete(pool: &SqlitePool, id: PlaylistId) -> Result<()> {
    sqlx::query("DELETE FROM playlists WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Number of membership entries, deleted songs included
pub async fn count_songs(pool: &SqlitePool, id: PlaylistId) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) AS count FROM playlist_songs WHERE playlist_id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;

    Ok(row.get("count"))
}

/// Attach a song at `position`.
///
/// Re-adding a song that is already a member moves it to the new position
/// instead of inserting a second row.
pub async fn add_song(
    pool: &SqlitePool,
    playlist_id: PlaylistId,
    song_id: SongId,
    position: i64,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO playlist_songs (playlist_id, song_id, position)
         VALUES (?, ?, ?)
         ON CONFLICT(playlist_id, song_id) DO UPDATE SET position = excluded.position",
    )
    .bind(playlist_id)
    .bind(song_id)
    .bind(position)
    .execute(pool)
    .await?;

    touch(pool, playlist_id).await
}

/// Detach a song. Absent entries are a no-op; positions of the remaining
/// entries are left as they are.
pub async fn remove_song(
    pool: &SqlitePool,
    playlist_id: PlaylistId,
    song_id: SongId,
) -> Result<()> {
    sqlx::query("DELETE FROM playlist_songs WHERE playlist_id = ? AND song_id = ?")
        .bind(playlist_id)
        .bind(song_id)
        .execute(pool)
        .await?;

    touch(pool, playlist_id).await
}

async fn touch(pool: &SqlitePool, id: PlaylistId) -> Result<()> {
    sqlx::query("UPDATE playlists SET updated_at = strftime('%s', 'now') WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

fn playlist_from_row(row: &sqlx::sqlite::SqliteRow) -> Playlist {
    Playlist {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        is_public: row.get::<i64, _>("is_public") != 0,
        owner_id: row.get("owner_id"),
        owner: Some(UserSummary {
            id: row.get("owner_id"),
            name: row.get("owner_name"),
            email: row.get("owner_email"),
        }),
        songs: None,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
