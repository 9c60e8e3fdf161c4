//! Catalog queries: filtering, search, sorting, pagination, CRUD

use crate::error::{Result, StorageError};
use chorus_core::types::{CreateSong, Song, SongId, UpdateSong, UserSummary};
use serde::Deserialize;
use sqlx::{Row, SqlitePool};

/// Hard cap on page size, whatever the request asks for
pub const MAX_PAGE_SIZE: i64 = 100;

/// Default page size for catalog listings
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Sortable catalog columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    /// Sort by song title
    Title,
    /// Sort by artist name
    Artist,
    /// Sort by album name
    Album,
    /// Sort by upload time
    #[default]
    CreatedAt,
}

impl SortField {
    fn column(self) -> &'static str {
        match self {
            SortField::Title => "title",
            SortField::Artist => "artist",
            SortField::Album => "album",
            SortField::CreatedAt => "created_at",
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Ascending
    Asc,
    /// Descending
    #[default]
    Desc,
}

impl SortOrder {
    fn keyword(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Catalog listing parameters
#[derive(Debug, Clone)]
pub struct SongFilter {
    /// Exact genre match
    pub genre: Option<String>,
    /// Artist substring match
    pub artist: Option<String>,
    /// Substring match over title, artist, and album
    pub search: Option<String>,
    /// Sort column
    pub sort_by: SortField,
    /// Sort direction
    pub sort_order: SortOrder,
    /// 1-based page number
    pub page: i64,
    /// Page size (clamped to [`MAX_PAGE_SIZE`])
    pub per_page: i64,
}

impl Default for SongFilter {
    fn default() -> Self {
        Self {
            genre: None,
            artist: None,
            search: None,
            sort_by: SortField::default(),
            sort_order: SortOrder::default(),
            page: 1,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

const SONG_COLUMNS: &str = "s.id, s.title, s.artist, s.album, s.genre, s.duration, s.year, \
     s.cover_image, s.audio_file, s.uploaded_by, s.created_at, s.updated_at, \
     u.name AS uploader_name, u.email AS uploader_email";

/// List songs matching `filter`, with uploader identity and total count.
///
/// The secondary `id` ordering keeps pagination deterministic when the sort
/// column has ties.
pub async fn list(pool: &SqlitePool, filter: &SongFilter) -> Result<(Vec<Song>, i64)> {
    let mut conditions: Vec<&str> = Vec::new();
    let mut params: Vec<String> = Vec::new();

    if let Some(genre) = &filter.genre {
        conditions.push("s.genre = ?");
        params.push(genre.clone());
    }

    if let Some(artist) = &filter.artist {
        conditions.push("s.artist LIKE ?");
        params.push(format!("%{}%", artist));
    }

    if let Some(search) = &filter.search {
        conditions.push("(s.title LIKE ? OR s.artist LIKE ? OR s.album LIKE ?)");
        let pattern = format!("%{}%", search);
        params.push(pattern.clone());
        params.push(pattern.clone());
        params.push(pattern);
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    let count_sql = format!("SELECT COUNT(*) AS count FROM songs s {}", where_clause);
    let mut count_query = sqlx::query(&count_sql);
    for param in &params {
        count_query = count_query.bind(param.as_str());
    }
    let total: i64 = count_query.fetch_one(pool).await?.get("count");

    let page = filter.page.max(1);
    let per_page = filter.per_page.clamp(1, MAX_PAGE_SIZE);
    let direction = filter.sort_order.keyword();

    let list_sql = format!(
        "SELECT {SONG_COLUMNS}
         FROM songs s
         INNER JOIN users u ON s.uploaded_by = u.id
         {where_clause}
         ORDER BY s.{sort} {direction}, s.id {direction}
         LIMIT ? OFFSET ?",
        sort = filter.sort_by.column(),
    );

    let mut list_query = sqlx::query(&list_sql);
    for param in &params {
        list_query = list_query.bind(param.as_str());
    }
    let rows = list_query
        .bind(per_page)
        .bind((page - 1) * per_page)
        .fetch_all(pool)
        .await?;

    Ok((rows.iter().map(song_from_row).collect(), total))
}

/// Get a song with its uploader
pub async fn get_by_id(pool: &SqlitePool, id: SongId) -> Result<Option<Song>> {
    let sql = format!(
        "SELECT {SONG_COLUMNS}
         FROM songs s
         INNER JOIN users u ON s.uploaded_by = u.id
         WHERE s.id = ?"
    );

    let row = sqlx::query(&sql).bind(id).fetch_optional(pool).await?;

    Ok(row.as_ref().map(song_from_row))
}

/// Whether a song row exists
pub async fn exists(pool: &SqlitePool, id: SongId) -> Result<bool> {
    let row = sqlx::query("SELECT COUNT(*) AS count FROM songs WHERE id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;

    Ok(row.get::<i64, _>("count") > 0)
}

/// Insert a new song row
pub async fn create(pool: &SqlitePool, song: &CreateSong) -> Result<Song> {
    let result = sqlx::query(
        "INSERT INTO songs (title, artist, album, genre, duration, year, cover_image, audio_file, uploaded_by)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&song.title)
    .bind(&song.artist)
    .bind(&song.album)
    .bind(&song.genre)
    .bind(song.duration)
    .bind(song.year)
    .bind(&song.cover_image)
    .bind(&song.audio_file)
    .bind(song.uploaded_by)
    .execute(pool)
    .await?;

    let id = SongId::new(result.last_insert_rowid());

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| StorageError::not_found("song", id))
}

/// Apply a partial update to a song row
pub async fn update(pool: &SqlitePool, id: SongId, update: &UpdateSong) -> Result<Song> {
    let mut sets: Vec<&str> = Vec::new();

    if update.title.is_some() {
        sets.push("title = ?");
    }
    if update.artist.is_some() {
        sets.push("artist = ?");
    }
    if update.album.is_some() {
        sets.push("album = ?");
    }
    if update.genre.is_some() {
        sets.push("genre = ?");
    }
    if update.duration.is_some() {
        sets.push("duration = ?");
    }
    if update.year.is_some() {
        sets.push("year = ?");
    }
    if update.cover_image.is_some() {
        sets.push("cover_image = ?");
    }
    sets.push("updated_at = strftime('%s', 'now')");

    let sql = format!("UPDATE songs SET {} WHERE id = ?", sets.join(", "));
    let mut query = sqlx::query(&sql);

    // Bind in the same order the fragments were pushed
    if let Some(v) = &update.title {
        query = query.bind(v);
    }
    if let Some(v) = &update.artist {
        query = query.bind(v);
    }
    if let Some(v) = &update.album {
        query = query.bind(v);
    }
    if let Some(v) = &update.genre {
        query = query.bind(v);
    }
    if let Some(v) = update.duration {
        query = query.bind(v);
    }
    if let Some(v) = update.year {
        query = query.bind(v);
    }
    if let Some(v) = &update.cover_image {
        query = query.bind(v);
    }

    query.bind(id).execute(pool).await?;

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| StorageError::not_found("song", id))
}

/// Delete a song row
pub async fn delete(pool: &SqlitePool, id: SongId) -> Result<()> {
    sqlx::query("DELETE FROM songs WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

fn song_from_row(row: &sqlx::sqlite::SqliteRow) -> Song {
    Song {
        id: row.get("id"),
        title: row.get("title"),
        artist: row.get("artist"),
        album: row.get("album"),
        genre: row.get("genre"),
        duration: row.get("duration"),
        year: row.get("year"),
        cover_image: row.get("cover_image"),
        audio_file: row.get("audio_file"),
        uploaded_by: row.get("uploaded_by"),
        uploader: Some(UserSummary {
            id: row.get("uploaded_by"),
            name: row.get("uploader_name"),
            email: row.get("uploader_email"),
        }),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
