//! Catalog API routes
use crate::{
    api::MessageResponse,
    config::UploadSettings,
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    services::files::{AUDIO_BUCKET, COVER_BUCKET},
    state::AppState,
    validation::{self, ValidationErrors},
};
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use chorus_core::{
    policy::{can, Action, Resource},
    types::{CreateSong, Page, Song, SongId, UpdateSong},
};
use chorus_storage::songs::{self, SongFilter, SortField, SortOrder};
use chrono::{Datelike, Utc};
use serde::Deserialize;

const AUDIO_MIME_TYPES: &[&str] = &[
    "audio/mpeg",
    "audio/mp3",
    "audio/wav",
    "audio/x-wav",
    "audio/ogg",
];

const IMAGE_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

#[derive(Debug, Deserialize)]
pub struct SongListQuery {
    pub genre: Option<String>,
    pub artist: Option<String>,
    pub search: Option<String>,
    #[serde(default)]
    pub sort_by: SortField,
    #[serde(default)]
    pub sort_order: SortOrder,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_per_page")]
    pub per_page: i64,
}

fn default_page() -> i64 {
    1
}

fn default_per_page() -> i64 {
    songs::DEFAULT_PAGE_SIZE
}

/// GET /api/songs
///
/// Public catalog listing with filtering, search, sorting, and pagination.
pub async fn list_songs(
    State(state): State<AppState>,
    Query(query): Query<SongListQuery>,
) -> Result<Json<Page<Song>>> {
    let page = query.page.max(1);
    let per_page = query.per_page.clamp(1, songs::MAX_PAGE_SIZE);

    let filter = SongFilter {
        genre: query.genre,
        artist: query.artist,
        search: query.search,
        sort_by: query.sort_by,
        sort_order: query.sort_order,
        page,
        per_page,
    };

    let (data, total) = songs::list(&state.pool, &filter).await?;

    Ok(Json(Page::new(data, total, page, per_page)))
}

/// GET /api/songs/:id
pub async fn get_song(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Song>> {
    let song = songs::get_by_id(&state.pool, SongId::new(id))
        .await?
        .ok_or_else(|| ServerError::NotFound("Song not found".to_string()))?;

    Ok(Json(song))
}

/// POST /api/songs
///
/// Multipart upload: metadata fields plus a required `audio_file` and an
/// optional `cover_image`. The uploader becomes the song's owner.
pub async fn create_song(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<Song>)> {
    if !can(&user.actor(), Action::Create, &Resource::Collection) {
        return Err(ServerError::Forbidden);
    }

    let form = parse_song_form(&headers, body).await?;

    let mut errors = ValidationErrors::new();
    validation::required_string(&mut errors, "title", form.title.as_deref(), 2, 255);
    validation::required_string(&mut errors, "artist", form.artist.as_deref(), 2, 255);
    validation::optional_string(&mut errors, "album", form.album.as_deref(), 255);
    validation::optional_string(&mut errors, "genre", form.genre.as_deref(), 100);
    let duration = validation::parse_int(&mut errors, "duration", form.duration.as_deref());
    validation::optional_int_min(&mut errors, "duration", duration, 1);
    let year = validation::parse_int(&mut errors, "year", form.year.as_deref());
    validation::optional_int_range(&mut errors, "year", year, 1900, current_year());
    validate_audio(&mut errors, form.audio_file.as_ref(), &state.uploads);
    validate_cover(&mut errors, form.cover_image.as_ref(), &state.uploads);
    errors.into_result()?;

    let (Some(title), Some(artist), Some(audio)) = (form.title, form.artist, form.audio_file)
    else {
        return Err(ServerError::Internal("validated field missing".to_string()));
    };

    // The audio file is required, so a failed store aborts the create.
    let audio_path = state
        .files
        .store(AUDIO_BUCKET, &extension_of(&audio, "mp3"), &audio.data)
        .await?;

    let cover_path = match &form.cover_image {
        Some(cover) => Some(
            state
                .files
                .store(COVER_BUCKET, &extension_of(cover, "jpg"), &cover.data)
                .await?,
        ),
        None => None,
    };

    let song = songs::create(
        &state.pool,
        &CreateSong {
            title,
            artist,
            album: form.album,
            genre: form.genre,
            duration: duration.unwrap_or(180),
            year,
            cover_image: cover_path,
            audio_file: audio_path,
            uploaded_by: user.user().id,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(song)))
}

/// PUT /api/songs/:id
///
/// Multipart like create, but every field is optional and `audio_file`
/// replacements are ignored. A new `cover_image` replaces the stored one.
pub async fn update_song(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    user: AuthenticatedUser,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Song>> {
    let id = SongId::new(id);
    let song = songs::get_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Song not found".to_string()))?;

    if !can(&user.actor(), Action::Update, &Resource::from(&song)) {
        return Err(ServerError::Forbidden);
    }

    let form = parse_song_form(&headers, body).await?;

    let mut errors = ValidationErrors::new();
    if form.title.is_some() {
        validation::required_string(&mut errors, "title", form.title.as_deref(), 2, 255);
    }
    if form.artist.is_some() {
        validation::required_string(&mut errors, "artist", form.artist.as_deref(), 2, 255);
    }
    validation::optional_string(&mut errors, "album", form.album.as_deref(), 255);
    validation::optional_string(&mut errors, "genre", form.genre.as_deref(), 100);
    let duration = validation::parse_int(&mut errors, "duration", form.duration.as_deref());
    validation::optional_int_min(&mut errors, "duration", duration, 1);
    let year = validation::parse_int(&mut errors, "year", form.year.as_deref());
    validation::optional_int_range(&mut errors, "year", year, 1900, current_year());
    validate_cover(&mut errors, form.cover_image.as_ref(), &state.uploads);
    errors.into_result()?;

    let cover_path = match &form.cover_image {
        Some(cover) => {
            // Replacing the cover: drop the old file first, best-effort
            if let Some(old) = &song.cover_image {
                if let Err(e) = state.files.delete(old).await {
                    tracing::warn!("Failed to delete old cover {}: {}", old, e);
                }
            }
            Some(
                state
                    .files
                    .store(COVER_BUCKET, &extension_of(cover, "jpg"), &cover.data)
                    .await?,
            )
        }
        None => None,
    };

    let updated = songs::update(
        &state.pool,
        id,
        &UpdateSong {
            title: form.title,
            artist: form.artist,
            album: form.album,
            genre: form.genre,
            duration,
            year,
            cover_image: cover_path,
        },
    )
    .await?;

    Ok(Json(updated))
}

/// DELETE /api/songs/:id
///
/// Stored files are removed best-effort; a storage failure is logged and
/// never blocks deleting the record.
pub async fn delete_song(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<MessageResponse>> {
    let id = SongId::new(id);
    let song = songs::get_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Song not found".to_string()))?;

    if !can(&user.actor(), Action::Delete, &Resource::from(&song)) {
        return Err(ServerError::Forbidden);
    }

    if let Some(cover) = &song.cover_image {
        if let Err(e) = state.files.delete(cover).await {
            tracing::warn!("Failed to delete cover {}: {}", cover, e);
        }
    }
    if let Err(e) = state.files.delete(&song.audio_file).await {
        tracing::warn!("Failed to delete audio {}: {}", song.audio_file, e);
    }

    songs::delete(&state.pool, id).await?;

    Ok(Json(MessageResponse::new("Song deleted successfully")))
}

// Multipart form handling

struct UploadedFile {
    filename: String,
    content_type: Option<String>,
    data: Vec<u8>,
}

#[derive(Default)]
struct SongForm {
    title: Option<String>,
    artist: Option<String>,
    album: Option<String>,
    genre: Option<String>,
    duration: Option<String>,
    year: Option<String>,
    audio_file: Option<UploadedFile>,
    cover_image: Option<UploadedFile>,
}

async fn parse_song_form(headers: &HeaderMap, body: Bytes) -> Result<SongForm> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ServerError::BadRequest("Missing Content-Type".to_string()))?;

    if !content_type.starts_with("multipart/form-data") {
        return Err(ServerError::BadRequest(
            "Expected multipart/form-data".to_string(),
        ));
    }

    let boundary = content_type
        .split("boundary=")
        .nth(1)
        .ok_or_else(|| ServerError::BadRequest("Missing boundary".to_string()))?;

    // Convert Bytes to a stream for multer
    let stream = futures_util::stream::once(async move { Ok::<_, std::io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut form = SongForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(format!("Failed to parse multipart: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "title" => form.title = Some(text_field(field).await?),
            "artist" => form.artist = Some(text_field(field).await?),
            "album" => form.album = Some(text_field(field).await?),
            "genre" => form.genre = Some(text_field(field).await?),
            "duration" => form.duration = Some(text_field(field).await?),
            "year" => form.year = Some(text_field(field).await?),
            "audio_file" => form.audio_file = Some(file_field(field).await?),
            "cover_image" => form.cover_image = Some(file_field(field).await?),
            _ => {}
        }
    }

    Ok(form)
}

async fn text_field(field: multer::Field<'_>) -> Result<String> {
    field
        .text()
        .await
        .map_err(|e| ServerError::BadRequest(format!("Failed to read field: {}", e)))
}

async fn file_field(field: multer::Field<'_>) -> Result<UploadedFile> {
    let filename = field.file_name().unwrap_or("upload").to_string();
    let content_type = field.content_type().map(|m| m.essence_str().to_string());

    let data = field
        .bytes()
        .await
        .map_err(|e| ServerError::BadRequest(format!("Failed to read file: {}", e)))?
        .to_vec();

    Ok(UploadedFile {
        filename,
        content_type,
        data,
    })
}

fn file_mime(file: &UploadedFile) -> Option<String> {
    file.content_type.clone().or_else(|| {
        mime_guess::from_path(&file.filename)
            .first_raw()
            .map(str::to_string)
    })
}

fn extension_of(file: &UploadedFile, fallback: &str) -> String {
    std::path::Path::new(&file.filename)
        .extension()
        .and_then(|e| e.to_str())
        .map_or_else(|| fallback.to_string(), str::to_string)
}

fn validate_audio(
    errors: &mut ValidationErrors,
    file: Option<&UploadedFile>,
    limits: &UploadSettings,
) {
    let Some(file) = file else {
        errors.add("audio_file", "The audio_file field is required.");
        return;
    };

    let mime = file_mime(file);
    if !mime.as_deref().is_some_and(|m| AUDIO_MIME_TYPES.contains(&m)) {
        errors.add(
            "audio_file",
            "The audio_file must be a file of type: mp3, wav, ogg.",
        );
    }

    if file.data.len() > limits.max_audio_bytes() {
        errors.add(
            "audio_file",
            format!(
                "The audio_file may not be greater than {} kilobytes.",
                limits.max_audio_kb
            ),
        );
    }
}

fn validate_cover(
    errors: &mut ValidationErrors,
    file: Option<&UploadedFile>,
    limits: &UploadSettings,
) {
    let Some(file) = file else {
        return;
    };

    let mime = file_mime(file);
    if !mime.as_deref().is_some_and(|m| IMAGE_MIME_TYPES.contains(&m)) {
        errors.add("cover_image", "The cover_image must be an image.");
    }

    if file.data.len() > limits.max_image_bytes() {
        errors.add(
            "cover_image",
            format!(
                "The cover_image may not be greater than {} kilobytes.",
                limits.max_image_kb
            ),
        );
    }
}

fn current_year() -> i64 {
    i64::from(Utc::now().year())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(filename: &str, content_type: Option<&str>, size: usize) -> UploadedFile {
        UploadedFile {
            filename: filename.to_string(),
            content_type: content_type.map(str::to_string),
            data: vec![0u8; size],
        }
    }

    fn limits() -> UploadSettings {
        UploadSettings {
            max_audio_kb: 10240,
            max_image_kb: 2048,
        }
    }

    #[test]
    fn missing_audio_is_required() {
        let mut errors = ValidationErrors::new();
        validate_audio(&mut errors, None, &limits());
        assert!(errors.has("audio_file"));
    }

    #[test]
    fn audio_mime_whitelist() {
        let mut errors = ValidationErrors::new();
        validate_audio(
            &mut errors,
            Some(&upload("song.mp3", Some("audio/mpeg"), 1024)),
            &limits(),
        );
        assert!(errors.is_empty());

        validate_audio(
            &mut errors,
            Some(&upload("song.flac", Some("audio/flac"), 1024)),
            &limits(),
        );
        assert!(errors.has("audio_file"));
    }

    #[test]
    fn audio_mime_guessed_from_filename() {
        let mut errors = ValidationErrors::new();
        validate_audio(&mut errors, Some(&upload("song.ogg", None, 1024)), &limits());
        assert!(errors.is_empty());
    }

    #[test]
    fn oversized_audio_rejected() {
        let mut errors = ValidationErrors::new();
        validate_audio(
            &mut errors,
            Some(&upload("song.mp3", Some("audio/mpeg"), 10240 * 1024 + 1)),
            &limits(),
        );
        assert!(errors.has("audio_file"));
    }

    #[test]
    fn cover_is_optional_but_checked_when_present() {
        let mut errors = ValidationErrors::new();
        validate_cover(&mut errors, None, &limits());
        assert!(errors.is_empty());

        validate_cover(
            &mut errors,
            Some(&upload("cover.png", Some("image/png"), 1024)),
            &limits(),
        );
        assert!(errors.is_empty());

        validate_cover(
            &mut errors,
            Some(&upload("cover.pdf", Some("application/pdf"), 1024)),
            &limits(),
        );
        assert!(errors.has("cover_image"));
    }

    #[test]
    fn extension_falls_back_when_missing() {
        assert_eq!(extension_of(&upload("song.mp3", None, 0), "mp3"), "mp3");
        assert_eq!(extension_of(&upload("song", None, 0), "mp3"), "mp3");
        assert_eq!(extension_of(&upload("cover.PNG", None, 0), "jpg"), "PNG");
    }
}
