//! Route table
use crate::{api, state::AppState};
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Build the application router.
///
/// Authentication is enforced per handler through the extractors in
/// [`crate::middleware`]; uploaded media is served read-only under
/// `/storage`.
pub fn create_router(app_state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(api::health::health))
        // Identity
        .route("/register", post(api::auth::register))
        .route("/login", post(api::auth::login))
        .route("/logout", post(api::auth::logout))
        .route("/user", get(api::auth::current_user))
        // Catalog
        .route(
            "/songs",
            get(api::songs::list_songs).post(api::songs::create_song),
        )
        .route(
            "/songs/:id",
            get(api::songs::get_song)
                .put(api::songs::update_song)
                .delete(api::songs::delete_song),
        )
        // Playlists
        .route(
            "/playlists",
            get(api::playlists::list_playlists).post(api::playlists::create_playlist),
        )
        .route(
            "/playlists/:id",
            get(api::playlists::get_playlist)
                .put(api::playlists::update_playlist)
                .delete(api::playlists::delete_playlist),
        )
        .route("/playlists/:id/songs", post(api::playlists::add_song))
        .route(
            "/playlists/:id/songs/:song_id",
            delete(api::playlists::remove_song),
        );

    let media_dir = app_state.files.base_path().to_path_buf();

    Router::new()
        .nest("/api", api_routes)
        .nest_service("/storage", ServeDir::new(media_dir))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
