//! Shared application state
use crate::config::UploadSettings;
use crate::services::{AuthService, FileStorage};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub auth: Arc<AuthService>,
    pub files: Arc<FileStorage>,
    pub uploads: UploadSettings,
}

impl AppState {
    pub fn new(
        pool: SqlitePool,
        auth: Arc<AuthService>,
        files: Arc<FileStorage>,
        uploads: UploadSettings,
    ) -> Self {
        Self {
            pool,
            auth,
            files,
            uploads,
        }
    }
}
