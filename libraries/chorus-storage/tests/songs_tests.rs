//! Integration tests for the catalog vertical slice
//!
//! Covers filter/search semantics, deterministic ordering, pagination,
//! and partial updates.


use chorus_core::types::{SongId, UpdateSong};
use chorus_storage::songs::{self, SongFilter, SortField, SortOrder};
use test_helpers::*;

#[tokio::test]
async fn test_create_and_get_song_with_uploader() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let user_id = create_test_user(pool, "Frank", "frank@example.com").await;
    let song_id = create_test_song(pool, "My Way", "Frank Sinatra", None, None, user_id).await;

    let song = songs::get_by_id(pool, song_id).await.unwrap().unwrap();

    assert_eq!(song.title, "My Way");
    assert_eq!(song.artist, "Frank Sinatra");
    assert_eq!(song.uploaded_by, user_id);
    assert_eq!(song.duration, 180);

    let uploader = song.uploader.expect("uploader should be joined in");
    assert_eq!(uploader.id, user_id);
    assert_eq!(uploader.name, "Frank");
    assert_eq!(uploader.email, "frank@example.com");
}

#[tokio::test]
async fn test_get_unknown_song_returns_none() {
    let test_db = TestDb::new().await;

    let result = songs::get_by_id(test_db.pool(), SongId::new(4242))
        .await
        .unwrap();

    assert!(result.is_none());
    assert!(!songs::exists(test_db.pool(), SongId::new(4242)).await.unwrap());
}

#[tokio::test]
async fn test_search_matches_title_artist_and_album() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let user_id = create_test_user(pool, "Frank", "frank@example.com").await;

    create_test_song(pool, "My Way", "Frank Sinatra", None, None, user_id).await;
    create_test_song(pool, "Sinatra Medley", "Various", None, None, user_id).await;
    create_test_song(
        pool,
        "Come Fly",
        "Big Band",
        Some("Sinatra Covers"),
        None,
        user_id,
    )
    .await;
    create_test_song(pool, "Unrelated", "Nobody", None, None, user_id).await;

    let filter = SongFilter {
        search: Some("sinatra".to_string()),
        ..Default::default()
    };

    let (matched, total) = songs::list(pool, &filter).await.unwrap();

    assert_eq!(total, 3);
    assert!(matched.iter().all(|s| {
        s.title.to_lowercase().contains("sinatra")
            || s.artist.to_lowercase().contains("sinatra")
            || s.album
                .as_deref()
                .is_some_and(|a| a.to_lowercase().contains("sinatra"))
    }));
}

#[tokio::test]
async fn test_genre_filter_is_exact() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let user_id = create_test_user(pool, "Frank", "frank@example.com").await;
    create_test_song(pool, "Song A", "Artist", None, Some("jazz"), user_id).await;
    create_test_song(pool, "Song B", "Artist", None, Some("jazz-fusion"), user_id).await;

    let filter = SongFilter {
        genre: Some("jazz".to_string()),
        ..Default::default()
    };

    let (matched, total) = songs::list(pool, &filter).await.unwrap();

    assert_eq!(total, 1);
    assert_eq!(matched[0].title, "Song A");
}

#[tokio::test]
async fn test_artist_filter_is_substring() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let user_id = create_test_user(pool, "Frank", "frank@example.com").await;
    create_test_song(pool, "Song A", "Frank Sinatra", None, None, user_id).await;
    create_test_song(pool, "Song B", "Aretha Franklin", None, None, user_id).await;
    create_test_song(pool, "Song C", "Miles Davis", None, None, user_id).await;

    let filter = SongFilter {
        artist: Some("Frank".to_string()),
        ..Default::default()
    };

    let (matched, total) = songs::list(pool, &filter).await.unwrap();

    assert_eq!(total, 2);
    assert!(matched.iter().all(|s| s.artist.contains("Frank")));
}

#[tokio::test]
async fn test_list_order_is_deterministic() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let user_id = create_test_user(pool, "Frank", "frank@example.com").await;

    // Same created_at second for all three is likely; the id tie-break keeps
    // the order stable anyway.
    for i in 0..3 {
        create_test_song(pool, &format!("Song {}", i), "Artist", None, None, user_id).await;
    }

    let filter = SongFilter::default();
    let (first, _) = songs::list(pool, &filter).await.unwrap();
    let (second, _) = songs::list(pool, &filter).await.unwrap();

    let ids = |songs: &[chorus_core::types::Song]| songs.iter().map(|s| s.id).collect::<Vec<_>>();
    assert_eq!(ids(&first), ids(&second));
    assert_eq!(first.len(), 3);
}

#[tokio::test]
async fn test_sort_by_title_ascending() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let user_id = create_test_user(pool, "Frank", "frank@example.com").await;
    create_test_song(pool, "Charlie", "Artist", None, None, user_id).await;
    create_test_song(pool, "Alpha", "Artist", None, None, user_id).await;
    create_test_song(pool, "Bravo", "Artist", None, None, user_id).await;

    let filter = SongFilter {
        sort_by: SortField::Title,
        sort_order: SortOrder::Asc,
        ..Default::default()
    };

    let (sorted, _) = songs::list(pool, &filter).await.unwrap();
    let titles: Vec<&str> = sorted.iter().map(|s| s.title.as_str()).collect();

    assert_eq!(titles, vec!["Alpha", "Bravo", "Charlie"]);
}

#[tokio::test]
async fn test_pagination_windows_and_total() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let user_id = create_test_user(pool, "Frank", "frank@example.com").await;
    for i in 0..5 {
        create_test_song(pool, &format!("Song {}", i), "Artist", None, None, user_id).await;
    }

    let page1 = SongFilter {
        sort_by: SortField::Title,
        sort_order: SortOrder::Asc,
        page: 1,
        per_page: 2,
        ..Default::default()
    };
    let page3 = SongFilter {
        page: 3,
        ..page1.clone()
    };

    let (first, total) = songs::list(pool, &page1).await.unwrap();
    assert_eq!(total, 5);
    assert_eq!(first.len(), 2);

    let (last, total) = songs::list(pool, &page3).await.unwrap();
    assert_eq!(total, 5);
    assert_eq!(last.len(), 1);
    assert_eq!(last[0].title, "Song 4");
}

#[tokio::test]
async fn test_partial_update_leaves_other_fields() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let user_id = create_test_user(pool, "Frank", "frank@example.com").await;
    let song_id = create_test_song(
        pool,
        "Original Title",
        "Original Artist",
        Some("Album"),
        Some("jazz"),
        user_id,
    )
    .await;

    let updated = songs::update(
        pool,
        song_id,
        &UpdateSong {
            title: Some("New Title".to_string()),
            year: Some(1969),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.title, "New Title");
    assert_eq!(updated.year, Some(1969));
    assert_eq!(updated.artist, "Original Artist");
    assert_eq!(updated.album.as_deref(), Some("Album"));
    assert_eq!(updated.genre.as_deref(), Some("jazz"));
}

#[tokio::test]
async fn test_delete_song() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let user_id = create_test_user(pool, "Frank", "frank@example.com").await;
    let song_id = create_test_song(pool, "Doomed", "Artist", None, None, user_id).await;

    songs::delete(pool, song_id).await.unwrap();

    assert!(songs::get_by_id(pool, song_id).await.unwrap().is_none());
}
