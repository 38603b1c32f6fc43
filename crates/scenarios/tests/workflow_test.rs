//! Runs the sample workflow against a live database.
//!
//! These tests need `DATABASE_URL` and are ignored by default; run them with
//! `cargo test -- --ignored`. The schema defaults to the stock-PostgreSQL DDL
//! and can be pointed elsewhere with `MUSIC_SAMPLE_TEST_DDL`. They share
//! tables and ids, so each one holds `DB_LOCK` for its whole run.

use configuration::DatabaseSettings;
use core_types::factories::{sample_album, sample_singer, sample_venue};
use core_types::{EntityKind, SampleSequence, TrackKey, VenueDescription};
use database::VenueFilter;
use database::repository::{
    count_singers_with_id, first_venue_matching, get_album, get_singer, get_track, save_album,
    save_singer, save_venue, venue_ids_matching,
};
use database::{DbRepository, connect, create_tables};
use scenarios::{Scenario, ScenarioContext};
use sqlx::types::Json;
use std::path::PathBuf;
use tokio::sync::Mutex;

static DB_LOCK: Mutex<()> = Mutex::const_new(());

fn test_ddl_path() -> PathBuf {
    std::env::var("MUSIC_SAMPLE_TEST_DDL")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../create_data_model.postgres.sql")
        })
}

/// Connects, creates the tables and empties them.
async fn empty_repository() -> DbRepository {
    dotenvy::dotenv().ok();
    let pool = connect(&DatabaseSettings::default()).await.expect("connect");
    create_tables(&pool, &test_ddl_path()).await.expect("create tables");

    let repo = DbRepository::new(pool);
    repo.delete_all_data().await.expect("clean start");
    repo
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn sample_workflow_round_trips_every_entity() {
    let _guard = DB_LOCK.lock().await;
    let repo = empty_repository().await;
    let mut ctx = ScenarioContext::new(repo.clone());

    for scenario in Scenario::ALL {
        if scenario == Scenario::DeleteAllData {
            // Verify the rows written so far are really there before cleanup.
            assert_eq!(repo.count_rows(EntityKind::Singer).await.unwrap(), 3);
            assert_eq!(repo.count_rows(EntityKind::Album).await.unwrap(), 3);
            assert_eq!(repo.count_rows(EntityKind::Track).await.unwrap(), 3);
            assert_eq!(repo.count_rows(EntityKind::Venue).await.unwrap(), 6);
            assert_eq!(repo.count_rows(EntityKind::Concert).await.unwrap(), 3);
        }
        if let Err(e) = scenario.run(&mut ctx).await {
            repo.delete_all_data().await.ok();
            panic!("scenario {scenario} failed: {e:?}");
        }
    }

    for kind in EntityKind::DELETION_ORDER {
        assert_eq!(repo.count_rows(kind).await.unwrap(), 0, "{kind} rows remain");
    }

    // A singer saved outside any transaction is visible by id and removed by cleanup.
    let singer = sample_singer(&mut ctx.sequence, "1");
    save_singer(repo.pool(), &singer).await.unwrap();
    let fetched = get_singer(repo.pool(), "1").await.unwrap();
    assert_eq!(fetched.first_name, singer.first_name);
    assert_eq!(fetched.last_name, singer.last_name);

    repo.delete_all_data().await.unwrap();
    assert_eq!(count_singers_with_id(repo.pool(), "1").await.unwrap(), 0);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn rows_with_null_audit_columns_load_and_can_be_saved_over() {
    let _guard = DB_LOCK.lock().await;
    let repo = empty_repository().await;
    let pool = repo.pool();

    sqlx::query("INSERT INTO singers (id, last_name, full_name) VALUES ('1', 'legacy', 'legacy singer')")
        .execute(pool)
        .await
        .unwrap();
    sqlx::query("INSERT INTO albums (id, title, singer_id) VALUES ('1', 'legacy album', '1')")
        .execute(pool)
        .await
        .unwrap();
    sqlx::query(
        "INSERT INTO tracks (id, track_number, track_id, title, sample_rate) \
         VALUES ('1', 2, '1', 'legacy track', 1.0)",
    )
    .execute(pool)
    .await
    .unwrap();

    let legacy = get_singer(pool, "1").await.unwrap();
    assert_eq!(legacy.active, None);
    assert_eq!(legacy.created_at, None);
    let track = get_track(pool, &TrackKey { album_id: "1".to_string(), track_number: 2 })
        .await
        .unwrap();
    assert_eq!(track.title, "legacy track");
    assert_eq!(track.updated_at, None);

    let mut seq = SampleSequence::new();
    let singer = sample_singer(&mut seq, "1");
    save_singer(pool, &singer).await.unwrap();
    let stored = get_singer(pool, "1").await.unwrap();
    assert_eq!(stored.full_name, singer.full_name);
    assert_eq!(stored.active, Some(true));
    assert!(stored.created_at.is_some());
    assert!(stored.updated_at.is_some());

    let album = sample_album(&mut seq, "1", Some("1"));
    save_album(pool, &album).await.unwrap();
    let stored = get_album(pool, "1").await.unwrap();
    assert_eq!(stored.title, album.title);
    assert!(stored.created_at.is_some());

    repo.delete_all_data().await.unwrap();
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn capacity_filter_returns_every_venue_sharing_the_value() {
    let _guard = DB_LOCK.lock().await;
    let repo = empty_repository().await;
    let pool = repo.pool();

    let mut seq = SampleSequence::new();
    for id in ["10", "100"] {
        let mut venue = sample_venue(&mut seq, id).unwrap();
        venue.description = Some(Json(VenueDescription {
            address: format!("address{id}"),
            capacity: 300,
            is_popular: false,
        }));
        save_venue(pool, &venue).await.unwrap();
    }

    let filter = VenueFilter::Capacity(300);
    let ids = venue_ids_matching(pool, &filter).await.unwrap();
    assert_eq!(ids, vec!["10".to_string(), "100".to_string()]);
    // Ids are strings, so the first match is "10" rather than "100".
    let first = first_venue_matching(pool, &filter).await.unwrap().unwrap();
    assert_eq!(first.id, "10");

    repo.delete_all_data().await.unwrap();
}
