//! Row-level access to the five catalog tables.
//!
//! Every function is generic over the executor so the same statement runs on
//! the pool (`repo.pool()`) or inside an open transaction (`&mut *tx`).

use crate::DbError;
use crate::filters::{VenueFilter, track_update_query, TrackUpdate};
use core_types::{Album, Concert, EntityKind, Singer, Track, TrackKey, Venue};
use sqlx::postgres::{PgPool, Postgres};
use sqlx::{PgExecutor, QueryBuilder, Transaction};

const SINGER_COLUMNS: &str = "id, first_name, last_name, full_name, active, created_at, updated_at";
const ALBUM_COLUMNS: &str =
    "id, singer_id, title, marketing_budget, release_date, cover_picture, created_at, updated_at";
const TRACK_COLUMNS: &str = "track_id, id, track_number, title, sample_rate, created_at, updated_at";
const VENUE_COLUMNS: &str = "id, name, description, created_at, updated_at";
const CONCERT_COLUMNS: &str =
    "id, venue_id, singer_id, name, start_time, end_time, created_at, updated_at";

/// Holds the shared pool and the operations that span several tables.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Opens a plain transaction (no savepoints). Dropping it uncommitted rolls back.
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, DbError> {
        Ok(self.pool.begin().await?)
    }

    /// Deletes every row of every catalog table in a single transaction.
    pub async fn delete_all_data(&self) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        for kind in EntityKind::DELETION_ORDER {
            // Some engines refuse DML without a WHERE clause.
            let statement = format!("DELETE FROM {} WHERE true", kind.table_name());
            let result = sqlx::query(&statement).execute(&mut *tx).await?;
            tracing::debug!(table = kind.table_name(), rows = result.rows_affected(), "Deleted rows.");
        }

        tx.commit().await?;
        Ok(())
    }

    /// Counts the rows currently stored for `kind`.
    pub async fn count_rows(&self, kind: EntityKind) -> Result<i64, DbError> {
        let statement = format!("SELECT COUNT(*) FROM {}", kind.table_name());
        let count = sqlx::query_scalar::<_, i64>(&statement)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

fn not_found(error: sqlx::Error, what: impl FnOnce() -> String) -> DbError {
    match error {
        sqlx::Error::RowNotFound => DbError::NotFound(what()),
        other => other.into(),
    }
}

// ==============================================================================
// Singers
// ==============================================================================

/// Inserts the singer, or overwrites every non-key column if the id exists.
/// A stored `created_at` is kept; a NULL one is filled in.
pub async fn save_singer<'e, E>(executor: E, singer: &Singer) -> Result<(), DbError>
where
    E: PgExecutor<'e>,
{
    sqlx::query(
        r#"
        INSERT INTO singers (id, first_name, last_name, full_name, active, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (id) DO UPDATE SET
            first_name = EXCLUDED.first_name,
            last_name = EXCLUDED.last_name,
            full_name = EXCLUDED.full_name,
            active = EXCLUDED.active,
            created_at = COALESCE(singers.created_at, EXCLUDED.created_at),
            updated_at = EXCLUDED.updated_at
        "#,
    )
    .bind(&singer.id)
    .bind(&singer.first_name)
    .bind(&singer.last_name)
    .bind(&singer.full_name)
    .bind(singer.active)
    .bind(singer.created_at)
    .bind(singer.updated_at)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn get_singer<'e, E>(executor: E, id: &str) -> Result<Singer, DbError>
where
    E: PgExecutor<'e>,
{
    let statement = format!("SELECT {SINGER_COLUMNS} FROM singers WHERE id = $1");
    sqlx::query_as::<_, Singer>(&statement)
        .bind(id)
        .fetch_one(executor)
        .await
        .map_err(|e| not_found(e, || format!("singer with id '{id}'")))
}

pub async fn find_singer_by_full_name<'e, E>(executor: E, full_name: &str) -> Result<Singer, DbError>
where
    E: PgExecutor<'e>,
{
    let statement = format!("SELECT {SINGER_COLUMNS} FROM singers WHERE full_name = $1");
    sqlx::query_as::<_, Singer>(&statement)
        .bind(full_name)
        .fetch_one(executor)
        .await
        .map_err(|e| not_found(e, || format!("singer named '{full_name}'")))
}

pub async fn count_singers_with_id<'e, E>(executor: E, id: &str) -> Result<i64, DbError>
where
    E: PgExecutor<'e>,
{
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM singers WHERE id = $1")
        .bind(id)
        .fetch_one(executor)
        .await?;
    Ok(count)
}

// ==============================================================================
// Albums
// ==============================================================================

/// Inserts the album, or overwrites every non-key column if the id exists.
/// A stored `created_at` is kept; a NULL one is filled in.
pub async fn save_album<'e, E>(executor: E, album: &Album) -> Result<(), DbError>
where
    E: PgExecutor<'e>,
{
    sqlx::query(
        r#"
        INSERT INTO albums (id, singer_id, title, marketing_budget, release_date, cover_picture, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (id) DO UPDATE SET
            singer_id = EXCLUDED.singer_id,
            title = EXCLUDED.title,
            marketing_budget = EXCLUDED.marketing_budget,
            release_date = EXCLUDED.release_date,
            cover_picture = EXCLUDED.cover_picture,
            created_at = COALESCE(albums.created_at, EXCLUDED.created_at),
            updated_at = EXCLUDED.updated_at
        "#,
    )
    .bind(&album.id)
    .bind(&album.singer_id)
    .bind(&album.title)
    .bind(album.marketing_budget)
    .bind(album.release_date)
    .bind(&album.cover_picture)
    .bind(album.created_at)
    .bind(album.updated_at)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn get_album<'e, E>(executor: E, id: &str) -> Result<Album, DbError>
where
    E: PgExecutor<'e>,
{
    let statement = format!("SELECT {ALBUM_COLUMNS} FROM albums WHERE id = $1");
    sqlx::query_as::<_, Album>(&statement)
        .bind(id)
        .fetch_one(executor)
        .await
        .map_err(|e| not_found(e, || format!("album with id '{id}'")))
}

pub async fn find_album_by_title<'e, E>(executor: E, title: &str) -> Result<Album, DbError>
where
    E: PgExecutor<'e>,
{
    let statement = format!("SELECT {ALBUM_COLUMNS} FROM albums WHERE title = $1");
    sqlx::query_as::<_, Album>(&statement)
        .bind(title)
        .fetch_one(executor)
        .await
        .map_err(|e| not_found(e, || format!("album titled '{title}'")))
}

pub async fn album_exists<'e, E>(executor: E, id: &str) -> Result<bool, DbError>
where
    E: PgExecutor<'e>,
{
    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM albums WHERE id = $1)")
        .bind(id)
        .fetch_one(executor)
        .await?;
    Ok(exists)
}

/// All albums owned by `singer_id`, ordered by id.
pub async fn albums_for_singer<'e, E>(executor: E, singer_id: &str) -> Result<Vec<Album>, DbError>
where
    E: PgExecutor<'e>,
{
    let statement = format!("SELECT {ALBUM_COLUMNS} FROM albums WHERE singer_id = $1 ORDER BY id");
    let albums = sqlx::query_as::<_, Album>(&statement)
        .bind(singer_id)
        .fetch_all(executor)
        .await?;
    Ok(albums)
}

/// Points an existing album at another singer. Returns the rows changed.
pub async fn set_album_singer<'e, E>(executor: E, album_id: &str, singer_id: &str) -> Result<u64, DbError>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query("UPDATE albums SET singer_id = $1, updated_at = NOW() WHERE id = $2")
        .bind(singer_id)
        .bind(album_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

// ==============================================================================
// Tracks
// ==============================================================================

/// Inserts a track. There is no upsert: key columns of an interleaved row
/// are never rewritten, so an existing key is reported as a database error.
pub async fn insert_track<'e, E>(executor: E, track: &Track) -> Result<(), DbError>
where
    E: PgExecutor<'e>,
{
    sqlx::query(
        r#"
        INSERT INTO tracks (id, track_number, track_id, title, sample_rate, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(&track.album_id)
    .bind(track.track_number)
    .bind(&track.track_id)
    .bind(&track.title)
    .bind(track.sample_rate)
    .bind(track.created_at)
    .bind(track.updated_at)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn get_track<'e, E>(executor: E, key: &TrackKey) -> Result<Track, DbError>
where
    E: PgExecutor<'e>,
{
    let statement = format!("SELECT {TRACK_COLUMNS} FROM tracks WHERE track_number = $1 AND id = $2");
    sqlx::query_as::<_, Track>(&statement)
        .bind(key.track_number)
        .bind(&key.album_id)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            not_found(e, || {
                format!("track {} of album '{}'", key.track_number, key.album_id)
            })
        })
}

pub async fn find_track_by_title<'e, E>(executor: E, title: &str) -> Result<Track, DbError>
where
    E: PgExecutor<'e>,
{
    let statement = format!("SELECT {TRACK_COLUMNS} FROM tracks WHERE title = $1");
    sqlx::query_as::<_, Track>(&statement)
        .bind(title)
        .fetch_one(executor)
        .await
        .map_err(|e| not_found(e, || format!("track titled '{title}'")))
}

/// Filtered bulk update of non-key track columns. Returns the rows changed.
pub async fn update_tracks<'e, E>(executor: E, key: &TrackKey, update: &TrackUpdate) -> Result<u64, DbError>
where
    E: PgExecutor<'e>,
{
    let Some(mut builder) = track_update_query(key, update) else {
        return Ok(0);
    };
    let result = builder.build().execute(executor).await?;
    Ok(result.rows_affected())
}

// ==============================================================================
// Venues
// ==============================================================================

/// Inserts the venue, or overwrites every non-key column if the id exists.
/// A stored `created_at` is kept; a NULL one is filled in.
pub async fn save_venue<'e, E>(executor: E, venue: &Venue) -> Result<(), DbError>
where
    E: PgExecutor<'e>,
{
    sqlx::query(
        r#"
        INSERT INTO venues (id, name, description, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (id) DO UPDATE SET
            name = EXCLUDED.name,
            description = EXCLUDED.description,
            created_at = COALESCE(venues.created_at, EXCLUDED.created_at),
            updated_at = EXCLUDED.updated_at
        "#,
    )
    .bind(&venue.id)
    .bind(&venue.name)
    .bind(&venue.description)
    .bind(venue.created_at)
    .bind(venue.updated_at)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn get_venue<'e, E>(executor: E, id: &str) -> Result<Venue, DbError>
where
    E: PgExecutor<'e>,
{
    let statement = format!("SELECT {VENUE_COLUMNS} FROM venues WHERE id = $1");
    sqlx::query_as::<_, Venue>(&statement)
        .bind(id)
        .fetch_one(executor)
        .await
        .map_err(|e| not_found(e, || format!("venue with id '{id}'")))
}

pub async fn find_venue_by_name<'e, E>(executor: E, name: &str) -> Result<Venue, DbError>
where
    E: PgExecutor<'e>,
{
    let statement = format!("SELECT {VENUE_COLUMNS} FROM venues WHERE name = $1");
    sqlx::query_as::<_, Venue>(&statement)
        .bind(name)
        .fetch_one(executor)
        .await
        .map_err(|e| not_found(e, || format!("venue named '{name}'")))
}

/// The lowest-id venue whose description matches `filter`, if any.
pub async fn first_venue_matching<'e, E>(executor: E, filter: &VenueFilter) -> Result<Option<Venue>, DbError>
where
    E: PgExecutor<'e>,
{
    let mut builder = QueryBuilder::<Postgres>::new(format!("SELECT {VENUE_COLUMNS} FROM venues WHERE "));
    filter.push_predicate(&mut builder);
    builder.push(" ORDER BY id LIMIT 1");

    let venue = builder
        .build_query_as::<Venue>()
        .fetch_optional(executor)
        .await?;
    Ok(venue)
}

/// Ids of every venue whose description matches `filter`.
pub async fn venue_ids_matching<'e, E>(executor: E, filter: &VenueFilter) -> Result<Vec<String>, DbError>
where
    E: PgExecutor<'e>,
{
    let mut builder = QueryBuilder::<Postgres>::new("SELECT id FROM venues WHERE ");
    filter.push_predicate(&mut builder);
    builder.push(" ORDER BY id");

    let ids = builder
        .build_query_scalar::<String>()
        .fetch_all(executor)
        .await?;
    Ok(ids)
}

// ==============================================================================
// Concerts
// ==============================================================================

/// Inserts the concert, or overwrites every non-key column if the id exists.
/// A stored `created_at` is kept; a NULL one is filled in.
pub async fn save_concert<'e, E>(executor: E, concert: &Concert) -> Result<(), DbError>
where
    E: PgExecutor<'e>,
{
    sqlx::query(
        r#"
        INSERT INTO concerts (id, venue_id, singer_id, name, start_time, end_time, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (id) DO UPDATE SET
            venue_id = EXCLUDED.venue_id,
            singer_id = EXCLUDED.singer_id,
            name = EXCLUDED.name,
            start_time = EXCLUDED.start_time,
            end_time = EXCLUDED.end_time,
            created_at = COALESCE(concerts.created_at, EXCLUDED.created_at),
            updated_at = EXCLUDED.updated_at
        "#,
    )
    .bind(&concert.id)
    .bind(&concert.venue_id)
    .bind(&concert.singer_id)
    .bind(&concert.name)
    .bind(concert.start_time)
    .bind(concert.end_time)
    .bind(concert.created_at)
    .bind(concert.updated_at)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn get_concert<'e, E>(executor: E, id: &str) -> Result<Concert, DbError>
where
    E: PgExecutor<'e>,
{
    let statement = format!("SELECT {CONCERT_COLUMNS} FROM concerts WHERE id = $1");
    sqlx::query_as::<_, Concert>(&statement)
        .bind(id)
        .fetch_one(executor)
        .await
        .map_err(|e| not_found(e, || format!("concert with id '{id}'")))
}

pub async fn find_concert_by_name<'e, E>(executor: E, name: &str) -> Result<Concert, DbError>
where
    E: PgExecutor<'e>,
{
    let statement = format!("SELECT {CONCERT_COLUMNS} FROM concerts WHERE name = $1");
    sqlx::query_as::<_, Concert>(&statement)
        .bind(name)
        .fetch_one(executor)
        .await
        .map_err(|e| not_found(e, || format!("concert named '{name}'")))
}
