//! # Music Sample Database Crate
//!
//! This crate acts as the application-specific interface to the
//! PostgreSQL-compatible database holding the music catalog.
//!
//! ## Architectural Principles
//!
//! - **Adapter:** All SQL lives here. The scenarios speak in terms of
//!   `Singer`, `Album`, `Track`, `Venue` and `Concert`, never rows.
//! - **Executor-generic:** Every row operation accepts any `PgExecutor`, so
//!   the same call runs on the pool or inside an open transaction.
//! - **Interleaved tracks:** Tracks are insert-only on their key columns;
//!   later changes go through `update_tracks` with a `TrackUpdate`, which
//!   cannot name a key column.
//!
//! ## Public API
//!
//! - `connect` / `create_tables`: pool creation and schema provisioning.
//! - `DbRepository`: the pool holder, plus whole-catalog operations such as
//!   `delete_all_data`.
//! - `repository::*`: per-table save/fetch functions.
//! - `SingerAlbums`: a singer's album collection (create, add, list).
//! - `VenueFilter`: cast-then-compare predicates on the venue JSON document.
//! - `DbError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod filters;
pub mod relations;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, create_tables};
pub use error::DbError;
pub use filters::{TrackUpdate, VenueFilter};
pub use relations::SingerAlbums;
pub use repository::DbRepository;
