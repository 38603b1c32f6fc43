//! # Core Types
//!
//! Plain data structures shared by every crate in the workspace: the five
//! catalog records, the document stored in `venues.description`, and the
//! factories that fill them with sample values.

pub mod enums;
pub mod error;
pub mod factories;
pub mod models;

// Re-export the core types to provide a clean public API.
pub use enums::EntityKind;
pub use error::CoreError;
pub use factories::SampleSequence;
pub use models::{Album, Concert, Singer, Track, TrackKey, Venue, VenueDescription};
