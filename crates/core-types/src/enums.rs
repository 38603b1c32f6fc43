use serde::{Deserialize, Serialize};
use std::fmt;

/// The five record types of the music catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Singer,
    Album,
    Track,
    Venue,
    Concert,
}

impl EntityKind {
    /// Children before parents, so foreign keys never dangle mid-delete.
    pub const DELETION_ORDER: [EntityKind; 5] = [
        EntityKind::Track,
        EntityKind::Album,
        EntityKind::Concert,
        EntityKind::Venue,
        EntityKind::Singer,
    ];

    /// Returns the table backing this record type.
    pub fn table_name(&self) -> &'static str {
        match self {
            EntityKind::Singer => "singers",
            EntityKind::Album => "albums",
            EntityKind::Track => "tracks",
            EntityKind::Venue => "venues",
            EntityKind::Concert => "concerts",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Singer => "Singer",
            EntityKind::Album => "Album",
            EntityKind::Track => "Track",
            EntityKind::Venue => "Venue",
            EntityKind::Concert => "Concert",
        };
        f.write_str(name)
    }
}
