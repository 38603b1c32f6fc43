use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;

/// A row of the `singers` table.
///
/// The audit timestamps and `active` are nullable columns, so rows written by
/// other clients may leave them unset.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Singer {
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: String,
    pub full_name: String,
    pub active: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A row of the `albums` table. `singer_id` may be reassigned to another singer.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub singer_id: Option<String>,
    pub title: String,
    pub marketing_budget: Option<Decimal>,
    pub release_date: Option<NaiveDate>,
    pub cover_picture: Option<Vec<u8>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A row of the `tracks` table, interleaved in `albums`.
///
/// The primary key is `(id, track_number)` where `id` is the parent album id;
/// interleaved children must repeat the parent key column name. Key columns
/// are written once on insert and never updated afterwards.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Track {
    pub track_id: String,
    #[sqlx(rename = "id")]
    pub album_id: String,
    pub track_number: i64,
    pub title: String,
    pub sample_rate: f64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Track {
    pub fn key(&self) -> TrackKey {
        TrackKey {
            album_id: self.album_id.clone(),
            track_number: self.track_number,
        }
    }
}

/// The primary key of a track row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackKey {
    pub album_id: String,
    pub track_number: i64,
}

/// The semi-structured document stored in `venues.description` (JSONB).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueDescription {
    pub address: String,
    pub capacity: i64,
    #[serde(rename = "isPopular")]
    pub is_popular: bool,
}

/// A row of the `venues` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Venue {
    pub id: String,
    pub name: String,
    pub description: Option<Json<VenueDescription>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Venue {
    pub fn description(&self) -> Option<&VenueDescription> {
        self.description.as_ref().map(|json| &json.0)
    }
}

/// A row of the `concerts` table. The schema requires `end_time > start_time`.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Concert {
    pub id: String,
    pub venue_id: String,
    pub singer_id: String,
    pub name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn venue_description_uses_document_key_names() {
        let description = VenueDescription {
            address: "address7".to_string(),
            capacity: 1234,
            is_popular: true,
        };
        let value = serde_json::to_value(&description).unwrap();
        assert_eq!(
            value,
            json!({ "address": "address7", "capacity": 1234, "isPopular": true })
        );

        let parsed: VenueDescription =
            serde_json::from_value(json!({ "address": "a", "capacity": 5, "isPopular": false }))
                .unwrap();
        assert!(!parsed.is_popular);
    }

    #[test]
    fn track_key_is_album_and_number() {
        let now = Utc::now();
        let track = Track {
            track_id: "1".to_string(),
            album_id: "9".to_string(),
            track_number: 2,
            title: "track1".to_string(),
            sample_rate: 124.543,
            created_at: Some(now),
            updated_at: Some(now),
        };
        assert_eq!(
            track.key(),
            TrackKey { album_id: "9".to_string(), track_number: 2 }
        );
    }
}
