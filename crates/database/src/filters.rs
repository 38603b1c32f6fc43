use core_types::TrackKey;
use sqlx::{Postgres, QueryBuilder};

/// A predicate on one sub-field of `venues.description`.
///
/// The document column is opaque to the relational schema, so every filter
/// casts the extracted JSON value to a SQL type before comparing.
#[derive(Debug, Clone, PartialEq)]
pub enum VenueFilter {
    /// Matches `description.address`. The column is cast to text, which keeps
    /// the JSON quoting, so the bound value is the quoted JSON string.
    Address(String),
    Capacity(i64),
    IsPopular(bool),
}

impl VenueFilter {
    /// Appends the cast-and-compare predicate with its bound value.
    pub fn push_predicate(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        match self {
            VenueFilter::Address(address) => {
                builder
                    .push("(description -> 'address')::varchar = ")
                    .push_bind(json_string(address));
            }
            VenueFilter::Capacity(capacity) => {
                builder
                    .push("(description -> 'capacity')::bigint = ")
                    .push_bind(*capacity);
            }
            VenueFilter::IsPopular(is_popular) => {
                builder
                    .push("(description -> 'isPopular')::boolean = ")
                    .push_bind(*is_popular);
            }
        }
    }
}

/// Renders `value` as JSON text, e.g. `address3` becomes `"address3"`.
pub fn json_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

/// The only columns of a track that may change after insert.
///
/// Key columns (`id`, `track_number`) are deliberately absent: the storage
/// engine rejects writes to primary-key columns of an interleaved table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackUpdate {
    pub title: Option<String>,
    pub sample_rate: Option<f64>,
}

impl TrackUpdate {
    pub fn sample_rate(sample_rate: f64) -> Self {
        Self {
            sample_rate: Some(sample_rate),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.sample_rate.is_none()
    }
}

/// Builds `UPDATE tracks SET ... WHERE track_number = $n AND id = $m`.
///
/// Returns `None` when the update carries no columns.
pub fn track_update_query(key: &TrackKey, update: &TrackUpdate) -> Option<QueryBuilder<'static, Postgres>> {
    if update.is_empty() {
        return None;
    }

    let mut builder = QueryBuilder::new("UPDATE tracks SET ");
    let mut columns = builder.separated(", ");
    if let Some(title) = &update.title {
        columns.push("title = ").push_bind_unseparated(title.clone());
    }
    if let Some(sample_rate) = update.sample_rate {
        columns.push("sample_rate = ").push_bind_unseparated(sample_rate);
    }
    columns.push("updated_at = NOW()");

    builder
        .push(" WHERE track_number = ")
        .push_bind(key.track_number)
        .push(" AND id = ")
        .push_bind(key.album_id.clone());
    Some(builder)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn venue_sql(filter: &VenueFilter) -> String {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT id FROM venues WHERE ");
        filter.push_predicate(&mut builder);
        builder.sql().to_string()
    }

    #[test]
    fn address_filter_casts_to_text() {
        assert_eq!(
            venue_sql(&VenueFilter::Address("address3".to_string())),
            "SELECT id FROM venues WHERE (description -> 'address')::varchar = $1"
        );
    }

    #[test]
    fn capacity_and_popularity_filters_cast_to_their_types() {
        assert!(venue_sql(&VenueFilter::Capacity(300)).ends_with("::bigint = $1"));
        assert!(venue_sql(&VenueFilter::IsPopular(true)).ends_with("::boolean = $1"));
    }

    #[test]
    fn json_string_keeps_quotes() {
        assert_eq!(json_string("address3"), "\"address3\"");
        assert_eq!(json_string("a\"b"), "\"a\\\"b\"");
    }

    #[test]
    fn track_update_only_touches_non_key_columns() {
        let key = TrackKey {
            album_id: "1".to_string(),
            track_number: 2,
        };
        let builder = track_update_query(&key, &TrackUpdate::sample_rate(0.25)).unwrap();
        assert_eq!(
            builder.sql(),
            "UPDATE tracks SET sample_rate = $1, updated_at = NOW() WHERE track_number = $2 AND id = $3"
        );
    }

    #[test]
    fn track_update_with_title_and_rate() {
        let key = TrackKey {
            album_id: "1".to_string(),
            track_number: 2,
        };
        let update = TrackUpdate {
            title: Some("renamed".to_string()),
            sample_rate: Some(1.0),
        };
        let builder = track_update_query(&key, &update).unwrap();
        assert!(builder.sql().starts_with("UPDATE tracks SET title = $1, sample_rate = $2,"));
    }

    #[test]
    fn empty_track_update_builds_nothing() {
        let key = TrackKey {
            album_id: "1".to_string(),
            track_number: 2,
        };
        assert!(track_update_query(&key, &TrackUpdate::default()).is_none());
    }
}
