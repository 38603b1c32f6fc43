//! Builders for sample catalog records.
//!
//! Every factory draws one value from a [`SampleSequence`] and uses it as the
//! suffix of the generated names, so records built from the same sequence
//! never share a title or name.

use crate::error::CoreError;
use crate::models::{Album, Concert, Singer, Track, Venue, VenueDescription};
use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal_macros::dec;
use sqlx::types::Json;

/// Monotonic counter for sample-value suffixes.
#[derive(Debug, Default)]
pub struct SampleSequence {
    current: u32,
}

impl SampleSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the sequence and returns the new value.
    pub fn next_suffix(&mut self) -> u32 {
        self.current += 1;
        self.current
    }

    /// The last value handed out (0 before the first call).
    pub fn current(&self) -> u32 {
        self.current
    }
}

pub fn sample_singer(seq: &mut SampleSequence, id: &str) -> Singer {
    let n = seq.next_suffix();
    let now = Utc::now();
    Singer {
        id: id.to_string(),
        first_name: Some("singer".to_string()),
        last_name: n.to_string(),
        full_name: format!("singer{n}"),
        active: Some(true),
        created_at: Some(now),
        updated_at: Some(now),
    }
}

pub fn sample_album(seq: &mut SampleSequence, id: &str, singer_id: Option<&str>) -> Album {
    let n = seq.next_suffix();
    let now = Utc::now();
    Album {
        id: id.to_string(),
        singer_id: singer_id.map(str::to_string),
        title: format!("album{n}"),
        marketing_budget: Some(dec!(200000)),
        release_date: Some(now.date_naive()),
        cover_picture: Some(b"hello world".to_vec()),
        created_at: Some(now),
        updated_at: Some(now),
    }
}

pub fn sample_track(
    seq: &mut SampleSequence,
    track_id: &str,
    track_number: i64,
    album_id: &str,
) -> Track {
    let n = seq.next_suffix();
    let now = Utc::now();
    Track {
        track_id: track_id.to_string(),
        album_id: album_id.to_string(),
        track_number,
        title: format!("track{n}"),
        sample_rate: 124.543,
        created_at: Some(now),
        updated_at: Some(now),
    }
}

/// Builds a venue description for suffix `n`, seeding the generator from the clock.
pub fn sample_venue_description(n: u32) -> Result<VenueDescription, CoreError> {
    let seed = Utc::now().timestamp_micros() as u64;
    let mut rng = StdRng::seed_from_u64(seed);
    sample_venue_description_with(&mut rng, n)
}

/// Capacity is uniform in `[100 * n, 500 * n]`; popularity is a coin flip.
pub fn sample_venue_description_with<R: Rng>(
    rng: &mut R,
    n: u32,
) -> Result<VenueDescription, CoreError> {
    if n == 0 {
        return Err(CoreError::InvalidInput(
            "venue description suffix".to_string(),
            "must be at least 1".to_string(),
        ));
    }
    let n = i64::from(n);
    Ok(VenueDescription {
        address: format!("address{n}"),
        capacity: rng.random_range(100 * n..=500 * n),
        is_popular: rng.random_bool(0.5),
    })
}

pub fn sample_venue(seq: &mut SampleSequence, id: &str) -> Result<Venue, CoreError> {
    let n = seq.next_suffix();
    let now = Utc::now();
    Ok(Venue {
        id: id.to_string(),
        name: format!("venue{n}"),
        description: Some(Json(sample_venue_description(n)?)),
        created_at: Some(now),
        updated_at: Some(now),
    })
}

/// The concert starts now and lasts one hour.
pub fn sample_concert(
    seq: &mut SampleSequence,
    id: &str,
    venue_id: &str,
    singer_id: &str,
) -> Concert {
    let n = seq.next_suffix();
    let now = Utc::now();
    Concert {
        id: id.to_string(),
        venue_id: venue_id.to_string(),
        singer_id: singer_id.to_string(),
        name: format!("concert{n}"),
        start_time: now,
        end_time: now + Duration::hours(1),
        created_at: Some(now),
        updated_at: Some(now),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_factory_call_advances_the_sequence() {
        let mut seq = SampleSequence::new();
        let singer = sample_singer(&mut seq, "1");
        let album = sample_album(&mut seq, "1", Some(&singer.id));
        let track = sample_track(&mut seq, "1", 2, &album.id);
        let venue = sample_venue(&mut seq, "1").unwrap();
        let concert = sample_concert(&mut seq, "1", &venue.id, &singer.id);

        assert_eq!(singer.last_name, "1");
        assert_eq!(singer.full_name, "singer1");
        assert_eq!(singer.first_name.as_deref(), Some("singer"));
        assert_eq!(album.title, "album2");
        assert_eq!(album.singer_id.as_deref(), Some("1"));
        assert_eq!(album.marketing_budget, Some(dec!(200000)));
        assert_eq!(album.cover_picture.as_deref(), Some(&b"hello world"[..]));
        assert_eq!(track.title, "track3");
        assert_eq!(track.album_id, "1");
        assert_eq!(venue.name, "venue4");
        assert_eq!(concert.name, "concert5");
        assert_eq!(seq.current(), 5);
    }

    #[test]
    fn concert_ends_after_it_starts() {
        let mut seq = SampleSequence::new();
        let concert = sample_concert(&mut seq, "1", "1", "1");
        assert_eq!(concert.end_time - concert.start_time, Duration::hours(1));
    }

    #[test]
    fn venue_description_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for n in 1..50 {
            let description = sample_venue_description_with(&mut rng, n).unwrap();
            let n = i64::from(n);
            assert!(description.capacity >= 100 * n);
            assert!(description.capacity <= 500 * n);
            assert_eq!(description.address, format!("address{n}"));
        }
    }

    #[test]
    fn venue_description_is_deterministic_for_a_seed() {
        let first = sample_venue_description_with(&mut StdRng::seed_from_u64(7), 3).unwrap();
        let second = sample_venue_description_with(&mut StdRng::seed_from_u64(7), 3).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn venue_description_rejects_zero_suffix() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            sample_venue_description_with(&mut rng, 0),
            Err(CoreError::InvalidInput(_, _))
        ));
    }

    #[test]
    fn sample_venue_carries_matching_address() {
        let mut seq = SampleSequence::new();
        seq.next_suffix();
        let venue = sample_venue(&mut seq, "10").unwrap();
        let description = venue.description().unwrap();
        assert_eq!(description.address, "address2");
        assert_eq!(venue.name, "venue2");
    }
}
