use crate::ScenarioContext;
use crate::error::ScenarioError;
use crate::verify::{ensure, ensure_eq};
use core_types::TrackKey;
use database::TrackUpdate;
use database::repository::{get_track, update_tracks};

const UPDATED_SAMPLE_RATE: f64 = 0.25;

/// Changes a non-key column of an interleaved track.
///
/// A fetch-mutate-save round trip would rewrite the key columns too, which
/// the storage engine rejects, so this goes through the filtered update.
pub async fn interleaved_table_update(ctx: &mut ScenarioContext) -> Result<(), ScenarioError> {
    let pool = ctx.repo.pool();
    let key = TrackKey {
        album_id: "1".to_string(),
        track_number: 2,
    };

    let changed = update_tracks(pool, &key, &TrackUpdate::sample_rate(UPDATED_SAMPLE_RATE)).await?;
    ensure_eq("Interleaved update should touch exactly one track", &1, &changed)?;

    let updated = get_track(pool, &key).await?;
    ensure(
        updated.sample_rate == UPDATED_SAMPLE_RATE,
        "Update on Interleaved Table Failed",
    )
}
