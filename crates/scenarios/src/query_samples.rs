use crate::ScenarioContext;
use crate::error::ScenarioError;
use crate::verify::ensure;
use core_types::factories::{sample_album, sample_concert, sample_singer, sample_track, sample_venue};
use database::repository::{
    find_album_by_title, find_concert_by_name, find_singer_by_full_name, find_track_by_title,
    find_venue_by_name, insert_track, save_album, save_concert, save_singer, save_venue,
};

/// Stores two records of each kind with crossed foreign keys and finds each
/// one again by its name or title.
///
/// Singer '2' and album '2' already exist at this point; saving them again
/// overwrites their columns.
pub async fn create_and_query_sample_data(ctx: &mut ScenarioContext) -> Result<(), ScenarioError> {
    let pool = ctx.repo.pool();
    let seq = &mut ctx.sequence;

    let singer1 = sample_singer(seq, "2");
    let singer2 = sample_singer(seq, "3");
    save_singer(pool, &singer1).await?;
    save_singer(pool, &singer2).await?;

    let fetched1 = find_singer_by_full_name(pool, &singer1.full_name).await?;
    let fetched2 = find_singer_by_full_name(pool, &singer2.full_name).await?;
    ensure(
        fetched1.id == singer1.id && fetched2.id == singer2.id,
        "Fetching Singer Data Failed",
    )?;

    let album1 = sample_album(seq, "2", Some(&singer1.id));
    let album2 = sample_album(seq, "3", Some(&singer2.id));
    save_album(pool, &album1).await?;
    save_album(pool, &album2).await?;

    let fetched1 = find_album_by_title(pool, &album1.title).await?;
    let fetched2 = find_album_by_title(pool, &album2.title).await?;
    ensure(
        fetched1.id == album1.id && fetched2.id == album2.id,
        "Fetching Album Data Failed",
    )?;

    let track1 = sample_track(seq, "2", 5, &album1.id);
    let track2 = sample_track(seq, "3", 6, &album2.id);
    insert_track(pool, &track1).await?;
    insert_track(pool, &track2).await?;

    let fetched1 = find_track_by_title(pool, &track1.title).await?;
    let fetched2 = find_track_by_title(pool, &track2.title).await?;
    ensure(
        fetched1.track_id == track1.track_id && fetched2.track_id == track2.track_id,
        "Fetching Track Data Failed",
    )?;

    let venue1 = sample_venue(seq, "2")?;
    let venue2 = sample_venue(seq, "3")?;
    save_venue(pool, &venue1).await?;
    save_venue(pool, &venue2).await?;

    let fetched1 = find_venue_by_name(pool, &venue1.name).await?;
    let fetched2 = find_venue_by_name(pool, &venue2.name).await?;
    ensure(
        fetched1.id == venue1.id && fetched2.id == venue2.id,
        "Fetching Venue Data Failed",
    )?;

    let concert1 = sample_concert(seq, "2", &venue1.id, &singer2.id);
    let concert2 = sample_concert(seq, "3", &venue2.id, &singer1.id);
    save_concert(pool, &concert1).await?;
    save_concert(pool, &concert2).await?;

    let fetched1 = find_concert_by_name(pool, &concert1.name).await?;
    let fetched2 = find_concert_by_name(pool, &concert2.name).await?;
    ensure(
        fetched1.id == concert1.id && fetched2.id == concert2.id,
        "Fetching Concert Data Failed",
    )
}
