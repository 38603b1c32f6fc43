use crate::ScenarioContext;
use crate::error::ScenarioError;
use crate::verify::{ensure, ensure_eq};
use core_types::factories::{sample_album, sample_concert, sample_singer, sample_track, sample_venue};
use database::DbError;
use database::repository::{
    get_album, get_concert, get_singer, get_track, get_venue, insert_track, save_album,
    save_concert, save_singer, save_venue,
};

/// Saves one record of each kind inside a single transaction, re-reading
/// each one before moving on. Any failure leaves nothing behind.
pub async fn add_data(ctx: &mut ScenarioContext) -> Result<(), ScenarioError> {
    // Dropping `tx` on an early return rolls everything back.
    let mut tx = ctx.repo.begin().await?;
    let seq = &mut ctx.sequence;

    let singer = sample_singer(seq, "1");
    save_singer(&mut *tx, &singer).await?;
    let stored = get_singer(&mut *tx, &singer.id).await?;
    ensure(
        stored.first_name == singer.first_name && stored.last_name == singer.last_name,
        "Saving Singer Data Failed",
    )?;

    let album = sample_album(seq, "1", Some(&singer.id));
    save_album(&mut *tx, &album).await?;
    let stored = get_album(&mut *tx, &album.id).await?;
    ensure_eq("Saving Album Data Failed", &album.title, &stored.title)?;

    // Insert only: the key columns of an interleaved row are never rewritten.
    let track = sample_track(seq, "1", 2, &album.id);
    insert_track(&mut *tx, &track).await?;
    let stored = get_track(&mut *tx, &track.key()).await?;
    ensure_eq("Saving Track Data Failed", &track.title, &stored.title)?;

    let venue = sample_venue(seq, "1")?;
    save_venue(&mut *tx, &venue).await?;
    let stored = get_venue(&mut *tx, &venue.id).await?;
    ensure_eq("Saving Venue Data Failed", &venue.name, &stored.name)?;

    let concert = sample_concert(seq, "1", &venue.id, &singer.id);
    save_concert(&mut *tx, &concert).await?;
    let stored = get_concert(&mut *tx, &concert.id).await?;
    ensure_eq("Saving Concert Data Failed", &concert.name, &stored.name)?;

    tx.commit().await.map_err(DbError::from)?;
    Ok(())
}
