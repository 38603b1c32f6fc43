use crate::ScenarioContext;
use crate::error::ScenarioError;
use crate::verify::{ensure, ensure_eq};
use chrono::Utc;
use core_types::Album;
use core_types::factories::sample_singer;
use database::SingerAlbums;
use database::repository::{album_exists, get_album, get_singer, save_singer};
use rust_decimal_macros::dec;

/// Creates an album through a second singer's collection, then moves the
/// first album over to that singer as well.
///
/// Expects `add_data` to have stored singer '1' and album '1'.
pub async fn foreign_key_operations(ctx: &mut ScenarioContext) -> Result<(), ScenarioError> {
    let pool = ctx.repo.pool();
    let seq = &mut ctx.sequence;

    let singer1 = get_singer(pool, "1").await?;
    let mut album1 = get_album(pool, "1").await?;
    ensure(
        album1.singer_id.as_deref() == Some(singer1.id.as_str()),
        "Album1 doesn't belong to singer1",
    )?;

    let singer2 = sample_singer(seq, "2");
    save_singer(pool, &singer2).await?;
    let albums = SingerAlbums::of(&singer2);

    let n = seq.next_suffix();
    let now = Utc::now();
    let draft = Album {
        id: "2".to_string(),
        singer_id: None,
        title: format!("album{n}"),
        marketing_budget: Some(dec!(250000)),
        release_date: None,
        cover_picture: Some(b"new world".to_vec()),
        created_at: Some(now),
        updated_at: Some(now),
    };
    let album2 = albums.create(pool, draft).await?;
    ensure(
        album2.singer_id.as_deref() == Some(singer2.id.as_str()),
        "Album2 is not associated with singer2",
    )?;
    ensure(album_exists(pool, &album2.id).await?, "Album2 not found in the db")?;

    albums.add(pool, &mut album1).await?;
    ensure(
        album1.singer_id.as_deref() == Some(singer2.id.as_str()),
        "Couldn't change the parent of album1 from singer1 to singer2",
    )?;

    let stored = get_album(pool, &album1.id).await?;
    ensure_eq(
        "Album1 reassignment was not persisted",
        &album1.singer_id,
        &stored.singer_id,
    )?;

    let owned: Vec<String> = albums.all(pool).await?.into_iter().map(|a| a.id).collect();
    ensure(
        owned.contains(&album1.id) && owned.contains(&album2.id),
        format!("Singer2 should own albums 1 and 2, found {owned:?}"),
    )?;

    tracing::debug!(albums = ?owned, "Singer2 album collection verified.");
    Ok(())
}
