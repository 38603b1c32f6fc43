use crate::DbError;
use crate::repository::{albums_for_singer, save_album, set_album_singer};
use core_types::{Album, Singer};
use sqlx::PgExecutor;

/// The albums owned by one singer, seen from the singer's side of the foreign key.
///
/// Creating or adding through this handle always writes `albums.singer_id`;
/// the singer row itself is never touched.
#[derive(Debug, Clone, Copy)]
pub struct SingerAlbums<'a> {
    singer_id: &'a str,
}

impl<'a> SingerAlbums<'a> {
    pub fn of(singer: &'a Singer) -> Self {
        Self {
            singer_id: &singer.id,
        }
    }

    /// Saves `album` as belonging to this singer and returns the stored value.
    pub async fn create<'e, E>(&self, executor: E, mut album: Album) -> Result<Album, DbError>
    where
        E: PgExecutor<'e>,
    {
        album.singer_id = Some(self.singer_id.to_string());
        save_album(executor, &album).await?;
        Ok(album)
    }

    /// Moves an existing album to this singer, in the database and in `album`.
    pub async fn add<'e, E>(&self, executor: E, album: &mut Album) -> Result<(), DbError>
    where
        E: PgExecutor<'e>,
    {
        let changed = set_album_singer(executor, &album.id, self.singer_id).await?;
        if changed == 0 {
            return Err(DbError::NotFound(format!("album with id '{}'", album.id)));
        }
        tracing::debug!(album_id = %album.id, singer_id = self.singer_id, "Album reassigned.");
        album.singer_id = Some(self.singer_id.to_string());
        Ok(())
    }

    /// Every album currently pointing at this singer.
    pub async fn all<'e, E>(&self, executor: E) -> Result<Vec<Album>, DbError>
    where
        E: PgExecutor<'e>,
    {
        albums_for_singer(executor, self.singer_id).await
    }
}
