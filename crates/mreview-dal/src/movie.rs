use crate::{ChosenRow, Error, FromRowPrefixed, error::Result, genre::Genre};
use futures::TryStreamExt as _;
use serde::{Deserialize, Serialize};
use sqlx::{Pool, Row as _};
use tracing::debug;

/// New movie, fields are expected to be validated by the caller
#[derive(Debug, Clone)]
pub struct CreateMovie {
    pub title: String,
    pub year: i64,
    pub rate: f64,
    pub synopsis: String,
    pub genre_id: i64,
    pub poster: Vec<u8>,
}

/// Replacement values for an existing movie
///
/// `poster` is only overwritten when present, `version` must match the stored row.
#[derive(Debug, Clone)]
pub struct UpdateMovie {
    pub title: String,
    pub year: i64,
    pub rate: f64,
    pub synopsis: String,
    pub genre_id: i64,
    pub poster: Option<Vec<u8>>,
    pub version: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, sqlx::FromRow)]
pub struct MovieShort {
    pub id: i64,
    pub title: String,
    pub year: i64,
    pub rate: f64,
    pub synopsis: String,
    pub genre_id: i64,
}

/// Movie with its genre, poster bytes are loaded separately by `poster`
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub year: i64,
    pub rate: f64,
    pub synopsis: String,
    pub genre: Genre,
    pub version: i64,
}

impl sqlx::FromRow<'_, ChosenRow> for Movie {
    fn from_row(row: &ChosenRow) -> Result<Self, sqlx::Error> {
        let genre = Genre::from_row_prefixed(row)?;
        Ok(Movie {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            year: row.try_get("year")?,
            rate: row.try_get("rate")?,
            synopsis: row.try_get("synopsis")?,
            genre,
            version: row.try_get("version")?,
        })
    }
}

const SELECT_MOVIE: &str = r#"
    SELECT m.id, m.title, m.year, m.rate, m.synopsis, m.version,
    g.id as genre_id, g.name as genre_name
    FROM movie m
    JOIN genre g ON m.genre_id = g.id
    WHERE m.id = ?
    "#;

pub type MovieRepository = MovieRepositoryImpl<Pool<crate::ChosenDB>>;

pub struct MovieRepositoryImpl<E> {
    executor: E,
}

impl<'c, E> MovieRepositoryImpl<E>
where
    for<'a> &'a E: sqlx::Executor<'c, Database = crate::ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub async fn create(&self, payload: CreateMovie) -> Result<Movie> {
        let result = sqlx::query(
            "INSERT INTO movie (title, year, rate, synopsis, genre_id, poster, version) VALUES (?, ?, ?, ?, ?, ?, 1)",
        )
        .bind(&payload.title)
        .bind(payload.year)
        .bind(payload.rate)
        .bind(&payload.synopsis)
        .bind(payload.genre_id)
        .bind(&payload.poster)
        .execute(&self.executor)
        .await?;

        let id = result.last_insert_rowid();
        debug!("Created movie {id}");
        self.get(id).await
    }

    pub async fn update(&self, id: i64, payload: UpdateMovie) -> Result<Movie> {
        let version = payload.version;
        let result = sqlx::query(
            "UPDATE movie SET title = ?, year = ?, rate = ?, synopsis = ?, genre_id = ?, poster = COALESCE(?, poster), version = ? WHERE id = ? and version = ?",
        )
        .bind(&payload.title)
        .bind(payload.year)
        .bind(payload.rate)
        .bind(&payload.synopsis)
        .bind(payload.genre_id)
        .bind(&payload.poster)
        .bind(version + 1)
        .bind(id)
        .bind(version)
        .execute(&self.executor)
        .await?;

        if result.rows_affected() == 0 {
            if self.exists(id).await? {
                Err(Error::FailedUpdate { id, version })
            } else {
                Err(Error::RecordNotFound("Movie".to_string()))
            }
        } else {
            self.get(id).await
        }
    }

    /// All movies, best rated first
    pub async fn list(&self) -> Result<Vec<MovieShort>> {
        let records = sqlx::query_as::<_, MovieShort>(
            "SELECT id, title, year, rate, synopsis, genre_id FROM movie ORDER BY rate DESC, id",
        )
        .fetch(&self.executor)
        .try_collect::<Vec<_>>()
        .await?;
        Ok(records)
    }

    pub async fn get(&self, id: i64) -> Result<Movie> {
        sqlx::query_as::<_, Movie>(SELECT_MOVIE)
            .bind(id)
            .fetch_optional(&self.executor)
            .await?
            .ok_or_else(|| Error::RecordNotFound("Movie".to_string()))
    }

    pub async fn poster(&self, id: i64) -> Result<Vec<u8>> {
        sqlx::query_scalar::<_, Vec<u8>>("SELECT poster FROM movie WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.executor)
            .await?
            .ok_or_else(|| Error::RecordNotFound("Poster".to_string()))
    }

    pub async fn exists(&self, id: i64) -> Result<bool> {
        let found = sqlx::query_scalar::<_, i64>("SELECT id FROM movie WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.executor)
            .await?;
        Ok(found.is_some())
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let res = sqlx::query("DELETE FROM movie WHERE id = ?")
            .bind(id)
            .execute(&self.executor)
            .await?;

        if res.rows_affected() == 0 {
            Err(Error::RecordNotFound("Movie".to_string()))
        } else {
            Ok(())
        }
    }

    pub async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT count(*) FROM movie")
            .fetch_one(&self.executor)
            .await?;
        Ok(count as u64)
    }
}
