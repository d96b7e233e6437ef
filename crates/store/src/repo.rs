//! sqlx-backed sink over the migrated SQLite schema.

use crate::Database;
use crate::error::{ErrorKind, Result};
use crate::models::{BlitId, DictionaryId, DocumentId, NewBlit, NewShape, ShapeId};
use crate::sink::ShapeSink;
use async_trait::async_trait;
use exn::ResultExt;
use sqlx::SqlitePool;
use time::UtcDateTime;

/// The SQLite implementation of [`ShapeSink`].
///
/// Every statement lives in `queries/*.sql` and is fully parameterized;
/// values reach the database through binds only. Identifiers are SQLite
/// rowids, so insertion order and identifier order agree, which is the
/// property the engine's parent ordering leans on.
#[derive(Debug, Clone)]
pub struct SqliteSink {
    pool: SqlitePool,
}

impl From<&Database> for SqliteSink {
    fn from(db: &Database) -> Self {
        Self { pool: db.pool().clone() }
    }
}

impl SqliteSink {
    /// Create a new sink over the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShapeSink for SqliteSink {
    async fn lookup_or_create_document(&self, name: &str, address: &str) -> Result<DocumentId> {
        let existing: Option<i64> = sqlx::query_scalar(include_str!("../queries/find_document.sql"))
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        if let Some(id) = existing {
            return Ok(id);
        }
        let result = sqlx::query(include_str!("../queries/insert_document.sql"))
            .bind(name)
            .bind(address)
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(result.last_insert_rowid())
    }

    async fn find_shared_dictionary(&self, name: &str) -> Result<Option<DictionaryId>> {
        sqlx::query_scalar(include_str!("../queries/find_shared_dictionary.sql"))
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)
    }

    async fn find_page_dictionary(
        &self,
        document: DocumentId,
        name: &str,
        page_number: i64,
    ) -> Result<Option<DictionaryId>> {
        sqlx::query_scalar(include_str!("../queries/find_page_dictionary.sql"))
            .bind(document)
            .bind(name)
            .bind(page_number)
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)
    }

    async fn create_dictionary(
        &self,
        document: DocumentId,
        name: &str,
        page_number: i64,
    ) -> Result<DictionaryId> {
        let result = sqlx::query(include_str!("../queries/insert_dictionary.sql"))
            .bind(name)
            .bind(page_number)
            .bind(document)
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(result.last_insert_rowid())
    }

    async fn dictionary_shapes(&self, dictionary: DictionaryId) -> Result<Vec<(u32, ShapeId)>> {
        let rows: Vec<(i64, i64)> = sqlx::query_as(include_str!("../queries/dictionary_shapes.sql"))
            .bind(dictionary)
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        rows.into_iter()
            .map(|(original, id)| {
                let original = u32::try_from(original).or_raise(|| ErrorKind::InvalidData("original id"))?;
                Ok((original, id))
            })
            .collect()
    }

    async fn store_shape(&self, shape: NewShape<'_>) -> Result<ShapeId> {
        // Reassemble the chunked transport into the blob to bind. The
        // concatenation is the persisted byte sequence, exactly.
        let bits: Option<Vec<u8>> = shape.payload.map(|payload| {
            let mut bytes = Vec::with_capacity(payload.len());
            for chunk in payload.chunks() {
                bytes.extend_from_slice(chunk);
            }
            bytes
        });
        let width = i64::try_from(shape.width).or_raise(|| ErrorKind::InvalidData("width"))?;
        let height = i64::try_from(shape.height).or_raise(|| ErrorKind::InvalidData("height"))?;
        let bbox = shape
            .bbox
            .map(|bbox| -> Result<[i64; 4]> {
                Ok([
                    i64::try_from(bbox.top).or_raise(|| ErrorKind::InvalidData("bbox top"))?,
                    i64::try_from(bbox.left).or_raise(|| ErrorKind::InvalidData("bbox left"))?,
                    i64::try_from(bbox.right).or_raise(|| ErrorKind::InvalidData("bbox right"))?,
                    i64::try_from(bbox.bottom).or_raise(|| ErrorKind::InvalidData("bbox bottom"))?,
                ])
            })
            .transpose()?;
        let result = sqlx::query(include_str!("../queries/insert_shape.sql"))
            .bind(i64::from(shape.original_id))
            .bind(shape.parent)
            .bind(bits)
            .bind(width)
            .bind(height)
            .bind(shape.dictionary)
            .bind(bbox.map(|b| b[0]))
            .bind(bbox.map(|b| b[1]))
            .bind(bbox.map(|b| b[2]))
            .bind(bbox.map(|b| b[3]))
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(result.last_insert_rowid())
    }

    async fn store_blit(&self, blit: NewBlit) -> Result<BlitId> {
        let result = sqlx::query(include_str!("../queries/insert_blit.sql"))
            .bind(blit.document)
            .bind(blit.page_number)
            .bind(blit.shape)
            .bind(i64::from(blit.left))
            .bind(i64::from(blit.bottom))
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(result.last_insert_rowid())
    }

    async fn link_page(
        &self,
        document: DocumentId,
        page_number: i64,
        dictionary: Option<DictionaryId>,
    ) -> Result<()> {
        sqlx::query(include_str!("../queries/link_page.sql"))
            .bind(document)
            .bind(page_number)
            .bind(dictionary)
            .bind(UtcDateTime::now().unix_timestamp())
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(())
    }
}
