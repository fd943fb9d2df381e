use async_trait::async_trait;
use sqlx::{types::Json, FromRow, PgPool};
use uuid::Uuid;

use super::{
    parse_id, with_id, Collection, DeleteAck, Document, DocumentStore, Filter, InsertAck,
    StoreError, UpdateAck, ID_FIELD,
};

/// Document store backed by one JSONB table per collection
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

#[derive(Debug, FromRow)]
struct DocumentRow {
    id: Uuid,
    doc: Json<Document>,
}

impl DocumentRow {
    fn into_document(self) -> Document {
        with_id(self.id, self.doc.0)
    }
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn find(&self, collection: Collection, filter: &Filter) -> Result<Vec<Document>, StoreError> {
        let rows = sqlx::query_as::<_, DocumentRow>(&format!(
            "SELECT id, doc FROM {} WHERE doc @> $1 ORDER BY created_at, id",
            collection
        ))
        .bind(Json(filter.clone()))
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!("Found {} documents in {}", rows.len(), collection);
        Ok(rows.into_iter().map(DocumentRow::into_document).collect())
    }

    async fn find_by_id(&self, collection: Collection, id: &str) -> Result<Option<Document>, StoreError> {
        let id = parse_id(id)?;

        let row = sqlx::query_as::<_, DocumentRow>(&format!(
            "SELECT id, doc FROM {} WHERE id = $1",
            collection
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(DocumentRow::into_document))
    }

    async fn insert_one(&self, collection: Collection, mut document: Document) -> Result<InsertAck, StoreError> {
        document.remove(ID_FIELD);
        let id = Uuid::new_v4();

        sqlx::query(&format!("INSERT INTO {} (id, doc) VALUES ($1, $2)", collection))
            .bind(id)
            .bind(Json(document))
            .execute(&self.pool)
            .await?;

        Ok(InsertAck {
            acknowledged: true,
            inserted_id: id.to_string(),
        })
    }

    async fn delete_one(&self, collection: Collection, id: &str) -> Result<DeleteAck, StoreError> {
        let id = parse_id(id)?;

        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", collection))
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(DeleteAck {
            acknowledged: true,
            deleted_count: result.rows_affected(),
        })
    }

    async fn update_fields(
        &self,
        collection: Collection,
        id: &str,
        mut fields: Document,
    ) -> Result<UpdateAck, StoreError> {
        let id = parse_id(id)?;
        fields.remove(ID_FIELD);

        // Documents already holding every value count as matched but not modified
        let (matched, modified): (i64, i64) = sqlx::query_as(&format!(
            r#"
            WITH existing AS (
                SELECT id, doc FROM {table} WHERE id = $1
            ),
            updated AS (
                UPDATE {table} AS t
                SET doc = t.doc || $2
                FROM existing
                WHERE t.id = existing.id AND NOT (existing.doc @> $2)
                RETURNING t.id
            )
            SELECT (SELECT COUNT(*) FROM existing), (SELECT COUNT(*) FROM updated)
            "#,
            table = collection
        ))
        .bind(id)
        .bind(Json(fields))
        .fetch_one(&self.pool)
        .await?;

        Ok(UpdateAck {
            acknowledged: true,
            matched_count: matched as u64,
            modified_count: modified as u64,
        })
    }
}
