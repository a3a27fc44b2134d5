use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use serde_json::Value;
use uuid::Uuid;

use crate::entities::document;

use super::{Document, DocumentStore, Fields, Order, Query, StoreError};

/// Document store persisted in a single `documents` table. Collection
/// scoping and ordering run in SQL; equality predicates over the JSON
/// fields are applied in-process after the collection fetch.
pub struct SqlStore {
    conn: DatabaseConnection,
}

impl SqlStore {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }
}

fn to_document(model: document::Model) -> Document {
    let fields = match model.fields {
        Value::Object(map) => map,
        _ => Fields::new(),
    };
    Document {
        id: model.id,
        created_at: model.created_at,
        updated_at: model.updated_at,
        fields,
    }
}

#[async_trait]
impl DocumentStore for SqlStore {
    async fn add(
        &self,
        collection: &str,
        id: Option<String>,
        fields: Fields,
    ) -> Result<Document, StoreError> {
        let now = Utc::now();
        let id = id.unwrap_or_else(|| Uuid::new_v4().to_string());
        let model = document::ActiveModel {
            collection: Set(collection.to_string()),
            id: Set(id.clone()),
            fields: Set(Value::Object(fields.clone())),
            created_at: Set(now),
            updated_at: Set(now),
        };

        // Callers may supply a deterministic id; a colliding write replaces
        // the stored fields instead of failing.
        document::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([document::Column::Collection, document::Column::Id])
                    .update_columns([document::Column::Fields, document::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec(&self.conn)
            .await
            .map_err(StoreError::from_db)?;

        Ok(Document {
            id,
            created_at: now,
            updated_at: now,
            fields,
        })
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: Fields,
    ) -> Result<Document, StoreError> {
        let existing = document::Entity::find_by_id((collection.to_string(), id.to_string()))
            .one(&self.conn)
            .await
            .map_err(StoreError::from_db)?
            .ok_or_else(|| StoreError::not_found(collection, id))?;

        let mut fields = match existing.fields.clone() {
            Value::Object(map) => map,
            _ => Fields::new(),
        };
        for (field, value) in patch {
            fields.insert(field, value);
        }

        let mut model: document::ActiveModel = existing.into();
        model.fields = Set(Value::Object(fields));
        model.updated_at = Set(Utc::now());
        let updated = model.update(&self.conn).await.map_err(StoreError::from_db)?;
        Ok(to_document(updated))
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let result =
            document::Entity::delete_by_id((collection.to_string(), id.to_string()))
                .exec(&self.conn)
                .await
                .map_err(StoreError::from_db)?;
        if result.rows_affected == 0 {
            return Err(StoreError::not_found(collection, id));
        }
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let model = document::Entity::find_by_id((collection.to_string(), id.to_string()))
            .one(&self.conn)
            .await
            .map_err(StoreError::from_db)?;
        Ok(model.map(to_document))
    }

    async fn query(&self, collection: &str, query: Query) -> Result<Vec<Document>, StoreError> {
        let mut select =
            document::Entity::find().filter(document::Column::Collection.eq(collection));

        select = match query.order {
            Order::NewestFirst => select
                .order_by_desc(document::Column::CreatedAt)
                .order_by_asc(document::Column::Id),
            Order::OldestFirst => select
                .order_by_asc(document::Column::CreatedAt)
                .order_by_asc(document::Column::Id),
        };

        // The limit is only pushed down when nothing is left to filter here.
        if query.filters.is_empty() {
            if let Some(limit) = query.limit {
                select = select.limit(limit as u64);
            }
        }

        let models = select.all(&self.conn).await.map_err(StoreError::from_db)?;
        let mut docs: Vec<Document> = models
            .into_iter()
            .map(to_document)
            .filter(|doc| query.matches(&doc.fields))
            .collect();
        if let Some(limit) = query.limit {
            docs.truncate(limit);
        }
        Ok(docs)
    }
}
