use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    matches, parse_id, with_id, Collection, DeleteAck, Document, DocumentStore, Filter, InsertAck,
    StoreError, UpdateAck, ID_FIELD,
};

/// Process-local document store.
///
/// Documents live in insertion order per collection and vanish with the process.
#[derive(Default)]
pub struct InMemoryStore {
    collections: RwLock<HashMap<Collection, Vec<(Uuid, Document)>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load documents directly, bypassing the HTTP surface (services are created out-of-band)
    pub async fn seed(&self, collection: Collection, documents: Vec<Document>) -> Vec<String> {
        let mut collections = self.collections.write().await;
        let entries = collections.entry(collection).or_default();

        documents
            .into_iter()
            .map(|mut document| {
                document.remove(ID_FIELD);
                let id = Uuid::new_v4();
                entries.push((id, document));
                id.to_string()
            })
            .collect()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn find(&self, collection: Collection, filter: &Filter) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        let documents = collections
            .get(&collection)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|(_, body)| matches(body, filter))
                    .map(|(id, body)| with_id(*id, body.clone()))
                    .collect()
            })
            .unwrap_or_default();

        Ok(documents)
    }

    async fn find_by_id(&self, collection: Collection, id: &str) -> Result<Option<Document>, StoreError> {
        let id = parse_id(id)?;
        let collections = self.collections.read().await;

        Ok(collections.get(&collection).and_then(|entries| {
            entries
                .iter()
                .find(|(entry_id, _)| *entry_id == id)
                .map(|(entry_id, body)| with_id(*entry_id, body.clone()))
        }))
    }

    async fn insert_one(&self, collection: Collection, mut document: Document) -> Result<InsertAck, StoreError> {
        document.remove(ID_FIELD);
        let id = Uuid::new_v4();

        self.collections
            .write()
            .await
            .entry(collection)
            .or_default()
            .push((id, document));

        Ok(InsertAck {
            acknowledged: true,
            inserted_id: id.to_string(),
        })
    }

    async fn delete_one(&self, collection: Collection, id: &str) -> Result<DeleteAck, StoreError> {
        let id = parse_id(id)?;
        let mut collections = self.collections.write().await;

        let deleted_count = match collections.get_mut(&collection) {
            Some(entries) => match entries.iter().position(|(entry_id, _)| *entry_id == id) {
                Some(index) => {
                    entries.remove(index);
                    1
                }
                None => 0,
            },
            None => 0,
        };

        Ok(DeleteAck {
            acknowledged: true,
            deleted_count,
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
        let mut collections = self.collections.write().await;

        let target = collections
            .get_mut(&collection)
            .and_then(|entries| entries.iter_mut().find(|(entry_id, _)| *entry_id == id));

        let (matched_count, modified_count) = match target {
            None => (0, 0),
            Some((_, body)) => {
                if matches(body, &fields) {
                    (1, 0)
                } else {
                    body.extend(fields);
                    (1, 1)
                }
            }
        };

        Ok(UpdateAck {
            acknowledged: true,
            matched_count,
            modified_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("test document must be an object"),
        }
    }

    #[tokio::test]
    async fn test_insert_then_find_by_id() {
        let store = InMemoryStore::new();
        let ack = store
            .insert_one(Collection::Bookings, doc(json!({"email": "a@x.com"})))
            .await
            .unwrap();

        assert!(ack.acknowledged);
        let found = store
            .find_by_id(Collection::Bookings, &ack.inserted_id)
            .await
            .unwrap()
            .expect("inserted booking should be found");
        assert_eq!(found["email"], "a@x.com");
        assert_eq!(found[ID_FIELD], Value::String(ack.inserted_id));
    }

    #[tokio::test]
    async fn test_client_supplied_id_is_replaced() {
        let store = InMemoryStore::new();
        let ack = store
            .insert_one(Collection::Bookings, doc(json!({"_id": "mine", "email": "a@x.com"})))
            .await
            .unwrap();

        assert_ne!(ack.inserted_id, "mine");
        let all = store.find(Collection::Bookings, &Filter::new()).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0][ID_FIELD], Value::String(ack.inserted_id));
    }

    #[tokio::test]
    async fn test_find_filters_and_keeps_insertion_order() {
        let store = InMemoryStore::new();
        for (email, service) in [("a@x.com", "oil"), ("b@y.com", "tires"), ("a@x.com", "brakes")] {
            store
                .insert_one(Collection::Bookings, doc(json!({"email": email, "service": service})))
                .await
                .unwrap();
        }

        let owned = store
            .find(Collection::Bookings, &doc(json!({"email": "a@x.com"})))
            .await
            .unwrap();
        let services: Vec<&Value> = owned.iter().map(|d| &d["service"]).collect();
        assert_eq!(services, vec!["oil", "brakes"]);
    }

    #[tokio::test]
    async fn test_collections_are_isolated() {
        let store = InMemoryStore::new();
        store.seed(Collection::Services, vec![doc(json!({"name": "Oil change"}))]).await;

        let bookings = store.find(Collection::Bookings, &Filter::new()).await.unwrap();
        assert!(bookings.is_empty());
    }

    #[tokio::test]
    async fn test_delete_reports_counts() {
        let store = InMemoryStore::new();
        let ack = store
            .insert_one(Collection::Bookings, doc(json!({"email": "a@x.com"})))
            .await
            .unwrap();

        let first = store.delete_one(Collection::Bookings, &ack.inserted_id).await.unwrap();
        let second = store.delete_one(Collection::Bookings, &ack.inserted_id).await.unwrap();

        assert_eq!(first.deleted_count, 1);
        assert_eq!(second.deleted_count, 0);
        assert!(second.acknowledged);
    }

    #[tokio::test]
    async fn test_update_fields_merges_and_counts() {
        let store = InMemoryStore::new();
        let ack = store
            .insert_one(
                Collection::Bookings,
                doc(json!({"email": "a@x.com", "status": "pending", "price": 120})),
            )
            .await
            .unwrap();

        let changed = store
            .update_fields(Collection::Bookings, &ack.inserted_id, doc(json!({"status": "confirmed"})))
            .await
            .unwrap();
        assert_eq!((changed.matched_count, changed.modified_count), (1, 1));

        let unchanged = store
            .update_fields(Collection::Bookings, &ack.inserted_id, doc(json!({"status": "confirmed"})))
            .await
            .unwrap();
        assert_eq!((unchanged.matched_count, unchanged.modified_count), (1, 0));

        let booking = store
            .find_by_id(Collection::Bookings, &ack.inserted_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(booking["status"], "confirmed");
        assert_eq!(booking["email"], "a@x.com");
        assert_eq!(booking["price"], 120);
    }

    #[tokio::test]
    async fn test_update_missing_document_matches_nothing() {
        let store = InMemoryStore::new();
        let ack = store
            .update_fields(
                Collection::Bookings,
                "0b6f2f1e-2c1d-4c6f-9a43-3f1b0f5a2d10",
                doc(json!({"status": "done"})),
            )
            .await
            .unwrap();

        assert_eq!((ack.matched_count, ack.modified_count), (0, 0));
    }

    #[tokio::test]
    async fn test_malformed_id_is_rejected() {
        let store = InMemoryStore::new();

        let result = store.find_by_id(Collection::Services, "12345").await;
        assert!(matches!(result, Err(StoreError::InvalidId(_))));

        let result = store.delete_one(Collection::Bookings, "12345").await;
        assert!(matches!(result, Err(StoreError::InvalidId(_))));
    }
}
