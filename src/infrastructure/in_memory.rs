use crate::application::engine::Stores;
use crate::domain::bill::Bill;
use crate::domain::food_order::FoodOrder;
use crate::domain::loyalty::LoyaltyMember;
use crate::domain::ports::{Document, DocumentStore};
use crate::error::{LedgerError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory document collection.
///
/// Uses `Arc<RwLock<HashMap<String, D>>>` so clones share the same data.
/// Version checks happen under the write lock, which makes `replace` a true
/// compare-and-set.
#[derive(Clone)]
pub struct InMemoryStore<D> {
    docs: Arc<RwLock<HashMap<String, D>>>,
}

impl<D> Default for InMemoryStore<D> {
    fn default() -> Self {
        Self {
            docs: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<D> InMemoryStore<D> {
    /// Creates a new, empty in-memory collection.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl<D: Document> DocumentStore<D> for InMemoryStore<D> {
    async fn insert(&self, doc: D) -> Result<()> {
        let mut docs = self.docs.write().await;
        match docs.entry(doc.id().to_string()) {
            Entry::Occupied(_) => Err(LedgerError::AlreadyExists {
                entity: D::ENTITY,
                id: doc.id().to_string(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(doc);
                Ok(())
            }
        }
    }

    async fn get(&self, id: &str) -> Result<Option<D>> {
        let docs = self.docs.read().await;
        Ok(docs.get(id).cloned())
    }

    async fn replace(&self, mut doc: D, expected_version: u64) -> Result<D> {
        let mut docs = self.docs.write().await;
        let current = docs
            .get_mut(doc.id())
            .ok_or_else(|| LedgerError::not_found(D::ENTITY, doc.id()))?;

        if current.version() != expected_version {
            return Err(LedgerError::VersionConflict {
                entity: D::ENTITY,
                id: doc.id().to_string(),
                expected: expected_version,
                found: current.version(),
            });
        }

        doc.set_version(expected_version + 1);
        *current = doc.clone();
        Ok(doc)
    }

    async fn delete(&self, id: &str) -> Result<Option<D>> {
        let mut docs = self.docs.write().await;
        Ok(docs.remove(id))
    }

    async fn all(&self) -> Result<Vec<D>> {
        let docs = self.docs.read().await;
        Ok(docs.values().cloned().collect())
    }
}

/// Fresh, empty in-memory collections for every store port.
pub fn in_memory_stores() -> Stores {
    Stores {
        members: Box::new(InMemoryStore::<LoyaltyMember>::new()),
        bills: Box::new(InMemoryStore::<Bill>::new()),
        orders: Box::new(InMemoryStore::<FoodOrder>::new()),
    }
}
