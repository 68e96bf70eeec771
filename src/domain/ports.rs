use super::bill::Bill;
use super::food_order::FoodOrder;
use super::loyalty::LoyaltyMember;
use crate::error::Result;
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// A record stored by id, guarded by a monotonically increasing version.
pub trait Document: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection (table, column family) the document lives in.
    const COLLECTION: &'static str;
    /// Human-readable entity name used in error messages.
    const ENTITY: &'static str;

    fn id(&self) -> &str;
    fn version(&self) -> u64;
    fn set_version(&mut self, version: u64);
}

pub type Predicate<'a, D> = &'a (dyn Fn(&D) -> bool + Send + Sync);

#[async_trait]
pub trait DocumentStore<D: Document>: Send + Sync {
    /// Inserts a new document. Fails with `AlreadyExists` if the id is taken.
    async fn insert(&self, doc: D) -> Result<()>;

    async fn get(&self, id: &str) -> Result<Option<D>>;

    /// Compare-and-set: writes `doc` only if the stored version still equals
    /// `expected_version`, and stores it as `expected_version + 1`.
    async fn replace(&self, doc: D, expected_version: u64) -> Result<D>;

    /// Removes the document, returning it if it existed.
    async fn delete(&self, id: &str) -> Result<Option<D>>;

    async fn all(&self) -> Result<Vec<D>>;

    async fn find(&self, predicate: Predicate<'_, D>) -> Result<Vec<D>> {
        let docs = self.all().await?;
        Ok(docs.into_iter().filter(|doc| predicate(doc)).collect())
    }
}

pub type MemberStoreBox = Box<dyn DocumentStore<LoyaltyMember>>;
pub type BillStoreBox = Box<dyn DocumentStore<Bill>>;
pub type FoodOrderStoreBox = Box<dyn DocumentStore<FoodOrder>>;
