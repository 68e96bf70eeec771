use crate::domain::bill::Bill;
use crate::domain::food_order::FoodOrder;
use crate::domain::loyalty::LoyaltyMember;
use crate::domain::ports::{Document, DocumentStore};
use crate::error::{LedgerError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, IteratorMode, Options};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column families, one per document collection.
pub const COLUMN_FAMILIES: [&str; 3] = [
    LoyaltyMember::COLLECTION,
    Bill::COLLECTION,
    FoodOrder::COLLECTION,
];

/// A persistent store implementation using RocksDB.
///
/// Every document type lives in its own column family, keyed by document id
/// and encoded as JSON. Writes are serialized through `write_lock` so the
/// read-compare-write in `replace` cannot interleave with another writer in
/// this process.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    write_lock: Arc<Mutex<()>>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that every collection's column family exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let descriptors = COLUMN_FAMILIES
            .iter()
            .map(|name| ColumnFamilyDescriptor::new(*name, Options::default()));

        let db = DB::open_cf_descriptors(&opts, path, descriptors)?;

        Ok(Self {
            db: Arc::new(db),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    fn cf<D: Document>(&self) -> Result<&rocksdb::ColumnFamily> {
        self.db.cf_handle(D::COLLECTION).ok_or_else(|| {
            LedgerError::StoreUnavailable(Box::new(std::io::Error::other(format!(
                "column family `{}` not found",
                D::COLLECTION
            ))))
        })
    }

    fn read<D: Document>(&self, id: &str) -> Result<Option<D>> {
        let cf = self.cf::<D>()?;
        match self.db.get_cf(cf, id.as_bytes())? {
            Some(bytes) => Ok(Some(decode(&bytes)?)),
            None => Ok(None),
        }
    }

    fn write<D: Document>(&self, doc: &D) -> Result<()> {
        let cf = self.cf::<D>()?;
        let value = serde_json::to_vec(doc).map_err(|e| {
            LedgerError::StoreUnavailable(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("serialization error: {e}"),
            )))
        })?;
        self.db.put_cf(cf, doc.id().as_bytes(), value)?;
        Ok(())
    }
}

fn decode<D: Document>(bytes: &[u8]) -> Result<D> {
    serde_json::from_slice(bytes).map_err(|e| {
        LedgerError::StoreUnavailable(Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("deserialization error: {e}"),
        )))
    })
}

#[async_trait]
impl<D: Document> DocumentStore<D> for RocksDBStore {
    async fn insert(&self, doc: D) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        if self.read::<D>(doc.id())?.is_some() {
            return Err(LedgerError::AlreadyExists {
                entity: D::ENTITY,
                id: doc.id().to_string(),
            });
        }
        self.write(&doc)
    }

    async fn get(&self, id: &str) -> Result<Option<D>> {
        self.read(id)
    }

    async fn replace(&self, mut doc: D, expected_version: u64) -> Result<D> {
        let _guard = self.write_lock.lock().await;
        let current: D = self
            .read(doc.id())?
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
        self.write(&doc)?;
        Ok(doc)
    }

    async fn delete(&self, id: &str) -> Result<Option<D>> {
        let _guard = self.write_lock.lock().await;
        let existing = self.read::<D>(id)?;
        if existing.is_some() {
            let cf = self.cf::<D>()?;
            self.db.delete_cf(cf, id.as_bytes())?;
        }
        Ok(existing)
    }

    async fn all(&self) -> Result<Vec<D>> {
        let cf = self.cf::<D>()?;
        let mut docs = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = item?;
            docs.push(decode(&value)?);
        }
        Ok(docs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bill::Charges;
    use crate::domain::money::Money;
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_rocksdb_open_cf() {
        let dir = tempdir().unwrap();
        let store = RocksDBStore::open(dir.path()).expect("Failed to open RocksDB");

        for name in COLUMN_FAMILIES {
            assert!(store.db.cf_handle(name).is_some());
        }
    }

    #[tokio::test]
    async fn test_rocksdb_member_round_trip() {
        let dir = tempdir().unwrap();
        let store = RocksDBStore::open(dir.path()).unwrap();

        let member = LoyaltyMember::new("m1", "Ada");
        DocumentStore::insert(&store, member.clone()).await.unwrap();

        let mut stored: LoyaltyMember = DocumentStore::get(&store, "m1").await.unwrap().unwrap();
        assert_eq!(stored, member);

        stored.earn(3_000, None).unwrap();
        let replaced = DocumentStore::replace(&store, stored.clone(), 0).await.unwrap();
        assert_eq!(replaced.version(), 1);

        let conflict = DocumentStore::replace(&store, stored, 0).await;
        assert!(matches!(conflict, Err(LedgerError::VersionConflict { .. })));

        let all: Vec<LoyaltyMember> = DocumentStore::all(&store).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].points(), 3_000);
    }

    #[tokio::test]
    async fn test_rocksdb_collections_are_separate() {
        let dir = tempdir().unwrap();
        let store = RocksDBStore::open(dir.path()).unwrap();

        let bill = Bill::new(
            "shared-id",
            "B1",
            Charges::new(Money::new(dec!(80)), Money::ZERO, Money::ZERO),
        );
        DocumentStore::insert(&store, bill).await.unwrap();
        DocumentStore::insert(&store, LoyaltyMember::new("shared-id", "Ada"))
            .await
            .unwrap();

        let removed: Option<Bill> = DocumentStore::delete(&store, "shared-id").await.unwrap();
        assert!(removed.is_some());

        let member: Option<LoyaltyMember> = DocumentStore::get(&store, "shared-id").await.unwrap();
        assert!(member.is_some());
    }
}
