//! Sequence allocator
//!
//! Ids are `max(existing) + 1`. Each collection has one lane; the lane guard
//! is held from the natural-key check through the insert, so two creates on
//! the same collection never observe the same maximum. The unique primary
//! key in the store still rejects a duplicate if another process races us.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::{DomainResult, Record, RecordRepository};

/// Proof that the caller holds the allocation lane for one collection.
pub struct SequenceLane {
    entity: &'static str,
    _guard: OwnedMutexGuard<()>,
}

impl SequenceLane {
    pub fn entity(&self) -> &'static str {
        self.entity
    }
}

#[derive(Default)]
pub struct SequenceAllocator {
    lanes: DashMap<&'static str, Arc<Mutex<()>>>,
}

impl SequenceAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive allocation rights on `entity`.
    pub async fn lane(&self, entity: &'static str) -> SequenceLane {
        let lock = self
            .lanes
            .entry(entity)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        SequenceLane {
            entity,
            _guard: lock.lock_owned().await,
        }
    }

    /// Next id for `T`. Requires the lane so the read and the following
    /// insert are serialized against other creates.
    pub async fn next_id<T: Record<Id = i32>>(
        &self,
        repo: &dyn RecordRepository<T>,
        lane: &SequenceLane,
    ) -> DomainResult<i32> {
        debug_assert_eq!(lane.entity(), T::ENTITY);
        Ok(repo.max_id().await?.map_or(1, |max| max + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Draft, NewTenant, Ownership, Reseller, Audit};
    use crate::infrastructure::storage::MemoryCollection;

    #[tokio::test]
    async fn empty_collection_starts_at_one() {
        let seq = SequenceAllocator::new();
        let repo = MemoryCollection::<Reseller>::new();
        let lane = seq.lane(Reseller::ENTITY).await;
        assert_eq!(seq.next_id::<Reseller>(&repo, &lane).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn next_id_follows_max() {
        let seq = SequenceAllocator::new();
        let repo = MemoryCollection::<Reseller>::new();
        let row: Reseller = NewTenant {
            name: "R".into(),
            phone_no: "1".into(),
            email_id: "r@x.test".into(),
            address: "a".into(),
        }
        .into_record(41, Ownership::default(), Audit::created("root"));
        repo.insert(&row).await.unwrap();

        let lane = seq.lane(Reseller::ENTITY).await;
        assert_eq!(seq.next_id::<Reseller>(&repo, &lane).await.unwrap(), 42);
    }

    #[tokio::test]
    async fn lanes_are_exclusive_per_entity() {
        let seq = Arc::new(SequenceAllocator::new());
        let held = seq.lane("client").await;

        // A different collection is not blocked.
        let other = tokio::time::timeout(std::time::Duration::from_millis(50), seq.lane("user")).await;
        assert!(other.is_ok());

        let same = tokio::time::timeout(std::time::Duration::from_millis(50), seq.lane("client")).await;
        assert!(same.is_err());

        drop(held);
        let again = tokio::time::timeout(std::time::Duration::from_millis(50), seq.lane("client")).await;
        assert!(again.is_ok());
    }
}
