//! In-memory share repository.

use crate::domain::{Period, PricedShare, Share, ShareDraft, ShareState};
use crate::error::Result;
use crate::ports::{ShareAmountUpdate, ShareRepository};
use async_trait::async_trait;
use socios_types::{MemberId, ShareId};
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;

/// In-memory share repository.
///
/// Stands in for the external document store. Both bulk operations apply
/// under a single write lock, which is this adapter's equivalent of the
/// store's atomic batch call, and `bulk_insert` enforces the unique
/// `(member, period)` constraint with insert-if-absent semantics.
#[derive(Default)]
pub struct InMemoryShareRepository {
    shares: RwLock<HashMap<ShareId, Share>>,
}

impl InMemoryShareRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a pre-built share, bypassing draft pricing. Intended for
    /// seeding scenarios (paid shares, prior-month leftovers).
    pub async fn seed(&self, share: Share) {
        self.shares.write().await.insert(share.id, share);
    }

    /// Point lookup by id.
    pub async fn get(&self, id: ShareId) -> Option<Share> {
        self.shares.read().await.get(&id).cloned()
    }

    /// Every stored share, unordered.
    pub async fn all(&self) -> Vec<Share> {
        self.shares.read().await.values().cloned().collect()
    }
}

#[async_trait]
impl ShareRepository for InMemoryShareRepository {
    async fn find_by_period(&self, period: Period, member_ids: &[MemberId]) -> Result<Vec<Share>> {
        let wanted: HashSet<MemberId> = member_ids.iter().copied().collect();
        Ok(self
            .shares
            .read()
            .await
            .values()
            .filter(|s| s.period == period && wanted.contains(&s.member_id))
            .cloned()
            .collect())
    }

    async fn find_by_states(&self, states: &[ShareState]) -> Result<Vec<Share>> {
        Ok(self
            .shares
            .read()
            .await
            .values()
            .filter(|s| states.contains(&s.state))
            .cloned()
            .collect())
    }

    async fn bulk_insert(&self, drafts: Vec<ShareDraft>) -> Result<Vec<Share>> {
        let mut shares = self.shares.write().await;

        // Keys already covered, plus keys covered earlier in this batch.
        let mut covered: HashSet<(MemberId, Period)> = shares
            .values()
            .map(|s| (s.member_id, s.period))
            .collect();

        let mut created = Vec::new();
        for draft in drafts {
            if !covered.insert((draft.member_id, draft.period)) {
                continue;
            }
            let share = Share::from_draft(draft);
            shares.insert(share.id, share.clone());
            created.push(share);
        }
        Ok(created)
    }

    async fn bulk_update(&self, updates: Vec<ShareAmountUpdate>) -> Result<usize> {
        let mut shares = self.shares.write().await;
        let mut applied = 0;
        for update in updates {
            if let Some(share) = shares.get_mut(&update.id) {
                let priced = PricedShare {
                    amount: update.amount,
                    state: update.state,
                };
                // Paid shares reject the transition; the update is dropped.
                if share.reprice(&priced, None).is_ok() {
                    applied += 1;
                }
            }
        }
        Ok(applied)
    }
}
