//! In-memory member directory.

use crate::error::Result;
use crate::ports::MemberDirectory;
use async_trait::async_trait;
use socios_types::{Member, MemberId};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory member directory.
///
/// Stands in for the club's external roster service. Listing returns
/// members sorted by name so runs are deterministic.
#[derive(Default)]
pub struct InMemoryMemberDirectory {
    members: RwLock<HashMap<MemberId, Member>>,
}

impl InMemoryMemberDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a member at construction time.
    pub fn with_member(mut self, member: Member) -> Self {
        self.members.get_mut().insert(member.id, member);
        self
    }

    /// Adds or replaces a member after construction.
    pub async fn upsert(&self, member: Member) {
        self.members.write().await.insert(member.id, member);
    }
}

#[async_trait]
impl MemberDirectory for InMemoryMemberDirectory {
    async fn list_active_members(&self) -> Result<Vec<Member>> {
        let mut active: Vec<Member> = self
            .members
            .read()
            .await
            .values()
            .filter(|m| m.is_billable())
            .cloned()
            .collect();
        active.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        Ok(active)
    }

    async fn get_by_id(&self, id: MemberId) -> Result<Option<Member>> {
        Ok(self.members.read().await.get(&id).cloned())
    }
}
