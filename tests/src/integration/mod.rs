//! Cross-crate billing choreography tests.

pub mod billing_flows;

use chrono::{DateTime, Utc};
use socios_billing::adapters::{
    InMemoryConfigStore, InMemoryMemberDirectory, InMemoryShareRepository,
};
use socios_billing::test_utils::{ManualClock, RecordingNotifier};
use socios_billing::{BillingConfig, BillingService, CONFIG_KEY_BASE_AMOUNT};
use socios_types::{Member, MemberId};
use std::sync::Arc;

/// A fully wired engine over in-memory collaborators, with handles to
/// every fake so tests can inspect and perturb them.
pub struct Harness {
    pub service: Arc<BillingService>,
    pub config_store: Arc<InMemoryConfigStore>,
    pub directory: Arc<InMemoryMemberDirectory>,
    pub repository: Arc<InMemoryShareRepository>,
    pub notifier: Arc<RecordingNotifier>,
    pub clock: Arc<ManualClock>,
}

/// Builds a harness with the given roster, configured base amount and
/// starting instant.
pub async fn harness(
    base: i64,
    members: Vec<Member>,
    notifier: RecordingNotifier,
    now: DateTime<Utc>,
) -> Harness {
    let config_store = Arc::new(
        InMemoryConfigStore::new().with_value(CONFIG_KEY_BASE_AMOUNT, &base.to_string()),
    );
    let directory = Arc::new(InMemoryMemberDirectory::new());
    for member in members {
        directory.upsert(member).await;
    }
    let repository = Arc::new(InMemoryShareRepository::new());
    let notifier = Arc::new(notifier);
    let clock = Arc::new(ManualClock::new(now));

    let service = Arc::new(BillingService::new(
        BillingConfig::default(),
        config_store.clone(),
        directory.clone(),
        repository.clone(),
        notifier.clone(),
        clock.clone(),
    ));

    Harness {
        service,
        config_store,
        directory,
        repository,
        notifier,
        clock,
    }
}

/// An active member with explicit contact and discount settings.
pub fn member(name: &str, has_sibling_discount: bool, email: Option<&str>) -> Member {
    Member {
        id: MemberId::new(),
        full_name: name.to_string(),
        active: true,
        has_sibling_discount,
        email: email.map(str::to_string),
    }
}
