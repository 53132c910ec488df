use std::sync::Arc;

use committee_core::{EventStore, LedgerError, LedgerResult};
use committee_ledger::{
    Committee, Draw, Ledger, LedgerConfig, Member, NewCommittee, NewDraw, NewMember, NewPayment,
    Payment,
};
use thiserror::Error;
use tokio::sync::{RwLock, RwLockReadGuard};
use tracing::{debug, error, info};

#[derive(Debug, Error)]
pub enum CommitError {
    #[error(transparent)]
    Rejected(#[from] LedgerError),

    #[error("ledger updated but journaling failed: {0:#}")]
    Journal(anyhow::Error),
}

/// Writers are serialized behind one lock, and the events each write
/// produces are journaled before the lock is released, so the journal order
/// matches the ledger order.
pub struct SharedLedger {
    ledger: RwLock<Ledger>,
    store: Arc<dyn EventStore>,
}

impl SharedLedger {
    pub fn new(mut ledger: Ledger, store: Arc<dyn EventStore>) -> Self {
        ledger.set_event_capture(true);
        Self {
            ledger: RwLock::new(ledger),
            store,
        }
    }

    pub async fn restore(config: LedgerConfig, store: Arc<dyn EventStore>) -> anyhow::Result<Self> {
        let envelopes = store.all().await?;
        info!("restoring ledger from {} journaled events", envelopes.len());
        let ledger = Ledger::replay(config, envelopes.into_iter().map(|e| e.event));
        Ok(Self::new(ledger, store))
    }

    pub fn store(&self) -> &Arc<dyn EventStore> {
        &self.store
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, Ledger> {
        self.ledger.read().await
    }

    /// Runs one ledger operation under the write lock and journals the
    /// events it produced. Events a failed append left behind are journaled
    /// first. On a journal failure the operation stays applied and the
    /// unjournaled events wait in the ledger's outbox for the next call.
    pub async fn mutate<T>(
        &self,
        operation: impl FnOnce(&mut Ledger) -> LedgerResult<T>,
    ) -> Result<T, CommitError> {
        let mut ledger = self.ledger.write().await;
        let outcome = operation(&mut *ledger);
        self.journal(&mut ledger).await?;
        Ok(outcome?)
    }

    /// Journals whatever an earlier failed append left in the outbox.
    pub async fn flush(&self) -> Result<usize, CommitError> {
        let mut ledger = self.ledger.write().await;
        self.journal(&mut ledger).await
    }

    async fn journal(&self, ledger: &mut Ledger) -> Result<usize, CommitError> {
        let mut events = ledger.drain_events().into_iter();
        let mut journaled = 0;

        while let Some(event) = events.next() {
            let name = event.name();
            match self.store.append(event.clone()).await {
                Ok(envelope) => {
                    debug!("journaled {} as #{}", name, envelope.sequence);
                    journaled += 1;
                }
                Err(err) => {
                    let mut pending = vec![event];
                    pending.extend(events);
                    error!(
                        "failed to journal {}, {} events left pending: {err:#}",
                        name,
                        pending.len()
                    );
                    ledger.requeue_events(pending);
                    return Err(CommitError::Journal(err));
                }
            }
        }

        Ok(journaled)
    }

    pub async fn create_committee(&self, new: NewCommittee) -> Result<Committee, CommitError> {
        self.mutate(|ledger| ledger.create_committee(new)).await
    }

    pub async fn add_member(&self, new: NewMember) -> Result<Member, CommitError> {
        self.mutate(|ledger| ledger.add_member(new)).await
    }

    pub async fn record_payment(&self, new: NewPayment) -> Result<Payment, CommitError> {
        self.mutate(|ledger| ledger.record_payment(new)).await
    }

    pub async fn record_draw(&self, new: NewDraw) -> Result<Draw, CommitError> {
        self.mutate(|ledger| ledger.record_draw(new)).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::InMemoryEventStore;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use committee_core::{DomainEvent, DomainEventKind, EventEnvelope, ShareType, Unit};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    /// Fails the append with the given 1-based call number, once.
    struct FailingStore {
        inner: InMemoryEventStore,
        calls: AtomicUsize,
        fail_on: usize,
    }

    impl FailingStore {
        fn failing_on(fail_on: usize) -> Self {
            Self {
                inner: InMemoryEventStore::default(),
                calls: AtomicUsize::new(0),
                fail_on,
            }
        }
    }

    #[async_trait]
    impl EventStore for FailingStore {
        async fn append(&self, event: DomainEvent) -> anyhow::Result<EventEnvelope> {
            if self.calls.fetch_add(1, Ordering::SeqCst) + 1 == self.fail_on {
                anyhow::bail!("journal unavailable");
            }
            self.inner.append(event).await
        }

        async fn stream(&self, committee_id: Uuid) -> anyhow::Result<Vec<EventEnvelope>> {
            self.inner.stream(committee_id).await
        }

        async fn all(&self) -> anyhow::Result<Vec<EventEnvelope>> {
            self.inner.all().await
        }
    }

    fn new_committee() -> NewCommittee {
        NewCommittee {
            name: "Friends Savings 2024".to_string(),
            monthly_amount: dec!(5000),
            duration_months: 12,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            allow_half_share: true,
        }
    }

    fn new_member(committee: &Committee, name: &str, share_type: ShareType) -> NewMember {
        NewMember {
            committee_id: committee.id,
            name: name.to_string(),
            phone: "555-0100".to_string(),
            share_type,
        }
    }

    fn shared() -> (SharedLedger, Arc<InMemoryEventStore>) {
        let store = Arc::new(InMemoryEventStore::default());
        let shared = SharedLedger::new(Ledger::default(), store.clone());
        (shared, store)
    }

    #[tokio::test]
    async fn journals_every_event_in_sequence() {
        let (shared, store) = shared();
        let committee = shared.create_committee(new_committee()).await.unwrap();
        shared
            .add_member(new_member(&committee, "Bob", ShareType::Half))
            .await
            .unwrap();
        shared
            .add_member(new_member(&committee, "Charlie", ShareType::Half))
            .await
            .unwrap();

        let journal = store.all().await.unwrap();
        let sequences: Vec<i64> = journal.iter().map(|e| e.sequence).collect();
        assert_eq!(sequences, [1, 2, 3, 4]);
        assert!(matches!(
            journal[3].event.kind,
            DomainEventKind::MembersPaired { .. }
        ));
        assert_eq!(store.stream(committee.id).await.unwrap().len(), 4);
        assert!(store.stream(Uuid::new_v4()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejected_operations_journal_nothing() {
        let (shared, store) = shared();
        let committee = shared.create_committee(new_committee()).await.unwrap();

        let err = shared
            .record_payment(NewPayment {
                committee_id: committee.id,
                month: "2024-01".parse().unwrap(),
                unit: Unit::Single(Uuid::new_v4()),
                amount: dec!(5000),
                date_paid: NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CommitError::Rejected(LedgerError::InvalidReference { .. })
        ));
        assert_eq!(store.all().await.unwrap().len(), 1);
        assert!(shared.read().await.payments().is_empty());
    }

    #[tokio::test]
    async fn restore_replays_the_journal() {
        let (shared, store) = shared();
        shared.mutate(committee_ledger::seed::demo).await.unwrap();

        let restored = SharedLedger::restore(LedgerConfig::default(), store)
            .await
            .unwrap();

        let original = shared.read().await;
        let rebuilt = restored.read().await;
        assert_eq!(rebuilt.committees(), original.committees());
        assert_eq!(rebuilt.members(), original.members());
        assert_eq!(rebuilt.payments(), original.payments());
        assert_eq!(rebuilt.draws(), original.draws());
    }

    #[tokio::test]
    async fn failed_append_keeps_the_rest_of_the_batch_pending() {
        let store = Arc::new(FailingStore::failing_on(3));
        let shared = SharedLedger::new(Ledger::default(), store.clone());
        let committee = shared.create_committee(new_committee()).await.unwrap();
        shared
            .add_member(new_member(&committee, "Bob", ShareType::Half))
            .await
            .unwrap();

        let err = shared
            .add_member(new_member(&committee, "Charlie", ShareType::Half))
            .await
            .unwrap_err();
        assert!(matches!(err, CommitError::Journal(_)));
        assert_eq!(shared.read().await.members().len(), 2);
        assert_eq!(shared.read().await.pending_events(), 2);
        assert_eq!(store.all().await.unwrap().len(), 2);

        assert_eq!(shared.flush().await.unwrap(), 2);
        assert_eq!(shared.read().await.pending_events(), 0);

        let restored = SharedLedger::restore(LedgerConfig::default(), store.clone())
            .await
            .unwrap();
        let live = shared.read().await;
        let rebuilt = restored.read().await;
        assert_eq!(rebuilt.members(), live.members());
        assert_eq!(
            rebuilt.members().iter().filter(|m| m.pair_id.is_some()).count(),
            2
        );
    }

    #[tokio::test]
    async fn next_write_journals_pending_events_first() {
        let store = Arc::new(FailingStore::failing_on(2));
        let shared = SharedLedger::new(Ledger::default(), store.clone());
        let committee = shared.create_committee(new_committee()).await.unwrap();
        assert!(
            shared
                .add_member(new_member(&committee, "Alice", ShareType::Full))
                .await
                .is_err()
        );

        shared
            .add_member(new_member(&committee, "Dana", ShareType::Full))
            .await
            .unwrap();

        let journal = store.all().await.unwrap();
        let added: Vec<String> = journal
            .iter()
            .filter_map(|envelope| match &envelope.event.kind {
                DomainEventKind::MemberAdded(member) => Some(member.name.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(journal.len(), 3);
        assert_eq!(added, ["Alice", "Dana"]);
    }

    #[tokio::test]
    async fn shared_ledger_always_captures_events() {
        let store = Arc::new(InMemoryEventStore::default());
        let ledger = Ledger::new(LedgerConfig {
            capture_events: false,
            ..LedgerConfig::default()
        });
        let shared = SharedLedger::new(ledger, store.clone());
        shared.create_committee(new_committee()).await.unwrap();
        assert_eq!(store.all().await.unwrap().len(), 1);
    }
}
