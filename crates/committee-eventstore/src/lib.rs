mod shared;

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use committee_core::{DomainEvent, EventEnvelope, EventStore};
use tokio::sync::RwLock;
use uuid::Uuid;

pub use shared::{CommitError, SharedLedger};

#[derive(Default)]
pub struct InMemoryEventStore {
    envelopes: RwLock<Vec<EventEnvelope>>,
    by_committee: RwLock<HashMap<Uuid, Vec<usize>>>,
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn append(&self, event: DomainEvent) -> anyhow::Result<EventEnvelope> {
        let mut envelopes = self.envelopes.write().await;
        let envelope = EventEnvelope {
            sequence: envelopes.len() as i64 + 1,
            event,
            stored_at: Utc::now(),
        };

        let mut by_committee = self.by_committee.write().await;
        by_committee
            .entry(envelope.event.committee_id)
            .or_default()
            .push(envelopes.len());
        envelopes.push(envelope.clone());

        Ok(envelope)
    }

    async fn stream(&self, committee_id: Uuid) -> anyhow::Result<Vec<EventEnvelope>> {
        let envelopes = self.envelopes.read().await;
        let by_committee = self.by_committee.read().await;
        Ok(by_committee
            .get(&committee_id)
            .map(|positions| positions.iter().map(|&i| envelopes[i].clone()).collect())
            .unwrap_or_default())
    }

    async fn all(&self) -> anyhow::Result<Vec<EventEnvelope>> {
        Ok(self.envelopes.read().await.clone())
    }
}
