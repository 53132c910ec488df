use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::events::DomainEvent;

#[derive(Debug, Clone)]
pub struct EventEnvelope {
    pub sequence: i64,
    pub event: DomainEvent,
    pub stored_at: DateTime<Utc>,
}

#[async_trait]
pub trait EventStore: Send + Sync {
    async fn append(&self, event: DomainEvent) -> anyhow::Result<EventEnvelope>;
    async fn stream(&self, committee_id: Uuid) -> anyhow::Result<Vec<EventEnvelope>>;
    async fn all(&self) -> anyhow::Result<Vec<EventEnvelope>>;
}
