use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Committee, Draw, Member, Payment};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum DomainEventKind {
    CommitteeCreated(Committee),
    MemberAdded(Member),
    MembersPaired { pair_id: Uuid, members: [Uuid; 2] },
    PaymentRecorded(Payment),
    DrawRecorded(Draw),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DomainEvent {
    pub id: Uuid,
    pub committee_id: Uuid,
    pub kind: DomainEventKind,
    pub occurred_at: DateTime<Utc>,
}

impl DomainEvent {
    pub fn new(committee_id: Uuid, kind: DomainEventKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            committee_id,
            kind,
            occurred_at: Utc::now(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self.kind {
            DomainEventKind::CommitteeCreated(_) => "committee_created",
            DomainEventKind::MemberAdded(_) => "member_added",
            DomainEventKind::MembersPaired { .. } => "members_paired",
            DomainEventKind::PaymentRecorded(_) => "payment_recorded",
            DomainEventKind::DrawRecorded(_) => "draw_recorded",
        }
    }
}
