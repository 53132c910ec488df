use chrono::NaiveDate;
use committee_core::{
    Committee, DomainEvent, DomainEventKind, Draw, LedgerResult, Member, MonthYear, Payment,
    ShareType, Unit,
};
use rust_decimal::Decimal;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::{LedgerConfig, ValidationMode};
use crate::penalty;
use crate::validation;

#[derive(Debug, Clone)]
pub struct NewCommittee {
    pub name: String,
    pub monthly_amount: Decimal,
    pub duration_months: u32,
    pub start_date: NaiveDate,
    pub allow_half_share: bool,
}

#[derive(Debug, Clone)]
pub struct NewMember {
    pub committee_id: Uuid,
    pub name: String,
    pub phone: String,
    pub share_type: ShareType,
}

#[derive(Debug, Clone)]
pub struct NewPayment {
    pub committee_id: Uuid,
    pub month: MonthYear,
    pub unit: Unit,
    pub amount: Decimal,
    pub date_paid: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct NewDraw {
    pub committee_id: Uuid,
    pub month: MonthYear,
    pub winner: Unit,
    pub payout_date: NaiveDate,
    pub amount: Decimal,
}

/// Collections only grow; the one in-place mutation is assigning a pairing
/// id to a waiting half member.
#[derive(Debug, Default)]
pub struct Ledger {
    config: LedgerConfig,
    committees: Vec<Committee>,
    members: Vec<Member>,
    payments: Vec<Payment>,
    draws: Vec<Draw>,
    outbox: Vec<DomainEvent>,
}

impl Ledger {
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Records are taken verbatim: no validation, no new ids, nothing queued.
    pub fn replay(config: LedgerConfig, events: impl IntoIterator<Item = DomainEvent>) -> Self {
        let mut ledger = Self::new(config);
        let mut applied = 0usize;
        for event in events {
            ledger.apply(event.kind);
            applied += 1;
        }
        debug!("replayed {} ledger events", applied);
        ledger
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn committees(&self) -> &[Committee] {
        &self.committees
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    pub fn draws(&self) -> &[Draw] {
        &self.draws
    }

    pub fn committee(&self, committee_id: Uuid) -> Option<&Committee> {
        self.committees.iter().find(|c| c.id == committee_id)
    }

    pub fn members_of(&self, committee_id: Uuid) -> impl Iterator<Item = &Member> {
        self.members
            .iter()
            .filter(move |m| m.committee_id == committee_id)
    }

    pub fn payments_of(&self, committee_id: Uuid) -> impl Iterator<Item = &Payment> {
        self.payments
            .iter()
            .filter(move |p| p.committee_id == committee_id)
    }

    pub fn draws_of(&self, committee_id: Uuid) -> impl Iterator<Item = &Draw> {
        self.draws
            .iter()
            .filter(move |d| d.committee_id == committee_id)
    }

    pub fn drain_events(&mut self) -> Vec<DomainEvent> {
        std::mem::take(&mut self.outbox)
    }

    /// Puts events that could not be delivered back at the head of the
    /// outbox, ahead of anything queued since.
    pub fn requeue_events(&mut self, events: Vec<DomainEvent>) {
        if !events.is_empty() {
            self.outbox.splice(0..0, events);
        }
    }

    pub fn pending_events(&self) -> usize {
        self.outbox.len()
    }

    pub fn set_event_capture(&mut self, enabled: bool) {
        self.config.capture_events = enabled;
    }

    pub fn create_committee(&mut self, new: NewCommittee) -> LedgerResult<Committee> {
        if self.is_strict() {
            validation::check_committee(&new)?;
        }

        let committee = Committee {
            id: Uuid::new_v4(),
            name: new.name,
            monthly_amount: new.monthly_amount,
            duration_months: new.duration_months,
            start_date: new.start_date,
            allow_half_share: new.allow_half_share,
        };

        self.committees.push(committee.clone());
        self.emit(
            committee.id,
            DomainEventKind::CommitteeCreated(committee.clone()),
        );
        info!("committee {} ({}) created", committee.id, committee.name);

        Ok(committee)
    }

    /// Adds a member. A half member is paired with the earliest waiting half
    /// member of the same committee, or waits for the next one.
    pub fn add_member(&mut self, new: NewMember) -> LedgerResult<Member> {
        if self.is_strict() {
            validation::check_member(self, &new)?;
        }

        let mut member = Member {
            id: Uuid::new_v4(),
            committee_id: new.committee_id,
            name: new.name,
            phone: new.phone,
            share_type: new.share_type,
            pair_id: None,
        };

        let mut partner_id = None;
        if member.share_type == ShareType::Half {
            if let Some(partner) = self
                .members
                .iter_mut()
                .find(|m| m.committee_id == member.committee_id && m.is_unpaired_half())
            {
                let pair_id = Uuid::new_v4();
                partner.pair_id = Some(pair_id);
                member.pair_id = Some(pair_id);
                partner_id = Some(partner.id);
            }
        }

        self.members.push(member.clone());
        self.emit(
            member.committee_id,
            DomainEventKind::MemberAdded(member.clone()),
        );

        match (partner_id, member.pair_id) {
            (Some(partner_id), Some(pair_id)) => {
                self.emit(
                    member.committee_id,
                    DomainEventKind::MembersPaired {
                        pair_id,
                        members: [partner_id, member.id],
                    },
                );
                info!(
                    "member {} paired with {} as {}",
                    member.id, partner_id, pair_id
                );
            }
            _ if member.share_type == ShareType::Half => {
                info!("half member {} waiting for a partner", member.id);
            }
            _ => info!("member {} joined committee {}", member.id, member.committee_id),
        }

        Ok(member)
    }

    pub fn record_payment(&mut self, new: NewPayment) -> LedgerResult<Payment> {
        if self.is_strict() {
            validation::check_payment(self, &new)?;
        }

        let due = penalty::due_date(new.month, self.config.due_day);
        let late_days = penalty::late_days(due, new.date_paid);

        let payment = Payment {
            id: Uuid::new_v4(),
            committee_id: new.committee_id,
            month: new.month,
            unit: new.unit,
            amount: new.amount,
            date_paid: new.date_paid,
            late_days,
            demerit_points: penalty::demerit_points(late_days),
        };

        self.payments.push(payment.clone());
        self.emit(
            payment.committee_id,
            DomainEventKind::PaymentRecorded(payment.clone()),
        );
        info!(
            "payment {} recorded for {} in {} ({} days late)",
            payment.id, payment.unit, payment.month, payment.late_days
        );

        Ok(payment)
    }

    pub fn record_draw(&mut self, new: NewDraw) -> LedgerResult<Draw> {
        if self.is_strict() {
            validation::check_draw(self, &new)?;
        }

        let draw = Draw {
            id: Uuid::new_v4(),
            committee_id: new.committee_id,
            month: new.month,
            winner: new.winner,
            payout_date: new.payout_date,
            amount: new.amount,
        };

        self.draws.push(draw.clone());
        self.emit(draw.committee_id, DomainEventKind::DrawRecorded(draw.clone()));
        info!(
            "draw {} for {} won by {} ({})",
            draw.id, draw.month, draw.winner, draw.amount
        );

        Ok(draw)
    }

    fn is_strict(&self) -> bool {
        self.config.validation == ValidationMode::Strict
    }

    fn emit(&mut self, committee_id: Uuid, kind: DomainEventKind) {
        if !self.config.capture_events {
            return;
        }
        self.outbox.push(DomainEvent::new(committee_id, kind));
    }

    fn apply(&mut self, kind: DomainEventKind) {
        match kind {
            DomainEventKind::CommitteeCreated(committee) => self.committees.push(committee),
            DomainEventKind::MemberAdded(member) => self.members.push(member),
            DomainEventKind::MembersPaired { pair_id, members } => {
                for member in self.members.iter_mut().filter(|m| members.contains(&m.id)) {
                    member.pair_id = Some(pair_id);
                }
            }
            DomainEventKind::PaymentRecorded(payment) => self.payments.push(payment),
            DomainEventKind::DrawRecorded(draw) => self.draws.push(draw),
        }
    }
}
