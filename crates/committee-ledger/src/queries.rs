use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDate;
use committee_core::{
    Committee, Draw, LedgerError, LedgerResult, Member, MonthYear, Payment, ShareType, Unit,
};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::ledger::Ledger;

const UNKNOWN_UNIT: &str = "Unknown";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PayingUnit {
    pub unit: Unit,
    pub name: String,
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PaymentStatus {
    Unpaid,
    Paid,
    Late { days: u32 },
}

impl PaymentStatus {
    pub fn of(payment: Option<&Payment>) -> Self {
        match payment {
            None => Self::Unpaid,
            Some(p) if p.late_days == 0 => Self::Paid,
            Some(p) => Self::Late { days: p.late_days },
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unpaid => f.write_str("Unpaid"),
            Self::Paid => f.write_str("Paid"),
            Self::Late { days: 1 } => f.write_str("Late (1 day)"),
            Self::Late { days } => write!(f, "Late ({days} days)"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct CommitteeProgress {
    pub months_elapsed: u32,
    pub duration_months: u32,
    pub fraction: Decimal,
    pub complete: bool,
}

impl CommitteeProgress {
    pub fn of(committee: &Committee, today: NaiveDate) -> Self {
        let elapsed = MonthYear::of(today)
            .months_since(committee.start_month())
            .max(0);
        let months_elapsed = u32::try_from(elapsed).unwrap_or(u32::MAX);
        let duration = committee.duration_months;

        let fraction = if duration == 0 {
            Decimal::ONE
        } else {
            (Decimal::from(months_elapsed) / Decimal::from(duration)).min(Decimal::ONE)
        };

        Self {
            months_elapsed,
            duration_months: duration,
            fraction,
            complete: months_elapsed >= duration,
        }
    }

    pub fn months_completed(&self) -> u32 {
        self.months_elapsed.min(self.duration_months)
    }

    pub fn percent(&self) -> Decimal {
        self.fraction * Decimal::ONE_HUNDRED
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MemberRoster {
    pub full: Vec<Member>,
    pub pairs: Vec<PayingUnit>,
    pub unpaired_half: Vec<Member>,
    pub member_count: usize,
    pub capacity: u32,
}

impl MemberRoster {
    pub fn has_unpaired_half(&self) -> bool {
        !self.unpaired_half.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PaymentCell {
    pub month: MonthYear,
    pub status: PaymentStatus,
    pub payment: Option<Payment>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PaymentRow {
    pub unit: Unit,
    pub name: String,
    pub demerit_total: u32,
    pub cells: Vec<PaymentCell>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PaymentGrid {
    pub months: Vec<MonthYear>,
    pub rows: Vec<PaymentRow>,
}

impl Ledger {
    fn require_committee(&self, committee_id: Uuid) -> LedgerResult<&Committee> {
        self.committee(committee_id)
            .ok_or_else(|| LedgerError::missing("committee", committee_id))
    }

    /// Full members in creation order, then complete pairs in order of their
    /// first member.
    pub fn paying_units(&self, committee_id: Uuid) -> Vec<PayingUnit> {
        let mut singles = Vec::new();
        let mut pairs: Vec<PayingUnit> = Vec::new();

        for member in self.members_of(committee_id) {
            match (member.share_type, member.pair_id) {
                (ShareType::Full, _) => singles.push(PayingUnit {
                    unit: Unit::Single(member.id),
                    name: member.name.clone(),
                    members: vec![member.clone()],
                }),
                (ShareType::Half, Some(pair_id)) => {
                    let unit = Unit::Pair(pair_id);
                    match pairs.iter().position(|p| p.unit == unit) {
                        Some(index) => pairs[index].members.push(member.clone()),
                        None => pairs.push(PayingUnit {
                            unit,
                            name: String::new(),
                            members: vec![member.clone()],
                        }),
                    }
                }
                (ShareType::Half, None) => {}
            }
        }

        pairs.retain(|pair| pair.members.len() == 2);
        for pair in &mut pairs {
            pair.name = join_names(&pair.members);
        }

        singles.extend(pairs);
        singles
    }

    pub fn winners(&self, committee_id: Uuid) -> HashSet<Unit> {
        self.draws_of(committee_id).map(|d| d.winner).collect()
    }

    pub fn has_won(&self, committee_id: Uuid, unit: Unit) -> bool {
        self.draws_of(committee_id).any(|d| d.winner == unit)
    }

    pub fn eligible_winners(&self, committee_id: Uuid) -> Vec<PayingUnit> {
        let winners = self.winners(committee_id);
        self.paying_units(committee_id)
            .into_iter()
            .filter(|u| !winners.contains(&u.unit))
            .collect()
    }

    pub fn payment_for(&self, committee_id: Uuid, unit: Unit, month: MonthYear) -> Option<&Payment> {
        self.payments_of(committee_id)
            .find(|p| p.unit == unit && p.month == month)
    }

    pub fn payment_status(&self, committee_id: Uuid, unit: Unit, month: MonthYear) -> PaymentStatus {
        PaymentStatus::of(self.payment_for(committee_id, unit, month))
    }

    pub fn demerit_total(&self, committee_id: Uuid, unit: Unit) -> u32 {
        self.payments_of(committee_id)
            .filter(|p| p.unit == unit)
            .fold(0u32, |total, p| total.saturating_add(p.demerit_points))
    }

    pub fn progress(&self, committee_id: Uuid, today: NaiveDate) -> LedgerResult<CommitteeProgress> {
        let committee = self.require_committee(committee_id)?;
        Ok(CommitteeProgress::of(committee, today))
    }

    pub fn roster(&self, committee_id: Uuid) -> LedgerResult<MemberRoster> {
        let committee = self.require_committee(committee_id)?;
        let members: Vec<&Member> = self.members_of(committee_id).collect();

        let full = members
            .iter()
            .filter(|m| m.share_type == ShareType::Full)
            .map(|m| (*m).clone())
            .collect();
        let unpaired_half = members
            .iter()
            .filter(|m| m.is_unpaired_half())
            .map(|m| (*m).clone())
            .collect();
        let pairs = self
            .paying_units(committee_id)
            .into_iter()
            .filter(|u| matches!(u.unit, Unit::Pair(_)))
            .collect();

        Ok(MemberRoster {
            full,
            pairs,
            unpaired_half,
            member_count: members.len(),
            capacity: committee.duration_months,
        })
    }

    pub fn payment_grid(&self, committee_id: Uuid) -> LedgerResult<PaymentGrid> {
        let committee = self.require_committee(committee_id)?;
        let months = committee.schedule();

        let rows = self
            .paying_units(committee_id)
            .into_iter()
            .map(|paying| {
                let cells = months
                    .iter()
                    .map(|&month| {
                        let payment = self.payment_for(committee_id, paying.unit, month);
                        PaymentCell {
                            month,
                            status: PaymentStatus::of(payment),
                            payment: payment.cloned(),
                        }
                    })
                    .collect();
                PaymentRow {
                    unit: paying.unit,
                    demerit_total: self.demerit_total(committee_id, paying.unit),
                    name: paying.name,
                    cells,
                }
            })
            .collect();

        Ok(PaymentGrid { months, rows })
    }

    pub fn unit_name(&self, committee_id: Uuid, unit: Unit) -> String {
        let members: Vec<Member> = match unit {
            Unit::Single(member_id) => self
                .members_of(committee_id)
                .filter(|m| m.id == member_id)
                .cloned()
                .collect(),
            Unit::Pair(pair_id) => self
                .members_of(committee_id)
                .filter(|m| m.pair_id == Some(pair_id))
                .cloned()
                .collect(),
        };
        if members.is_empty() {
            return UNKNOWN_UNIT.to_string();
        }
        join_names(&members)
    }

    pub fn draw_history(&self, committee_id: Uuid) -> Vec<&Draw> {
        self.draws_of(committee_id).collect()
    }

    pub fn next_draw_month(&self, committee_id: Uuid) -> LedgerResult<MonthYear> {
        let committee = self.require_committee(committee_id)?;
        let drawn = u32::try_from(self.draws_of(committee_id).count()).unwrap_or(u32::MAX);
        committee
            .start_month()
            .plus_months(drawn)
            .ok_or_else(|| LedgerError::malformed("next draw month is out of range"))
    }
}

fn join_names(members: &[Member]) -> String {
    members
        .iter()
        .map(|m| m.name.as_str())
        .collect::<Vec<_>>()
        .join(" & ")
}
