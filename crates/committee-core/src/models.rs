use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calendar::MonthYear;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Committee {
    pub id: Uuid,
    pub name: String,
    pub monthly_amount: Decimal,
    pub duration_months: u32,
    pub start_date: NaiveDate,
    pub allow_half_share: bool,
}

impl Committee {
    pub fn start_month(&self) -> MonthYear {
        MonthYear::of(self.start_date)
    }

    pub fn total_payout(&self) -> Decimal {
        self.monthly_amount * Decimal::from(self.duration_months)
    }

    pub fn schedule(&self) -> Vec<MonthYear> {
        let start = self.start_month();
        (0..self.duration_months)
            .map_while(|offset| start.plus_months(offset))
            .collect()
    }

    pub fn covers(&self, month: MonthYear) -> bool {
        let offset = month.months_since(self.start_month());
        offset >= 0 && offset < i64::from(self.duration_months)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ShareType {
    Full,
    Half,
}

impl fmt::Display for ShareType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShareType::Full => f.write_str("Full"),
            ShareType::Half => f.write_str("Half"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Member {
    pub id: Uuid,
    pub committee_id: Uuid,
    pub name: String,
    pub phone: String,
    pub share_type: ShareType,
    pub pair_id: Option<Uuid>,
}

impl Member {
    pub fn is_unpaired_half(&self) -> bool {
        self.share_type == ShareType::Half && self.pair_id.is_none()
    }

    /// `None` for a half member still waiting for a partner.
    pub fn unit(&self) -> Option<Unit> {
        match (self.share_type, self.pair_id) {
            (ShareType::Full, _) => Some(Unit::Single(self.id)),
            (ShareType::Half, Some(pair_id)) => Some(Unit::Pair(pair_id)),
            (ShareType::Half, None) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Unit {
    Single(Uuid),
    Pair(Uuid),
}

impl Unit {
    pub fn id(&self) -> Uuid {
        match self {
            Unit::Single(id) | Unit::Pair(id) => *id,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Single(id) => write!(f, "member {id}"),
            Unit::Pair(id) => write!(f, "pair {id}"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Payment {
    pub id: Uuid,
    pub committee_id: Uuid,
    pub month: MonthYear,
    pub unit: Unit,
    pub amount: Decimal,
    pub date_paid: NaiveDate,
    pub late_days: u32,
    pub demerit_points: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Draw {
    pub id: Uuid,
    pub committee_id: Uuid,
    pub month: MonthYear,
    pub winner: Unit,
    pub payout_date: NaiveDate,
    pub amount: Decimal,
}
