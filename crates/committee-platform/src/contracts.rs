use chrono::{DateTime, NaiveDate, Utc};
use committee_core::{Committee, DomainEvent, Draw, MonthYear, ShareType, Unit};
use committee_ledger::{CommitteeProgress, MemberRoster, PayingUnit, PaymentGrid};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCommitteeRequest {
    pub name: String,
    pub monthly_amount: Decimal,
    pub duration_months: u32,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub allow_half_share: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddMemberRequest {
    pub name: String,
    pub phone: String,
    #[serde(default = "default_share_type")]
    pub share_type: ShareType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordPaymentRequest {
    pub month: MonthYear,
    pub unit: Unit,
    pub amount: Option<Decimal>,
    pub date_paid: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordDrawRequest {
    pub winner: Unit,
    pub month: Option<MonthYear>,
    pub payout_date: Option<NaiveDate>,
    pub amount: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommitteeSummary {
    pub committee: Committee,
    pub progress: CommitteeProgress,
    pub progress_percent: Decimal,
    pub member_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommitteeDetailResponse {
    pub committee: Committee,
    pub progress: CommitteeProgress,
    pub roster: MemberRoster,
    pub total_payout: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentGridResponse {
    pub committee_id: Uuid,
    pub grid: PaymentGrid,
}

#[derive(Debug, Clone, Serialize)]
pub struct DrawView {
    pub draw: Draw,
    pub winner_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DrawsResponse {
    pub committee_id: Uuid,
    pub history: Vec<DrawView>,
    pub next_month: MonthYear,
    pub eligible: Vec<PayingUnit>,
    pub payout_amount: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventView {
    pub sequence: i64,
    pub stored_at: DateTime<Utc>,
    pub event: DomainEvent,
}

fn default_share_type() -> ShareType {
    ShareType::Full
}
