use chrono::NaiveDate;
use committee_core::{LedgerError, LedgerResult, MonthYear, ShareType, Unit};
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use crate::ledger::{Ledger, NewCommittee, NewDraw, NewMember, NewPayment};

fn date(year: i32, month: u32, day: u32) -> LedgerResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| LedgerError::malformed(format!("invalid date {year}-{month}-{day}")))
}

fn member(committee_id: Uuid, name: &str, phone: &str, share_type: ShareType) -> NewMember {
    NewMember {
        committee_id,
        name: name.to_string(),
        phone: phone.to_string(),
        share_type,
    }
}

pub fn demo(ledger: &mut Ledger) -> LedgerResult<()> {
    let friends = ledger.create_committee(NewCommittee {
        name: "Friends Savings 2024".to_string(),
        monthly_amount: Decimal::from(5000),
        duration_months: 12,
        start_date: date(2024, 1, 1)?,
        allow_half_share: true,
    })?;
    let office = ledger.create_committee(NewCommittee {
        name: "Office Fund".to_string(),
        monthly_amount: Decimal::from(10000),
        duration_months: 10,
        start_date: date(2024, 3, 1)?,
        allow_half_share: false,
    })?;

    let alice = ledger.add_member(member(friends.id, "Alice", "123-456-7890", ShareType::Full))?;
    ledger.add_member(member(friends.id, "Bob", "123-456-7891", ShareType::Half))?;
    let charlie = ledger.add_member(member(friends.id, "Charlie", "123-456-7892", ShareType::Half))?;
    ledger.add_member(member(office.id, "David", "123-456-7893", ShareType::Full))?;

    let pair = charlie
        .unit()
        .ok_or_else(|| LedgerError::malformed("Bob and Charlie were not paired"))?;
    let january = MonthYear::new(2024, 1)?;

    ledger.record_payment(NewPayment {
        committee_id: friends.id,
        month: january,
        unit: Unit::Single(alice.id),
        amount: friends.monthly_amount,
        date_paid: date(2024, 1, 8)?,
    })?;
    ledger.record_payment(NewPayment {
        committee_id: friends.id,
        month: january,
        unit: pair,
        amount: friends.monthly_amount,
        date_paid: date(2024, 1, 12)?,
    })?;
    ledger.record_draw(NewDraw {
        committee_id: friends.id,
        month: january,
        winner: Unit::Single(alice.id),
        payout_date: date(2024, 1, 15)?,
        amount: friends.total_payout(),
    })?;

    info!("demo data loaded");
    Ok(())
}
