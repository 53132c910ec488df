use committee_core::{Committee, LedgerError, LedgerResult, MonthYear, ShareType, Unit};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::ledger::{Ledger, NewCommittee, NewDraw, NewMember, NewPayment};

pub(crate) fn check_committee(new: &NewCommittee) -> LedgerResult<()> {
    require_text("name", &new.name)?;
    require_positive("monthly_amount", new.monthly_amount)?;
    if new.duration_months == 0 {
        return Err(LedgerError::malformed("duration_months must be positive"));
    }
    Ok(())
}

pub(crate) fn check_member(ledger: &Ledger, new: &NewMember) -> LedgerResult<()> {
    let committee = require_committee(ledger, new.committee_id)?;
    require_text("name", &new.name)?;
    require_text("phone", &new.phone)?;
    if new.share_type == ShareType::Half && !committee.allow_half_share {
        return Err(LedgerError::malformed(format!(
            "committee {} does not allow half shares",
            committee.id
        )));
    }
    Ok(())
}

pub(crate) fn check_payment(ledger: &Ledger, new: &NewPayment) -> LedgerResult<()> {
    let committee = require_committee(ledger, new.committee_id)?;
    require_unit(ledger, committee.id, new.unit)?;
    require_scheduled(committee, new.month)?;
    require_positive("amount", new.amount)?;
    if ledger
        .payment_for(committee.id, new.unit, new.month)
        .is_some()
    {
        return Err(LedgerError::DuplicatePayment {
            unit: new.unit,
            month: new.month,
        });
    }
    Ok(())
}

pub(crate) fn check_draw(ledger: &Ledger, new: &NewDraw) -> LedgerResult<()> {
    let committee = require_committee(ledger, new.committee_id)?;
    require_unit(ledger, committee.id, new.winner)?;
    require_scheduled(committee, new.month)?;
    require_positive("amount", new.amount)?;
    if ledger.has_won(committee.id, new.winner) {
        return Err(LedgerError::DuplicateWinner { unit: new.winner });
    }
    Ok(())
}

fn require_committee(ledger: &Ledger, committee_id: Uuid) -> LedgerResult<&Committee> {
    ledger
        .committee(committee_id)
        .ok_or_else(|| LedgerError::missing("committee", committee_id))
}

/// A single must be a full member of the committee; a pair must have both
/// halves present.
fn require_unit(ledger: &Ledger, committee_id: Uuid, unit: Unit) -> LedgerResult<()> {
    let known = ledger
        .paying_units(committee_id)
        .iter()
        .any(|candidate| candidate.unit == unit);
    if known {
        return Ok(());
    }
    let entity = match unit {
        Unit::Single(_) => "member",
        Unit::Pair(_) => "pair",
    };
    Err(LedgerError::missing(entity, unit.id()))
}

fn require_scheduled(committee: &Committee, month: MonthYear) -> LedgerResult<()> {
    if committee.covers(month) {
        return Ok(());
    }
    Err(LedgerError::malformed(format!(
        "{month} is outside the term of committee {}",
        committee.id
    )))
}

fn require_text(field: &str, value: &str) -> LedgerResult<()> {
    if value.trim().is_empty() {
        return Err(LedgerError::malformed(format!("{field} is required")));
    }
    Ok(())
}

fn require_positive(field: &str, value: Decimal) -> LedgerResult<()> {
    if value <= Decimal::ZERO {
        return Err(LedgerError::malformed(format!("{field} must be positive")));
    }
    Ok(())
}
