pub mod config;
pub mod ledger;
pub mod penalty;
pub mod queries;
pub mod seed;
mod validation;

pub use committee_core::{
    Committee, DomainEvent, DomainEventKind, Draw, LedgerError, LedgerResult, Member, MonthYear,
    Payment, ShareType, Unit,
};
pub use config::{LedgerConfig, ValidationMode};
pub use ledger::{Ledger, NewCommittee, NewDraw, NewMember, NewPayment};
pub use queries::{
    CommitteeProgress, MemberRoster, PayingUnit, PaymentCell, PaymentGrid, PaymentRow,
    PaymentStatus,
};
