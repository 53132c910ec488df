pub mod calendar;
pub mod error;
pub mod events;
pub mod models;
pub mod storage;

pub use calendar::MonthYear;
pub use error::{LedgerError, LedgerResult};
pub use events::{DomainEvent, DomainEventKind};
pub use models::{Committee, Draw, Member, Payment, ShareType, Unit};
pub use storage::{EventEnvelope, EventStore};
