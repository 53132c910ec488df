pub mod config;
pub mod contracts;

pub use config::ServiceConfig;
pub use contracts::{
    AddMemberRequest, CommitteeDetailResponse, CommitteeSummary, CreateCommitteeRequest,
    DrawView, DrawsResponse, EventView, PaymentGridResponse, RecordDrawRequest,
    RecordPaymentRequest,
};
