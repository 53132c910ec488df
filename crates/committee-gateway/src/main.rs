use std::{net::SocketAddr, sync::Arc};

use anyhow::Result as AnyResult;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use chrono::{NaiveDate, Utc};
use committee_core::{EventStore, LedgerError};
use committee_eventstore::{CommitError, InMemoryEventStore, SharedLedger};
use committee_ledger::{
    Committee, CommitteeProgress, Draw, Ledger, Member, NewCommittee, NewDraw, NewMember,
    NewPayment, Payment, seed,
};
use committee_platform::{
    AddMemberRequest, CommitteeDetailResponse, CommitteeSummary, CreateCommitteeRequest,
    DrawView, DrawsResponse, EventView, PaymentGridResponse, RecordDrawRequest,
    RecordPaymentRequest, ServiceConfig,
};
use rust_decimal::Decimal;
use tracing::{error, info};
use uuid::Uuid;

type ApiResult<T> = Result<Json<T>, (StatusCode, String)>;

#[derive(Clone)]
struct AppState {
    ledger: Arc<SharedLedger>,
}

#[tokio::main]
async fn main() -> AnyResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "committee_gateway=info,committee_ledger=info".to_string()),
        )
        .init();

    let config = ServiceConfig::from_env("0.0.0.0:8080")?;
    let store = Arc::new(InMemoryEventStore::default());
    let ledger = SharedLedger::new(Ledger::new(config.ledger.clone()), store);

    if config.seed_demo {
        ledger.mutate(seed::demo).await?;
    }

    let state = AppState {
        ledger: Arc::new(ledger),
    };
    let router = Router::new()
        .route("/healthz", get(healthz))
        .route("/committees", get(list_committees).post(create_committee))
        .route("/committees/{committee_id}", get(committee_detail))
        .route("/committees/{committee_id}/members", post(add_member))
        .route(
            "/committees/{committee_id}/payments",
            get(payment_grid).post(record_payment),
        )
        .route(
            "/committees/{committee_id}/draws",
            get(list_draws).post(record_draw),
        )
        .route("/events", get(list_events))
        .with_state(state);

    let addr: SocketAddr = config.http_addr.parse()?;
    info!(
        "committee gateway listening on {} ({} validation)",
        addr, config.ledger.validation
    );
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

async fn healthz() -> &'static str {
    "ok"
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn ledger_rejection(err: LedgerError) -> (StatusCode, String) {
    let status = match err {
        LedgerError::InvalidReference { .. } => StatusCode::NOT_FOUND,
        LedgerError::DuplicatePayment { .. } | LedgerError::DuplicateWinner { .. } => {
            StatusCode::CONFLICT
        }
        LedgerError::MalformedInput(_) => StatusCode::BAD_REQUEST,
    };
    (status, err.to_string())
}

fn commit_rejection(err: CommitError) -> (StatusCode, String) {
    match err {
        CommitError::Rejected(err) => ledger_rejection(err),
        CommitError::Journal(err) => {
            error!("journal failure: {err:#}");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

async fn list_committees(State(state): State<AppState>) -> ApiResult<Vec<CommitteeSummary>> {
    let ledger = state.ledger.read().await;
    let today = today();

    let summaries = ledger
        .committees()
        .iter()
        .map(|committee| {
            let progress = CommitteeProgress::of(committee, today);
            CommitteeSummary {
                committee: committee.clone(),
                progress_percent: progress.percent().round_dp(2),
                progress,
                member_count: ledger.members_of(committee.id).count(),
            }
        })
        .collect();

    Ok(Json(summaries))
}

async fn create_committee(
    State(state): State<AppState>,
    Json(payload): Json<CreateCommitteeRequest>,
) -> ApiResult<Committee> {
    let committee = state
        .ledger
        .create_committee(NewCommittee {
            name: payload.name.trim().to_string(),
            monthly_amount: payload.monthly_amount,
            duration_months: payload.duration_months,
            start_date: payload.start_date,
            allow_half_share: payload.allow_half_share,
        })
        .await
        .map_err(commit_rejection)?;

    Ok(Json(committee))
}

async fn committee_detail(
    State(state): State<AppState>,
    Path(committee_id): Path<Uuid>,
) -> ApiResult<CommitteeDetailResponse> {
    let ledger = state.ledger.read().await;
    let committee = ledger
        .committee(committee_id)
        .cloned()
        .ok_or_else(|| ledger_rejection(LedgerError::missing("committee", committee_id)))?;
    let progress = ledger
        .progress(committee_id, today())
        .map_err(ledger_rejection)?;
    let roster = ledger.roster(committee_id).map_err(ledger_rejection)?;

    Ok(Json(CommitteeDetailResponse {
        total_payout: committee.total_payout(),
        committee,
        progress,
        roster,
    }))
}

async fn add_member(
    State(state): State<AppState>,
    Path(committee_id): Path<Uuid>,
    Json(payload): Json<AddMemberRequest>,
) -> ApiResult<Member> {
    let member = state
        .ledger
        .add_member(NewMember {
            committee_id,
            name: payload.name.trim().to_string(),
            phone: payload.phone.trim().to_string(),
            share_type: payload.share_type,
        })
        .await
        .map_err(commit_rejection)?;

    Ok(Json(member))
}

async fn payment_grid(
    State(state): State<AppState>,
    Path(committee_id): Path<Uuid>,
) -> ApiResult<PaymentGridResponse> {
    let ledger = state.ledger.read().await;
    let grid = ledger.payment_grid(committee_id).map_err(ledger_rejection)?;

    Ok(Json(PaymentGridResponse { committee_id, grid }))
}

async fn record_payment(
    State(state): State<AppState>,
    Path(committee_id): Path<Uuid>,
    Json(payload): Json<RecordPaymentRequest>,
) -> ApiResult<Payment> {
    let payment = state
        .ledger
        .mutate(|ledger| {
            let monthly_amount = ledger
                .committee(committee_id)
                .map(|c| c.monthly_amount)
                .ok_or_else(|| LedgerError::missing("committee", committee_id))?;
            ledger.record_payment(payment_from_request(
                committee_id,
                payload,
                monthly_amount,
                today(),
            ))
        })
        .await
        .map_err(commit_rejection)?;

    Ok(Json(payment))
}

fn payment_from_request(
    committee_id: Uuid,
    payload: RecordPaymentRequest,
    monthly_amount: Decimal,
    today: NaiveDate,
) -> NewPayment {
    NewPayment {
        committee_id,
        month: payload.month,
        unit: payload.unit,
        amount: payload.amount.unwrap_or(monthly_amount),
        date_paid: payload.date_paid.unwrap_or(today),
    }
}

async fn list_draws(
    State(state): State<AppState>,
    Path(committee_id): Path<Uuid>,
) -> ApiResult<DrawsResponse> {
    let ledger = state.ledger.read().await;
    let committee = ledger
        .committee(committee_id)
        .ok_or_else(|| ledger_rejection(LedgerError::missing("committee", committee_id)))?;

    let history = ledger
        .draw_history(committee_id)
        .into_iter()
        .map(|draw| DrawView {
            winner_name: ledger.unit_name(committee_id, draw.winner),
            draw: draw.clone(),
        })
        .collect();

    Ok(Json(DrawsResponse {
        committee_id,
        history,
        next_month: ledger
            .next_draw_month(committee_id)
            .map_err(ledger_rejection)?,
        eligible: ledger.eligible_winners(committee_id),
        payout_amount: committee.total_payout(),
    }))
}

async fn record_draw(
    State(state): State<AppState>,
    Path(committee_id): Path<Uuid>,
    Json(payload): Json<RecordDrawRequest>,
) -> ApiResult<Draw> {
    let draw = state
        .ledger
        .mutate(|ledger| {
            let payout = ledger
                .committee(committee_id)
                .map(|c| c.total_payout())
                .ok_or_else(|| LedgerError::missing("committee", committee_id))?;
            let month = match payload.month {
                Some(month) => month,
                None => ledger.next_draw_month(committee_id)?,
            };
            ledger.record_draw(NewDraw {
                committee_id,
                month,
                winner: payload.winner,
                payout_date: payload.payout_date.unwrap_or_else(today),
                amount: payload.amount.unwrap_or(payout),
            })
        })
        .await
        .map_err(commit_rejection)?;

    Ok(Json(draw))
}

async fn list_events(State(state): State<AppState>) -> ApiResult<Vec<EventView>> {
    let envelopes = state.ledger.store().all().await.map_err(|err| {
        error!("failed to read journal: {err:#}");
        (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
    })?;

    Ok(Json(
        envelopes
            .into_iter()
            .map(|envelope| EventView {
                sequence: envelope.sequence,
                stored_at: envelope.stored_at,
                event: envelope.event,
            })
            .collect(),
    ))
}
