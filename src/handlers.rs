use crate::auth::{expired_cookie, session_cookie, session_token};
use crate::errors::AppError;
use crate::ledger::LeadLedger;
use crate::models::{AddLeadRequest, LeadSnapshot, LoginRequest, SessionResponse, TargetRequest};
use crate::progress::ProgressView;
use crate::state::AppState;
use crate::storage::persist_ledger;
use crate::ui::render_index;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse},
    Json,
};
use chrono::Local;
use tracing::{info, warn};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let ledger = state.ledger.lock().await;
    let snapshot = ledger.snapshot();
    Html(render_index(&ProgressView::from_snapshot(&snapshot), &snapshot.input_history))
}

pub async fn get_leads(State(state): State<AppState>) -> Json<LeadSnapshot> {
    let ledger = state.ledger.lock().await;
    Json(ledger.snapshot())
}

pub async fn add_leads(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<AddLeadRequest>, JsonRejection>,
) -> Result<Json<LeadSnapshot>, AppError> {
    authorize(&state, &headers).await?;
    let Json(payload) = payload?;
    let snapshot = mutate(&state, |ledger| ledger.add_leads(payload.value, timestamp())).await?;
    info!(value = payload.value, achieved = snapshot.achieved_leads, "leads added");
    Ok(Json(snapshot))
}

pub async fn update_target(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<TargetRequest>, JsonRejection>,
) -> Result<Json<LeadSnapshot>, AppError> {
    authorize(&state, &headers).await?;
    let Json(payload) = payload?;
    let snapshot = mutate(&state, |ledger| ledger.set_target(payload.new_target)).await?;
    info!(total_target = snapshot.total_target, "target updated");
    Ok(Json(snapshot))
}

pub async fn undo(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<LeadSnapshot>, AppError> {
    authorize(&state, &headers).await?;
    let snapshot = mutate(&state, LeadLedger::undo).await?;
    info!(redo_depth = snapshot.redo_stack.len(), "undo applied");
    Ok(Json(snapshot))
}

pub async fn redo(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<LeadSnapshot>, AppError> {
    authorize(&state, &headers).await?;
    let snapshot = mutate(&state, LeadLedger::redo).await?;
    info!(history_depth = snapshot.history_stack.len(), "redo applied");
    Ok(Json(snapshot))
}

pub async fn reset(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<LeadSnapshot>, AppError> {
    authorize(&state, &headers).await?;
    let snapshot = mutate(&state, |ledger| {
        ledger.reset();
        Ok(())
    })
    .await?;
    warn!("lead board reset");
    Ok(Json(snapshot))
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    let account = state
        .account
        .as_deref()
        .ok_or_else(|| AppError::unauthorized("login is not configured"))?;

    if payload.email.trim() != account.email || payload.password != account.password {
        warn!(email = payload.email.trim(), "rejected login");
        return Err(AppError::unauthorized("invalid email or password"));
    }

    let token = state.sessions.lock().await.open(&account.email);
    info!(email = %account.email, "session opened");
    Ok((
        [(header::SET_COOKIE, session_cookie(&token))],
        Json(SessionResponse {
            email: account.email.clone(),
        }),
    ))
}

pub async fn refresh(State(state): State<AppState>, headers: HeaderMap) -> Result<impl IntoResponse, AppError> {
    let token = session_token(&headers).ok_or_else(|| AppError::unauthorized("no session"))?;
    let email = state
        .sessions
        .lock()
        .await
        .lookup(&token)
        .ok_or_else(|| AppError::unauthorized("session expired"))?;

    Ok(([(header::SET_COOKIE, session_cookie(&token))], Json(SessionResponse { email })))
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(token) = session_token(&headers) {
        if state.sessions.lock().await.close(&token) {
            info!("session closed");
        }
    }
    (StatusCode::NO_CONTENT, [(header::SET_COOKIE, expired_cookie())])
}

async fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), AppError> {
    let token = session_token(headers).ok_or_else(|| AppError::unauthorized("login required"))?;
    if state.sessions.lock().await.lookup(&token).is_none() {
        return Err(AppError::unauthorized("session expired"));
    }
    Ok(())
}

/// Applies a change under the ledger lock and persists it before releasing.
async fn mutate<F>(state: &AppState, change: F) -> Result<LeadSnapshot, AppError>
where
    F: FnOnce(&mut LeadLedger) -> Result<(), crate::ledger::LedgerError>,
{
    let mut ledger = state.ledger.lock().await;
    let mut next = ledger.clone();
    change(&mut next)?;
    persist_ledger(&state.data_path, &next).await?;
    *ledger = next;
    Ok(ledger.snapshot())
}

fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
