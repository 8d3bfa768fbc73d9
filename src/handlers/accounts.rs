//! Route handlers: argument marshaling and status-code selection only.
//! All ledger behavior lives in `services::accounts`.

use crate::db::models::AccountView;
use crate::domain::Role;
use crate::error::AppError;
use crate::services;
use crate::AppState;
use axum::{
    Json,
    extract::{Path, State},
};

pub async fn create(
    State(state): State<AppState>,
    Path((username, email, password, role, deposit)): Path<(
        String,
        String,
        String,
        String,
        String,
    )>,
) -> Result<Json<AccountView>, AppError> {
    let role: Role = role
        .parse()
        .map_err(|e: crate::domain::ParseRoleError| AppError::Validation(e.to_string()))?;
    let deposit = parse_amount(&deposit)?;

    let view =
        services::accounts::create_account(&state.db, &username, &email, &password, role, deposit)
            .await?;
    Ok(Json(view))
}

pub async fn delete(
    State(state): State<AppState>,
    Path((_username, email, _password)): Path<(String, String, String)>,
) -> Result<Json<AccountView>, AppError> {
    let view = services::accounts::delete_account(&state.db, &email).await?;
    Ok(Json(view))
}

pub async fn login(
    State(state): State<AppState>,
    Path((email, password)): Path<(String, String)>,
) -> Result<Json<AccountView>, AppError> {
    let view = services::accounts::login(&state.db, &email, &password).await?;
    Ok(Json(view))
}

pub async fn deposit(
    State(state): State<AppState>,
    Path((email, amount)): Path<(String, String)>,
) -> Result<Json<AccountView>, AppError> {
    let amount = parse_amount(&amount)?;
    let view = services::accounts::deposit(&state.db, &email, amount).await?;
    Ok(Json(view))
}

pub async fn withdraw(
    State(state): State<AppState>,
    Path((email, amount)): Path<(String, String)>,
) -> Result<Json<AccountView>, AppError> {
    let amount = parse_amount(&amount)?;
    let view = services::accounts::withdraw(&state.db, &email, amount).await?;
    Ok(Json(view))
}

pub async fn send_money(
    State(state): State<AppState>,
    Path((email, amount, receiver)): Path<(String, String, String)>,
) -> Result<Json<AccountView>, AppError> {
    let amount = parse_amount(&amount)?;
    let view = services::accounts::send_money(&state.db, &email, amount, &receiver).await?;
    Ok(Json(view))
}

pub async fn balance(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<AccountView>, AppError> {
    let view = services::accounts::balance(&state.db, &email).await?;
    Ok(Json(view))
}

pub async fn transactions(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<AccountView>, AppError> {
    let view = services::accounts::transactions(&state.db, &email).await?;
    Ok(Json(view))
}

pub async fn all_accounts(
    State(state): State<AppState>,
) -> Result<Json<Vec<AccountView>>, AppError> {
    let views = services::accounts::all_accounts(&state.db).await?;
    Ok(Json(views))
}

/// Amounts arrive as path strings; they must parse as finite, non-negative
/// numbers. The magnitude of the operation is validated here, never in the
/// ledger core.
fn parse_amount(raw: &str) -> Result<f64, AppError> {
    let amount: f64 = raw
        .parse()
        .map_err(|_| AppError::Validation(format!("amount '{raw}' is not a number")))?;

    if !amount.is_finite() || amount < 0.0 {
        return Err(AppError::Validation(format!(
            "amount '{raw}' must be a non-negative number"
        )));
    }

    Ok(amount)
}
