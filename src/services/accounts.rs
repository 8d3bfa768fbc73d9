//! Account operations. Every mutation runs inside a database transaction
//! with the account row locked, so concurrent requests against the same
//! account serialize instead of dropping one side's update.

use crate::db::models::{Account, AccountView};
use crate::db::queries;
use crate::domain::ledger::{self, LedgerUpdate};
use crate::domain::Role;
use crate::error::AppError;
use chrono::Utc;
use sqlx::PgPool;

pub async fn create_account(
    pool: &PgPool,
    name: &str,
    email: &str,
    password: &str,
    role: Role,
    deposit: f64,
) -> Result<AccountView, AppError> {
    let mut tx = pool.begin().await?;

    // Creates of the same email serialize on an advisory lock held until
    // commit; the existence pre-check alone would not see a concurrent
    // uncommitted insert.
    queries::lock_email(&mut tx, email).await?;
    if queries::email_exists(&mut tx, email).await? {
        return Err(AppError::Duplicate(format!(
            "an account already exists for {email}"
        )));
    }

    let account = Account::new(
        name.to_string(),
        email.to_string(),
        password.to_string(),
        role.as_str().to_string(),
        ledger::round_to_cents(deposit),
    );
    queries::insert_account(&mut tx, &account).await?;
    tx.commit().await?;

    tracing::info!(email = %account.email, balance = account.balance, "account created");
    Ok(AccountView::assemble(account, Vec::new()))
}

/// Deletes every account row matching the email (duplicates included) and
/// returns the state of the first match as it stood before deletion.
pub async fn delete_account(pool: &PgPool, email: &str) -> Result<AccountView, AppError> {
    let account = require_account(pool, email).await?;
    let entries = queries::list_entries(pool, account.id).await?;
    let removed = queries::delete_accounts(pool, email).await?;

    tracing::info!(email = %email, removed, "account deleted");
    Ok(AccountView::assemble(account, entries))
}

pub async fn login(pool: &PgPool, email: &str, password: &str) -> Result<AccountView, AppError> {
    let account = authenticate(pool, email, password).await?;
    load_view(pool, account).await
}

/// Credential check shared by login and the listing gate.
pub async fn authenticate(
    pool: &PgPool,
    email: &str,
    password: &str,
) -> Result<Account, AppError> {
    let account = require_account(pool, email).await?;
    if account.password != password {
        return Err(AppError::Unauthorized(format!(
            "invalid credentials for {email}"
        )));
    }
    Ok(account)
}

pub async fn deposit(pool: &PgPool, email: &str, amount: f64) -> Result<AccountView, AppError> {
    tracing::info!(email = %email, amount, "depositing funds");
    mutate_balance(pool, email, |balance| ledger::apply_deposit(balance, amount)).await
}

/// Withdraws funds; overdrawing is allowed and triggers the fixed fee as a
/// second ledger entry. The returned view reflects the post-fee balance.
pub async fn withdraw(pool: &PgPool, email: &str, amount: f64) -> Result<AccountView, AppError> {
    tracing::info!(email = %email, amount, "withdrawing funds");
    mutate_balance(pool, email, |balance| ledger::apply_withdrawal(balance, amount)).await
}

/// Moves funds between two accounts in one database transaction: the sender
/// is never left debited without the matching credit. Returns the sender's
/// post-withdraw state.
pub async fn send_money(
    pool: &PgPool,
    sender_email: &str,
    amount: f64,
    receiver_email: &str,
) -> Result<AccountView, AppError> {
    tracing::info!(sender = %sender_email, receiver = %receiver_email, amount, "transferring funds");

    if sender_email == receiver_email {
        // Degenerate self-transfer: one locked row, withdraw then deposit.
        return mutate_balance(pool, sender_email, |balance| {
            let mut update = ledger::apply_withdrawal(balance, amount);
            let deposit = ledger::apply_deposit(update.balance, amount);
            update.balance = deposit.balance;
            update.entries.extend(deposit.entries);
            update
        })
        .await;
    }

    let mut tx = pool.begin().await?;

    // Lock both rows in lexicographic email order so two opposing transfers
    // cannot deadlock.
    let (mut sender, receiver) = if sender_email < receiver_email {
        let s = queries::find_account_for_update(&mut tx, sender_email)
            .await?
            .ok_or_else(|| not_found(sender_email))?;
        let r = queries::find_account_for_update(&mut tx, receiver_email)
            .await?
            .ok_or_else(|| not_found(receiver_email))?;
        (s, r)
    } else {
        let r = queries::find_account_for_update(&mut tx, receiver_email)
            .await?
            .ok_or_else(|| not_found(receiver_email))?;
        let s = queries::find_account_for_update(&mut tx, sender_email)
            .await?
            .ok_or_else(|| not_found(sender_email))?;
        (s, r)
    };

    let now = Utc::now();

    let withdrawal = ledger::apply_withdrawal(sender.balance, amount);
    queries::update_balance(&mut tx, sender.id, withdrawal.balance).await?;
    for entry in &withdrawal.entries {
        queries::append_entry(&mut tx, sender.id, entry, now).await?;
    }

    let credit = ledger::apply_deposit(receiver.balance, amount);
    queries::update_balance(&mut tx, receiver.id, credit.balance).await?;
    for entry in &credit.entries {
        queries::append_entry(&mut tx, receiver.id, entry, now).await?;
    }

    sender.balance = withdrawal.balance;
    let entries = queries::list_entries_in_tx(&mut tx, sender.id).await?;
    tx.commit().await?;

    Ok(AccountView::assemble(sender, entries))
}

/// Read-only: account with history, nothing appended.
pub async fn balance(pool: &PgPool, email: &str) -> Result<AccountView, AppError> {
    let account = require_account(pool, email).await?;
    load_view(pool, account).await
}

pub async fn transactions(pool: &PgPool, email: &str) -> Result<AccountView, AppError> {
    balance(pool, email).await
}

pub async fn all_accounts(pool: &PgPool) -> Result<Vec<AccountView>, AppError> {
    let accounts = queries::list_accounts(pool).await?;
    let mut views = Vec::with_capacity(accounts.len());
    for account in accounts {
        let entries = queries::list_entries(pool, account.id).await?;
        views.push(AccountView::assemble(account, entries));
    }
    tracing::info!(count = views.len(), "listing all accounts");
    Ok(views)
}

async fn require_account(pool: &PgPool, email: &str) -> Result<Account, AppError> {
    queries::find_account(pool, email)
        .await?
        .ok_or_else(|| not_found(email))
}

fn not_found(email: &str) -> AppError {
    AppError::NotFound(format!("no account for email {email}"))
}

async fn load_view(pool: &PgPool, account: Account) -> Result<AccountView, AppError> {
    let entries = queries::list_entries(pool, account.id).await?;
    Ok(AccountView::assemble(account, entries))
}

/// Shared read-modify-write path for deposit, withdraw, and self-transfer:
/// lock the row, compute the update, persist balance and entries, commit.
async fn mutate_balance<F>(pool: &PgPool, email: &str, apply: F) -> Result<AccountView, AppError>
where
    F: FnOnce(f64) -> LedgerUpdate,
{
    let mut tx = pool.begin().await?;
    let mut account = queries::find_account_for_update(&mut tx, email)
        .await?
        .ok_or_else(|| not_found(email))?;

    let update = apply(account.balance);
    let now = Utc::now();

    queries::update_balance(&mut tx, account.id, update.balance).await?;
    for entry in &update.entries {
        queries::append_entry(&mut tx, account.id, entry, now).await?;
    }

    account.balance = update.balance;
    let entries = queries::list_entries_in_tx(&mut tx, account.id).await?;
    tx.commit().await?;

    Ok(AccountView::assemble(account, entries))
}
