use crate::db::models::{Account, LedgerRow};
use crate::domain::ledger::LedgerEntry;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Result, Transaction as SqlxTransaction};
use uuid::Uuid;

// --- Account Queries ---

pub async fn find_account(pool: &PgPool, email: &str) -> Result<Option<Account>> {
    sqlx::query_as::<_, Account>(
        "SELECT * FROM accounts WHERE email = $1 ORDER BY created LIMIT 1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await
}

/// Locks the account row for the rest of the enclosing transaction. Every
/// read-modify-write goes through this so two concurrent mutations of the
/// same account serialize instead of losing one side's update.
pub async fn find_account_for_update(
    executor: &mut SqlxTransaction<'_, Postgres>,
    email: &str,
) -> Result<Option<Account>> {
    sqlx::query_as::<_, Account>(
        r#"
        SELECT * FROM accounts
        WHERE email = $1
        ORDER BY created
        LIMIT 1
        FOR UPDATE
        "#,
    )
    .bind(email)
    .fetch_optional(&mut **executor)
    .await
}

/// Takes a transaction-scoped advisory lock keyed on the email. `accounts`
/// has no unique index and a plain existence check sees no uncommitted
/// insert under READ COMMITTED, so concurrent creates of the same email must
/// serialize here before the pre-check. Released automatically at
/// commit/rollback.
pub async fn lock_email(
    executor: &mut SqlxTransaction<'_, Postgres>,
    email: &str,
) -> Result<()> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
        .bind(email)
        .execute(&mut **executor)
        .await?;

    Ok(())
}

pub async fn email_exists(
    executor: &mut SqlxTransaction<'_, Postgres>,
    email: &str,
) -> Result<bool> {
    let row: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM accounts WHERE email = $1 LIMIT 1")
            .bind(email)
            .fetch_optional(&mut **executor)
            .await?;

    Ok(row.is_some())
}

pub async fn insert_account(
    executor: &mut SqlxTransaction<'_, Postgres>,
    account: &Account,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO accounts (id, name, email, password, role, balance, created)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(account.id)
    .bind(&account.name)
    .bind(&account.email)
    .bind(&account.password)
    .bind(&account.role)
    .bind(account.balance)
    .bind(account.created)
    .execute(&mut **executor)
    .await?;

    Ok(())
}

/// Removes every account row matching the email, duplicates included, and
/// returns the number removed. Transaction rows go with them via cascade.
pub async fn delete_accounts(pool: &PgPool, email: &str) -> Result<u64> {
    let result = sqlx::query("DELETE FROM accounts WHERE email = $1")
        .bind(email)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

pub async fn update_balance(
    executor: &mut SqlxTransaction<'_, Postgres>,
    account_id: Uuid,
    balance: f64,
) -> Result<()> {
    sqlx::query("UPDATE accounts SET balance = $1 WHERE id = $2")
        .bind(balance)
        .bind(account_id)
        .execute(&mut **executor)
        .await?;

    Ok(())
}

pub async fn list_accounts(pool: &PgPool) -> Result<Vec<Account>> {
    sqlx::query_as::<_, Account>("SELECT * FROM accounts ORDER BY created")
        .fetch_all(pool)
        .await
}

// --- Ledger Queries ---

pub async fn append_entry(
    executor: &mut SqlxTransaction<'_, Postgres>,
    account_id: Uuid,
    entry: &LedgerEntry,
    at: DateTime<Utc>,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO account_transactions (id, account_id, kind, amount, balance, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(account_id)
    .bind(entry.kind.as_str())
    .bind(entry.amount)
    .bind(entry.balance)
    .bind(at)
    .execute(&mut **executor)
    .await?;

    Ok(())
}

pub async fn list_entries(pool: &PgPool, account_id: Uuid) -> Result<Vec<LedgerRow>> {
    sqlx::query_as::<_, LedgerRow>(
        "SELECT * FROM account_transactions WHERE account_id = $1 ORDER BY seq",
    )
    .bind(account_id)
    .fetch_all(pool)
    .await
}

pub async fn list_entries_in_tx(
    executor: &mut SqlxTransaction<'_, Postgres>,
    account_id: Uuid,
) -> Result<Vec<LedgerRow>> {
    sqlx::query_as::<_, LedgerRow>(
        "SELECT * FROM account_transactions WHERE account_id = $1 ORDER BY seq",
    )
    .bind(account_id)
    .fetch_all(&mut **executor)
    .await
}
