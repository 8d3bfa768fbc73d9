use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One row of the `accounts` table. Email is the lookup key for every
/// operation but carries no unique constraint; duplicate prevention is an
/// explicit pre-check inside the create transaction.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub balance: f64,
    pub created: DateTime<Utc>,
}

impl Account {
    pub fn new(
        name: String,
        email: String,
        password: String,
        role: String,
        balance: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password,
            role,
            balance,
            created: Utc::now(),
        }
    }
}

/// One row of the append-only `account_transactions` table. `seq` orders
/// entries within an account.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct LedgerRow {
    pub id: Uuid,
    pub account_id: Uuid,
    pub seq: i64,
    pub kind: String,
    pub amount: f64,
    pub balance: f64,
    pub created_at: DateTime<Utc>,
}

/// Wire shape of a single transaction record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionView {
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: f64,
    pub balance: f64,
    pub timestamp: DateTime<Utc>,
}

impl From<LedgerRow> for TransactionView {
    fn from(row: LedgerRow) -> Self {
        Self {
            kind: row.kind,
            amount: row.amount,
            balance: row.balance,
            timestamp: row.created_at,
        }
    }
}

/// Wire shape of a full account: the flat row plus its transaction history,
/// reassembling the original single-document response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountView {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub balance: f64,
    pub created: DateTime<Utc>,
    pub transactions: Vec<TransactionView>,
}

impl AccountView {
    pub fn assemble(account: Account, entries: Vec<LedgerRow>) -> Self {
        Self {
            name: account.name,
            email: account.email,
            password: account.password,
            role: account.role,
            balance: account.balance,
            created: account.created,
            transactions: entries.into_iter().map(TransactionView::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_account() -> Account {
        Account::new(
            "Peter Parker".to_string(),
            "pparker@mit.edu".to_string(),
            "secret01".to_string(),
            "CUSTOMER".to_string(),
            100.0,
        )
    }

    #[test]
    fn assembles_view_with_transaction_history() {
        let account = sample_account();
        let entry = LedgerRow {
            id: Uuid::new_v4(),
            account_id: account.id,
            seq: 1,
            kind: "DEPOSIT".to_string(),
            amount: 50.0,
            balance: 150.0,
            created_at: Utc::now(),
        };

        let view = AccountView::assemble(account, vec![entry]);
        assert_eq!(view.email, "pparker@mit.edu");
        assert_eq!(view.balance, 100.0);
        assert_eq!(view.transactions.len(), 1);
        assert_eq!(view.transactions[0].kind, "DEPOSIT");
    }

    #[test]
    fn view_serializes_with_type_field() {
        let account = sample_account();
        let entry = LedgerRow {
            id: Uuid::new_v4(),
            account_id: account.id,
            seq: 1,
            kind: "WITHDRAW".to_string(),
            amount: 25.0,
            balance: 75.0,
            created_at: Utc::now(),
        };

        let view = AccountView::assemble(account, vec![entry]);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["transactions"][0]["type"], "WITHDRAW");
        assert_eq!(json["transactions"][0]["amount"], 25.0);
        assert!(json["transactions"][0].get("seq").is_none());
        assert!(json.get("id").is_none());
    }
}
