//! Domain types shared across the service.
//! Framework-agnostic: no axum or sqlx imports here.

pub mod ledger;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Access role carried by every account. Only `Banker` and `Auditor` may
/// read the all-accounts listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Banker,
    Customer,
    Auditor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Banker => "BANKER",
            Role::Customer => "CUSTOMER",
            Role::Auditor => "AUDITOR",
        }
    }

    pub fn can_list_accounts(&self) -> bool {
        matches!(self, Role::Banker | Role::Auditor)
    }
}

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BANKER" => Ok(Role::Banker),
            "CUSTOMER" => Ok(Role::Customer),
            "AUDITOR" => Ok(Role::Auditor),
            other => Err(ParseRoleError(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRoleError(pub String);

impl fmt::Display for ParseRoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role '{}'", self.0)
    }
}

impl std::error::Error for ParseRoleError {}

/// Kind of a ledger entry. `Balance` exists for wire compatibility with the
/// historical record shape but no live operation appends one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionKind {
    Deposit,
    Withdraw,
    Overdraft,
    Balance,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "DEPOSIT",
            TransactionKind::Withdraw => "WITHDRAW",
            TransactionKind::Overdraft => "OVERDRAFT",
            TransactionKind::Balance => "BALANCE",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
