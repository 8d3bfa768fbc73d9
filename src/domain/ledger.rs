//! Pure ledger arithmetic: balance updates and the entries they append.
//!
//! Kept free of database concerns so the rounding and overdraft rules can be
//! tested in isolation; the service layer persists whatever this module
//! computes, inside a row-locked transaction.

use crate::domain::TransactionKind;

/// Fixed fee debited whenever a withdrawal drives the balance negative.
pub const OVERDRAFT_FEE: f64 = 35.00;

/// Rounds a currency amount to whole cents. Half-cents round toward positive
/// infinity, so an overdrawn balance of exactly -0.125 becomes -0.12, not
/// -0.13. Non-finite inputs collapse to zero rather than poisoning the
/// stored balance.
pub fn round_to_cents(amount: f64) -> f64 {
    if !amount.is_finite() {
        return 0.0;
    }
    (amount * 100.0 + 0.5).floor() / 100.0
}

/// One entry to append to an account's transaction history. `balance` is the
/// account balance immediately after the entry applies.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    pub kind: TransactionKind,
    pub amount: f64,
    pub balance: f64,
}

/// Result of applying a deposit or withdrawal: the new balance plus the
/// entries (one, or two when an overdraft fee fires) to append.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerUpdate {
    pub balance: f64,
    pub entries: Vec<LedgerEntry>,
}

pub fn apply_deposit(balance: f64, amount: f64) -> LedgerUpdate {
    let new_balance = round_to_cents(balance + amount);
    LedgerUpdate {
        balance: new_balance,
        entries: vec![LedgerEntry {
            kind: TransactionKind::Deposit,
            amount,
            balance: new_balance,
        }],
    }
}

/// Applies a withdrawal. Overdrawing is allowed; a negative result triggers
/// the fixed fee as a second entry, exactly once per withdrawal. The returned
/// balance is the post-fee figure.
pub fn apply_withdrawal(balance: f64, amount: f64) -> LedgerUpdate {
    let after_withdraw = round_to_cents(balance - amount);
    let mut entries = vec![LedgerEntry {
        kind: TransactionKind::Withdraw,
        amount,
        balance: after_withdraw,
    }];

    let mut new_balance = after_withdraw;
    if after_withdraw < 0.0 {
        new_balance = round_to_cents(after_withdraw - OVERDRAFT_FEE);
        entries.push(LedgerEntry {
            kind: TransactionKind::Overdraft,
            amount: OVERDRAFT_FEE,
            balance: new_balance,
        });
    }

    LedgerUpdate {
        balance: new_balance,
        entries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_cents() {
        assert_eq!(round_to_cents(10.005), 10.01);
        assert_eq!(round_to_cents(10.004), 10.0);
        assert_eq!(round_to_cents(0.1 + 0.2), 0.3);
        assert_eq!(round_to_cents(f64::NAN), 0.0);
        assert_eq!(round_to_cents(f64::INFINITY), 0.0);
    }

    #[test]
    fn half_cents_round_toward_positive_infinity() {
        // 0.125 and -0.125 are exactly representable, so these hit the tie
        // case for real: both move up, never away from zero.
        assert_eq!(round_to_cents(0.125), 0.13);
        assert_eq!(round_to_cents(-0.125), -0.12);
        assert_eq!(round_to_cents(-85.005), -85.0);
    }

    #[test]
    fn deposit_appends_one_entry_with_new_balance() {
        let update = apply_deposit(100.0, 50.0);
        assert_eq!(update.balance, 150.0);
        assert_eq!(update.entries.len(), 1);
        assert_eq!(update.entries[0].kind, TransactionKind::Deposit);
        assert_eq!(update.entries[0].amount, 50.0);
        assert_eq!(update.entries[0].balance, 150.0);
    }

    #[test]
    fn running_balance_stays_rounded_across_a_sequence() {
        // Exact running total rounded to cents at each step, never carrying
        // extra precision forward.
        let mut balance = 0.0;
        for _ in 0..10 {
            balance = apply_deposit(balance, 0.1).balance;
        }
        assert_eq!(balance, 1.0);

        balance = apply_deposit(balance, 1.005).balance;
        assert_eq!(balance, 2.01);
    }

    #[test]
    fn covered_withdrawal_appends_one_entry() {
        let update = apply_withdrawal(100.0, 25.0);
        assert_eq!(update.balance, 75.0);
        assert_eq!(update.entries.len(), 1);
        assert_eq!(update.entries[0].kind, TransactionKind::Withdraw);
    }

    #[test]
    fn overdraft_fires_exactly_once() {
        let update = apply_withdrawal(100.0, 200.0);
        assert_eq!(update.entries.len(), 2);
        assert_eq!(update.entries[0].kind, TransactionKind::Withdraw);
        assert_eq!(update.entries[0].balance, -50.0);
        assert_eq!(update.entries[1].kind, TransactionKind::Overdraft);
        assert_eq!(update.entries[1].amount, OVERDRAFT_FEE);
        assert_eq!(update.entries[1].balance, -85.0);
        // caller sees the post-fee figure
        assert_eq!(update.balance, -85.0);
    }

    #[test]
    fn withdrawal_to_exactly_zero_is_not_an_overdraft() {
        let update = apply_withdrawal(40.0, 40.0);
        assert_eq!(update.balance, 0.0);
        assert_eq!(update.entries.len(), 1);
    }

    #[test]
    fn worked_scenario_from_account_history() {
        // Start 100.00, deposit 50.00, withdraw 200.00 (overdraft).
        let deposit = apply_deposit(100.0, 50.0);
        assert_eq!(deposit.balance, 150.0);

        let withdraw = apply_withdrawal(deposit.balance, 200.0);
        assert_eq!(withdraw.balance, -85.0);

        let total_entries = deposit.entries.len() + withdraw.entries.len();
        assert_eq!(total_entries, 3);
    }

    #[test]
    fn transfer_legs_compose() {
        // 25.00 from A (100.00) to B (10.00), no overdraft on either side.
        let sender = apply_withdrawal(100.0, 25.0);
        let receiver = apply_deposit(10.0, 25.0);
        assert_eq!(sender.balance, 75.0);
        assert_eq!(sender.entries.len(), 1);
        assert_eq!(receiver.balance, 35.0);
        assert_eq!(receiver.entries.len(), 1);
    }
}
