use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tracing::{info, warn};

use crate::domain::{Cents, Movement, MovementKind, PiggyBank, TotalCents, Withdrawal};

use super::AppError;

/// Application service providing high-level operations for the piggy bank.
/// This is the primary interface for any client (CLI, tests, etc.).
///
/// The ledger and its journal share one lock, so an operation validates,
/// mutates the balance and records its movement as a single step even when
/// the service is shared across threads.
#[derive(Debug, Default)]
pub struct PiggyBankService {
    state: Mutex<SessionState>,
}

#[derive(Debug, Default)]
struct SessionState {
    bank: PiggyBank,
    movements: Vec<Movement>,
}

impl SessionState {
    fn record(&mut self, movement: Movement) -> Movement {
        let movement = movement.with_sequence(self.movements.len() as u64 + 1);
        self.movements.push(movement.clone());
        movement
    }
}

/// Result of a successful withdrawal
#[derive(Debug, Clone)]
pub struct WithdrawalResult {
    pub withdrawal: Withdrawal,
    pub movement: Movement,
}

/// Totals over the current session. Totals are widened because money can
/// cycle through the balance many times within its `Cents` range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub balance: Cents,
    pub deposit_count: usize,
    pub withdrawal_count: usize,
    pub total_deposited: TotalCents,
    pub total_withdrawn: TotalCents,
    pub total_fees: TotalCents,
}

impl PiggyBankService {
    /// Create a service around an empty piggy bank.
    pub fn new() -> Self {
        Self::default()
    }

    // Operations validate before mutating, so the state behind a poisoned
    // lock is still consistent.
    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Deposit money into the piggy bank.
    pub fn deposit(&self, amount_cents: Cents) -> Result<Movement, AppError> {
        let mut state = self.lock();

        let balance = state.bank.deposit(amount_cents).map_err(|e| {
            warn!(amount_cents, error = %e, "deposit rejected");
            e
        })?;
        let movement = state.record(Movement::deposit(amount_cents, balance));

        info!(
            amount_cents,
            balance_cents = balance,
            sequence = movement.sequence,
            "deposit recorded"
        );
        Ok(movement)
    }

    /// Withdraw money, paying the fee on amounts above the threshold.
    pub fn withdraw(&self, amount_cents: Cents) -> Result<WithdrawalResult, AppError> {
        let mut state = self.lock();

        let withdrawal = state.bank.withdraw(amount_cents).map_err(|e| {
            warn!(amount_cents, balance_cents = state.bank.balance(), error = %e, "withdrawal rejected");
            e
        })?;
        let movement = state.record(Movement::withdrawal(
            withdrawal.amount,
            withdrawal.fee.unwrap_or(0),
            withdrawal.balance_after,
        ));

        info!(
            amount_cents,
            fee_cents = withdrawal.fee.unwrap_or(0),
            balance_cents = withdrawal.balance_after,
            sequence = movement.sequence,
            "withdrawal recorded"
        );
        Ok(WithdrawalResult {
            withdrawal,
            movement,
        })
    }

    /// Current balance.
    pub fn balance(&self) -> Cents {
        self.lock().bank.balance()
    }

    /// Successful movements of this session, oldest first.
    pub fn movements(&self) -> Vec<Movement> {
        self.lock().movements.clone()
    }

    pub fn summary(&self) -> SessionSummary {
        let state = self.lock();

        state.movements.iter().fold(
            SessionSummary {
                balance: state.bank.balance(),
                ..SessionSummary::default()
            },
            |mut summary, movement| {
                match movement.kind {
                    MovementKind::Deposit => {
                        summary.deposit_count += 1;
                        summary.total_deposited += TotalCents::from(movement.amount_cents);
                    }
                    MovementKind::Withdrawal => {
                        summary.withdrawal_count += 1;
                        summary.total_withdrawn += TotalCents::from(movement.amount_cents);
                        summary.total_fees += TotalCents::from(movement.fee_cents);
                    }
                }
                summary
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LedgerError;

    #[test]
    fn test_failed_operations_are_not_journalled() {
        let service = PiggyBankService::new();

        assert!(service.withdraw(100).is_err());
        assert!(service.deposit(0).is_err());
        assert!(service.movements().is_empty());
        assert_eq!(service.balance(), 0);
    }

    #[test]
    fn test_sequences_are_gap_free() {
        let service = PiggyBankService::new();
        service.deposit(1000).unwrap();
        let _ = service.withdraw(5000);
        service.withdraw(500).unwrap();

        let sequences: Vec<u64> = service.movements().iter().map(|m| m.sequence).collect();
        assert_eq!(sequences, vec![1, 2]);
    }

    #[test]
    fn test_error_wraps_ledger_error() {
        let service = PiggyBankService::new();
        let err = service.deposit(-5).unwrap_err();

        assert_eq!(
            err.ledger_error(),
            &LedgerError::InvalidAmount { amount: -5 }
        );
    }

    #[test]
    fn test_service_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PiggyBankService>();
    }
}
