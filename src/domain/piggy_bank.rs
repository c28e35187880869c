use serde::Serialize;
use thiserror::Error;

use super::{Cents, format_cents};

/// Flat fee charged on withdrawals above [`FEE_THRESHOLD`] (2.50).
pub const WITHDRAWAL_FEE: Cents = 250;

/// Withdrawals strictly greater than this amount (200.00) pay [`WITHDRAWAL_FEE`].
pub const FEE_THRESHOLD: Cents = 20_000;

/// Fee owed for withdrawing `amount`, if any.
pub fn fee_for(amount: Cents) -> Option<Cents> {
    (amount > FEE_THRESHOLD).then_some(WITHDRAWAL_FEE)
}

/// A single non-negative balance. The only way to change it is through
/// [`PiggyBank::deposit`] and [`PiggyBank::withdraw`]; a failed operation
/// leaves the balance untouched.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PiggyBank {
    balance: Cents,
}

/// Outcome of a successful withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Withdrawal {
    /// Amount requested by the caller
    pub amount: Cents,
    /// Fee charged on top of the amount, if the threshold was exceeded
    pub fee: Option<Cents>,
    /// Amount actually debited (amount + fee)
    pub total_cost: Cents,
    pub balance_after: Cents,
}

impl Withdrawal {
    pub fn fee_applied(&self) -> bool {
        self.fee.is_some()
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Amount must be greater than zero (got {})", money(.amount))]
    InvalidAmount { amount: Cents },

    #[error(
        "Insufficient funds: balance {}, required {}",
        money(.balance),
        money(.required)
    )]
    InsufficientFunds { balance: Cents, required: Cents },

    #[error("Deposit of {} would overflow the balance", money(.amount))]
    BalanceOverflow { amount: Cents },
}

fn money(cents: &Cents) -> String {
    format_cents(*cents)
}

impl PiggyBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance(&self) -> Cents {
        self.balance
    }

    /// Add `amount` to the balance and return the new balance.
    pub fn deposit(&mut self, amount: Cents) -> Result<Cents, LedgerError> {
        if amount <= 0 {
            return Err(LedgerError::InvalidAmount { amount });
        }

        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow { amount })?;
        Ok(self.balance)
    }

    /// Debit `amount` plus the withdrawal fee when `amount` exceeds the threshold.
    pub fn withdraw(&mut self, amount: Cents) -> Result<Withdrawal, LedgerError> {
        if amount <= 0 {
            return Err(LedgerError::InvalidAmount { amount });
        }

        let fee = fee_for(amount);
        // An overflowing total can never be covered by the balance
        let total_cost = match amount.checked_add(fee.unwrap_or(0)) {
            Some(total) if total <= self.balance => total,
            total => {
                return Err(LedgerError::InsufficientFunds {
                    balance: self.balance,
                    required: total.unwrap_or(Cents::MAX),
                });
            }
        };

        self.balance -= total_cost;
        Ok(Withdrawal {
            amount,
            fee,
            total_cost,
            balance_after: self.balance,
        })
    }
}
