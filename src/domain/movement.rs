use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::Cents;

pub type MovementId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    Deposit,
    Withdrawal,
}

impl MovementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementKind::Deposit => "deposit",
            MovementKind::Withdrawal => "withdrawal",
        }
    }
}

impl std::fmt::Display for MovementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A successful deposit or withdrawal, as recorded in the session journal.
/// Movements are immutable once recorded.
#[derive(Debug, Clone, Serialize)]
pub struct Movement {
    pub id: MovementId,
    /// Position in the journal, starting at 1 (assigned by the service)
    pub sequence: u64,
    pub kind: MovementKind,
    /// Amount requested, in cents (always positive)
    pub amount_cents: Cents,
    /// Fee charged on top of the amount (0 for deposits and untaxed withdrawals)
    pub fee_cents: Cents,
    pub balance_after: Cents,
    pub recorded_at: DateTime<Utc>,
}

impl Movement {
    pub fn deposit(amount_cents: Cents, balance_after: Cents) -> Self {
        Self::new(MovementKind::Deposit, amount_cents, 0, balance_after)
    }

    pub fn withdrawal(amount_cents: Cents, fee_cents: Cents, balance_after: Cents) -> Self {
        Self::new(
            MovementKind::Withdrawal,
            amount_cents,
            fee_cents,
            balance_after,
        )
    }

    fn new(kind: MovementKind, amount_cents: Cents, fee_cents: Cents, balance_after: Cents) -> Self {
        Self {
            id: Uuid::new_v4(),
            sequence: 0, // Will be set by the service
            kind,
            amount_cents,
            fee_cents,
            balance_after,
            recorded_at: Utc::now(),
        }
    }

    pub fn with_sequence(mut self, sequence: u64) -> Self {
        self.sequence = sequence;
        self
    }

    /// Signed effect of this movement on the balance.
    pub fn net_change(&self) -> Cents {
        match self.kind {
            MovementKind::Deposit => self.amount_cents,
            MovementKind::Withdrawal => -(self.amount_cents + self.fee_cents),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deposit_movement() {
        let m = Movement::deposit(5000, 5000).with_sequence(1);

        assert_eq!(m.kind, MovementKind::Deposit);
        assert_eq!(m.sequence, 1);
        assert_eq!(m.fee_cents, 0);
        assert_eq!(m.net_change(), 5000);
    }

    #[test]
    fn test_withdrawal_net_change_includes_fee() {
        let m = Movement::withdrawal(30000, 250, 0);
        assert_eq!(m.net_change(), -30250);
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let m = Movement::withdrawal(100, 0, 900);
        let json = serde_json::to_value(&m).unwrap();

        assert_eq!(json["kind"], "withdrawal");
        assert_eq!(json["amount_cents"], 100);
        assert_eq!(json["balance_after"], 900);
    }
}
