//! Deposit domain model

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::Local;
use serde::{Deserialize, Serialize};

/// Counter for generating unique deposit ids within the same millisecond
static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a unique deposit id based on timestamp + counter
///
/// Lower 48 bits carry the unix millisecond timestamp, upper 16 bits a
/// rolling counter, so ids created in the same millisecond stay unique.
fn generate_id() -> u64 {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    let counter = ID_COUNTER.fetch_add(1, Ordering::Relaxed) & 0xFFFF;
    (timestamp << 16) | counter
}

/// Outcome of a deposit attempt as recorded in the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepositStatus {
    Success,
    Failed,
}

/// One entry in a user's deposit history
///
/// `card_number` holds only the last four digits; the full number must never
/// reach the snapshot or the event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deposit {
    pub id: u64,
    pub amount: i64,
    pub date: String,
    pub card_type: String,
    pub card_number: String,
    pub status: DepositStatus,
}

impl Deposit {
    /// Record a successful deposit, truncating the card number to its
    /// last four digits
    pub fn success(amount: i64, card_number: &str, card_type: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            amount,
            date: Local::now().format("%Y-%m-%d %H:%M").to_string(),
            card_type: card_type.into(),
            card_number: Self::last_four(card_number),
            status: DepositStatus::Success,
        }
    }

    /// Last four characters of a card number
    pub fn last_four(card_number: &str) -> String {
        let digits: Vec<char> = card_number.chars().collect();
        let start = digits.len().saturating_sub(4);
        digits[start..].iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_four_truncation() {
        assert_eq!(Deposit::last_four("4111111111111111"), "1111");
        assert_eq!(Deposit::last_four("5500005555551234"), "1234");
        assert_eq!(Deposit::last_four("123"), "123");
    }

    #[test]
    fn test_success_deposit_never_keeps_full_number() {
        let deposit = Deposit::success(50_000, "4111111111119876", "visa");
        assert_eq!(deposit.card_number, "9876");
        assert_eq!(deposit.status, DepositStatus::Success);
        assert_eq!(deposit.amount, 50_000);
    }

    #[test]
    fn test_ids_are_unique_within_a_millisecond() {
        let a = Deposit::success(1, "4111111111111111", "visa");
        let b = Deposit::success(1, "4111111111111111", "visa");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&DepositStatus::Success).unwrap();
        assert_eq!(json, "\"success\"");
    }
}
