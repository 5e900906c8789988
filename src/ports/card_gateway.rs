//! Card gateway port
//!
//! Defines the interface for verifying a card charge with an external
//! payment provider. The only implementation in this crate is a simulation,
//! but the contract is the one a real gateway integration must keep:
//! asynchronous, able to decline independently of input validity, and never
//! mutating caller state.

use async_trait::async_trait;

use crate::domain::result::Result;

/// A charge to be verified by the gateway
///
/// Carries the full card number for the duration of the call only; the
/// ledger persists nothing beyond the last four digits.
#[derive(Debug, Clone)]
pub struct CardCharge {
    pub card_number: String,
    pub card_serial: String,
    pub card_type: String,
    pub amount: i64,
}

/// Gateway approval, echoing the requested amount unchanged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardApproval {
    pub amount: i64,
}

/// Card verification gateway trait
///
/// A decline is returned as `Error::CardRejected` with the gateway's
/// message; infrastructure failures use the other error variants.
#[async_trait]
pub trait CardGateway: Send + Sync {
    /// Gateway name (e.g., "simulated")
    fn name(&self) -> &str;

    /// Verify the charge; resolves after the provider's latency
    async fn validate(&self, charge: &CardCharge) -> Result<CardApproval>;
}
