//! Simulated card gateway
//!
//! Stands in for a real payment provider: sleeps a bounded delay, then
//! declines with a configurable probability and approves otherwise, echoing
//! the requested amount unchanged. Declines are independent of input
//! validity - structurally valid charges can still be rejected, which is
//! what the deposit atomicity tests rely on.

use async_trait::async_trait;
use rand::Rng;
use tokio::time::{sleep, Duration};

use crate::domain::result::{Error, Result};
use crate::ports::{CardApproval, CardCharge, CardGateway};

/// Configuration for the simulated gateway
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Probability of a decline, 0.0..=1.0
    pub decline_rate: f64,
    /// Minimum simulated latency in milliseconds
    pub min_delay_ms: u64,
    /// Maximum simulated latency in milliseconds
    pub max_delay_ms: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            decline_rate: 0.1,
            min_delay_ms: 400,
            max_delay_ms: 1200,
        }
    }
}

impl GatewayConfig {
    /// Always approve, no latency (for tests)
    pub fn always_approve() -> Self {
        Self {
            decline_rate: 0.0,
            min_delay_ms: 0,
            max_delay_ms: 0,
        }
    }

    /// Always decline, no latency (for tests)
    pub fn always_decline() -> Self {
        Self {
            decline_rate: 1.0,
            min_delay_ms: 0,
            max_delay_ms: 0,
        }
    }
}

/// Simulated card verification gateway
pub struct SimulatedCardGateway {
    config: GatewayConfig,
}

impl SimulatedCardGateway {
    pub fn new(config: GatewayConfig) -> Self {
        Self { config }
    }

    fn roll_delay(&self) -> Duration {
        if self.config.max_delay_ms == 0 {
            return Duration::ZERO;
        }
        let ms = if self.config.min_delay_ms >= self.config.max_delay_ms {
            self.config.min_delay_ms
        } else {
            rand::thread_rng().gen_range(self.config.min_delay_ms..=self.config.max_delay_ms)
        };
        Duration::from_millis(ms)
    }

    fn roll_decline(&self) -> bool {
        if self.config.decline_rate <= 0.0 {
            return false;
        }
        if self.config.decline_rate >= 1.0 {
            return true;
        }
        rand::thread_rng().gen_bool(self.config.decline_rate)
    }
}

#[async_trait]
impl CardGateway for SimulatedCardGateway {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn validate(&self, charge: &CardCharge) -> Result<CardApproval> {
        sleep(self.roll_delay()).await;

        if self.roll_decline() {
            return Err(Error::CardRejected(
                "Card verification failed, please try again".to_string(),
            ));
        }

        Ok(CardApproval {
            amount: charge.amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn charge() -> CardCharge {
        CardCharge {
            card_number: "4111111111111111".to_string(),
            card_serial: "12345".to_string(),
            card_type: "visa".to_string(),
            amount: 50_000,
        }
    }

    #[tokio::test]
    async fn test_always_approve_echoes_amount() {
        let gateway = SimulatedCardGateway::new(GatewayConfig::always_approve());
        let approval = gateway.validate(&charge()).await.unwrap();
        assert_eq!(approval.amount, 50_000);
    }

    #[tokio::test]
    async fn test_always_decline_is_card_rejected() {
        let gateway = SimulatedCardGateway::new(GatewayConfig::always_decline());
        let err = gateway.validate(&charge()).await.unwrap_err();
        assert!(matches!(err, Error::CardRejected(_)));
    }

    #[tokio::test]
    async fn test_decline_ignores_input_validity() {
        // Even a structurally perfect charge can be declined
        let gateway = SimulatedCardGateway::new(GatewayConfig::always_decline());
        assert!(gateway.validate(&charge()).await.is_err());
    }
}
