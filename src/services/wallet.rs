//! Wallet service - per-user balance and deposit history
//!
//! The authoritative balance lives on the directory record; callers re-read
//! it rather than caching a projection. A deposit validates input, asks the
//! card gateway to verify the charge, and only then mutates balance and
//! history together in one committed snapshot. The store lock is held from
//! before the gateway call through persistence, so the record cannot change
//! underneath an in-flight deposit.

use std::sync::Arc;

use crate::domain::result::{Error, FieldError, Result};
use crate::domain::Deposit;
use crate::ports::{CardApproval, CardCharge, CardGateway};
use crate::services::{LogEvent, LoggingService};
use crate::store::Store;

/// Minimum digits for a card number
const MIN_CARD_NUMBER_DIGITS: usize = 10;
/// Minimum digits for a card serial
const MIN_CARD_SERIAL_DIGITS: usize = 5;

/// Wallet service for balances and deposits
pub struct WalletService {
    store: Arc<Store>,
    gateway: Arc<dyn CardGateway>,
    logging: Arc<LoggingService>,
}

impl WalletService {
    pub fn new(
        store: Arc<Store>,
        gateway: Arc<dyn CardGateway>,
        logging: Arc<LoggingService>,
    ) -> Self {
        Self {
            store,
            gateway,
            logging,
        }
    }

    /// The user's authoritative balance, read from the directory record
    pub async fn get_balance(&self, email: &str) -> Result<i64> {
        self.store
            .read(|state| {
                state
                    .users
                    .iter()
                    .find(|u| u.email == email)
                    .map(|u| u.balance)
                    .ok_or_else(|| Error::not_found(format!("no user with email {}", email)))
            })
            .await
    }

    /// The user's deposit history, newest first
    pub async fn deposit_history(&self, email: &str) -> Result<Vec<Deposit>> {
        self.store
            .read(|state| {
                state
                    .users
                    .iter()
                    .find(|u| u.email == email)
                    .map(|u| u.deposit_history.clone())
                    .ok_or_else(|| Error::not_found(format!("no user with email {}", email)))
            })
            .await
    }

    /// Verify a charge with the gateway without touching any state
    pub async fn validate_card(&self, charge: &CardCharge) -> Result<CardApproval> {
        self.gateway.validate(charge).await
    }

    /// Deposit funds onto a user's balance
    ///
    /// Structural validation collects every failing field before returning;
    /// a gateway decline returns `CardRejected`. In both cases nothing is
    /// mutated. On approval, balance and history are updated in the same
    /// committed snapshot.
    pub async fn deposit(
        &self,
        email: &str,
        card_number: &str,
        card_serial: &str,
        card_type: &str,
        amount: i64,
    ) -> Result<Deposit> {
        let fields = validate_deposit_input(card_number, card_serial, card_type, amount);
        if !fields.is_empty() {
            return Err(Error::InvalidInput(fields));
        }

        let charge = CardCharge {
            card_number: card_number.to_string(),
            card_serial: card_serial.to_string(),
            card_type: card_type.to_string(),
            amount,
        };

        // Exclusive from here through persistence
        let mut state = self.store.lock().await;

        if !state.users.iter().any(|u| u.email == email) {
            return Err(Error::not_found(format!("no user with email {}", email)));
        }

        let approval = match self.gateway.validate(&charge).await {
            Ok(approval) => approval,
            Err(e) => {
                let _ = self
                    .logging
                    .log(
                        LogEvent::new("deposit_failed")
                            .with_email(email)
                            .with_error(e.to_string()),
                    );
                return Err(e);
            }
        };

        let mut working = state.clone();
        let user = working
            .users
            .iter_mut()
            .find(|u| u.email == email)
            .ok_or_else(|| Error::not_found(format!("no user with email {}", email)))?;

        let deposit = Deposit::success(approval.amount, card_number, card_type);
        user.balance += approval.amount;
        user.deposit_history.insert(0, deposit.clone());

        self.store.commit(&mut state, working)?;
        drop(state);

        let _ = self
            .logging
            .log(LogEvent::new("deposit_succeeded").with_email(email));

        Ok(deposit)
    }
}

/// Collect every failing field from deposit input
///
/// Field names use the camelCase keys the view layer renders against.
fn validate_deposit_input(
    card_number: &str,
    card_serial: &str,
    card_type: &str,
    amount: i64,
) -> Vec<FieldError> {
    let mut fields = Vec::new();

    if !is_numeric(card_number) || card_number.len() < MIN_CARD_NUMBER_DIGITS {
        fields.push(FieldError::new(
            "cardNumber",
            format!(
                "Card number must be at least {} digits",
                MIN_CARD_NUMBER_DIGITS
            ),
        ));
    }
    if !is_numeric(card_serial) || card_serial.len() < MIN_CARD_SERIAL_DIGITS {
        fields.push(FieldError::new(
            "cardSerial",
            format!(
                "Card serial must be at least {} digits",
                MIN_CARD_SERIAL_DIGITS
            ),
        ));
    }
    if card_type.trim().is_empty() {
        fields.push(FieldError::new("cardType", "Card type is required"));
    }
    if amount <= 0 {
        fields.push(FieldError::new("amount", "Amount must be greater than zero"));
    }

    fields
}

fn is_numeric(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}
