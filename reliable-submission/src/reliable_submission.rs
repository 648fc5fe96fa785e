//! # Reliable Submission
//!
//! A [`LedgerClient`] decorator whose `send` blocks until the fate of the submitted
//! transaction is known.
//!
//! Consensus settles transactions asynchronously: a plain submission only returns a hash.
//! [`ReliableSubmissionClient`] keeps polling the decorated client until either
//! - the transaction is included in a validated ledger, or
//! - the latest validated ledger has passed the transaction's `lastLedgerSequence`, after
//!   which the transaction can never be included.
//!
//! All other operations are forwarded to the decorated client unchanged.

use async_trait::async_trait;
use log::{
    debug,
    error,
    info,
    warn,
};
use snafu::ResultExt;
use tokio::time::sleep;

use crate::address::AddressResolver;
use crate::config::ReliableSubmissionConfig;
use crate::error::{
    AddressResolutionSnafu,
    Error,
    ErrorCategory,
    Result,
    SubmissionSnafu,
};
use crate::ledger_client::{
    LedgerClient,
    Wallet,
};
use crate::model::{
    Drops,
    LedgerSequence,
    PaymentTransaction,
    RawTransactionStatus,
    TransactionHash,
    TransactionStatus,
};

/// The settled result of a reliable submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionOutcome {
    /// The hash assigned at submission.
    pub transaction_hash: TransactionHash,
    /// The last ledger in which the transaction could have been included.
    pub last_ledger_sequence: LedgerSequence,
    /// The latest validated ledger observed alongside the validated status.
    pub latest_validated_ledger_sequence: LedgerSequence,
    /// Number of poll iterations it took to observe validation.
    pub poll_iterations: u32,
    /// The payment status derived from the final status snapshot. A validated
    /// transaction may still have failed to apply.
    pub status: TransactionStatus,
}

/// A ledger client that blocks on `send` until the transaction reached a deterministic
/// state.
///
/// The wrapper holds no state across calls; concurrent `send` calls for different
/// transactions progress independently.
#[derive(Debug, Clone)]
pub struct ReliableSubmissionClient<C, R> {
    /// The client all calls are delegated to.
    decorated_client: C,
    /// Decodes the sender's address for sequence lookups.
    address_resolver: R,
    /// Polling cadence.
    config: ReliableSubmissionConfig,
}

impl<C, R> ReliableSubmissionClient<C, R>
where
    C: LedgerClient,
    R: AddressResolver,
{
    /// Creates a new `ReliableSubmissionClient` with the default configuration.
    ///
    /// # Arguments
    ///
    /// * `decorated_client` - The client performing the network calls.
    /// * `address_resolver` - Converts wallet addresses to classic addresses.
    pub fn new(decorated_client: C, address_resolver: R) -> Self {
        Self {
            decorated_client,
            address_resolver,
            config: ReliableSubmissionConfig::default(),
        }
    }

    /// Sets the configuration.
    #[must_use]
    pub fn with_config(mut self, config: ReliableSubmissionConfig) -> Self {
        self.config = config;
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &ReliableSubmissionConfig {
        &self.config
    }

    /// The decorated client.
    pub fn decorated_client(&self) -> &C {
        &self.decorated_client
    }

    /// Submits a payment and waits until it is validated or provably expired.
    ///
    /// # Returns
    ///
    /// The [`SubmissionOutcome`] of a validated transaction.
    ///
    /// # Errors
    ///
    /// - [`Error::Submission`] when the decorated client fails to submit.
    /// - [`Error::UnboundedFinality`] when the transaction carries no `lastLedgerSequence`.
    /// - [`Error::AddressResolution`] when the sender's address cannot be decoded.
    /// - [`Error::TransactionExpired`] when the inclusion window closed before validation.
    /// - [`Error::SenderAccountDeleted`] when the sender disappears while polling.
    /// - Any error of the decorated client raised while polling, unchanged.
    pub async fn send_and_wait(
        &self,
        amount: Drops,
        destination: &str,
        sender: &dyn Wallet,
        memo: Option<&str>,
    ) -> Result<SubmissionOutcome> {
        let ledger_close_interval = self.config.ledger_close_interval;

        let transaction_hash = self
            .decorated_client
            .send(amount, destination, sender, memo)
            .await
            .context(SubmissionSnafu)?;
        info!(
            "📤 Submitted transaction {}, waiting {:?} for a ledger to close",
            transaction_hash, ledger_close_interval
        );
        sleep(ledger_close_interval).await;

        let mut raw_status = self
            .decorated_client
            .get_raw_transaction_status(&transaction_hash)
            .await?;
        let last_ledger_sequence = raw_status.last_ledger_sequence;
        if !raw_status.has_expiry_bound() {
            error!(
                "❌ Transaction {} has no lastLedgerSequence, its status cannot be determined",
                transaction_hash
            );
            return Err(Error::UnboundedFinality { transaction_hash });
        }

        // Sequence lookups require the classic address of an account that exists.
        // The sender existed at submission; a later deletion consumes the sequence of
        // the transaction in flight and is reported as `SenderAccountDeleted`.
        let sender_address = sender.address();
        let classic_address = self
            .address_resolver
            .decode_to_canonical(sender_address)
            .context(AddressResolutionSnafu {
                address: sender_address,
                category: ErrorCategory::Unknown,
            })?
            .address;

        let mut latest_validated_ledger_sequence = self
            .latest_validated_ledger_sequence(&transaction_hash, &classic_address)
            .await?;

        let mut poll_iterations = 0;
        while latest_validated_ledger_sequence <= last_ledger_sequence && !raw_status.is_validated
        {
            sleep(ledger_close_interval).await;
            poll_iterations += 1;

            latest_validated_ledger_sequence = self
                .latest_validated_ledger_sequence(&transaction_hash, &classic_address)
                .await?;
            raw_status = self
                .decorated_client
                .get_raw_transaction_status(&transaction_hash)
                .await?;

            debug!(
                "🔄 Poll {} for {}: latest validated ledger {}, last ledger sequence {}, validated: {}",
                poll_iterations,
                transaction_hash,
                latest_validated_ledger_sequence,
                last_ledger_sequence,
                raw_status.is_validated
            );
        }

        settle(
            transaction_hash,
            &raw_status,
            latest_validated_ledger_sequence,
            poll_iterations,
        )
    }

    /// Looks up the latest validated ledger sequence through the sender's account.
    async fn latest_validated_ledger_sequence(
        &self,
        transaction_hash: &TransactionHash,
        classic_address: &str,
    ) -> Result<LedgerSequence> {
        match self
            .decorated_client
            .get_latest_validated_ledger_sequence(classic_address)
            .await
        {
            Err(Error::AccountNotFound { address }) => {
                warn!(
                    "⚠️ Sender {} disappeared while transaction {} was in flight",
                    address, transaction_hash
                );
                Err(Error::SenderAccountDeleted {
                    transaction_hash: transaction_hash.clone(),
                    address,
                })
            }
            result => result,
        }
    }
}

/// Turns the last observation of the polling loop into the result of `send`.
fn settle(
    transaction_hash: TransactionHash,
    raw_status: &RawTransactionStatus,
    latest_validated_ledger_sequence: LedgerSequence,
    poll_iterations: u32,
) -> Result<SubmissionOutcome> {
    if raw_status.is_validated {
        let status = TransactionStatus::from_raw(raw_status);
        info!(
            "✅ Transaction {} validated after {} polls ({}, {:?})",
            transaction_hash, poll_iterations, raw_status.transaction_status_code, status
        );
        return Ok(SubmissionOutcome {
            transaction_hash,
            last_ledger_sequence: raw_status.last_ledger_sequence,
            latest_validated_ledger_sequence,
            poll_iterations,
            status,
        });
    }

    warn!(
        "⌛ Transaction {} expired: ledger {} validated past last ledger sequence {}",
        transaction_hash, latest_validated_ledger_sequence, raw_status.last_ledger_sequence
    );
    Err(Error::TransactionExpired {
        transaction_hash,
        last_ledger_sequence: raw_status.last_ledger_sequence,
        latest_validated_ledger_sequence,
    })
}

#[async_trait]
impl<C, R> LedgerClient for ReliableSubmissionClient<C, R>
where
    C: LedgerClient,
    R: AddressResolver,
{
    async fn send(
        &self,
        amount: Drops,
        destination: &str,
        sender: &dyn Wallet,
        memo: Option<&str>,
    ) -> Result<TransactionHash> {
        self.send_and_wait(amount, destination, sender, memo)
            .await
            .map(|outcome| outcome.transaction_hash)
    }

    async fn get_balance(&self, address: &str) -> Result<Drops> {
        self.decorated_client.get_balance(address).await
    }

    async fn get_payment_status(
        &self,
        transaction_hash: &TransactionHash,
    ) -> Result<TransactionStatus> {
        self.decorated_client
            .get_payment_status(transaction_hash)
            .await
    }

    async fn get_latest_validated_ledger_sequence(&self, address: &str) -> Result<LedgerSequence> {
        self.decorated_client
            .get_latest_validated_ledger_sequence(address)
            .await
    }

    async fn get_raw_transaction_status(
        &self,
        transaction_hash: &TransactionHash,
    ) -> Result<RawTransactionStatus> {
        self.decorated_client
            .get_raw_transaction_status(transaction_hash)
            .await
    }

    async fn account_exists(&self, address: &str) -> Result<bool> {
        self.decorated_client.account_exists(address).await
    }

    async fn payment_history(&self, address: &str) -> Result<Vec<PaymentTransaction>> {
        self.decorated_client.payment_history(address).await
    }
}
