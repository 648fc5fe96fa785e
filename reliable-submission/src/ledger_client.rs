//! # Ledger Client Capability Set
//!
//! The operations a ledger client offers to its callers. Both raw network clients and the
//! [`crate::ReliableSubmissionClient`] decorator implement [`LedgerClient`], so a decorated
//! client is a drop-in substitute for the client it wraps.
//!
//! ## Overview
//! - [`LedgerClient`]: submission, balance, status, and history queries.
//! - [`Wallet`]: the sending side of a payment, as far as submission is concerned.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{
    Drops,
    LedgerSequence,
    PaymentTransaction,
    RawTransactionStatus,
    TransactionHash,
    TransactionStatus,
};

/// The sending side of a payment.
///
/// Key management is left to implementations; ledger clients only need the address the
/// wallet reports, which may be in an encoded (non-classic) form.
pub trait Wallet: Send + Sync {
    /// The address of the wallet, possibly in an encoded form.
    fn address(&self) -> &str;
}

/// Defines the operations of a ledger client.
///
/// Implementations must be safe to call concurrently; a single client may be shared by
/// several decorators.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Submits a payment of `amount` drops from `sender` to `destination`.
    ///
    /// # Returns
    /// - The hash of the submitted transaction. Whether the transaction settles is not
    ///   known at this point.
    async fn send(
        &self,
        amount: Drops,
        destination: &str,
        sender: &dyn Wallet,
        memo: Option<&str>,
    ) -> Result<TransactionHash>;

    /// Returns the balance of `address`, in drops.
    async fn get_balance(&self, address: &str) -> Result<Drops>;

    /// Returns the settled state of the payment identified by `transaction_hash`.
    async fn get_payment_status(&self, transaction_hash: &TransactionHash)
        -> Result<TransactionStatus>;

    /// Returns the latest validated ledger sequence as observed through `address`.
    ///
    /// `address` must be a classic address of an existing account.
    async fn get_latest_validated_ledger_sequence(&self, address: &str) -> Result<LedgerSequence>;

    /// Returns a fresh snapshot of the transaction identified by `transaction_hash`.
    async fn get_raw_transaction_status(
        &self,
        transaction_hash: &TransactionHash,
    ) -> Result<RawTransactionStatus>;

    /// Returns whether `address` exists on the validated ledger.
    async fn account_exists(&self, address: &str) -> Result<bool>;

    /// Returns the payments sent or received by `address`.
    async fn payment_history(&self, address: &str) -> Result<Vec<PaymentTransaction>>;
}

#[async_trait]
impl<C: LedgerClient + ?Sized> LedgerClient for Arc<C> {
    async fn send(
        &self,
        amount: Drops,
        destination: &str,
        sender: &dyn Wallet,
        memo: Option<&str>,
    ) -> Result<TransactionHash> {
        (**self).send(amount, destination, sender, memo).await
    }

    async fn get_balance(&self, address: &str) -> Result<Drops> {
        (**self).get_balance(address).await
    }

    async fn get_payment_status(
        &self,
        transaction_hash: &TransactionHash,
    ) -> Result<TransactionStatus> {
        (**self).get_payment_status(transaction_hash).await
    }

    async fn get_latest_validated_ledger_sequence(&self, address: &str) -> Result<LedgerSequence> {
        (**self).get_latest_validated_ledger_sequence(address).await
    }

    async fn get_raw_transaction_status(
        &self,
        transaction_hash: &TransactionHash,
    ) -> Result<RawTransactionStatus> {
        (**self).get_raw_transaction_status(transaction_hash).await
    }

    async fn account_exists(&self, address: &str) -> Result<bool> {
        (**self).account_exists(address).await
    }

    async fn payment_history(&self, address: &str) -> Result<Vec<PaymentTransaction>> {
        (**self).payment_history(address).await
    }
}
