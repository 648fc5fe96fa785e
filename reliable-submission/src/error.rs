use snafu::Snafu;

use crate::address::AddressError;
use crate::model::{
    LedgerSequence,
    TransactionHash,
};

/// Broad categories of ledger errors, used to tag failures whose upstream cause is not
/// otherwise classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The caller supplied input the ledger cannot act on.
    InvalidInput,
    /// A ledger node answered with data of an unexpected shape.
    MalformedResponse,
    /// The failure does not fit any known category.
    Unknown,
}

/// How a failed `send` should be interpreted by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The initial submission was not accepted. No transaction is in flight.
    Submission,
    /// The network attached no expiry bound, so the outcome cannot be bounded.
    UnboundedFinality,
    /// The sender's address could not be decoded to its classic form.
    AddressResolution,
    /// The transaction provably will never settle.
    Expiry,
    /// A ledger client call failed.
    Upstream,
}

/// Represents errors raised by ledger clients and by the reliable submission wrapper.
///
/// The first group of variants is what a [`crate::LedgerClient`] implementation reports
/// about its own calls. The second group is produced only by
/// [`crate::ReliableSubmissionClient::send`] while determining a transaction's fate.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Error when the ledger node could not be reached or the call did not complete.
    #[snafu(display("Ledger transport failure: {message}"))]
    Transport {
        /// Human-readable description of the failure.
        message: String,
    },

    /// Error when the queried account does not exist on the validated ledger.
    #[snafu(display("Account not found: {address}"))]
    AccountNotFound {
        /// The address that was queried.
        address: String,
    },

    /// Error when a ledger node returned a response that could not be interpreted.
    #[snafu(display("Malformed ledger response: {message}"))]
    MalformedResponse {
        /// Description of what was wrong with the response.
        message: String,
    },

    /// Error when the network refused a submitted transaction.
    #[snafu(display("Transaction rejected with {engine_result}: {message}"))]
    Rejected {
        /// The engine result code reported by the node, e.g. `tecUNFUNDED_PAYMENT`.
        engine_result: String,
        /// The engine result message.
        message: String,
    },

    /// Error when the underlying submission failed. Nothing is in flight.
    #[snafu(display("Error submitting transaction: {source}"))]
    Submission {
        /// The error reported by the decorated client.
        #[snafu(source(from(Error, Box::new)))]
        source: Box<Error>,
    },

    /// Error when the submitted transaction carries no `lastLedgerSequence`.
    ///
    /// Without an expiry bound there is no ledger past which the transaction is known to
    /// be dead, so its status cannot be reliably determined.
    #[snafu(display(
        "Transaction {transaction_hash} did not have a lastLedgerSequence field so its status cannot be reliably determined"
    ))]
    UnboundedFinality {
        /// The hash returned by the submission.
        transaction_hash: TransactionHash,
    },

    /// Error when the sending wallet reported an address that could not be decoded to a
    /// classic address.
    #[snafu(display(
        "The source wallet reported an address which could not be decoded to a classic address ({address}): {source}"
    ))]
    AddressResolution {
        /// The encoded address reported by the wallet.
        address: String,
        /// The category of the failure. Always [`ErrorCategory::Unknown`], since the wallet
        /// handed over data of an unexpected shape.
        category: ErrorCategory,
        /// The decoding error.
        source: AddressError,
    },

    /// Error when the inclusion window of a transaction closed before it was validated.
    #[snafu(display(
        "Transaction {transaction_hash} expired: latest validated ledger {latest_validated_ledger_sequence} passed its last ledger sequence {last_ledger_sequence}"
    ))]
    TransactionExpired {
        /// The hash returned by the submission.
        transaction_hash: TransactionHash,
        /// The last ledger in which the transaction could have been included.
        last_ledger_sequence: LedgerSequence,
        /// The validated ledger observed past that bound.
        latest_validated_ledger_sequence: LedgerSequence,
    },

    /// Error when the sending account disappeared while its transaction was in flight.
    ///
    /// Deleting the account consumes the sequence number of the pending transaction, so
    /// the transaction can no longer settle.
    #[snafu(display(
        "Sender account {address} was deleted while transaction {transaction_hash} was in flight"
    ))]
    SenderAccountDeleted {
        /// The hash returned by the submission.
        transaction_hash: TransactionHash,
        /// The classic address of the sender.
        address: String,
    },
}

impl Error {
    /// Classifies this error for callers of `send`.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Submission { .. } => ErrorKind::Submission,
            Error::UnboundedFinality { .. } => ErrorKind::UnboundedFinality,
            Error::AddressResolution { .. } => ErrorKind::AddressResolution,
            Error::TransactionExpired { .. } | Error::SenderAccountDeleted { .. } => {
                ErrorKind::Expiry
            }
            Error::Transport { .. }
            | Error::AccountNotFound { .. }
            | Error::MalformedResponse { .. }
            | Error::Rejected { .. } => ErrorKind::Upstream,
        }
    }

    /// Returns `true` when the error is a definitive negative result: the transaction
    /// will never settle, as opposed to its fate being unknown.
    pub fn is_definitive(&self) -> bool {
        self.kind() == ErrorKind::Expiry
    }
}

/// Type alias for results that return a `Result<T, Error>`.
pub type Result<T, E = Error> = std::result::Result<T, E>;
