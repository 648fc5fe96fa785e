//! Ledger data model shared by ledger clients and the reliable submission wrapper.

use std::fmt;
use std::str::FromStr;

use serde::{
    Deserialize,
    Serialize,
};
use snafu::Snafu;

/// A ledger index. Ledger rounds are numbered monotonically from genesis.
pub type LedgerSequence = u32;

/// An amount of the ledger's native asset, expressed in drops.
pub type Drops = u64;

/// Transaction status codes starting with this prefix mean the transaction applied
/// successfully.
const SUCCESS_CODE_PREFIX: &str = "tes";

/// Errors that can occur when parsing a [`TransactionHash`].
#[derive(Debug, Snafu)]
pub enum TransactionHashError {
    /// The hash was not valid hexadecimal.
    #[snafu(display("transaction hash is not valid hex: {source}"), context(false))]
    Hex {
        /// The underlying hex decoding error.
        source: hex::FromHexError,
    },
    /// The hash did not decode to 32 bytes.
    #[snafu(display("transaction hash must be 32 bytes, got {length}"))]
    Length {
        /// Number of decoded bytes.
        length: usize,
    },
}

/// Identifier of a submitted transaction.
///
/// Stored in canonical upper-case hex form, so two hashes compare equal regardless of the
/// case they were parsed from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TransactionHash(String);

impl TransactionHash {
    /// Parses a 32-byte transaction hash from its hex representation.
    pub fn from_hex(hash: &str) -> Result<Self, TransactionHashError> {
        let bytes = hex::decode(hash)?;
        if bytes.len() != 32 {
            return Err(TransactionHashError::Length {
                length: bytes.len(),
            });
        }
        Ok(Self(hex::encode_upper(bytes)))
    }

    /// The hash as upper-case hex.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TransactionHash {
    type Err = TransactionHashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for TransactionHash {
    type Error = TransactionHashError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<TransactionHash> for String {
    fn from(hash: TransactionHash) -> Self {
        hash.0
    }
}

/// A point-in-time snapshot of a transaction as reported by a ledger node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransactionStatus {
    /// Whether the transaction is included in a validated ledger.
    pub is_validated: bool,
    /// The engine result code, e.g. `tesSUCCESS`.
    pub transaction_status_code: String,
    /// The last ledger in which the transaction may be included. `0` when the
    /// transaction carries no such bound.
    pub last_ledger_sequence: LedgerSequence,
    /// Whether the transaction is a payment that delivered its full amount.
    pub is_full_payment: bool,
}

impl RawTransactionStatus {
    /// Returns `true` when the network attached an expiry bound to the transaction.
    pub fn has_expiry_bound(&self) -> bool {
        self.last_ledger_sequence != 0
    }
}

/// The settled state of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransactionStatus {
    /// The transaction is not yet in a validated ledger.
    Pending,
    /// The transaction was validated and applied successfully.
    Succeeded,
    /// The transaction was validated but did not apply, or only partially paid.
    Failed,
    /// The status could not be determined.
    Unknown,
}

impl TransactionStatus {
    /// Derives the payment status from a raw status snapshot.
    pub fn from_raw(raw: &RawTransactionStatus) -> Self {
        if !raw.is_validated {
            TransactionStatus::Pending
        } else if !raw.is_full_payment {
            TransactionStatus::Failed
        } else if raw.transaction_status_code.starts_with(SUCCESS_CODE_PREFIX) {
            TransactionStatus::Succeeded
        } else {
            TransactionStatus::Failed
        }
    }
}

/// A memo attached to a payment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Memo {
    /// Memo content.
    pub data: Option<String>,
    /// Content encoding, e.g. `text/plain`.
    pub format: Option<String>,
    /// Memo type.
    pub memo_type: Option<String>,
}

/// A payment as it appears in an account's transaction history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentTransaction {
    /// Hash of the transaction.
    pub hash: TransactionHash,
    /// Classic address of the sender.
    pub account: String,
    /// Classic address of the receiver.
    pub destination: String,
    /// Delivered amount.
    pub amount: Drops,
    /// Fee paid by the sender.
    pub fee: Drops,
    /// Sequence number of the sending account used by this transaction.
    pub sequence: u32,
    /// Ledger that included the transaction.
    pub ledger_index: Option<LedgerSequence>,
    /// Last ledger in which the transaction could have been included.
    pub last_ledger_sequence: Option<LedgerSequence>,
    /// Memos attached to the payment.
    #[serde(default)]
    pub memos: Vec<Memo>,
    /// Close time of the including ledger, in seconds since the ledger epoch.
    pub timestamp: Option<u64>,
}
