//! # Reliable Submission Library
//!
//! This library wraps a ledger client so that submitting a payment blocks until the
//! transaction's fate is known: either it was included in a validated ledger, or its
//! inclusion window closed and it can never settle.
//!
//! ## Modules
//! - [`ledger_client`]: The capability set every ledger client offers.
//! - [`reliable_submission`]: The decorator turning fire-and-forget submission into a
//!   deterministic call.
//! - [`address`]: Decoding of wallet addresses to classic addresses.

#![forbid(unsafe_code)]

/// Address resolution module.
///
/// Sequence lookups need the classic form of the sender's address; wallets may report
/// an encoded form. Resolution is pluggable through [`address::AddressResolver`].
pub mod address;

/// Configuration module.
///
/// Provides the polling cadence, both as a plain struct and as `clap` arguments that can
/// be flattened into a binary's CLI.
pub mod config;

/// Error handling module.
///
/// Defines a custom error type using the `snafu` crate, shared by ledger clients and the
/// reliable submission wrapper, so callers can tell transactions that will never settle
/// apart from failures to determine their fate.
pub mod error;

/// Ledger client module.
///
/// Declares the [`ledger_client::LedgerClient`] trait and the [`ledger_client::Wallet`]
/// sender abstraction.
pub mod ledger_client;

/// Data models
pub mod model;

/// Reliable submission module.
///
/// Submits a transaction through a decorated client and polls its status once per ledger
/// close until it is validated or its `lastLedgerSequence` has passed.
pub mod reliable_submission;

#[cfg(test)]
mod scripted_ledger;

pub use address::{
    AddressResolver,
    ClassicAddress,
    ClassicAddressResolver,
};
pub use config::{
    ReliableSubmissionArgs,
    ReliableSubmissionConfig,
};
pub use error::{
    Error,
    ErrorCategory,
    ErrorKind,
    Result,
};
pub use ledger_client::{
    LedgerClient,
    Wallet,
};
pub use reliable_submission::{
    ReliableSubmissionClient,
    SubmissionOutcome,
};
