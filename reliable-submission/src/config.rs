use std::time::Duration;

use clap::Args;

/// Default ledger close interval, in milliseconds.
pub const DEFAULT_LEDGER_CLOSE_INTERVAL_MS: u64 = 4_000;

/// Tuning of the reliable submission wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReliableSubmissionConfig {
    /// How long to wait after submission and between status polls.
    ///
    /// Should match the cadence at which the network closes ledgers.
    pub ledger_close_interval: Duration,
}

impl Default for ReliableSubmissionConfig {
    fn default() -> Self {
        Self {
            ledger_close_interval: Duration::from_millis(DEFAULT_LEDGER_CLOSE_INTERVAL_MS),
        }
    }
}

/// CLI args for configuring reliable submission.
#[derive(Debug, Clone, Args)]
pub struct ReliableSubmissionArgs {
    /// Milliseconds to wait after submission and between finality polls.
    #[arg(
        long,
        env = "LEDGER_CLOSE_INTERVAL_MS",
        default_value_t = DEFAULT_LEDGER_CLOSE_INTERVAL_MS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub ledger_close_interval_ms: u64,
}

impl From<ReliableSubmissionArgs> for ReliableSubmissionConfig {
    fn from(args: ReliableSubmissionArgs) -> Self {
        Self {
            ledger_close_interval: Duration::from_millis(args.ledger_close_interval_ms),
        }
    }
}
