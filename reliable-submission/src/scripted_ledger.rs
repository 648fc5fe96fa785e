use std::collections::{
    HashMap,
    VecDeque,
};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{
    Error,
    Result,
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

/// One poll's view of the ledger: `(latest_validated_ledger_sequence, is_validated)`.
pub type Observation = (LedgerSequence, bool);

/// A ledger call recorded by [`ScriptedLedger`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// A submission.
    Send {
        /// Receiver of the payment.
        destination: String,
    },
    /// A balance query for an address.
    GetBalance(String),
    /// A payment status query.
    GetPaymentStatus(TransactionHash),
    /// A latest validated ledger sequence lookup through an address.
    GetLatestValidatedLedgerSequence(String),
    /// A raw status fetch.
    GetRawTransactionStatus(TransactionHash),
    /// An account existence query.
    AccountExists(String),
    /// A history query.
    PaymentHistory(String),
}

/// A wallet reporting a fixed address.
pub struct TestWallet(pub String);

impl Wallet for TestWallet {
    fn address(&self) -> &str {
        &self.0
    }
}

/// Scripted fate of one transaction.
struct Script {
    /// Expiry bound reported by every status fetch.
    last_ledger_sequence: LedgerSequence,
    /// Observations replayed in order.
    observations: Vec<Observation>,
    /// Next observation answering a status fetch.
    status_cursor: usize,
    /// Next observation answering a sequence lookup.
    sequence_cursor: usize,
}

impl Script {
    /// The observation at `cursor`, repeating the last one past the end.
    fn observation(&self, cursor: usize) -> Observation {
        let last = self.observations.len().saturating_sub(1);
        self.observations[cursor.min(last)]
    }
}

/// Mutable state behind [`ScriptedLedger`].
#[derive(Default)]
struct State {
    /// Recorded calls.
    calls: Vec<Call>,
    /// Outcomes handed out by `send`, in order.
    pending_submissions: VecDeque<Result<TransactionHash>>,
    /// Scripts by transaction.
    scripts: HashMap<TransactionHash, Script>,
    /// Last submitted transaction of each sender.
    in_flight_by_sender: HashMap<String, TransactionHash>,
    /// Successful sequence lookups after which the sender is reported missing.
    deleted_after_lookups: Option<usize>,
    /// Successful sequence lookups so far.
    sequence_lookups: usize,
    /// Successful status fetches after which fetches fail with a transport error.
    status_failure_after: Option<usize>,
    /// Successful status fetches so far.
    status_fetches: usize,
    /// Funded accounts.
    balances: HashMap<String, Drops>,
    /// Payment history of funded accounts.
    history: HashMap<String, Vec<PaymentTransaction>>,
}

/// In-memory [`LedgerClient`] replaying scripted observations.
///
/// Every status fetch and every sequence lookup of a transaction advances its own cursor
/// through the script; the last observation repeats once the script runs out. The first
/// observation answers both the initial status fetch and the initial sequence lookup.
#[derive(Default)]
pub struct ScriptedLedger {
    /// Script and call log.
    state: Mutex<State>,
}

impl ScriptedLedger {
    /// A ledger that will accept one submission and replay `observations` for it.
    pub fn single(
        hash: &TransactionHash,
        last_ledger_sequence: LedgerSequence,
        observations: Vec<Observation>,
    ) -> Self {
        let ledger = Self::default();
        ledger.script(hash, last_ledger_sequence, observations);
        ledger
    }

    /// Queues a submission of `hash` replaying `observations`.
    pub fn script(
        &self,
        hash: &TransactionHash,
        last_ledger_sequence: LedgerSequence,
        observations: Vec<Observation>,
    ) {
        assert!(!observations.is_empty(), "a script needs observations");
        let mut state = self.state.lock().unwrap();
        state.pending_submissions.push_back(Ok(hash.clone()));
        state.scripts.insert(
            hash.clone(),
            Script {
                last_ledger_sequence,
                observations,
                status_cursor: 0,
                sequence_cursor: 0,
            },
        );
    }

    /// Queues a submission that fails with `error`.
    pub fn reject_next_submission(&self, error: Error) {
        self.state
            .lock()
            .unwrap()
            .pending_submissions
            .push_back(Err(error));
    }

    /// Reports the sending account as missing once `lookups` sequence lookups succeeded.
    pub fn delete_sender_after(&self, lookups: usize) {
        self.state.lock().unwrap().deleted_after_lookups = Some(lookups);
    }

    /// Fails status fetches with a transport error once `fetches` fetches succeeded.
    pub fn fail_status_after(&self, fetches: usize) {
        self.state.lock().unwrap().status_failure_after = Some(fetches);
    }

    /// Registers an existing account.
    pub fn fund(&self, address: &str, balance: Drops, history: Vec<PaymentTransaction>) {
        let mut state = self.state.lock().unwrap();
        state.balances.insert(address.to_string(), balance);
        state.history.insert(address.to_string(), history);
    }

    /// All calls made so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Number of recorded calls matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|call| predicate(call)).count()
    }

    /// Appends `call` to the call log.
    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }
}

/// The error a node reports for a missing account.
fn account_not_found(address: &str) -> Error {
    Error::AccountNotFound {
        address: address.to_string(),
    }
}

#[async_trait]
impl LedgerClient for ScriptedLedger {
    async fn send(
        &self,
        _amount: Drops,
        destination: &str,
        sender: &dyn Wallet,
        _memo: Option<&str>,
    ) -> Result<TransactionHash> {
        self.record(Call::Send {
            destination: destination.to_string(),
        });
        let mut state = self.state.lock().unwrap();
        let hash = state
            .pending_submissions
            .pop_front()
            .unwrap_or_else(|| {
                Err(Error::Transport {
                    message: "no scripted submission".to_string(),
                })
            })?;
        state
            .in_flight_by_sender
            .insert(sender.address().to_string(), hash.clone());
        Ok(hash)
    }

    async fn get_balance(&self, address: &str) -> Result<Drops> {
        self.record(Call::GetBalance(address.to_string()));
        let state = self.state.lock().unwrap();
        state
            .balances
            .get(address)
            .copied()
            .ok_or_else(|| account_not_found(address))
    }

    async fn get_payment_status(
        &self,
        transaction_hash: &TransactionHash,
    ) -> Result<TransactionStatus> {
        self.record(Call::GetPaymentStatus(transaction_hash.clone()));
        let state = self.state.lock().unwrap();
        Ok(match state.scripts.get(transaction_hash) {
            Some(script) if script.observation(script.status_cursor).1 => {
                TransactionStatus::Succeeded
            }
            Some(_) => TransactionStatus::Pending,
            None => TransactionStatus::Unknown,
        })
    }

    async fn get_latest_validated_ledger_sequence(&self, address: &str) -> Result<LedgerSequence> {
        self.record(Call::GetLatestValidatedLedgerSequence(address.to_string()));
        let mut state = self.state.lock().unwrap();
        if state
            .deleted_after_lookups
            .is_some_and(|lookups| state.sequence_lookups >= lookups)
        {
            return Err(account_not_found(address));
        }
        state.sequence_lookups += 1;

        let hash = state
            .in_flight_by_sender
            .get(address)
            .cloned()
            .ok_or_else(|| account_not_found(address))?;
        let script = state
            .scripts
            .get_mut(&hash)
            .ok_or_else(|| account_not_found(address))?;
        let (latest, _) = script.observation(script.sequence_cursor);
        script.sequence_cursor += 1;
        Ok(latest)
    }

    async fn get_raw_transaction_status(
        &self,
        transaction_hash: &TransactionHash,
    ) -> Result<RawTransactionStatus> {
        self.record(Call::GetRawTransactionStatus(transaction_hash.clone()));
        let mut state = self.state.lock().unwrap();
        if state
            .status_failure_after
            .is_some_and(|fetches| state.status_fetches >= fetches)
        {
            return Err(Error::Transport {
                message: "connection reset by peer".to_string(),
            });
        }
        state.status_fetches += 1;

        let script = state
            .scripts
            .get_mut(transaction_hash)
            .ok_or_else(|| Error::MalformedResponse {
                message: format!("txnNotFound: {transaction_hash}"),
            })?;
        let (_, is_validated) = script.observation(script.status_cursor);
        script.status_cursor += 1;
        Ok(RawTransactionStatus {
            is_validated,
            transaction_status_code: "tesSUCCESS".to_string(),
            last_ledger_sequence: script.last_ledger_sequence,
            is_full_payment: true,
        })
    }

    async fn account_exists(&self, address: &str) -> Result<bool> {
        self.record(Call::AccountExists(address.to_string()));
        Ok(self.state.lock().unwrap().balances.contains_key(address))
    }

    async fn payment_history(&self, address: &str) -> Result<Vec<PaymentTransaction>> {
        self.record(Call::PaymentHistory(address.to_string()));
        let state = self.state.lock().unwrap();
        state
            .history
            .get(address)
            .cloned()
            .ok_or_else(|| account_not_found(address))
    }
}
