//! Resolution of wallet addresses to the classic form required for sequence lookups.

use snafu::{
    ResultExt,
    Snafu,
};

/// Version byte prefixed to the account id of a classic address.
const CLASSIC_ADDRESS_VERSION: u8 = 0x00;

/// Length of the account id carried by a classic address.
const ACCOUNT_ID_LENGTH: usize = 20;

/// Errors that can occur when decoding an address to its classic form.
#[derive(Debug, Snafu, Clone, PartialEq, Eq)]
#[snafu(visibility(pub(crate)))]
pub enum AddressError {
    /// The address was empty.
    #[snafu(display("address is empty"))]
    Empty,
    /// The address is not valid base58check in the ledger alphabet.
    #[snafu(display("address {address} could not be decoded: {source}"))]
    Decode {
        /// The rejected address.
        address: String,
        /// The base58check decoding error, e.g. an invalid character or checksum.
        source: bs58::decode::Error,
    },
    /// The address decoded, but not to a classic address version.
    #[snafu(display("address {address} has version {version:#04x}, expected a classic address"))]
    InvalidVersion {
        /// The rejected address.
        address: String,
        /// The leading version byte.
        version: u8,
    },
    /// The address decoded to a payload that is not an account id.
    #[snafu(display("address {address} carries a {length} byte payload, expected 20"))]
    InvalidPayloadLength {
        /// The rejected address.
        address: String,
        /// Length of the payload after the version byte.
        length: usize,
    },
}

/// A classic ledger address, the form accepted by sequence lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassicAddress {
    /// The base58check encoded account id.
    pub address: String,
}

/// Converts an encoded wallet address into its classic form.
///
/// Implementations are expected to be pure functions of their input.
pub trait AddressResolver: Send + Sync {
    /// Decodes `encoded_address` to its classic form.
    fn decode_to_canonical(&self, encoded_address: &str) -> Result<ClassicAddress, AddressError>;
}

/// Resolver for wallets that already report classic addresses.
///
/// The address is verified as a classic address and returned unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassicAddressResolver;

impl AddressResolver for ClassicAddressResolver {
    fn decode_to_canonical(&self, encoded_address: &str) -> Result<ClassicAddress, AddressError> {
        decode_account_id(encoded_address)?;
        Ok(ClassicAddress {
            address: encoded_address.to_string(),
        })
    }
}

/// Decodes a classic address to the account id it encodes.
///
/// Verifies the base58check checksum, the classic address version byte, and the account
/// id length.
pub fn decode_account_id(address: &str) -> Result<[u8; ACCOUNT_ID_LENGTH], AddressError> {
    if address.is_empty() {
        return Err(AddressError::Empty);
    }

    let decoded = bs58::decode(address)
        .with_alphabet(bs58::Alphabet::RIPPLE)
        .with_check(None)
        .into_vec()
        .context(DecodeSnafu { address })?;

    let (&version, account_id) = decoded
        .split_first()
        .ok_or_else(|| AddressError::InvalidPayloadLength {
            address: address.to_string(),
            length: 0,
        })?;
    if version != CLASSIC_ADDRESS_VERSION {
        return Err(AddressError::InvalidVersion {
            address: address.to_string(),
            version,
        });
    }

    account_id
        .try_into()
        .map_err(|_| AddressError::InvalidPayloadLength {
            address: address.to_string(),
            length: account_id.len(),
        })
}

impl<T: AddressResolver + ?Sized> AddressResolver for std::sync::Arc<T> {
    fn decode_to_canonical(&self, encoded_address: &str) -> Result<ClassicAddress, AddressError> {
        (**self).decode_to_canonical(encoded_address)
    }
}
