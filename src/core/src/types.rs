//! Core types for the batch distribution engine.

use byteorder::{ByteOrder, LittleEndian};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

use crate::amount;
use crate::errors::CoreError;

/// Number of decimal places of the native coin.
pub const NATIVE_DECIMALS: u8 = 9;

/// Decimal count substituted when a fungible asset's metadata lookup fails.
pub const DEFAULT_FUNGIBLE_DECIMALS: u8 = 9;

/// A 32-byte account address, rendered as `0x` followed by 64 hex characters.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address([u8; 32]);

impl Address {
    /// Creates an address from raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the raw address bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Returns the canonical `0x`-prefixed hex rendering.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex_part = match s.strip_prefix("0x") {
            Some(rest) => rest,
            None => {
                return Err(CoreError::InvalidAddress(format!(
                    "missing 0x prefix: {}",
                    s
                )))
            }
        };

        if hex_part.len() != 64 {
            return Err(CoreError::InvalidAddress(format!(
                "expected 64 hex characters, got {}: {}",
                hex_part.len(),
                s
            )));
        }

        let bytes = hex::decode(hex_part)
            .map_err(|e| CoreError::InvalidAddress(format!("{}: {}", e, s)))?;

        let mut address = [0u8; 32];
        address.copy_from_slice(&bytes);
        Ok(Self(address))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

// Serialize as the canonical hex string so transaction descriptions stay
// readable on the wire.
impl serde::Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct AddressVisitor;

        impl<'de> serde::de::Visitor<'de> for AddressVisitor {
            type Value = Address;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a 0x-prefixed 64-character hex address")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Address::from_str(v).map_err(|e| E::custom(e.to_string()))
            }
        }

        deserializer.deserialize_str(AddressVisitor)
    }
}

/// Fully qualified type tag of a fungible asset, e.g. `0x2::coin::USDC`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoinType(String);

impl CoinType {
    /// Parses and validates a type tag of the form `address::module::name`.
    pub fn new(tag: impl Into<String>) -> Result<Self, CoreError> {
        let tag = tag.into();
        let segments: Vec<&str> = tag.split("::").collect();
        if segments.len() < 3 || segments.iter().any(|s| s.is_empty()) {
            return Err(CoreError::InvalidCoinType(format!(
                "expected address::module::name, got {}",
                tag
            )));
        }
        Ok(Self(tag))
    }

    /// Returns the full type tag.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the display symbol, the last `::`-separated segment.
    pub fn symbol(&self) -> &str {
        self.0.rsplit("::").next().unwrap_or(&self.0)
    }
}

impl fmt::Display for CoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The asset being distributed: the native coin or a fungible asset type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Asset {
    /// The ledger's native coin, which also pays fees.
    Native,
    /// A fungible asset identified by its type tag.
    Fungible(CoinType),
}

impl Asset {
    /// Whether this is the native coin.
    pub fn is_native(&self) -> bool {
        matches!(self, Asset::Native)
    }

    /// Display symbol for the asset.
    pub fn symbol(&self) -> &str {
        match self {
            Asset::Native => "native",
            Asset::Fungible(coin_type) => coin_type.symbol(),
        }
    }
}

impl FromStr for Asset {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("native") {
            Ok(Asset::Native)
        } else {
            Ok(Asset::Fungible(CoinType::new(s)?))
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Asset::Native => write!(f, "native"),
            Asset::Fungible(coin_type) => write!(f, "{}", coin_type),
        }
    }
}

/// Opaque identifier of a discrete coin object held on the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    /// Wraps a ledger-assigned object identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A discrete holding of a fungible asset with an integer balance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinObject {
    /// The ledger-assigned object identifier
    pub id: ObjectId,
    /// The balance held by this object, in smallest units
    pub balance: u128,
}

impl CoinObject {
    /// Creates a coin object from an identifier and a balance.
    pub fn new(id: impl Into<String>, balance: u128) -> Self {
        Self {
            id: ObjectId::new(id),
            balance,
        }
    }
}

/// One parsed recipient row: an account address and a human decimal amount.
///
/// Produced by the parsing layer and consumed read-only; the builder
/// re-validates both fields before using them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    /// The recipient's account address, `0x`-prefixed hex
    pub address: String,
    /// The amount to send, as a human decimal string
    pub amount: String,
}

impl Recipient {
    /// Creates a recipient row.
    pub fn new(address: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            amount: amount.into(),
        }
    }
}

/// One entry of a [`BatchPlan`]: an exact integer amount for one recipient.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlanEntry {
    /// The amount to carve out, in smallest units
    pub amount: u128,
    /// The validated recipient address
    pub recipient: Address,
}

/// The ordered integer transfer plan derived from a recipient list.
///
/// Immutable once computed; entries keep the input order of the recipient
/// list so the assembled transaction can be reviewed against it.
#[derive(Clone, Debug)]
pub struct BatchPlan {
    entries: Vec<PlanEntry>,
}

impl BatchPlan {
    /// Derives a plan from recipient rows at the given decimal count.
    ///
    /// Every row is validated: the address must be well formed and the
    /// amount must convert to a positive number of smallest units. Any bad
    /// row fails the whole derivation.
    pub fn from_recipients(recipients: &[Recipient], decimals: u8) -> Result<Self, CoreError> {
        if recipients.is_empty() {
            return Err(CoreError::NoRecipients);
        }

        let mut entries = Vec::with_capacity(recipients.len());
        for recipient in recipients {
            let address = Address::from_str(&recipient.address)?;
            let units = amount::to_smallest_unit(&recipient.amount, decimals)?;
            if units == 0 {
                return Err(CoreError::InvalidAmount(format!(
                    "amount for {} is zero at {} decimals: {}",
                    recipient.address, decimals, recipient.amount
                )));
            }
            entries.push(PlanEntry {
                amount: units,
                recipient: address,
            });
        }

        Ok(Self { entries })
    }

    /// The plan entries, in recipient input order.
    pub fn entries(&self) -> &[PlanEntry] {
        &self.entries
    }

    /// Number of planned transfers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the plan is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all planned amounts, in smallest units.
    pub fn total(&self) -> Result<u128, CoreError> {
        let mut total: u128 = 0;
        for entry in &self.entries {
            total = total
                .checked_add(entry.amount)
                .ok_or(CoreError::BalanceOverflow)?;
        }
        Ok(total)
    }
}

/// What a sufficiency check was measured against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequirementKind {
    /// Transfer total plus the estimated fee, in the native coin.
    TransferAndFee,
    /// The estimated fee alone, in the native coin.
    Fee,
    /// The transfer total alone, in the transferred asset.
    Transfer,
}

/// Result of a pre-flight balance check.
///
/// An insufficient balance is an expected outcome, reported here rather
/// than raised as an error.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SufficiencyReport {
    /// Whether current holdings cover the requirement
    pub sufficient: bool,
    /// The current balance, as a decimal string in the checked denomination
    pub current_balance: String,
    /// The required amount, as a decimal string in the checked denomination
    pub required: String,
    /// Which requirement the figures above describe
    pub kind: RequirementKind,
}

/// A fungible asset's decimal count together with how it was obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedDecimals {
    /// The decimal count used for conversions
    pub decimals: u8,
    /// True when the metadata lookup failed and the documented default was
    /// substituted; callers may want to warn that the value is unverified
    pub defaulted: bool,
}

/// The pool a batch draws from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpendSource {
    /// The ledger's implicit fee-payment pool (native transfers)
    FeePool,
    /// A single spendable coin object (fungible transfers, after aggregation)
    Coin(ObjectId),
}

/// One step of an assembled batch transaction.
///
/// A `Split` carves an exact amount out of the spend source; the `Transfer`
/// immediately after it assigns the carved coin to one recipient.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Merge `sources` into `destination` so one coin backs every split.
    MergeCoins {
        /// The coin that absorbs the others
        destination: ObjectId,
        /// The coins consumed by the merge
        sources: Vec<ObjectId>,
    },

    /// Carve `amount` smallest units out of the spend source.
    Split {
        /// The exact amount to carve out
        amount: u128,
    },

    /// Send the most recently split coin to `recipient`.
    Transfer {
        /// The recipient's address
        recipient: Address,
    },
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::MergeCoins {
                destination,
                sources,
            } => {
                write!(f, "merge {} coins into {}", sources.len(), destination)
            }
            Command::Split { amount } => write!(f, "split {}", amount),
            Command::Transfer { recipient } => write!(f, "transfer to {}", recipient),
        }
    }
}

/// A fully assembled, unsubmitted batch transaction.
///
/// Commands keep recipient input order so the caller can audit the
/// transaction before handing it to a signer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransactionDescription {
    /// The sending account
    pub sender: Address,
    /// The asset being distributed
    pub asset: Asset,
    /// The decimal count the amounts were converted at
    pub decimals: ResolvedDecimals,
    /// The pool the splits draw from
    pub source: SpendSource,
    /// The ordered command sequence
    pub commands: Vec<Command>,
}

impl TransactionDescription {
    /// Number of split+transfer pairs, one per recipient.
    pub fn split_transfer_pairs(&self) -> usize {
        self.commands
            .windows(2)
            .filter(|pair| {
                matches!(pair[0], Command::Split { .. })
                    && matches!(pair[1], Command::Transfer { .. })
            })
            .count()
    }

    /// Computes a deterministic digest of this description.
    ///
    /// Two descriptions with the same sender, asset, and command sequence
    /// hash identically, so the digest identifies what a reviewer approved.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.sender.as_bytes());

        match &self.asset {
            Asset::Native => hasher.update([0u8]),
            Asset::Fungible(coin_type) => {
                hasher.update([1u8]);
                hasher.update(coin_type.as_str().as_bytes());
            }
        }

        hasher.update([self.decimals.decimals, self.decimals.defaulted as u8]);

        match &self.source {
            SpendSource::FeePool => hasher.update([0u8]),
            SpendSource::Coin(id) => {
                hasher.update([1u8]);
                hasher.update(id.as_str().as_bytes());
            }
        }

        for command in &self.commands {
            match command {
                Command::MergeCoins {
                    destination,
                    sources,
                } => {
                    hasher.update([0u8]);
                    hasher.update(destination.as_str().as_bytes());
                    for source in sources {
                        hasher.update(source.as_str().as_bytes());
                    }
                }
                Command::Split { amount } => {
                    hasher.update([1u8]);
                    let mut amount_bytes = [0u8; 16];
                    LittleEndian::write_u128(&mut amount_bytes, *amount);
                    hasher.update(amount_bytes);
                }
                Command::Transfer { recipient } => {
                    hasher.update([2u8]);
                    hasher.update(recipient.as_bytes());
                }
            }
        }

        hex::encode(hasher.finalize())
    }
}
