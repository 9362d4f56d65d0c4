use codec::{Decode, Encode, MaxEncodedLen};
use frame_support::pallet_prelude::RuntimeDebug;
use scale_info::TypeInfo;
use sp_core::{H160, H256};
use sp_std::{collections::btree_set::BTreeSet, vec::Vec};

/// Ethereum-style address of an oracle key: `keccak256(pubkey)[12..32]`.
pub type OracleId = H160;

/// Digest of an action's canonical encoding; the key votes accumulate under.
pub type ActionDigest = H256;

/// `r || s || v` recoverable secp256k1 signature.
pub type EcdsaSignature = [u8; 65];

/// Address on the external chain, as reported by the oracles.
#[derive(Clone, Copy, Encode, Decode, Eq, PartialEq, RuntimeDebug, TypeInfo, MaxEncodedLen)]
pub struct ExternalAddress {
	/// Workchain the address lives on (`-1` for the masterchain).
	pub workchain: i8,
	pub address_hash: H256,
}

/// The observed external transaction a mint attests to.
#[derive(Clone, Copy, Encode, Decode, Eq, PartialEq, RuntimeDebug, TypeInfo, MaxEncodedLen)]
pub struct ExternalTxRef {
	/// Source account of the transfer on the external chain
	pub address: ExternalAddress,
	pub tx_hash: H256,
	/// Logical time (sequence) of the transaction
	pub logical_time: u64,
}

/// Request to mint `amount` wrapped tokens to `receiver`.
#[derive(Clone, Encode, Decode, Eq, PartialEq, RuntimeDebug, TypeInfo, MaxEncodedLen)]
pub struct MintRequest<AccountId> {
	pub receiver: AccountId,
	pub amount: u128,
	pub tx: ExternalTxRef,
}

/// Every action the oracle quorum can authorize.
#[derive(Clone, Encode, Decode, Eq, PartialEq, RuntimeDebug, TypeInfo)]
pub enum BridgeAction<AccountId> {
	/// Mint against an observed external transaction
	MintRequest(MintRequest<AccountId>),
	/// Replace the whole oracle set. `version_tag` only distinguishes proposals.
	OracleSetUpdate { version_tag: u64, new_set: Vec<OracleId> },
	/// Switch burning on or off. `nonce` must beat the last accepted one.
	BurnStatusUpdate { allowed: bool, nonce: u64 },
}

/// One oracle's vote: the claimed signer and its signature over the action.
#[derive(Clone, Encode, Decode, Eq, PartialEq, RuntimeDebug, TypeInfo, MaxEncodedLen)]
pub struct OracleSignature {
	pub signer: OracleId,
	pub signature: EcdsaSignature,
}

/// Votes gathered so far for one action digest.
#[derive(Clone, Default, Encode, Decode, Eq, PartialEq, RuntimeDebug, TypeInfo)]
pub struct VoteRecord {
	/// Oracles that already contributed a valid vote
	pub voters: BTreeSet<OracleId>,
	/// Set once the effect executed; never cleared
	pub finalized: bool,
}

impl VoteRecord {
	pub fn count(&self) -> u32 {
		self.voters.len() as u32
	}
}

/// Result of a successful vote submission.
#[derive(Clone, Copy, Encode, Decode, Eq, PartialEq, RuntimeDebug, TypeInfo)]
pub struct VoteOutcome {
	pub count: u32,
	pub finalized: bool,
}

/// Minimum number of distinct oracle votes for a set of `oracles` members:
/// `ceil(2 * oracles / 3)`, never below one.
pub fn quorum_for(oracles: u32) -> u32 {
	(oracles.saturating_mul(2).saturating_add(2) / 3).max(1)
}
