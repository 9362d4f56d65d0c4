//! Canonical encoding of bridge actions.
//!
//! Every action is laid out as a sequence of 32-byte big-endian words, the same
//! head layout the Ethereum ABI uses, and hashed with keccak256. The first word
//! is a per-variant tag and the second the identity of the bridge instance, so
//! votes never transfer between action kinds or between deployments.
//!
//! Oracles sign these digests off-chain. Changing a tag, the field order or the
//! set of encoded fields invalidates every signature still waiting for quorum.

use crate::types::{ActionDigest, BridgeAction, ExternalTxRef, MintRequest, OracleId};
use codec::Encode;
use sp_io::hashing::keccak_256;
use sp_std::vec::Vec;

pub const MINT_REQUEST_TAG: u64 = 0xDA7A;
pub const ORACLE_SET_UPDATE_TAG: u64 = 0x5E7;
pub const BURN_STATUS_UPDATE_TAG: u64 = 0xB012;

const WORD: usize = 32;

/// Appends ABI-style words to a buffer.
struct WordWriter {
	buf: Vec<u8>,
}

impl WordWriter {
	fn with_words(words: usize) -> Self {
		Self { buf: Vec::with_capacity(words * WORD) }
	}

	fn word(&mut self, word: [u8; WORD]) -> &mut Self {
		self.buf.extend_from_slice(&word);
		self
	}

	fn uint(&mut self, value: u128) -> &mut Self {
		let mut word = [0u8; WORD];
		word[WORD - 16..].copy_from_slice(&value.to_be_bytes());
		self.word(word)
	}

	/// Two's complement, sign-extended to the full word.
	fn int(&mut self, value: i128) -> &mut Self {
		let mut word = if value < 0 { [0xff; WORD] } else { [0u8; WORD] };
		word[WORD - 16..].copy_from_slice(&value.to_be_bytes());
		self.word(word)
	}

	fn boolean(&mut self, value: bool) -> &mut Self {
		self.uint(value as u128)
	}

	fn address(&mut self, address: &OracleId) -> &mut Self {
		let mut word = [0u8; WORD];
		word[WORD - 20..].copy_from_slice(address.as_bytes());
		self.word(word)
	}

	fn account<AccountId: Encode>(&mut self, account: &AccountId) -> &mut Self {
		self.word(account_word(account))
	}

	fn finish(self) -> Vec<u8> {
		self.buf
	}
}

/// Account identities occupy a single word: the SCALE encoding left-padded to
/// 32 bytes, or its keccak256 when the encoding does not fit.
pub fn account_word<AccountId: Encode>(account: &AccountId) -> [u8; WORD] {
	account.using_encoded(|bytes| {
		if bytes.len() > WORD {
			return keccak_256(bytes);
		}
		let mut word = [0u8; WORD];
		word[WORD - bytes.len()..].copy_from_slice(bytes);
		word
	})
}

pub fn encode_mint_request<AccountId: Encode, Instance: Encode>(
	instance: &Instance,
	request: &MintRequest<AccountId>,
) -> Vec<u8> {
	let ExternalTxRef { address, tx_hash, logical_time } = &request.tx;
	let mut w = WordWriter::with_words(8);
	w.uint(MINT_REQUEST_TAG.into())
		.account(instance)
		.account(&request.receiver)
		.uint(request.amount)
		.int(address.workchain.into())
		.word(address.address_hash.to_fixed_bytes())
		.word(tx_hash.to_fixed_bytes())
		.uint(u128::from(*logical_time));
	w.finish()
}

pub fn encode_oracle_set_update<Instance: Encode>(
	instance: &Instance,
	version_tag: u64,
	new_set: &[OracleId],
) -> Vec<u8> {
	// Four head words precede the dynamic `address[]` tail.
	const TAIL_OFFSET: u128 = 4 * WORD as u128;

	let mut w = WordWriter::with_words(5 + new_set.len());
	w.uint(ORACLE_SET_UPDATE_TAG.into())
		.account(instance)
		.uint(version_tag.into())
		.uint(TAIL_OFFSET)
		.uint(new_set.len() as u128);
	for oracle in new_set {
		w.address(oracle);
	}
	w.finish()
}

pub fn encode_burn_status_update<Instance: Encode>(
	instance: &Instance,
	allowed: bool,
	nonce: u64,
) -> Vec<u8> {
	let mut w = WordWriter::with_words(4);
	w.uint(BURN_STATUS_UPDATE_TAG.into())
		.account(instance)
		.boolean(allowed)
		.uint(nonce.into());
	w.finish()
}

pub fn encode_action<AccountId: Encode, Instance: Encode>(
	instance: &Instance,
	action: &BridgeAction<AccountId>,
) -> Vec<u8> {
	match action {
		BridgeAction::MintRequest(request) => encode_mint_request(instance, request),
		BridgeAction::OracleSetUpdate { version_tag, new_set } =>
			encode_oracle_set_update(instance, *version_tag, new_set),
		BridgeAction::BurnStatusUpdate { allowed, nonce } =>
			encode_burn_status_update(instance, *allowed, *nonce),
	}
}

/// The identity an action is voted under on the bridge instance `instance`.
pub fn action_digest<AccountId: Encode, Instance: Encode>(
	instance: &Instance,
	action: &BridgeAction<AccountId>,
) -> ActionDigest {
	keccak_256(&encode_action(instance, action)).into()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::ExternalAddress;
	use sp_core::{H160, H256};

	const INSTANCE: [u8; 20] = [0xAB; 20];

	fn word_at(bytes: &[u8], index: usize) -> &[u8] {
		&bytes[index * WORD..(index + 1) * WORD]
	}

	fn uint_word(value: u128) -> [u8; WORD] {
		let mut word = [0u8; WORD];
		word[WORD - 16..].copy_from_slice(&value.to_be_bytes());
		word
	}

	fn sample_request() -> MintRequest<[u8; 32]> {
		MintRequest {
			receiver: [7u8; 32],
			amount: 1_000_000_000,
			tx: ExternalTxRef {
				address: ExternalAddress { workchain: -1, address_hash: H256::repeat_byte(0x21) },
				tx_hash: H256::repeat_byte(0x6C),
				logical_time: 19_459_352_000_003,
			},
		}
	}

	#[test]
	fn mint_request_layout() {
		let encoded = encode_mint_request(&INSTANCE, &sample_request());

		assert_eq!(encoded.len(), 8 * WORD);
		assert_eq!(word_at(&encoded, 0), uint_word(0xDA7A));
		assert_eq!(&word_at(&encoded, 1)[..12], &[0u8; 12]);
		assert_eq!(&word_at(&encoded, 1)[12..], &INSTANCE);
		assert_eq!(word_at(&encoded, 2), [7u8; 32]);
		assert_eq!(word_at(&encoded, 3), uint_word(1_000_000_000));
		// int8(-1) sign-extends to an all-ones word
		assert_eq!(word_at(&encoded, 4), [0xff; WORD]);
		assert_eq!(word_at(&encoded, 5), [0x21; WORD]);
		assert_eq!(word_at(&encoded, 6), [0x6C; WORD]);
		assert_eq!(word_at(&encoded, 7), uint_word(19_459_352_000_003));
	}

	#[test]
	fn positive_workchain_is_not_sign_extended() {
		let mut request = sample_request();
		request.tx.address.workchain = 0;
		let encoded = encode_mint_request(&INSTANCE, &request);
		assert_eq!(word_at(&encoded, 4), [0u8; WORD]);
	}

	#[test]
	fn oracle_set_update_layout() {
		let set = [H160::repeat_byte(1), H160::repeat_byte(2), H160::repeat_byte(3)];
		let encoded = encode_oracle_set_update(&INSTANCE, 13, &set);

		assert_eq!(encoded.len(), 8 * WORD);
		assert_eq!(word_at(&encoded, 0), uint_word(0x5E7));
		assert_eq!(word_at(&encoded, 2), uint_word(13));
		assert_eq!(word_at(&encoded, 3), uint_word(0x80));
		assert_eq!(word_at(&encoded, 4), uint_word(3));
		for (i, oracle) in set.iter().enumerate() {
			let word = word_at(&encoded, 5 + i);
			assert_eq!(&word[..12], &[0u8; 12]);
			assert_eq!(&word[12..], oracle.as_bytes());
		}
	}

	#[test]
	fn burn_status_update_layout() {
		let encoded = encode_burn_status_update(&INSTANCE, true, 41);

		assert_eq!(encoded.len(), 4 * WORD);
		assert_eq!(word_at(&encoded, 0), uint_word(0xB012));
		assert_eq!(word_at(&encoded, 2), uint_word(1));
		assert_eq!(word_at(&encoded, 3), uint_word(41));
	}

	#[test]
	fn digest_binds_instance_identity() {
		let action = BridgeAction::MintRequest(sample_request());
		let here = action_digest(&INSTANCE, &action);
		let elsewhere = action_digest(&[0xCD; 20], &action);

		assert_ne!(here, elsewhere);
		assert_eq!(here, action_digest(&INSTANCE, &action));
	}

	#[test]
	fn digest_binds_every_mint_field() {
		let base = sample_request();
		let digest = |request: MintRequest<[u8; 32]>| {
			action_digest(&INSTANCE, &BridgeAction::MintRequest(request))
		};
		let reference = digest(base.clone());

		let mut other = base.clone();
		other.amount += 1;
		assert_ne!(digest(other), reference);

		let mut other = base.clone();
		other.receiver = [8u8; 32];
		assert_ne!(digest(other), reference);

		let mut other = base.clone();
		other.tx.tx_hash = H256::repeat_byte(0x6D);
		assert_ne!(digest(other), reference);

		let mut other = base;
		other.tx.logical_time += 1;
		assert_ne!(digest(other), reference);
	}

	#[test]
	fn variants_do_not_alias() {
		let burn: BridgeAction<[u8; 32]> = BridgeAction::BurnStatusUpdate { allowed: true, nonce: 5 };
		let set: BridgeAction<[u8; 32]> =
			BridgeAction::OracleSetUpdate { version_tag: 5, new_set: Vec::new() };

		assert_ne!(encode_action(&INSTANCE, &burn)[..WORD], encode_action(&INSTANCE, &set)[..WORD]);
		assert_ne!(action_digest(&INSTANCE, &burn), action_digest(&INSTANCE, &set));
	}

	#[test]
	fn oversized_accounts_are_hashed_into_one_word() {
		let long = [9u8; 40];
		assert_eq!(account_word(&long), keccak_256(&long.encode()));

		let short = 5u64;
		let mut expected = [0u8; WORD];
		expected[WORD - 8..].copy_from_slice(&5u64.to_le_bytes());
		assert_eq!(account_word(&short), expected);
	}
}
