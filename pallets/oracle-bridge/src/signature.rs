//! Recovery of oracle identities from secp256k1 signatures.
//!
//! Oracles sign with standard Ethereum tooling, so the signed message is the
//! `eth_sign` envelope around the action digest rather than the digest itself.

use crate::types::{ActionDigest, EcdsaSignature, OracleId, OracleSignature};
use sp_io::{crypto::secp256k1_ecdsa_recover, hashing::keccak_256};

pub const ETH_SIGNED_MESSAGE_PREFIX: &[u8; 28] = b"\x19Ethereum Signed Message:\n32";

/// `keccak256("\x19Ethereum Signed Message:\n32" || digest)`
pub fn eth_signed_message_hash(digest: &ActionDigest) -> [u8; 32] {
	let mut message = [0u8; 60];
	message[..28].copy_from_slice(ETH_SIGNED_MESSAGE_PREFIX);
	message[28..].copy_from_slice(digest.as_bytes());
	keccak_256(&message)
}

/// Address of an uncompressed public key given without its `0x04` prefix.
pub fn oracle_id_from_public(public: &[u8; 64]) -> OracleId {
	OracleId::from_slice(&keccak_256(public)[12..])
}

/// Recovers the oracle that signed `digest`, or `None` for a malformed
/// signature.
pub fn recover_signer(digest: &ActionDigest, signature: &EcdsaSignature) -> Option<OracleId> {
	// Both raw (0/1) and Ethereum-style (27/28) recovery ids are accepted.
	if !matches!(signature[64], 0 | 1 | 27 | 28) {
		return None;
	}
	let public = secp256k1_ecdsa_recover(signature, &eth_signed_message_hash(digest)).ok()?;
	Some(oracle_id_from_public(&public))
}

/// True when `vote.signature` recovers to exactly `vote.signer`.
pub fn is_signed_by(digest: &ActionDigest, vote: &OracleSignature) -> bool {
	recover_signer(digest, &vote.signature) == Some(vote.signer)
}
