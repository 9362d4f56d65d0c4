//! Benchmarking setup for pallet-oracle-bridge
#![cfg(feature = "runtime-benchmarks")]

use super::*;
use crate::Pallet as OracleBridge;
use frame_benchmarking::v2::*;
use frame_support::traits::{Currency, Get};
use frame_system::RawOrigin;
use sp_core::{crypto::KeyTypeId, ecdsa, H160, H256};
use sp_runtime::traits::Saturating;
use sp_std::vec::Vec;

const SEED: u32 = 0;
const ORACLE_KEY: KeyTypeId = KeyTypeId(*b"orcl");

fn sign(public: &ecdsa::Public, digest: &ActionDigest) -> EcdsaSignature {
	let message = signature::eth_signed_message_hash(digest);
	sp_io::crypto::ecdsa_sign_prehashed(ORACLE_KEY, public, &message)
		.expect("oracle key was generated in the keystore")
		.0
}

/// Installs `count` fresh keystore oracles and returns them sorted by address.
fn setup_oracles<T: Config>(count: u32) -> Vec<(OracleId, ecdsa::Public)> {
	let probe = H256::zero();
	let mut oracles: Vec<_> = (0..count)
		.map(|_| {
			let public = sp_io::crypto::ecdsa_generate(ORACLE_KEY, None);
			let id = signature::recover_signer(&probe, &sign(&public, &probe))
				.expect("fresh signature recovers its key");
			(id, public)
		})
		.collect();
	oracles.sort_by_key(|(id, _)| *id);

	let ids: Vec<OracleId> = oracles.iter().map(|(id, _)| *id).collect();
	OracleBridge::<T>::replace_oracle_set(&ids);
	oracles
}

fn votes<T: Config>(
	oracles: &[(OracleId, ecdsa::Public)],
	action: &BridgeAction<T::AccountId>,
) -> Vec<OracleSignature> {
	let digest = OracleBridge::<T>::action_digest(action);
	oracles
		.iter()
		.map(|(signer, public)| OracleSignature { signer: *signer, signature: sign(public, &digest) })
		.collect()
}

fn tx_ref() -> ExternalTxRef {
	ExternalTxRef {
		address: ExternalAddress { workchain: 0, address_hash: H256::repeat_byte(0x21) },
		tx_hash: H256::repeat_byte(0x6C),
		logical_time: 1,
	}
}

#[benchmarks]
mod benchmarks {
	use super::*;

	#[benchmark]
	fn vote_for_minting(s: Linear<1, { T::MaxOracles::get() }>) {
		let oracles = setup_oracles::<T>(s);
		let caller: T::AccountId = whitelisted_caller();
		let receiver: T::AccountId = account("receiver", 0, SEED);
		let amount: BalanceOf<T> = T::Currency::minimum_balance().saturating_mul(100u32.into());
		let request = MintRequest {
			receiver: receiver.clone(),
			amount: amount.try_into().ok().expect("balance fits in u128"),
			tx: tx_ref(),
		};
		let signatures = votes::<T>(&oracles, &BridgeAction::MintRequest(request.clone()));

		#[extrinsic_call]
		vote_for_minting(RawOrigin::Signed(caller), request, signatures);

		assert_eq!(T::Currency::free_balance(&receiver), amount);
	}

	#[benchmark]
	fn vote_for_new_oracle_set(
		s: Linear<1, { T::MaxOracles::get() }>,
		n: Linear<1, { T::MaxOracles::get() }>,
	) {
		let oracles = setup_oracles::<T>(s);
		let caller: T::AccountId = whitelisted_caller();
		let new_set: Vec<OracleId> = (0..n).map(|i| H160::from_low_u64_be(i as u64 + 1)).collect();
		let action = BridgeAction::OracleSetUpdate { version_tag: 1, new_set: new_set.clone() };
		let signatures = votes::<T>(&oracles, &action);

		#[extrinsic_call]
		vote_for_new_oracle_set(RawOrigin::Signed(caller), 1, new_set.clone(), signatures);

		assert_eq!(Oracles::<T>::get(), new_set);
	}

	#[benchmark]
	fn vote_for_switch_burn(s: Linear<1, { T::MaxOracles::get() }>) {
		let oracles = setup_oracles::<T>(s);
		let caller: T::AccountId = whitelisted_caller();
		let signatures =
			votes::<T>(&oracles, &BridgeAction::BurnStatusUpdate { allowed: true, nonce: 1 });

		#[extrinsic_call]
		vote_for_switch_burn(RawOrigin::Signed(caller), true, 1, signatures);

		assert!(BurnAllowed::<T>::get());
		assert_eq!(LastBurnNonce::<T>::get(), 1);
	}

	#[benchmark]
	fn burn() {
		BurnAllowed::<T>::put(true);
		let caller: T::AccountId = whitelisted_caller();
		let amount = T::Currency::minimum_balance();
		T::Currency::make_free_balance_be(&caller, amount.saturating_mul(10u32.into()));
		let destination = ExternalAddress { workchain: 0, address_hash: H256::repeat_byte(1) };

		#[extrinsic_call]
		burn(RawOrigin::Signed(caller.clone()), amount, destination);

		assert_eq!(T::Currency::free_balance(&caller), amount.saturating_mul(9u32.into()));
	}

	impl_benchmark_test_suite!(OracleBridge, crate::mock::new_test_ext(), crate::mock::Test);
}
