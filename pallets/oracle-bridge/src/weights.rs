#![cfg_attr(rustfmt, rustfmt_skip)]
#![allow(unused_parens)]
#![allow(unused_imports)]

use frame_support::{traits::Get, weights::{Weight, constants::RocksDbWeight}};
use sp_std::marker::PhantomData;

/// Weight functions needed for pallet_oracle_bridge.
pub trait WeightInfo {
    fn vote_for_minting(s: u32) -> Weight;
    fn vote_for_new_oracle_set(s: u32, n: u32) -> Weight;
    fn vote_for_switch_burn(s: u32) -> Weight;
    fn burn() -> Weight;
}

/// Signature recovery dominates every vote extrinsic.
const RECOVER_WEIGHT: u64 = 50_000_000;

/// Default weights for pallet_oracle_bridge
pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: frame_system::Config> WeightInfo for SubstrateWeight<T> {
    fn vote_for_minting(s: u32) -> Weight {
        // Reads: Oracles, IsOracle per signer, VoteRecords, System::Account
        // Writes: VoteRecords, System::Account
        Weight::from_parts(30_000_000, 0)
            .saturating_add(Weight::from_parts(RECOVER_WEIGHT, 0).saturating_mul(s.into()))
            .saturating_add(T::DbWeight::get().reads(3))
            .saturating_add(T::DbWeight::get().reads(s.into()))
            .saturating_add(T::DbWeight::get().writes(2))
    }

    fn vote_for_new_oracle_set(s: u32, n: u32) -> Weight {
        // Reads: Oracles, IsOracle per signer, VoteRecords
        // Writes: VoteRecords, Oracles, IsOracle per old and new member
        Weight::from_parts(30_000_000, 0)
            .saturating_add(Weight::from_parts(RECOVER_WEIGHT, 0).saturating_mul(s.into()))
            .saturating_add(Weight::from_parts(100_000, 0).saturating_mul(n.into()))
            .saturating_add(T::DbWeight::get().reads(2))
            .saturating_add(T::DbWeight::get().reads(s.into()))
            .saturating_add(T::DbWeight::get().writes(2))
            .saturating_add(T::DbWeight::get().writes(n.saturating_mul(2).into()))
    }

    fn vote_for_switch_burn(s: u32) -> Weight {
        // Reads: Oracles, IsOracle per signer, VoteRecords, LastBurnNonce
        // Writes: VoteRecords, BurnAllowed, LastBurnNonce
        Weight::from_parts(30_000_000, 0)
            .saturating_add(Weight::from_parts(RECOVER_WEIGHT, 0).saturating_mul(s.into()))
            .saturating_add(T::DbWeight::get().reads(3))
            .saturating_add(T::DbWeight::get().reads(s.into()))
            .saturating_add(T::DbWeight::get().writes(3))
    }

    fn burn() -> Weight {
        Weight::from_parts(40_000_000, 0)
            .saturating_add(T::DbWeight::get().reads(2))
            .saturating_add(T::DbWeight::get().writes(1))
    }
}

impl WeightInfo for () {
    fn vote_for_minting(s: u32) -> Weight {
        Weight::from_parts(30_000_000, 0)
            .saturating_add(Weight::from_parts(RECOVER_WEIGHT, 0).saturating_mul(s.into()))
            .saturating_add(RocksDbWeight::get().reads(3))
            .saturating_add(RocksDbWeight::get().reads(s.into()))
            .saturating_add(RocksDbWeight::get().writes(2))
    }

    fn vote_for_new_oracle_set(s: u32, n: u32) -> Weight {
        Weight::from_parts(30_000_000, 0)
            .saturating_add(Weight::from_parts(RECOVER_WEIGHT, 0).saturating_mul(s.into()))
            .saturating_add(Weight::from_parts(100_000, 0).saturating_mul(n.into()))
            .saturating_add(RocksDbWeight::get().reads(2))
            .saturating_add(RocksDbWeight::get().reads(s.into()))
            .saturating_add(RocksDbWeight::get().writes(2))
            .saturating_add(RocksDbWeight::get().writes(n.saturating_mul(2).into()))
    }

    fn vote_for_switch_burn(s: u32) -> Weight {
        Weight::from_parts(30_000_000, 0)
            .saturating_add(Weight::from_parts(RECOVER_WEIGHT, 0).saturating_mul(s.into()))
            .saturating_add(RocksDbWeight::get().reads(3))
            .saturating_add(RocksDbWeight::get().reads(s.into()))
            .saturating_add(RocksDbWeight::get().writes(3))
    }

    fn burn() -> Weight {
        Weight::from_parts(40_000_000, 0)
            .saturating_add(RocksDbWeight::get().reads(2))
            .saturating_add(RocksDbWeight::get().writes(1))
    }
}
