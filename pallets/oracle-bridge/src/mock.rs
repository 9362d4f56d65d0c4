use crate as pallet_oracle_bridge;
use crate::{signature, ActionDigest, BridgeAction, OracleId, OracleSignature};
use frame_support::{derive_impl, parameter_types, traits::ConstU32, PalletId};
use sp_core::{ecdsa, Pair};
use sp_keyring::AccountKeyring;
use sp_keystore::{testing::MemoryKeystore, KeystoreExt};
use sp_runtime::{
	traits::{IdentifyAccount, IdentityLookup, Verify},
	BuildStorage,
};

pub type Signature = sp_runtime::MultiSignature;
pub type AccountId = <<Signature as Verify>::Signer as IdentifyAccount>::AccountId;
pub type Balance = u128;

pub const INITIAL_BALANCE: Balance = 1_000_000;
pub const MAX_ORACLES: u32 = 8;

// Configure a mock runtime to test the pallet
frame_support::construct_runtime!(
	pub enum Test
	{
		System: frame_system,
		Balances: pallet_balances,
		OracleBridge: pallet_oracle_bridge,
	}
);

#[derive_impl(frame_system::config_preludes::TestDefaultConfig)]
impl frame_system::Config for Test {
	type Block = frame_system::mocking::MockBlock<Test>;
	type AccountId = AccountId;
	type AccountData = pallet_balances::AccountData<Balance>;
	type Lookup = IdentityLookup<Self::AccountId>;
}

parameter_types! {
	pub const ExistentialDeposit: Balance = 10;
}

#[derive_impl(pallet_balances::config_preludes::TestDefaultConfig)]
impl pallet_balances::Config for Test {
	type Balance = Balance;
	type AccountStore = System;
	type ExistentialDeposit = ExistentialDeposit;
}

parameter_types! {
	pub const OracleBridgePalletId: PalletId = PalletId(*b"orclbrdg");
}

impl pallet_oracle_bridge::Config for Test {
	type RuntimeEvent = RuntimeEvent;
	type Currency = Balances;
	type PalletId = OracleBridgePalletId;
	type MaxOracles = ConstU32<MAX_ORACLES>;
	type WeightInfo = ();
}

// Relayers
pub fn alice() -> AccountId {
	AccountKeyring::Alice.to_account_id()
}
pub fn bob() -> AccountId {
	AccountKeyring::Bob.to_account_id()
}

// Never funded in genesis
pub fn new_account() -> AccountId {
	AccountKeyring::One.to_account_id()
}

// Oracle keys. Index `n` stands for oracle "On"; any index yields a valid key.
fn oracle_secret(index: u8) -> [u8; 32] {
	let mut secret = [0x42u8; 32];
	secret[31] = index;
	secret
}

pub fn oracle_pair(index: u8) -> ecdsa::Pair {
	ecdsa::Pair::from_seed(&oracle_secret(index))
}

pub fn oracle_id(index: u8) -> OracleId {
	let secret = libsecp256k1::SecretKey::parse(&oracle_secret(index)).unwrap();
	let public = libsecp256k1::PublicKey::from_secret_key(&secret).serialize();
	let mut uncompressed = [0u8; 64];
	uncompressed.copy_from_slice(&public[1..]);
	signature::oracle_id_from_public(&uncompressed)
}

pub fn oracle_ids(indices: &[u8]) -> Vec<OracleId> {
	indices.iter().map(|index| oracle_id(*index)).collect()
}

/// Signs `digest` the way an oracle's Ethereum tooling would.
pub fn sign_digest(digest: &ActionDigest, index: u8) -> OracleSignature {
	let signed = oracle_pair(index).sign_prehashed(&signature::eth_signed_message_hash(digest));
	OracleSignature { signer: oracle_id(index), signature: signed.0 }
}

pub fn sign_action(action: &BridgeAction<AccountId>, index: u8) -> OracleSignature {
	sign_digest(&OracleBridge::action_digest(action), index)
}

/// Votes of the given oracles for `action`, sorted by signer.
pub fn signed_batch(action: &BridgeAction<AccountId>, indices: &[u8]) -> Vec<OracleSignature> {
	let mut batch: Vec<_> = indices.iter().map(|index| sign_action(action, *index)).collect();
	batch.sort_by_key(|vote| vote.signer);
	batch
}

pub fn new_test_ext() -> sp_io::TestExternalities {
	new_test_ext_with_oracles(&[1, 2, 3])
}

pub fn new_test_ext_with_oracles(indices: &[u8]) -> sp_io::TestExternalities {
	let mut t = frame_system::GenesisConfig::<Test>::default().build_storage().unwrap();

	pallet_balances::GenesisConfig::<Test> {
		balances: vec![(alice(), INITIAL_BALANCE), (bob(), INITIAL_BALANCE)],
	}
	.assimilate_storage(&mut t)
	.unwrap();

	pallet_oracle_bridge::GenesisConfig::<Test> {
		oracles: oracle_ids(indices),
		burn_allowed: false,
		..Default::default()
	}
	.assimilate_storage(&mut t)
	.unwrap();

	let mut ext: sp_io::TestExternalities = t.into();
	ext.register_extension(KeystoreExt::new(MemoryKeystore::new()));
	ext.execute_with(|| System::set_block_number(1));
	ext
}
