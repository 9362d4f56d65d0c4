#![cfg_attr(not(feature = "std"), no_std)]

//! # Oracle Bridge Pallet
//!
//! Authorizes bridge actions by a quorum of external oracles. Oracles are
//! secp256k1 keys identified by their Ethereum-style address; each of them signs
//! the canonical digest of an action off-chain (see [`encoding`]) and anyone may
//! relay the signatures here, in one batch or spread over several.
//!
//! Three actions exist:
//! - mint wrapped tokens against an observed external-chain transaction,
//! - switch whether users may burn (and thereby bridge back),
//! - replace the oracle set as a whole.
//!
//! ## Voting
//! A batch must be sorted by strictly ascending signer address, every signature
//! must recover to its claimed signer and every signer must be a current
//! oracle. Any violation rejects the whole batch without recording a single
//! vote. Accepted votes accumulate per action digest until
//! `ceil(2 * oracles / 3)` distinct oracles have voted, measured against the
//! oracle set live when the batch arrives. The effect then executes once and
//! the digest is finalized for good: later batches for it succeed without
//! changing anything.

pub use pallet::*;
pub use types::*;
pub use weights::WeightInfo;

#[cfg(test)]
mod mock;


#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

pub mod encoding;
pub mod signature;
mod types;
pub mod weights;

const LOG_TARGET: &str = "runtime::oracle-bridge";

#[frame_support::pallet]
pub mod pallet {
	use super::*;
	use frame_support::{
		pallet_prelude::*,
		storage::with_storage_layer,
		traits::{Currency, ExistenceRequirement, Imbalance, WithdrawReasons},
		PalletId,
	};
	use frame_system::pallet_prelude::*;
	use sp_runtime::traits::AccountIdConversion;
	use sp_std::{collections::btree_set::BTreeSet, vec::Vec};

	pub type BalanceOf<T> =
		<<T as Config>::Currency as Currency<<T as frame_system::Config>::AccountId>>::Balance;

	#[pallet::pallet]
	#[pallet::without_storage_info]
	pub struct Pallet<T>(_);

	#[pallet::config]
	pub trait Config: frame_system::Config {
		type RuntimeEvent: From<Event<Self>> + IsType<<Self as frame_system::Config>::RuntimeEvent>;

		/// Token ledger credited by mints and debited by burns.
		type Currency: Currency<Self::AccountId>;

		/// The pallet's id. Its sovereign account is the instance identity bound
		/// into every action digest.
		#[pallet::constant]
		type PalletId: Get<PalletId>;

		/// Upper bound on the oracle set and on a single signature batch.
		#[pallet::constant]
		type MaxOracles: Get<u32>;

		type WeightInfo: WeightInfo;
	}

	/// Current oracle set, in the order it was proposed.
	#[pallet::storage]
	pub type Oracles<T> = StorageValue<_, Vec<OracleId>, ValueQuery>;

	/// Membership mirror of [`Oracles`].
	#[pallet::storage]
	pub type IsOracle<T> = StorageMap<_, Blake2_128Concat, OracleId, bool, ValueQuery>;

	/// Votes per action digest. A finalized record is never written again.
	#[pallet::storage]
	pub type VoteRecords<T> = StorageMap<_, Identity, ActionDigest, VoteRecord, ValueQuery>;

	#[pallet::storage]
	pub type BurnAllowed<T> = StorageValue<_, bool, ValueQuery>;

	/// Nonce of the last executed burn status update.
	#[pallet::storage]
	pub type LastBurnNonce<T> = StorageValue<_, u64, ValueQuery>;

	#[pallet::genesis_config]
	#[derive(frame_support::DefaultNoBound)]
	pub struct GenesisConfig<T: Config> {
		/// Founding oracle set; must be non-empty and free of duplicates.
		pub oracles: Vec<OracleId>,
		pub burn_allowed: bool,
		#[serde(skip)]
		pub _config: sp_std::marker::PhantomData<T>,
	}

	#[pallet::genesis_build]
	impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
		fn build(&self) {
			Pallet::<T>::ensure_valid_oracle_set(&self.oracles)
				.expect("founding oracle set must be non-empty, bounded and without duplicates");
			Pallet::<T>::replace_oracle_set(&self.oracles);
			BurnAllowed::<T>::put(self.burn_allowed);
		}
	}

	#[pallet::event]
	#[pallet::generate_deposit(pub(super) fn deposit_event)]
	pub enum Event<T: Config> {
		/// Votes were recorded; the action still lacks quorum.
		VotesRecorded { digest: ActionDigest, count: u32, quorum: u32 },
		Minted {
			digest: ActionDigest,
			receiver: T::AccountId,
			amount: BalanceOf<T>,
			tx: ExternalTxRef,
		},
		OracleSetUpdated { digest: ActionDigest, version_tag: u64, oracles: Vec<OracleId> },
		BurnStatusUpdated { digest: ActionDigest, allowed: bool, nonce: u64 },
		/// Tokens were burned to be released to `destination` on the external chain.
		Burned { who: T::AccountId, amount: BalanceOf<T>, destination: ExternalAddress },
	}

	#[pallet::error]
	pub enum Error<T> {
		/// Signature is malformed or does not recover to the claimed signer
		InvalidSignature,
		/// Signer is not in the current oracle set
		UnauthorizedSigner,
		/// Signers are not in strictly ascending order
		UnsortedOrDuplicateSignatures,
		/// Burn status nonce does not exceed the last accepted one
		StaleNonce,
		/// Batch carries no signatures
		NoSignatures,
		/// Batch holds more signatures than the oracle set may have members
		TooManySignatures,
		/// Proposed oracle set is empty, too large or contains duplicates
		InvalidOracleSet,
		/// Mint amount does not fit the balance type
		AmountOverflow,
		/// Ledger did not credit the full mint amount
		MintFailed,
		/// Burning is currently switched off
		BurnNotAllowed,
	}

	#[pallet::hooks]
	impl<T: Config> Hooks<BlockNumberFor<T>> for Pallet<T> {
		#[cfg(feature = "try-runtime")]
		fn try_state(_n: BlockNumberFor<T>) -> Result<(), sp_runtime::TryRuntimeError> {
			Self::ensure_oracle_set_consistent()
		}
	}

	#[pallet::call]
	impl<T: Config> Pallet<T> {
		/// Vote to mint against an observed external transaction.
		#[pallet::call_index(0)]
		#[pallet::weight(T::WeightInfo::vote_for_minting(signatures.len() as u32))]
		pub fn vote_for_minting(
			origin: OriginFor<T>,
			request: MintRequest<T::AccountId>,
			signatures: Vec<OracleSignature>,
		) -> DispatchResult {
			ensure_signed(origin)?;
			Self::submit_votes(&BridgeAction::MintRequest(request), &signatures)?;
			Ok(())
		}

		/// Vote to replace the oracle set with `new_set`.
		#[pallet::call_index(1)]
		#[pallet::weight(T::WeightInfo::vote_for_new_oracle_set(
			signatures.len() as u32,
			new_set.len() as u32,
		))]
		pub fn vote_for_new_oracle_set(
			origin: OriginFor<T>,
			version_tag: u64,
			new_set: Vec<OracleId>,
			signatures: Vec<OracleSignature>,
		) -> DispatchResult {
			ensure_signed(origin)?;
			Self::submit_votes(&BridgeAction::OracleSetUpdate { version_tag, new_set }, &signatures)?;
			Ok(())
		}

		/// Vote to switch burning on or off.
		#[pallet::call_index(2)]
		#[pallet::weight(T::WeightInfo::vote_for_switch_burn(signatures.len() as u32))]
		pub fn vote_for_switch_burn(
			origin: OriginFor<T>,
			allowed: bool,
			nonce: u64,
			signatures: Vec<OracleSignature>,
		) -> DispatchResult {
			ensure_signed(origin)?;
			Self::submit_votes(&BridgeAction::BurnStatusUpdate { allowed, nonce }, &signatures)?;
			Ok(())
		}

		/// Burn own tokens to have them released to `destination` on the
		/// external chain. Only possible while burning is allowed.
		#[pallet::call_index(3)]
		#[pallet::weight(T::WeightInfo::burn())]
		pub fn burn(
			origin: OriginFor<T>,
			amount: BalanceOf<T>,
			destination: ExternalAddress,
		) -> DispatchResult {
			let who = ensure_signed(origin)?;
			ensure!(BurnAllowed::<T>::get(), Error::<T>::BurnNotAllowed);

			// Dropping the imbalance takes the amount out of total issuance.
			let _ = T::Currency::withdraw(
				&who,
				amount,
				WithdrawReasons::TRANSFER,
				ExistenceRequirement::AllowDeath,
			)?;

			log::info!(
				target: LOG_TARGET,
				"burned {:?} from {:?} towards {:?}",
				amount,
				who,
				destination
			);
			Self::deposit_event(Event::Burned { who, amount, destination });
			Ok(())
		}
	}

	impl<T: Config> Pallet<T> {
		/// Sovereign account of the bridge; the instance identity of its digests.
		pub fn account_id() -> T::AccountId {
			T::PalletId::get().into_account_truncating()
		}

		pub fn action_digest(action: &BridgeAction<T::AccountId>) -> ActionDigest {
			encoding::action_digest(&Self::account_id(), action)
		}

		/// Validates a vote batch for `action`, merges its votes and executes
		/// the action once quorum is reached.
		///
		/// Runs in its own storage layer: on error nothing, including the
		/// effect on the token ledger, is written. Batches for an already
		/// finalized action succeed without touching storage.
		pub fn submit_votes(
			action: &BridgeAction<T::AccountId>,
			signatures: &[OracleSignature],
		) -> Result<VoteOutcome, DispatchError> {
			with_storage_layer(|| Self::do_submit_votes(action, signatures)).map_err(|err| {
				log::warn!(
					target: LOG_TARGET,
					"rejected {} signature(s) for {:?}: {:?}",
					signatures.len(),
					Self::action_digest(action),
					err
				);
				err
			})
		}

		fn do_submit_votes(
			action: &BridgeAction<T::AccountId>,
			signatures: &[OracleSignature],
		) -> Result<VoteOutcome, DispatchError> {
			ensure!(!signatures.is_empty(), Error::<T>::NoSignatures);
			ensure!(
				signatures.len() <= T::MaxOracles::get() as usize,
				Error::<T>::TooManySignatures
			);
			ensure!(
				signatures.windows(2).all(|pair| pair[0].signer < pair[1].signer),
				Error::<T>::UnsortedOrDuplicateSignatures
			);

			let digest = Self::action_digest(action);
			for vote in signatures {
				Self::check_signature(&digest, vote)?;
			}

			// Replays of a settled batch stay no-ops even after its signers rotated out.
			let record = VoteRecords::<T>::get(digest);
			if record.finalized {
				log::debug!(target: LOG_TARGET, "{:?} already executed, ignoring votes", digest);
				return Ok(VoteOutcome { count: record.count(), finalized: true });
			}

			for vote in signatures {
				ensure!(Self::is_oracle(&vote.signer), Error::<T>::UnauthorizedSigner);
			}
			Self::ensure_executable(action)?;

			// Quorum is measured against the set that validated this batch.
			let quorum = Self::quorum();
			let VoteOutcome { count, .. } =
				Self::record_votes(&digest, signatures.iter().map(|vote| vote.signer));

			if count < quorum {
				log::debug!(target: LOG_TARGET, "{:?} has {}/{} votes", digest, count, quorum);
				Self::deposit_event(Event::VotesRecorded { digest, count, quorum });
				return Ok(VoteOutcome { count, finalized: false });
			}

			Self::finalize(&digest);
			Self::execute(digest, action)?;
			Ok(VoteOutcome { count, finalized: true })
		}

		/// Adds `voters` to the record of `digest`, counting each oracle once.
		///
		/// A finalized record is left as it is; the returned `finalized` flag
		/// reports whether the digest was already settled.
		pub(crate) fn record_votes(
			digest: &ActionDigest,
			voters: impl IntoIterator<Item = OracleId>,
		) -> VoteOutcome {
			VoteRecords::<T>::mutate(digest, |record| {
				if !record.finalized {
					record.voters.extend(voters);
				}
				VoteOutcome { count: record.count(), finalized: record.finalized }
			})
		}

		/// Marks `digest` as executed. Irreversible.
		pub(crate) fn finalize(digest: &ActionDigest) {
			VoteRecords::<T>::mutate(digest, |record| record.finalized = true);
		}

		/// Checks that the action could take effect right now.
		fn ensure_executable(action: &BridgeAction<T::AccountId>) -> DispatchResult {
			match action {
				BridgeAction::MintRequest(request) => {
					Self::mint_amount(request.amount)?;
				},
				BridgeAction::OracleSetUpdate { new_set, .. } =>
					Self::ensure_valid_oracle_set(new_set)?,
				BridgeAction::BurnStatusUpdate { nonce, .. } => {
					ensure!(*nonce > LastBurnNonce::<T>::get(), Error::<T>::StaleNonce);
				},
			}
			Ok(())
		}

		fn execute(digest: ActionDigest, action: &BridgeAction<T::AccountId>) -> DispatchResult {
			match action {
				BridgeAction::MintRequest(request) => {
					let amount = Self::mint_amount(request.amount)?;
					let minted = T::Currency::deposit_creating(&request.receiver, amount);
					ensure!(minted.peek() == amount, Error::<T>::MintFailed);

					log::info!(
						target: LOG_TARGET,
						"minted {:?} to {:?} for external tx {:?}",
						amount,
						request.receiver,
						request.tx.tx_hash
					);
					Self::deposit_event(Event::Minted {
						digest,
						receiver: request.receiver.clone(),
						amount,
						tx: request.tx,
					});
				},
				BridgeAction::OracleSetUpdate { version_tag, new_set } => {
					Self::replace_oracle_set(new_set);

					log::info!(
						target: LOG_TARGET,
						"oracle set {} installed with {} members",
						version_tag,
						new_set.len()
					);
					Self::deposit_event(Event::OracleSetUpdated {
						digest,
						version_tag: *version_tag,
						oracles: new_set.clone(),
					});
				},
				BridgeAction::BurnStatusUpdate { allowed, nonce } => {
					BurnAllowed::<T>::put(allowed);
					LastBurnNonce::<T>::put(nonce);

					log::info!(target: LOG_TARGET, "burning allowed: {} (nonce {})", allowed, nonce);
					Self::deposit_event(Event::BurnStatusUpdated {
						digest,
						allowed: *allowed,
						nonce: *nonce,
					});
				},
			}
			Ok(())
		}

		fn mint_amount(amount: u128) -> Result<BalanceOf<T>, DispatchError> {
			BalanceOf::<T>::try_from(amount).map_err(|_| Error::<T>::AmountOverflow.into())
		}

		/// Checks that `vote.signature` is a signature of `digest` by `vote.signer`.
		pub fn check_signature(digest: &ActionDigest, vote: &OracleSignature) -> DispatchResult {
			ensure!(signature::is_signed_by(digest, vote), Error::<T>::InvalidSignature);
			Ok(())
		}

		pub fn ensure_valid_oracle_set(set: &[OracleId]) -> DispatchResult {
			ensure!(
				!set.is_empty() && set.len() <= T::MaxOracles::get() as usize,
				Error::<T>::InvalidOracleSet
			);
			let distinct: BTreeSet<&OracleId> = set.iter().collect();
			ensure!(distinct.len() == set.len(), Error::<T>::InvalidOracleSet);
			Ok(())
		}

		/// Swaps in `new_set` wholesale, membership mirror included.
		pub(crate) fn replace_oracle_set(new_set: &[OracleId]) {
			for old in Oracles::<T>::take() {
				IsOracle::<T>::remove(old);
			}
			for oracle in new_set {
				IsOracle::<T>::insert(oracle, true);
			}
			Oracles::<T>::put(new_set.to_vec());
		}

		/// The sequence and its membership mirror hold exactly the same oracles.
		pub fn ensure_oracle_set_consistent() -> DispatchResult {
			let oracles = Oracles::<T>::get();
			ensure!(!oracles.is_empty(), "oracle set is empty");
			ensure!(
				oracles.iter().all(|oracle| IsOracle::<T>::get(oracle)),
				"oracle missing from mirror"
			);
			let distinct: BTreeSet<OracleId> = oracles.iter().copied().collect();
			ensure!(distinct.len() == oracles.len(), "duplicate oracle in set");
			ensure!(
				IsOracle::<T>::iter_keys().all(|oracle| distinct.contains(&oracle)),
				"stale oracle in mirror"
			);
			Ok(())
		}

		pub fn is_oracle(who: &OracleId) -> bool {
			IsOracle::<T>::get(who)
		}

		pub fn current_oracle_set() -> Vec<OracleId> {
			Oracles::<T>::get()
		}

		pub fn oracle_at(index: u32) -> Option<OracleId> {
			Oracles::<T>::get().get(index as usize).copied()
		}

		/// Distinct votes needed to finalize an action against the live set.
		pub fn quorum() -> u32 {
			quorum_for(Oracles::<T>::decode_len().unwrap_or_default() as u32)
		}

		pub fn vote_count(digest: &ActionDigest) -> u32 {
			VoteRecords::<T>::get(digest).count()
		}

		pub fn is_finalized(digest: &ActionDigest) -> bool {
			VoteRecords::<T>::get(digest).finalized
		}

		pub fn burn_allowed() -> bool {
			BurnAllowed::<T>::get()
		}

		pub fn last_burn_nonce() -> u64 {
			LastBurnNonce::<T>::get()
		}
	}
}
