//! The cart sync engine.
//!
//! Every public operation is two-phase: try the remote service first; if the
//! service is unavailable (transport failure or 5xx), perform the equivalent
//! mutation against the local mirror and answer in the same shape, so a
//! caller cannot tell an online success from an offline one. Remote 4xx
//! answers are the service rejecting the request and never trigger the
//! offline path.
//!
//! Remote, when reachable, is authoritative: every remote success is written
//! through to the local mirror and the snapshot cache before it is returned.
//! The mirror carries an explicit [`SyncState`] tag recording whether it
//! still holds offline mutations the server has not seen.

use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use pawstore_cart_api as cart_api;

use crate::domain::{
	CartLineItem, CartMirror, CheckoutReceipt, PetSnapshot, RemoveReceipt, SyncState,
};
use crate::error::{CartError, Result};
use crate::infrastructure::{LocalCartStore, PetSnapshotCache};

use super::remote::RemoteCart;

/// Orchestrates the remote gateway, the local cart mirror and the pet
/// snapshot cache.
pub struct CartSyncEngine<R> {
	remote: R,
	// One writer at a time: every load-mutate-save cycle runs under this
	// lock, so concurrent callers within the process cannot lose writes.
	stores: Mutex<Stores>,
}

struct Stores {
	cart: LocalCartStore,
	snapshots: PetSnapshotCache,
}

impl<R: RemoteCart> CartSyncEngine<R> {
	pub fn new(remote: R, cart: LocalCartStore, snapshots: PetSnapshotCache) -> Self {
		Self {
			remote,
			stores: Mutex::new(Stores { cart, snapshots }),
		}
	}

	/// Current cart contents. Online, the remote list replaces the mirror
	/// wholesale; offline, the mirror is served unchanged.
	pub async fn list(&self) -> Result<Vec<CartLineItem>> {
		match self.remote.list().await {
			Ok(items) => {
				let items: Vec<CartLineItem> = items.into_iter().map(Into::into).collect();
				let stores = self.stores.lock().await;
				stores.snapshots.remember_all(items.iter().map(|i| &i.pet))?;
				stores.cart.save(&CartMirror::synced(items.clone()))?;
				Ok(items)
			}
			Err(e) if e.is_unavailability() => {
				warn!("cart service unavailable, serving local mirror: {e}");
				let stores = self.stores.lock().await;
				Ok(stores.cart.load()?.items)
			}
			Err(e) => Err(e.into()),
		}
	}

	/// Add a pet to the cart. Offline, an existing line's quantity grows, or
	/// a new line is synthesized from the snapshot cache; with neither, the
	/// add fails — there is no way to price an item with no known attributes.
	pub async fn add(&self, pet_id: i64, quantity: u32) -> Result<CartLineItem> {
		match self.remote.add(pet_id, quantity).await {
			Ok(item) => {
				let line = CartLineItem::from(item);
				let stores = self.stores.lock().await;
				stores.snapshots.remember(&line.pet)?;
				let mut mirror = stores.cart.load()?;
				mirror.upsert(line.clone());
				stores.cart.save(&mirror)?;
				Ok(line)
			}
			Err(e) if e.is_unavailability() => {
				warn!("cart service unavailable, adding pet {pet_id} to local mirror: {e}");
				let stores = self.stores.lock().await;
				let mut mirror = stores.cart.load()?;

				let line = match mirror.line_for_pet_mut(pet_id) {
					Some(existing) => {
						existing.set_quantity(existing.quantity + quantity);
						existing.clone()
					}
					None => {
						let Some(pet) = stores.snapshots.recall(pet_id)? else {
							return Err(CartError::UnknownPet { pet_id, source: e });
						};
						let line = CartLineItem::new(offline_line_id(), pet, quantity);
						mirror.items.push(line.clone());
						line
					}
				};

				mirror.sync_state = SyncState::PendingSync;
				stores.cart.save(&mirror)?;
				Ok(line)
			}
			Err(e) => Err(e.into()),
		}
	}

	/// Set a line's quantity. Quantity <= 0 deletes the line (answered as
	/// `None`), online and offline alike. Offline, a line that cannot be
	/// found locally surfaces the original remote error: there is nothing
	/// consistent to fall back to.
	pub async fn update_quantity(
		&self,
		line_id: i64,
		quantity: i32,
	) -> Result<Option<CartLineItem>> {
		match self.remote.update(line_id, quantity).await {
			Ok(Some(item)) => {
				let line = CartLineItem::from(item);
				let stores = self.stores.lock().await;
				stores.snapshots.remember(&line.pet)?;
				let mut mirror = stores.cart.load()?;
				mirror.upsert(line.clone());
				stores.cart.save(&mirror)?;
				Ok(Some(line))
			}
			Ok(None) => {
				// 204 from the service: the quantity change deleted the line.
				let stores = self.stores.lock().await;
				let mut mirror = stores.cart.load()?;
				mirror.remove_line(line_id);
				stores.cart.save(&mirror)?;
				Ok(None)
			}
			Err(e) if e.is_unavailability() => {
				warn!("cart service unavailable, updating line {line_id} in local mirror: {e}");
				let stores = self.stores.lock().await;
				let mut mirror = stores.cart.load()?;

				if quantity <= 0 {
					if mirror.remove_line(line_id).is_none() {
						return Err(e.into());
					}
					mirror.sync_state = SyncState::PendingSync;
					stores.cart.save(&mirror)?;
					return Ok(None);
				}

				let Some(line) = mirror.line_mut(line_id) else {
					return Err(e.into());
				};
				line.set_quantity(quantity as u32);
				let updated = line.clone();

				mirror.sync_state = SyncState::PendingSync;
				stores.cart.save(&mirror)?;
				Ok(Some(updated))
			}
			Err(e) => Err(e.into()),
		}
	}

	/// Remove a line from the cart.
	pub async fn remove(&self, line_id: i64) -> Result<RemoveReceipt> {
		match self.remote.remove(line_id).await {
			Ok(response) => {
				let stores = self.stores.lock().await;
				let mut mirror = stores.cart.load()?;
				mirror.remove_line(line_id);
				stores.cart.save(&mirror)?;
				Ok(response.into())
			}
			Err(e) if e.is_unavailability() => {
				warn!("cart service unavailable, removing line {line_id} from local mirror: {e}");
				let stores = self.stores.lock().await;
				let mut mirror = stores.cart.load()?;

				let Some(line) = mirror.remove_line(line_id) else {
					return Err(e.into());
				};
				mirror.sync_state = SyncState::PendingSync;
				stores.cart.save(&mirror)?;

				Ok(RemoveReceipt {
					message: format!("{} removed from cart (offline mode)", line.pet.name),
					status: "success".to_string(),
				})
			}
			Err(e) => Err(e.into()),
		}
	}

	/// Empty the cart. The local mirror is wiped whatever the remote said;
	/// clearing is idempotent and always safe to mirror. When the remote
	/// could not be cleared the mirror is tagged pending so the next sync
	/// clears the server too.
	pub async fn clear(&self) -> Result<()> {
		let outcome = self.remote.clear().await;
		let stores = self.stores.lock().await;

		match outcome {
			Ok(()) => {
				stores.cart.save(&CartMirror::default())?;
				Ok(())
			}
			Err(e) if e.is_unavailability() => {
				warn!("cart service unavailable, cleared local mirror only: {e}");
				stores.cart.save(&CartMirror::empty(SyncState::PendingSync))?;
				Ok(())
			}
			Err(e) => {
				stores.cart.save(&CartMirror::empty(SyncState::PendingSync))?;
				Err(e.into())
			}
		}
	}

	/// The cart total: the server's answer online, the decimal sum over the
	/// local mirror offline. Both paths share the mirror's arithmetic, so
	/// they agree for identical cart state.
	pub async fn total(&self) -> Result<Decimal> {
		match self.remote.total().await {
			Ok(response) => Ok(response.total),
			Err(e) if e.is_unavailability() => {
				warn!("cart service unavailable, totaling local mirror: {e}");
				let stores = self.stores.lock().await;
				Ok(stores.cart.load()?.total())
			}
			Err(e) => Err(e.into()),
		}
	}

	/// Check out the cart. A successful checkout empties both the server cart
	/// and the mirror. Offline, no transaction is ever fabricated: the error
	/// reports the locally computed total so the caller can show what would
	/// have been charged, and the mirror is left untouched for a retry.
	pub async fn checkout(&self) -> Result<CheckoutReceipt> {
		match self.remote.checkout().await {
			Ok(response) => {
				info!("checkout complete: {}", response.total);
				let stores = self.stores.lock().await;
				stores.cart.save(&CartMirror::default())?;
				Ok(response.into())
			}
			Err(e) if e.is_unavailability() => {
				let stores = self.stores.lock().await;
				let total = stores.cart.load()?.total();
				warn!("checkout unavailable, {total} would have been charged: {e}");
				Err(CartError::CheckoutUnavailable { total, source: e })
			}
			Err(e) => Err(e.into()),
		}
	}

	/// Replace the server cart with the local mirror, then re-adopt the
	/// server's view. Invoked by the caller once connectivity returns.
	///
	/// The mirror is persisted as [`SyncState::SyncInProgress`] before the
	/// remote is touched, so a crash mid-replay leaves a durable marker. The
	/// replay itself is one add per line, keyed by pet id — the mirror holds
	/// at most one line per pet, so re-running the whole sync after a
	/// partial failure cannot double-add anything.
	pub async fn sync_local_cart_with_server(&self) -> Result<Vec<CartLineItem>> {
		let stores = self.stores.lock().await;
		let mut mirror = stores.cart.load()?;

		info!(
			"syncing {} local cart lines with the server",
			mirror.items.len()
		);
		mirror.sync_state = SyncState::SyncInProgress;
		stores.cart.save(&mirror)?;

		self.remote.clear().await?;
		for line in &mirror.items {
			debug!("replaying pet {} x{}", line.pet.id, line.quantity);
			self.remote.add(line.pet.id, line.quantity).await?;
		}

		let items: Vec<CartLineItem> = self
			.remote
			.list()
			.await?
			.into_iter()
			.map(Into::into)
			.collect();
		stores.snapshots.remember_all(items.iter().map(|i| &i.pet))?;
		stores.cart.save(&CartMirror::synced(items.clone()))?;

		info!("cart sync complete: {} lines", items.len());
		Ok(items)
	}

	/// The persisted sync tag, exposed so "remote is authoritative when
	/// reachable" is observable from outside.
	pub async fn sync_state(&self) -> Result<SyncState> {
		let stores = self.stores.lock().await;
		Ok(stores.cart.load()?.sync_state)
	}

	/// Snapshot a pet observed outside any cart operation (e.g. a browse
	/// view), so an offline add can later reconstruct it.
	pub async fn observe_pet(&self, pet: cart_api::Pet) -> Result<PetSnapshot> {
		let snapshot = PetSnapshot::from(pet);
		let stores = self.stores.lock().await;
		stores.snapshots.remember(&snapshot)?;
		Ok(snapshot)
	}
}

/// Timestamp-based id for lines created while the server cannot assign one.
fn offline_line_id() -> i64 {
	Utc::now().timestamp_millis()
}
