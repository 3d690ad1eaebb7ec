//! Cart line items and the persisted local mirror.

use pawstore_cart_api as cart_api;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::pet::PetSnapshot;

/// One pet's presence in the cart.
///
/// The id is server-assigned when the line was created online, or a
/// timestamp-based id when it was created offline. The subtotal is derived
/// state: it is recomputed from `pet.price * quantity` on construction and on
/// every quantity change, never trusted after a mutation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
	pub id: i64,
	pub pet: PetSnapshot,
	pub quantity: u32,
	#[serde(with = "rust_decimal::serde::str")]
	pub subtotal: Decimal,
}

impl CartLineItem {
	pub fn new(id: i64, pet: PetSnapshot, quantity: u32) -> Self {
		let subtotal = pet.price * Decimal::from(quantity);
		Self {
			id,
			pet,
			quantity,
			subtotal,
		}
	}

	/// Set the quantity and recompute the subtotal. Quantity 0 is not stored
	/// here; callers delete the line instead.
	pub fn set_quantity(&mut self, quantity: u32) {
		self.quantity = quantity;
		self.subtotal = self.pet.price * Decimal::from(quantity);
	}
}

impl From<cart_api::CartItem> for CartLineItem {
	fn from(item: cart_api::CartItem) -> Self {
		// Recompute rather than carrying over the reported subtotal, so the
		// derived-state invariant holds no matter what the wire said.
		Self::new(item.id, item.pet.into(), item.quantity)
	}
}

/// Where the local mirror stands relative to the server.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SyncState {
	/// The mirror was last written from a full remote response
	Synced,

	/// Offline mutations exist that the server has not seen yet
	PendingSync,

	/// A replay to the server started and has not completed. Persisted before
	/// the replay touches the remote so the marker survives a crash.
	SyncInProgress,
}

/// The persisted local cart: an ordered list of line items plus the sync tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartMirror {
	pub sync_state: SyncState,
	pub items: Vec<CartLineItem>,
}

impl Default for CartMirror {
	fn default() -> Self {
		Self {
			sync_state: SyncState::Synced,
			items: Vec::new(),
		}
	}
}

impl CartMirror {
	pub fn empty(sync_state: SyncState) -> Self {
		Self {
			sync_state,
			items: Vec::new(),
		}
	}

	pub fn synced(items: Vec<CartLineItem>) -> Self {
		Self {
			sync_state: SyncState::Synced,
			items,
		}
	}

	/// Replace the line for this item's pet, or append. Keeps the
	/// one-line-per-pet invariant.
	pub fn upsert(&mut self, item: CartLineItem) {
		match self.items.iter_mut().find(|i| i.pet.id == item.pet.id) {
			Some(existing) => *existing = item,
			None => self.items.push(item),
		}
	}

	pub fn line_for_pet_mut(&mut self, pet_id: i64) -> Option<&mut CartLineItem> {
		self.items.iter_mut().find(|i| i.pet.id == pet_id)
	}

	pub fn line_mut(&mut self, line_id: i64) -> Option<&mut CartLineItem> {
		self.items.iter_mut().find(|i| i.id == line_id)
	}

	/// Remove and return the line with this id, if present.
	pub fn remove_line(&mut self, line_id: i64) -> Option<CartLineItem> {
		let index = self.items.iter().position(|i| i.id == line_id)?;
		Some(self.items.remove(index))
	}

	/// Decimal sum of `price * quantity` over all lines. The same arithmetic
	/// as line subtotals, so the offline total can never drift from what the
	/// line items show.
	pub fn total(&self) -> Decimal {
		self.items
			.iter()
			.map(|i| i.pet.price * Decimal::from(i.quantity))
			.sum()
	}
}

/// What a remove operation reports back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveReceipt {
	pub message: String,
	pub status: String,
}

impl From<cart_api::RemoveResponse> for RemoveReceipt {
	fn from(response: cart_api::RemoveResponse) -> Self {
		Self {
			message: response.message,
			status: response.status,
		}
	}
}

/// What a successful checkout reports back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutReceipt {
	pub message: String,
	#[serde(with = "rust_decimal::serde::str")]
	pub total: Decimal,
}

impl From<cart_api::CheckoutResponse> for CheckoutReceipt {
	fn from(response: cart_api::CheckoutResponse) -> Self {
		Self {
			message: response.message,
			total: response.total,
		}
	}
}
