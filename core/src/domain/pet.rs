//! Pet snapshots - the locally cached view of a pet's displayable attributes.
//!
//! A snapshot is what lets the cart render and price a line item while the
//! pet service is unreachable. Snapshots are refreshed every time a remote
//! response carries a fresher copy of the pet.

use chrono::{DateTime, Utc};
use pawstore_cart_api as cart_api;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Gender label applied when upstream data omits the field.
pub const UNKNOWN_GENDER: &str = "Unknown";

/// The last observed attributes of a pet.
///
/// Unlike the wire form ([`cart_api::Pet`]) every field here is concrete:
/// conversion from the wire is the single place where upstream gaps are
/// normalized, so no read site ever has to deal with a missing gender.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PetSnapshot {
	pub id: i64,

	/// Human-readable name
	pub name: String,

	/// Category label (e.g. "Dog", "Cat")
	pub category: String,

	/// Unit price, kept as a decimal to avoid float drift
	#[serde(with = "rust_decimal::serde::str")]
	pub price: Decimal,

	pub breed: String,

	/// Birth-year label as upstream displays it
	pub birth_year: String,

	/// Always concrete; defaults to [`UNKNOWN_GENDER`]
	pub gender: String,

	pub image_url: String,

	/// Whether the pet has already been purchased
	pub purchased: bool,
}

impl From<cart_api::Pet> for PetSnapshot {
	fn from(pet: cart_api::Pet) -> Self {
		Self {
			id: pet.id,
			name: pet.name,
			category: pet.category,
			price: pet.price,
			breed: pet.breed,
			birth_year: pet.birth_year,
			gender: pet.gender.unwrap_or_else(|| UNKNOWN_GENDER.to_string()),
			image_url: pet.image_url,
			purchased: pet.purchased,
		}
	}
}

/// A snapshot plus the moment it was observed, as persisted by the cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedSnapshot {
	#[serde(flatten)]
	pub pet: PetSnapshot,

	/// When this copy was taken from a remote response
	pub cached_at: DateTime<Utc>,
}
