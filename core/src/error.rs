//! Cart-specific error types

use pawstore_cart_api as cart_api;
use rust_decimal::Decimal;
use thiserror::Error;

/// Cart operation errors
#[derive(Error, Debug)]
pub enum CartError {
	/// The remote service failed and no local fallback could apply
	#[error("cart service error: {0}")]
	Api(#[from] cart_api::Error),

	/// An offline add had neither a local line nor a cached snapshot to
	/// build from. Carries the remote error that forced the offline path.
	#[error("no local or cached data for pet {pet_id}; cannot build a cart line offline")]
	UnknownPet {
		pet_id: i64,
		#[source]
		source: cart_api::Error,
	},

	/// Checkout could not reach the server. No transaction occurred; the
	/// total is what the local mirror says would have been charged.
	#[error("checkout unavailable; {total} would have been charged, no transaction occurred")]
	CheckoutUnavailable {
		total: Decimal,
		#[source]
		source: cart_api::Error,
	},

	/// Local storage read/write failure
	#[error("cart storage error: {0}")]
	Io(#[from] std::io::Error),

	/// Local storage held something that is not a cart
	#[error("cart storage corrupted: {0}")]
	Corrupt(#[from] serde_json::Error),
}

/// Result type for cart operations
pub type Result<T> = std::result::Result<T, CartError>;
