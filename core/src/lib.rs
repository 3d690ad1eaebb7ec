//! Pawstore cart core
//!
//! The client-side consistency engine behind the storefront cart: a local
//! mirror of the remote cart that stays usable while the service is
//! unreachable and reconciles once connectivity returns. UI event handlers
//! call the [`CartSyncEngine`] operations; rendering, routing, auth and
//! payment live elsewhere.

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod services;

pub use config::CartConfig;
pub use domain::{
	CartLineItem, CartMirror, CheckoutReceipt, PetSnapshot, RemoveReceipt, SyncState,
	UNKNOWN_GENDER,
};
pub use error::{CartError, Result};
pub use services::{CartSyncEngine, HttpRemoteCart, RemoteCart};

use infrastructure::{LocalCartStore, PetSnapshotCache};

/// The wired-up cart subsystem: config plus an engine talking HTTP.
pub struct CartCore {
	pub config: CartConfig,
	pub engine: CartSyncEngine<HttpRemoteCart>,
}

impl CartCore {
	/// Build the subsystem from an existing configuration.
	pub fn new(config: CartConfig) -> Self {
		let remote = HttpRemoteCart::new(config.api_url.clone());
		let cart = LocalCartStore::new(&config.data_dir);
		let snapshots = PetSnapshotCache::new(&config.data_dir);

		Self {
			engine: CartSyncEngine::new(remote, cart, snapshots),
			config,
		}
	}

	/// Load (or create) configuration under `data_dir` and build the
	/// subsystem from it.
	pub fn open(data_dir: &std::path::Path) -> Result<Self> {
		let config = CartConfig::load_from(data_dir)?;
		Ok(Self::new(config))
	}
}
