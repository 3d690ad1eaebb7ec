//! The local cart mirror, persisted as one JSON document.
//!
//! Deliberately dumb: `load` and `save` move the whole mirror at once, and
//! all merge/validation logic lives in the sync engine. A missing file is an
//! empty synced cart; an unreadable one is a storage error and propagates,
//! because silently losing the mirror would desync the cart without any
//! signal.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::CartMirror;
use crate::error::Result;

const CART_FILE: &str = "cart.json";

#[derive(Debug, Clone)]
pub struct LocalCartStore {
	path: PathBuf,
}

impl LocalCartStore {
	pub fn new(data_dir: &Path) -> Self {
		Self {
			path: data_dir.join(CART_FILE),
		}
	}

	/// Read the full mirror. Missing file loads as an empty synced cart.
	pub fn load(&self) -> Result<CartMirror> {
		if !self.path.exists() {
			return Ok(CartMirror::default());
		}

		let json = fs::read_to_string(&self.path)?;
		Ok(serde_json::from_str(&json)?)
	}

	/// Replace the full persisted mirror.
	pub fn save(&self, mirror: &CartMirror) -> Result<()> {
		if let Some(dir) = self.path.parent() {
			fs::create_dir_all(dir)?;
		}

		let json = serde_json::to_string_pretty(mirror)?;
		fs::write(&self.path, json)?;
		debug!(
			"saved cart mirror: {} items, {:?}",
			mirror.items.len(),
			mirror.sync_state
		);
		Ok(())
	}
}
