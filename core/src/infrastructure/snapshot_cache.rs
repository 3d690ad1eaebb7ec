//! Persistent cache of pet snapshots, keyed by pet id.
//!
//! Consulted only when a cart line must be synthesized entirely offline;
//! whenever a remote response is available in the same call, the remote data
//! wins and overwrites what is cached here. Entries outlive their cart
//! lines so a pet removed from the cart can still be re-added offline.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::debug;

use crate::domain::{CachedSnapshot, PetSnapshot};
use crate::error::Result;

const SNAPSHOT_FILE: &str = "pet_snapshots.json";

#[derive(Debug, Clone)]
pub struct PetSnapshotCache {
	path: PathBuf,
}

impl PetSnapshotCache {
	pub fn new(data_dir: &Path) -> Self {
		Self {
			path: data_dir.join(SNAPSHOT_FILE),
		}
	}

	/// Store or overwrite the snapshot for this pet, stamped with now.
	pub fn remember(&self, pet: &PetSnapshot) -> Result<()> {
		self.remember_all(std::iter::once(pet))
	}

	/// Batch form of [`remember`](Self::remember): one load-save cycle for a
	/// whole remote response worth of pets.
	pub fn remember_all<'a>(&self, pets: impl IntoIterator<Item = &'a PetSnapshot>) -> Result<()> {
		let mut entries = self.load_entries()?;
		let now = Utc::now();
		let mut stored = 0usize;

		for pet in pets {
			entries.insert(
				pet.id,
				CachedSnapshot {
					pet: pet.clone(),
					cached_at: now,
				},
			);
			stored += 1;
		}

		if stored == 0 {
			return Ok(());
		}

		self.save_entries(&entries)?;
		debug!("cached {stored} pet snapshots ({} total)", entries.len());
		Ok(())
	}

	/// Look up the last observed snapshot for a pet.
	pub fn recall(&self, pet_id: i64) -> Result<Option<PetSnapshot>> {
		let mut entries = self.load_entries()?;
		Ok(entries.remove(&pet_id).map(|entry| entry.pet))
	}

	fn load_entries(&self) -> Result<BTreeMap<i64, CachedSnapshot>> {
		if !self.path.exists() {
			return Ok(BTreeMap::new());
		}

		let json = fs::read_to_string(&self.path)?;
		Ok(serde_json::from_str(&json)?)
	}

	fn save_entries(&self, entries: &BTreeMap<i64, CachedSnapshot>) -> Result<()> {
		if let Some(dir) = self.path.parent() {
			fs::create_dir_all(dir)?;
		}

		let json = serde_json::to_string_pretty(entries)?;
		fs::write(&self.path, json)?;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::domain::UNKNOWN_GENDER;
	use tempfile::tempdir;

	fn snapshot(id: i64, name: &str, price: &str) -> PetSnapshot {
		PetSnapshot {
			id,
			name: name.into(),
			category: "Dog".into(),
			price: price.parse().unwrap(),
			breed: "Beagle".into(),
			birth_year: "2022".into(),
			gender: UNKNOWN_GENDER.into(),
			image_url: String::new(),
			purchased: false,
		}
	}

	#[test]
	fn recall_returns_what_was_remembered() {
		let dir = tempdir().unwrap();
		let cache = PetSnapshotCache::new(dir.path());

		cache.remember(&snapshot(7, "Biscuit", "25.00")).unwrap();

		let recalled = cache.recall(7).unwrap().unwrap();
		assert_eq!(recalled.name, "Biscuit");
		assert_eq!(recalled.price.to_string(), "25.00");
	}

	#[test]
	fn recall_of_an_unseen_pet_is_none() {
		let dir = tempdir().unwrap();
		let cache = PetSnapshotCache::new(dir.path());

		assert!(cache.recall(9).unwrap().is_none());
	}

	#[test]
	fn remember_overwrites_the_previous_snapshot() {
		let dir = tempdir().unwrap();
		let cache = PetSnapshotCache::new(dir.path());

		cache.remember(&snapshot(7, "Biscuit", "25.00")).unwrap();
		cache.remember(&snapshot(7, "Biscuit", "27.50")).unwrap();

		let recalled = cache.recall(7).unwrap().unwrap();
		assert_eq!(recalled.price.to_string(), "27.50");
	}

	#[test]
	fn snapshots_survive_independent_store_instances() {
		let dir = tempdir().unwrap();

		PetSnapshotCache::new(dir.path())
			.remember(&snapshot(3, "Clementine", "30.00"))
			.unwrap();

		let recalled = PetSnapshotCache::new(dir.path()).recall(3).unwrap();
		assert_eq!(recalled.unwrap().name, "Clementine");
	}
}
