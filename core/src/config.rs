//! Cart subsystem configuration

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;

const CONFIG_FILE: &str = "pawstore.json";

/// Persisted configuration for the cart subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartConfig {
	/// Config schema version
	pub version: u32,

	/// Directory holding the cart mirror, snapshot cache and this file
	pub data_dir: PathBuf,

	/// Base URL of the remote cart service
	pub api_url: String,
}

impl CartConfig {
	const TARGET_VERSION: u32 = 1;
	const DEFAULT_API_URL: &'static str = "http://localhost:8080/api";

	/// Load configuration from a data directory, creating a default config
	/// file when none exists.
	pub fn load_from(data_dir: &Path) -> Result<Self> {
		let config_path = data_dir.join(CONFIG_FILE);

		if config_path.exists() {
			info!("loading config from {config_path:?}");
			let json = fs::read_to_string(&config_path)?;
			let mut config: Self = serde_json::from_str(&json)?;

			if config.version < Self::TARGET_VERSION {
				info!(
					"migrating config from v{} to v{}",
					config.version,
					Self::TARGET_VERSION
				);
				config.migrate();
				config.save()?;
			}

			Ok(config)
		} else {
			warn!("no config found, creating default at {config_path:?}");
			let config = Self::default_with_dir(data_dir.to_path_buf());
			config.save()?;
			Ok(config)
		}
	}

	/// Default configuration rooted at a specific data directory.
	pub fn default_with_dir(data_dir: PathBuf) -> Self {
		Self {
			version: Self::TARGET_VERSION,
			data_dir,
			api_url: Self::DEFAULT_API_URL.to_string(),
		}
	}

	/// Save configuration to disk.
	pub fn save(&self) -> Result<()> {
		fs::create_dir_all(&self.data_dir)?;

		let config_path = self.data_dir.join(CONFIG_FILE);
		let json = serde_json::to_string_pretty(self)?;
		fs::write(&config_path, json)?;
		info!("saved config to {config_path:?}");
		Ok(())
	}

	fn migrate(&mut self) {
		if self.version == 0 {
			// v0 config predates the schema version field itself; nothing
			// else changed shape.
			self.version = 1;
		}
	}
}
