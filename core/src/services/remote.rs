//! The seam between the sync engine and the remote cart service.
//!
//! The engine only ever talks to a [`RemoteCart`]; in production that is
//! [`HttpRemoteCart`] forwarding to the cart-api crate, in tests a
//! scriptable fake.

use async_trait::async_trait;
use pawstore_cart_api as cart_api;

/// The five remote cart operations plus total and checkout, exactly as the
/// service contract shapes them. Implementations perform no retries and no
/// fallback; every error propagates unmodified.
#[async_trait]
pub trait RemoteCart: Send + Sync {
	async fn list(&self) -> cart_api::Result<Vec<cart_api::CartItem>>;

	async fn add(&self, pet_id: i64, quantity: u32) -> cart_api::Result<cart_api::CartItem>;

	/// `Ok(None)` is the service's 204 answer: a non-positive quantity
	/// deleted the line.
	async fn update(&self, item_id: i64, quantity: i32)
		-> cart_api::Result<Option<cart_api::CartItem>>;

	async fn remove(&self, item_id: i64) -> cart_api::Result<cart_api::RemoveResponse>;

	async fn clear(&self) -> cart_api::Result<()>;

	async fn total(&self) -> cart_api::Result<cart_api::TotalResponse>;

	async fn checkout(&self) -> cart_api::Result<cart_api::CheckoutResponse>;
}

/// Production [`RemoteCart`] backed by the HTTP cart service.
#[derive(Clone)]
pub struct HttpRemoteCart {
	config: cart_api::RequestConfig,
}

impl HttpRemoteCart {
	pub fn new(base_url: impl Into<String>) -> Self {
		Self {
			config: cart_api::RequestConfig::new(base_url),
		}
	}

	pub fn with_config(config: cart_api::RequestConfig) -> Self {
		Self { config }
	}
}

#[async_trait]
impl RemoteCart for HttpRemoteCart {
	async fn list(&self) -> cart_api::Result<Vec<cart_api::CartItem>> {
		cart_api::cart::list(self.config.clone()).await
	}

	async fn add(&self, pet_id: i64, quantity: u32) -> cart_api::Result<cart_api::CartItem> {
		cart_api::cart::add(self.config.clone(), pet_id, quantity).await
	}

	async fn update(
		&self,
		item_id: i64,
		quantity: i32,
	) -> cart_api::Result<Option<cart_api::CartItem>> {
		cart_api::cart::update(self.config.clone(), item_id, quantity).await
	}

	async fn remove(&self, item_id: i64) -> cart_api::Result<cart_api::RemoveResponse> {
		cart_api::cart::remove(self.config.clone(), item_id).await
	}

	async fn clear(&self) -> cart_api::Result<()> {
		cart_api::cart::clear(self.config.clone()).await
	}

	async fn total(&self) -> cart_api::Result<cart_api::TotalResponse> {
		cart_api::cart::total(self.config.clone()).await
	}

	async fn checkout(&self) -> cart_api::Result<cart_api::CheckoutResponse> {
		cart_api::cart::checkout(self.config.clone()).await
	}
}
