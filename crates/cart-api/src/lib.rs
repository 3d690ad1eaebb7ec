//! Stateless HTTP wrapper over the remote cart service.
//!
//! One `exec` function per remote operation, each a direct call against the
//! cart contract. Nothing here retries or falls back; errors propagate to the
//! caller (the sync engine) which decides what a failure means.

pub use reqwest::StatusCode;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Everything an `exec` call needs to reach the cart service.
#[derive(Clone)]
pub struct RequestConfig {
	pub client: reqwest::Client,
	pub base_url: String,
}

impl RequestConfig {
	pub fn new(base_url: impl Into<String>) -> Self {
		Self {
			client: reqwest::Client::new(),
			base_url: base_url.into(),
		}
	}
}

/// Remote cart API errors
#[derive(thiserror::Error, Debug)]
pub enum Error {
	/// The request never completed, or the response body could not be decoded
	#[error("cart service unreachable: {0}")]
	Transport(#[from] reqwest::Error),

	/// The service answered with a non-2xx status
	#[error("cart service returned {status}: {message}")]
	Status { status: StatusCode, message: String },
}

impl Error {
	/// Whether this error means the service is unavailable rather than
	/// rejecting the request. Transport failures and 5xx responses qualify;
	/// 4xx responses are the service refusing a well-delivered request and
	/// must not trigger any offline fallback.
	pub fn is_unavailability(&self) -> bool {
		match self {
			Self::Transport(_) => true,
			Self::Status { status, .. } => status.is_server_error(),
		}
	}
}

pub type Result<T> = std::result::Result<T, Error>;

/// A pet as the remote service reports it. `gender` is optional upstream;
/// normalization to a concrete value happens on the consumer side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
	pub id: i64,
	pub name: String,
	pub category: String,
	#[serde(with = "rust_decimal::serde::str")]
	pub price: Decimal,
	pub breed: String,
	pub birth_year: String,
	pub gender: Option<String>,
	pub image_url: String,
	pub purchased: bool,
}

/// One line of the remote cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
	pub id: i64,
	pub pet: Pet,
	pub quantity: u32,
	#[serde(with = "rust_decimal::serde::str")]
	pub subtotal: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveResponse {
	pub message: String,
	pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalResponse {
	#[serde(with = "rust_decimal::serde::str")]
	pub total: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
	pub message: String,
	#[serde(with = "rust_decimal::serde::str")]
	pub total: Decimal,
}

async fn parse_json<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
	let response = check_status(response).await?;
	Ok(response.json().await?)
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
	let status = response.status();
	if status.is_success() {
		return Ok(response);
	}

	let message = response.text().await.unwrap_or_default();
	tracing::debug!("cart service answered {status}: {message}");
	Err(Error::Status { status, message })
}

pub mod cart {
	use super::*;

	pub use list::exec as list;
	pub mod list {
		use super::*;

		pub type Response = Vec<CartItem>;

		pub async fn exec(config: RequestConfig) -> Result<Response> {
			let response = config
				.client
				.get(format!("{}/cart", config.base_url))
				.send()
				.await?;

			parse_json(response).await
		}
	}

	pub use add::exec as add;
	pub mod add {
		use super::*;

		pub async fn exec(config: RequestConfig, pet_id: i64, quantity: u32) -> Result<CartItem> {
			let response = config
				.client
				.post(format!("{}/cart/add/{}", config.base_url, pet_id))
				.query(&[("quantity", quantity)])
				.send()
				.await?;

			parse_json(response).await
		}
	}

	pub use update::exec as update;
	pub mod update {
		use super::*;

		/// `None` when the service answered 204 No Content, its signal that a
		/// non-positive quantity deleted the line.
		pub type Response = Option<CartItem>;

		pub async fn exec(config: RequestConfig, item_id: i64, quantity: i32) -> Result<Response> {
			let response = config
				.client
				.put(format!("{}/cart/{}", config.base_url, item_id))
				.query(&[("quantity", quantity)])
				.send()
				.await?;

			if response.status() == StatusCode::NO_CONTENT {
				return Ok(None);
			}

			parse_json(response).await.map(Some)
		}
	}

	pub use remove::exec as remove;
	pub mod remove {
		use super::*;

		pub async fn exec(config: RequestConfig, item_id: i64) -> Result<RemoveResponse> {
			let response = config
				.client
				.delete(format!("{}/cart/{}", config.base_url, item_id))
				.send()
				.await?;

			parse_json(response).await
		}
	}

	pub use clear::exec as clear;
	pub mod clear {
		use super::*;

		pub async fn exec(config: RequestConfig) -> Result<()> {
			let response = config
				.client
				.delete(format!("{}/cart", config.base_url))
				.send()
				.await?;

			check_status(response).await?;
			Ok(())
		}
	}

	pub use total::exec as total;
	pub mod total {
		use super::*;

		pub async fn exec(config: RequestConfig) -> Result<TotalResponse> {
			let response = config
				.client
				.get(format!("{}/cart/total", config.base_url))
				.send()
				.await?;

			parse_json(response).await
		}
	}

	pub use checkout::exec as checkout;
	pub mod checkout {
		use super::*;

		pub async fn exec(config: RequestConfig) -> Result<CheckoutResponse> {
			let response = config
				.client
				.post(format!("{}/cart/checkout", config.base_url))
				.send()
				.await?;

			parse_json(response).await
		}
	}
}
