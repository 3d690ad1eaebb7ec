//! Shared test helpers: a scriptable in-memory cart service plus builders
//! for pets, snapshots and engines.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rust_decimal::Decimal;

use pawstore_cart_api::{
	self as cart_api, CartItem, CheckoutResponse, Pet, RemoveResponse, StatusCode, TotalResponse,
};
use pawstore_core::infrastructure::{LocalCartStore, PetSnapshotCache};
use pawstore_core::{CartLineItem, CartSyncEngine, PetSnapshot, RemoteCart};

pub fn init_tracing() {
	let _ = tracing_subscriber::fmt::try_init();
}

pub fn pet(id: i64, name: &str, price: &str) -> Pet {
	Pet {
		id,
		name: name.into(),
		category: "Dog".into(),
		price: price.parse().unwrap(),
		breed: "Mixed".into(),
		birth_year: "2022".into(),
		gender: Some("Female".into()),
		image_url: format!("https://cdn.pawstore.test/pets/{id}.jpg"),
		purchased: false,
	}
}

pub fn pet_without_gender(id: i64, name: &str, price: &str) -> Pet {
	Pet {
		gender: None,
		..pet(id, name, price)
	}
}

pub fn snapshot(id: i64, name: &str, price: &str) -> PetSnapshot {
	PetSnapshot::from(pet(id, name, price))
}

pub fn line(line_id: i64, pet_snapshot: PetSnapshot, quantity: u32) -> CartLineItem {
	CartLineItem::new(line_id, pet_snapshot, quantity)
}

pub fn engine_at(dir: &Path, remote: FakeRemote) -> CartSyncEngine<FakeRemote> {
	CartSyncEngine::new(
		remote,
		LocalCartStore::new(dir),
		PetSnapshotCache::new(dir),
	)
}

/// An in-memory stand-in for the remote cart service, scriptable per test:
/// it can go offline (everything answers 503), reject requests (404), or
/// fail adds for one specific pet to simulate a mid-replay outage.
#[derive(Clone)]
pub struct FakeRemote {
	state: Arc<Mutex<FakeState>>,
}

struct FakeState {
	online: bool,
	rejecting: bool,
	fail_add_for: Option<i64>,
	pets: HashMap<i64, Pet>,
	items: Vec<CartItem>,
	next_id: i64,
	checkouts: u32,
}

impl FakeRemote {
	pub fn new() -> Self {
		Self {
			state: Arc::new(Mutex::new(FakeState {
				online: true,
				rejecting: false,
				fail_add_for: None,
				pets: HashMap::new(),
				items: Vec::new(),
				next_id: 1,
				checkouts: 0,
			})),
		}
	}

	pub fn with_pets(pets: impl IntoIterator<Item = Pet>) -> Self {
		let remote = Self::new();
		{
			let mut state = remote.state.lock().unwrap();
			for pet in pets {
				state.pets.insert(pet.id, pet);
			}
		}
		remote
	}

	pub fn go_offline(&self) {
		self.state.lock().unwrap().online = false;
	}

	pub fn go_online(&self) {
		self.state.lock().unwrap().online = true;
	}

	/// Answer 404 to everything, as a service that is up but refusing.
	pub fn reject_requests(&self, rejecting: bool) {
		self.state.lock().unwrap().rejecting = rejecting;
	}

	/// Fail adds for this pet with a 503 while everything else works.
	pub fn fail_add_for(&self, pet_id: Option<i64>) {
		self.state.lock().unwrap().fail_add_for = pet_id;
	}

	pub fn server_items(&self) -> Vec<CartItem> {
		self.state.lock().unwrap().items.clone()
	}

	pub fn checkouts(&self) -> u32 {
		self.state.lock().unwrap().checkouts
	}

	fn unavailable() -> cart_api::Error {
		cart_api::Error::Status {
			status: StatusCode::SERVICE_UNAVAILABLE,
			message: "service unavailable".into(),
		}
	}

	fn not_found(what: &str) -> cart_api::Error {
		cart_api::Error::Status {
			status: StatusCode::NOT_FOUND,
			message: what.into(),
		}
	}
}

impl FakeState {
	fn check_reachable(&self) -> cart_api::Result<()> {
		if !self.online {
			return Err(FakeRemote::unavailable());
		}
		if self.rejecting {
			return Err(FakeRemote::not_found("rejected"));
		}
		Ok(())
	}

	fn cart_total(&self) -> Decimal {
		self.items
			.iter()
			.map(|i| i.pet.price * Decimal::from(i.quantity))
			.sum()
	}
}

#[async_trait]
impl RemoteCart for FakeRemote {
	async fn list(&self) -> cart_api::Result<Vec<CartItem>> {
		let state = self.state.lock().unwrap();
		state.check_reachable()?;
		Ok(state.items.clone())
	}

	async fn add(&self, pet_id: i64, quantity: u32) -> cart_api::Result<CartItem> {
		let mut state = self.state.lock().unwrap();
		state.check_reachable()?;
		if state.fail_add_for == Some(pet_id) {
			return Err(Self::unavailable());
		}

		if let Some(item) = state.items.iter_mut().find(|i| i.pet.id == pet_id) {
			item.quantity += quantity;
			item.subtotal = item.pet.price * Decimal::from(item.quantity);
			return Ok(item.clone());
		}

		let Some(pet) = state.pets.get(&pet_id).cloned() else {
			return Err(Self::not_found("no such pet"));
		};
		let item = CartItem {
			id: state.next_id,
			subtotal: pet.price * Decimal::from(quantity),
			pet,
			quantity,
		};
		state.next_id += 1;
		state.items.push(item.clone());
		Ok(item)
	}

	async fn update(&self, item_id: i64, quantity: i32) -> cart_api::Result<Option<CartItem>> {
		let mut state = self.state.lock().unwrap();
		state.check_reachable()?;

		let Some(index) = state.items.iter().position(|i| i.id == item_id) else {
			return Err(Self::not_found("no such cart item"));
		};

		if quantity <= 0 {
			state.items.remove(index);
			return Ok(None);
		}

		let item = &mut state.items[index];
		item.quantity = quantity as u32;
		item.subtotal = item.pet.price * Decimal::from(item.quantity);
		Ok(Some(item.clone()))
	}

	async fn remove(&self, item_id: i64) -> cart_api::Result<RemoveResponse> {
		let mut state = self.state.lock().unwrap();
		state.check_reachable()?;

		let Some(index) = state.items.iter().position(|i| i.id == item_id) else {
			return Err(Self::not_found("no such cart item"));
		};
		let item = state.items.remove(index);
		Ok(RemoveResponse {
			message: format!("{} removed from cart", item.pet.name),
			status: "success".into(),
		})
	}

	async fn clear(&self) -> cart_api::Result<()> {
		let mut state = self.state.lock().unwrap();
		state.check_reachable()?;
		state.items.clear();
		Ok(())
	}

	async fn total(&self) -> cart_api::Result<TotalResponse> {
		let state = self.state.lock().unwrap();
		state.check_reachable()?;
		Ok(TotalResponse {
			total: state.cart_total(),
		})
	}

	async fn checkout(&self) -> cart_api::Result<CheckoutResponse> {
		let mut state = self.state.lock().unwrap();
		state.check_reachable()?;
		let total = state.cart_total();
		state.items.clear();
		state.checkouts += 1;
		Ok(CheckoutResponse {
			message: "Checkout successful".into(),
			total,
		})
	}
}
