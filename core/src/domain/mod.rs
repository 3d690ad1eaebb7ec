//! Domain model for the cart subsystem.

pub mod cart;
pub mod pet;

pub use cart::{CartLineItem, CartMirror, CheckoutReceipt, RemoveReceipt, SyncState};
pub use pet::{CachedSnapshot, PetSnapshot, UNKNOWN_GENDER};
