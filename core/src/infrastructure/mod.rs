//! Local persistence for the cart subsystem.

pub mod cart_store;
pub mod snapshot_cache;

pub use cart_store::LocalCartStore;
pub use snapshot_cache::PetSnapshotCache;
