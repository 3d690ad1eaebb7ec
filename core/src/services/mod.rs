//! Cart services: the remote seam and the sync engine built on top of it.

pub mod remote;
pub mod sync;

pub use remote::{HttpRemoteCart, RemoteCart};
pub use sync::CartSyncEngine;
