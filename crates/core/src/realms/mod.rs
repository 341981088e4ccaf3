//! Realms service client.
//!
//! Lists the account's hosted realms, picks one with a [`RealmSelector`] and
//! issues time-limited backup download links for it.

mod client;
mod error;
mod select;
mod types;

pub use crate::config::RealmSelector;
pub use client::RealmsClient;
pub use error::RealmsError;
pub use select::select_realm;
pub use types::{DownloadDescriptor, RealmReference, RealmSummary};
