//! Deterministic-address record registry.
//!
//! Records live at program-derived addresses computed from a class namespace
//! and a caller-supplied seed. A record is created once, read by anyone, and
//! closed at most once by its authority, at which point its rent is paid out
//! to a receiver and the address is retired for good.

use solana_program::declare_id;

pub mod client;
pub mod derive;
pub mod error;
pub mod guard;
pub mod instruction;
pub mod instructions;
pub mod processor;
pub mod runtime;
pub mod state;
pub mod store;

pub use client::RegistryClient;
pub use error::RegistryError;
pub use runtime::{Bank, Execute};
pub use state::{RecordClass, RecordInfo, RecordSnapshot};
pub use store::Ledger;

declare_id!("GhnjQ9vVXX21vEgzEYZf8aXEtgq6KUqZHnUYucnXirME");
