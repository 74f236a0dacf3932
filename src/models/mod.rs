//! Domain models for the contract ledger.
//!
//! # Core Concepts
//!
//! ## Session Entities
//!
//! - [`Project`]: Container that may hold at most one Active contract at a time.
//! - [`Contract`]: Record progressing Draft → Active → Finished, linked to a
//!   project only while Active.
//! - [`Registry`]: The in-memory lists of one session. Never rebuilt from the store.
//!
//! ## Stored Rows
//!
//! Every save appends a snapshot; nothing is updated in place.
//!
//! - [`ProjectRow`]: One saved project.
//! - [`ContractRow`]: One saved contract snapshot.

mod contract;
mod project;
mod registry;
mod rows;

pub use contract::*;
pub use project::*;
pub use registry::*;
pub use rows::*;
