//! Console record manager for projects and the contracts attached to them.
//!
//! The [`session`] owns the in-memory lists for one run; the [`db`] store is an
//! append-only log of every snapshot ever saved.

pub mod db;
pub mod error;
pub mod models;
pub mod report;
pub mod session;

pub use error::{Error, Result};
