//! Matchstone (workspace facade crate).
//!
//! This package keeps the `matchstone::{core,types}` public API stable while
//! the implementation lives in dedicated crates under `crates/`.

pub use matchstone_core as core;
pub use matchstone_types as types;
