// src/exec/mod.rs

//! Child-process execution outside the pipelines.
//!
//! - [`delegate`] runs the nested shared-assets project's build.

pub mod delegate;

pub use delegate::{DelegateHandle, SharedDelegator};
