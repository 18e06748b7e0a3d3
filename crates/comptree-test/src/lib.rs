//! comptree-test - Regression test support
//!
//! A small framework the workspace's `tests/*_reg.rs` suites share:
//!
//! - **[`RegParams`]** - indexed value/image comparisons with failure
//!   accounting and a final pass/fail summary
//! - **[`fixtures`]** - deterministic synthetic images with hand-derivable
//!   tree shapes
//!
//! # Usage
//!
//! ```
//! use comptree_test::{RegParams, fixtures};
//!
//! let mut rp = RegParams::new("doc");
//! let img = fixtures::central_peak();
//! rp.compare_ints(9, img.len() as i64);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment
//!
//! - `REGTEST_MODE`: set to `display` to report without failing

pub mod fixtures;
mod params;

pub use params::{RegParams, RegTestMode};
