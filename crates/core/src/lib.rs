//! Core utilities for CakeCost development tools
//!
//! This crate provides shared functionality used by the Android tooling:
//!
//! - **Error handling**: structured errors with codes, context, and recovery suggestions
//! - **Properties parsing**: Java-style `.properties` files (what Gradle reads `key.properties` with)
//! - **Process execution**: safe command execution with output capture
//!
//! # Example
//!
//! ```rust,no_run
//! use cakecost_core::properties::Properties;
//!
//! let props = Properties::load("android/key.properties").expect("malformed properties");
//! if let Some(alias) = props.get_nonblank("keyAlias") {
//!     println!("signing as {alias}");
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod process;
pub mod properties;

pub use error::{Error, ErrorCode, Result, ResultExt};
