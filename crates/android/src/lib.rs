//! Android build tooling for the CakeCost app
//!
//! This crate provides Android-specific functionality:
//! - Release signing configuration loading (`key.properties`)
//! - Declarative project settings
//! - Gradle build system integration

#![warn(missing_docs)]

pub mod gradle;
pub mod project;
pub mod signing;

pub use gradle::{BuildType, GradleProject};
pub use project::ProjectSettings;
pub use signing::{SigningConfig, SigningConfigLoader};
