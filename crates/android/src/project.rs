//! Declarative Android project settings
//!
//! The static values of the app module's build configuration: SDK levels,
//! application identity, toolchain targets, and per-build-type packaging
//! flags. These are opaque pass-through values for the build orchestrator;
//! the only behavior here is defaulting when the settings file is absent.

use cakecost_core::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root project settings, loadable from `cakecost-android.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ProjectSettings {
    /// Application identity and SDK pinning
    #[serde(default)]
    pub app: AppConfig,

    /// Java/Kotlin toolchain targets
    #[serde(default)]
    pub toolchain: ToolchainConfig,

    /// Per-build-type packaging flags
    #[serde(default)]
    pub build_types: BuildTypesConfig,
}

/// Application identity and SDK versions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Android namespace
    #[serde(default = "default_application_id")]
    pub namespace: String,

    /// Application id
    #[serde(default = "default_application_id")]
    pub application_id: String,

    /// compileSdk level
    #[serde(default = "default_compile_sdk")]
    pub compile_sdk: u32,

    /// minSdk level
    #[serde(default = "default_min_sdk")]
    pub min_sdk: u32,

    /// targetSdk level
    #[serde(default = "default_compile_sdk")]
    pub target_sdk: u32,

    /// Pinned NDK version
    #[serde(default = "default_ndk_version")]
    pub ndk_version: String,

    /// Monotonic version code
    #[serde(default = "default_version_code")]
    pub version_code: u32,

    /// Human-readable version name
    #[serde(default = "default_version_name")]
    pub version_name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            namespace: default_application_id(),
            application_id: default_application_id(),
            compile_sdk: default_compile_sdk(),
            min_sdk: default_min_sdk(),
            target_sdk: default_compile_sdk(),
            ndk_version: default_ndk_version(),
            version_code: default_version_code(),
            version_name: default_version_name(),
        }
    }
}

/// Java/Kotlin toolchain targets
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolchainConfig {
    /// Java source/target compatibility and Kotlin jvmTarget
    #[serde(default = "default_java_target")]
    pub java_target: u32,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            java_target: default_java_target(),
        }
    }
}

/// Flags for the named build types
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct BuildTypesConfig {
    /// Release build type
    #[serde(default)]
    pub release: BuildTypeConfig,

    /// Debug build type
    #[serde(default)]
    pub debug: BuildTypeConfig,
}

/// Packaging flags for one build type
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct BuildTypeConfig {
    /// Enable code minification
    #[serde(default)]
    pub minify_enabled: bool,

    /// Enable resource shrinking
    #[serde(default)]
    pub shrink_resources: bool,
}

fn default_application_id() -> String {
    "ru.cakecost.app".to_string()
}

fn default_compile_sdk() -> u32 {
    35
}

fn default_min_sdk() -> u32 {
    21
}

fn default_ndk_version() -> String {
    "27.0.12077973".to_string()
}

fn default_version_code() -> u32 {
    1
}

fn default_version_name() -> String {
    "1.0.0".to_string()
}

fn default_java_target() -> u32 {
    17
}

impl ProjectSettings {
    /// Load settings from an explicit path, a well-known candidate file, or
    /// defaults when no file exists.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => find_settings_file(),
        };

        match path {
            Some(p) => {
                let content = std::fs::read_to_string(&p).map_err(|e| {
                    Error::config(format!("Failed to read settings file {}: {}", p.display(), e))
                })?;
                toml::from_str(&content).map_err(|e| {
                    Error::config(format!("Failed to parse settings file {}: {}", p.display(), e))
                })
            }
            None => Ok(Self::default()),
        }
    }
}

/// Find the settings file in standard locations
fn find_settings_file() -> Option<std::path::PathBuf> {
    let candidates = ["cakecost-android.toml", ".cakecost-android.toml"];

    for candidate in candidates {
        let p = Path::new(candidate);
        if p.exists() {
            return Some(p.to_path_buf());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_app_module() {
        let settings = ProjectSettings::default();
        assert_eq!(settings.app.application_id, "ru.cakecost.app");
        assert_eq!(settings.app.compile_sdk, 35);
        assert_eq!(settings.app.min_sdk, 21);
        assert_eq!(settings.app.target_sdk, 35);
        assert_eq!(settings.app.ndk_version, "27.0.12077973");
        assert_eq!(settings.app.version_code, 1);
        assert_eq!(settings.app.version_name, "1.0.0");
        assert_eq!(settings.toolchain.java_target, 17);
        assert!(!settings.build_types.release.minify_enabled);
        assert!(!settings.build_types.release.shrink_resources);
    }

    #[test]
    fn test_partial_file_keeps_defaults_for_rest() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cakecost-android.toml");
        fs::write(
            &path,
            "[app]\nversion_code = 42\n\n[build_types.release]\nminify_enabled = true\n",
        )
        .unwrap();

        let settings = ProjectSettings::load(Some(&path)).unwrap();
        assert_eq!(settings.app.version_code, 42);
        assert_eq!(settings.app.application_id, "ru.cakecost.app");
        assert!(settings.build_types.release.minify_enabled);
        assert!(!settings.build_types.release.shrink_resources);
        assert!(!settings.build_types.debug.minify_enabled);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cakecost-android.toml");
        fs::write(&path, "[app\nversion_code = 42\n").unwrap();

        let err = ProjectSettings::load(Some(&path)).unwrap_err();
        assert_eq!(err.code.category(), "Configuration");
    }

    #[test]
    fn test_missing_explicit_path_is_error() {
        let dir = TempDir::new().unwrap();
        let err = ProjectSettings::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert_eq!(err.code.category(), "Configuration");
    }
}
