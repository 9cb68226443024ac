//! Gradle build system integration
//!
//! Invokes the project's Gradle wrapper for assembling, bundling, and
//! cleaning, and runs the signing preflight for release packaging.

use crate::signing::SigningConfig;
use cakecost_core::error::{Error, ErrorCode, Result};
use cakecost_core::process::{run_command_in_dir, CommandResult};
use std::path::{Path, PathBuf};

/// Named build variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildType {
    /// Debug build, default settings
    Debug,
    /// Release build, signed when a complete signing config exists
    Release,
}

impl BuildType {
    /// Gradle task suffix ("Debug" / "Release")
    pub fn task_suffix(&self) -> &'static str {
        match self {
            BuildType::Debug => "Debug",
            BuildType::Release => "Release",
        }
    }

    /// Parse from the CLI's `--configuration` value
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "debug" => Ok(BuildType::Debug),
            "release" => Ok(BuildType::Release),
            other => Err(Error::config(format!(
                "Unknown build configuration: {other}"
            ))
            .with_suggestion("Use \"debug\" or \"release\"")),
        }
    }
}

impl std::fmt::Display for BuildType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildType::Debug => write!(f, "debug"),
            BuildType::Release => write!(f, "release"),
        }
    }
}

/// Outcome of the release signing preflight
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseSigning {
    /// No key.properties: the release artifact will be unsigned
    Unsigned,
    /// Complete configuration with an existing keystore
    Signed {
        /// Resolved keystore path
        keystore: PathBuf,
    },
}

/// Check a loaded signing configuration before release packaging.
///
/// No configuration at all is fine (the build proceeds unsigned). A
/// configuration that exists but is missing keys, or that points at a
/// nonexistent keystore, aborts before Gradle is invoked.
pub fn preflight_release(signing: Option<&SigningConfig>) -> Result<ReleaseSigning> {
    let Some(config) = signing else {
        return Ok(ReleaseSigning::Unsigned);
    };

    config.ensure_complete()?;

    let keystore = config
        .store_file
        .clone()
        .ok_or_else(|| Error::signing("Signing configuration has no keystore path"))?;
    if !keystore.exists() {
        return Err(Error::keystore_not_found(&keystore));
    }

    Ok(ReleaseSigning::Signed { keystore })
}

/// A Gradle project directory with a wrapper script
#[derive(Debug, Clone)]
pub struct GradleProject {
    project_dir: PathBuf,
}

impl GradleProject {
    /// Bind to a Gradle project directory
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
        }
    }

    /// The bound project directory
    pub fn dir(&self) -> &Path {
        &self.project_dir
    }

    /// Platform wrapper script name
    pub fn wrapper() -> &'static str {
        if cfg!(windows) {
            "gradlew.bat"
        } else {
            "./gradlew"
        }
    }

    /// Whether the wrapper script exists in the project directory
    pub fn wrapper_exists(&self) -> bool {
        let name = if cfg!(windows) { "gradlew.bat" } else { "gradlew" };
        self.project_dir.join(name).exists()
    }

    /// Run a Gradle task through the wrapper
    pub fn run_task(&self, task: &str) -> Result<CommandResult> {
        if !self.wrapper_exists() {
            return Err(Error::new(
                ErrorCode::GradleWrapperMissing,
                format!(
                    "No Gradle wrapper in {}",
                    self.project_dir.display()
                ),
            )
            .with_suggestion("Run from the android/ project root, or pass --project-dir"));
        }
        run_command_in_dir(Self::wrapper(), &[task], &self.project_dir)
    }

    /// Build an APK
    pub fn assemble(&self, build_type: BuildType) -> Result<CommandResult> {
        self.run_task(&format!("assemble{}", build_type.task_suffix()))
    }

    /// Build an app bundle (AAB)
    pub fn bundle(&self, build_type: BuildType) -> Result<CommandResult> {
        self.run_task(&format!("bundle{}", build_type.task_suffix()))
    }

    /// Clean build artifacts
    pub fn clean(&self) -> Result<CommandResult> {
        self.run_task("clean")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_build_type_task_suffix() {
        assert_eq!(BuildType::Debug.task_suffix(), "Debug");
        assert_eq!(BuildType::Release.task_suffix(), "Release");
    }

    #[test]
    fn test_build_type_parse() {
        assert_eq!(BuildType::parse("debug").unwrap(), BuildType::Debug);
        assert_eq!(BuildType::parse("release").unwrap(), BuildType::Release);
        assert!(BuildType::parse("profile").is_err());
    }

    #[test]
    fn test_preflight_without_config_is_unsigned() {
        let result = preflight_release(None).unwrap();
        assert_eq!(result, ReleaseSigning::Unsigned);
    }

    #[test]
    fn test_preflight_rejects_incomplete_config() {
        let config = SigningConfig {
            store_file: Some(PathBuf::from("release.keystore")),
            store_password: Some("spass".to_string()),
            key_alias: None,
            key_password: None,
        };

        let err = preflight_release(Some(&config)).unwrap_err();
        assert_eq!(err.code, ErrorCode::IncompleteSigningConfig);
    }

    #[test]
    fn test_preflight_rejects_missing_keystore() {
        let dir = TempDir::new().unwrap();
        let config = SigningConfig {
            store_file: Some(dir.path().join("absent.keystore")),
            store_password: Some("spass".to_string()),
            key_alias: Some("upload".to_string()),
            key_password: Some("kpass".to_string()),
        };

        let err = preflight_release(Some(&config)).unwrap_err();
        assert_eq!(err.code, ErrorCode::KeystoreNotFound);
    }

    #[test]
    fn test_preflight_accepts_complete_config() {
        let dir = TempDir::new().unwrap();
        let keystore = dir.path().join("release.keystore");
        fs::write(&keystore, b"not a real keystore").unwrap();

        let config = SigningConfig {
            store_file: Some(keystore.clone()),
            store_password: Some("spass".to_string()),
            key_alias: Some("upload".to_string()),
            key_password: Some("kpass".to_string()),
        };

        let result = preflight_release(Some(&config)).unwrap();
        assert_eq!(result, ReleaseSigning::Signed { keystore });
    }

    #[test]
    fn test_run_task_without_wrapper_is_error() {
        let dir = TempDir::new().unwrap();
        let project = GradleProject::new(dir.path());

        let err = project.run_task("assembleDebug").unwrap_err();
        assert_eq!(err.code, ErrorCode::GradleWrapperMissing);
    }
}
