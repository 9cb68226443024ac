//! Release signing configuration
//!
//! The release signing identity lives outside the repository in an optional
//! `key.properties` file next to the Gradle project root. A missing file is
//! not an error: release builds simply come out unsigned. A present but
//! malformed file aborts configuration, and a present but incomplete one is
//! only rejected at packaging time.

use cakecost_core::error::{Error, Result};
use cakecost_core::properties::Properties;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Recognized keys in `key.properties`.
pub const STORE_FILE_KEY: &str = "storeFile";
/// Keystore password key.
pub const STORE_PASSWORD_KEY: &str = "storePassword";
/// Key alias key.
pub const KEY_ALIAS_KEY: &str = "keyAlias";
/// Key password key.
pub const KEY_PASSWORD_KEY: &str = "keyPassword";

/// Signing credentials for a release build.
///
/// Constructed once at configuration time and immutable thereafter. Any
/// field may be unset; completeness is only enforced by
/// [`SigningConfig::ensure_complete`] right before packaging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SigningConfig {
    /// Resolved keystore path
    pub store_file: Option<PathBuf>,
    /// Keystore password
    pub store_password: Option<String>,
    /// Alias of the signing key inside the keystore
    pub key_alias: Option<String>,
    /// Password of the signing key
    pub key_password: Option<String>,
}

impl SigningConfig {
    /// Names of the recognized keys that are unset or blank.
    pub fn missing_keys(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.store_file.is_none() {
            missing.push(STORE_FILE_KEY);
        }
        if self.store_password.is_none() {
            missing.push(STORE_PASSWORD_KEY);
        }
        if self.key_alias.is_none() {
            missing.push(KEY_ALIAS_KEY);
        }
        if self.key_password.is_none() {
            missing.push(KEY_PASSWORD_KEY);
        }
        missing
    }

    /// Whether all four fields are set.
    pub fn is_complete(&self) -> bool {
        self.missing_keys().is_empty()
    }

    /// Fail with an incomplete-signing-configuration error if any field is
    /// unset. Called by the release packaging path, never by the loader.
    pub fn ensure_complete(&self) -> Result<()> {
        let missing = self.missing_keys();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::incomplete_signing_config(&missing))
        }
    }

    /// Redacted view for JSON output. Passwords are reported as present or
    /// absent, never by value.
    pub fn to_report(&self) -> SigningReport {
        SigningReport {
            store_file: self.store_file.as_ref().map(|p| p.display().to_string()),
            store_password_set: self.store_password.is_some(),
            key_alias: self.key_alias.clone(),
            key_password_set: self.key_password.is_some(),
            complete: self.is_complete(),
        }
    }
}

/// Serializable, password-free description of a signing configuration.
#[derive(Debug, Clone, Serialize)]
pub struct SigningReport {
    /// Resolved keystore path, if set
    pub store_file: Option<String>,
    /// Whether `storePassword` is set
    pub store_password_set: bool,
    /// Key alias, if set
    pub key_alias: Option<String>,
    /// Whether `keyPassword` is set
    pub key_password_set: bool,
    /// Whether all four keys are set
    pub complete: bool,
}

/// Loads the optional release signing configuration.
///
/// `module_dir` is the app module directory (`android/app`). A relative
/// `storeFile` is resolved against it — NOT against the directory holding
/// the properties file, which conventionally sits one level up in the
/// Gradle project root (`android/`). The asymmetry matches what Gradle's
/// `file()` does inside the app module's build script and is easy to trip
/// over when writing `key.properties` by hand, so `signing check` always
/// prints the resolved path.
#[derive(Debug, Clone)]
pub struct SigningConfigLoader {
    module_dir: PathBuf,
}

impl SigningConfigLoader {
    /// Create a loader resolving `storeFile` against `module_dir`.
    pub fn new(module_dir: impl Into<PathBuf>) -> Self {
        Self {
            module_dir: module_dir.into(),
        }
    }

    /// The base directory used for `storeFile` resolution.
    pub fn module_dir(&self) -> &Path {
        &self.module_dir
    }

    /// Load the signing configuration from `path`.
    ///
    /// Returns `Ok(None)` when the file does not exist — the release build
    /// proceeds unsigned. Keys that are absent or blank leave their fields
    /// unset. Malformed properties syntax is an error; no partial
    /// configuration is ever returned.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Option<SigningConfig>> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }

        let props = Properties::load(path)?;

        let store_file = props
            .get_nonblank(STORE_FILE_KEY)
            .map(|raw| self.resolve_store_file(raw));

        Ok(Some(SigningConfig {
            store_file,
            store_password: props.get_nonblank(STORE_PASSWORD_KEY).map(String::from),
            key_alias: props.get_nonblank(KEY_ALIAS_KEY).map(String::from),
            key_password: props.get_nonblank(KEY_PASSWORD_KEY).map(String::from),
        }))
    }

    fn resolve_store_file(&self, raw: &str) -> PathBuf {
        let candidate = Path::new(raw);
        if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            self.module_dir.join(candidate)
        }
    }
}
