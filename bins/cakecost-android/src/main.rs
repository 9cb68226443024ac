//! CakeCost Android CLI
//!
//! Build and signing tools for the CakeCost Android app.

use anyhow::Result;
use cakecost_android::gradle::{self, BuildType, GradleProject, ReleaseSigning};
use cakecost_android::project::ProjectSettings;
use cakecost_android::signing::SigningConfigLoader;
use cakecost_cli::output::{mask_secret, Status};
use cakecost_cli::progress;
use cakecost_core::error::{exit_codes, Error, ErrorCode};
use cakecost_core::process::command_exists;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "cakecost-android")]
#[command(about = "Build and signing tools for the CakeCost Android app")]
#[command(version)]
struct Cli {
    /// Project settings file path
    #[arg(short, long, global = true)]
    settings: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect the release signing configuration
    Signing {
        #[command(subcommand)]
        action: SigningAction,
    },

    /// Build the app
    Build {
        /// Build configuration
        #[arg(long, default_value = "debug")]
        configuration: String,
        /// Clean before building
        #[arg(long)]
        clean: bool,
        /// Build bundle (AAB) instead of APK
        #[arg(long)]
        bundle: bool,
        /// Gradle project directory
        #[arg(long, default_value = "android")]
        project_dir: PathBuf,
    },

    /// Print the effective project settings
    Settings {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Diagnose environment
    Doctor {
        /// Gradle project directory
        #[arg(long, default_value = "android")]
        project_dir: PathBuf,
    },
}

#[derive(Subcommand)]
enum SigningAction {
    /// Verify the signing configuration (absent / incomplete / complete)
    Check {
        /// Path to key.properties
        #[arg(long, default_value = "android/key.properties")]
        properties: PathBuf,
        /// App module directory, the base for storeFile resolution
        #[arg(long, default_value = "android/app")]
        module_dir: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the resolved signing configuration (passwords masked)
    Show {
        /// Path to key.properties
        #[arg(long, default_value = "android/key.properties")]
        properties: PathBuf,
        /// App module directory, the base for storeFile resolution
        #[arg(long, default_value = "android/app")]
        module_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        owo_colors::set_override(false);
    }

    let exit_code = match cli.command {
        Commands::Signing { action } => match action {
            SigningAction::Check {
                properties,
                module_dir,
                json,
            } => run_signing_check(&properties, &module_dir, json),
            SigningAction::Show {
                properties,
                module_dir,
            } => run_signing_show(&properties, &module_dir),
        },
        Commands::Build {
            configuration,
            clean,
            bundle,
            project_dir,
        } => run_build(&configuration, clean, bundle, &project_dir, cli.settings.as_deref()),
        Commands::Settings { json } => run_settings(cli.settings.as_deref(), json),
        Commands::Doctor { project_dir } => run_doctor(&project_dir),
    };

    std::process::exit(exit_code);
}

/// Map an error to the CLI exit code for its category.
fn exit_code_for(err: &Error) -> i32 {
    match err.code {
        ErrorCode::IncompleteSigningConfig
        | ErrorCode::KeystoreNotFound
        | ErrorCode::SigningError => exit_codes::SIGNING_ERROR,
        ErrorCode::ConfigError
        | ErrorCode::ConfigParseError
        | ErrorCode::PropertiesSyntaxError => exit_codes::CONFIG_ERROR,
        ErrorCode::CommandNotFound => exit_codes::COMMAND_NOT_FOUND,
        _ => exit_codes::FAILURE,
    }
}

fn run_signing_check(properties: &Path, module_dir: &Path, json: bool) -> i32 {
    let loader = SigningConfigLoader::new(module_dir);

    let config = match loader.load(properties) {
        Ok(c) => c,
        Err(e) => {
            Status::error(&format!("{}", e));
            return exit_code_for(&e);
        }
    };

    let Some(config) = config else {
        if json {
            println!("{}", serde_json::json!({ "present": false }));
        } else {
            Status::info(&format!(
                "{} not found: release builds will be unsigned",
                properties.display()
            ));
        }
        return exit_codes::SUCCESS;
    };

    if json {
        let report = config.to_report();
        match serde_json::to_string_pretty(&serde_json::json!({
            "present": true,
            "config": report,
        })) {
            Ok(out) => println!("{}", out),
            Err(e) => {
                Status::error(&format!("Failed to serialize report: {}", e));
                return exit_codes::FAILURE;
            }
        }
        return if config.is_complete() {
            exit_codes::SUCCESS
        } else {
            exit_codes::SIGNING_ERROR
        };
    }

    let missing = config.missing_keys();
    if !missing.is_empty() {
        Status::error(&format!(
            "Signing configuration incomplete: missing {}",
            missing.join(", ")
        ));
        return exit_codes::SIGNING_ERROR;
    }

    // Complete config: also confirm the keystore actually exists at the
    // resolved location, which is the usual victim of the storeFile
    // base-directory asymmetry.
    if let Some(keystore) = &config.store_file {
        if keystore.exists() {
            Status::success(&format!("Signing config complete, keystore {}", keystore.display()));
            exit_codes::SUCCESS
        } else {
            Status::error(&format!("Keystore not found: {}", keystore.display()));
            Status::info("storeFile resolves relative to the app module directory, not key.properties");
            exit_codes::SIGNING_ERROR
        }
    } else {
        exit_codes::SIGNING_ERROR
    }
}

fn run_signing_show(properties: &Path, module_dir: &Path) -> i32 {
    let loader = SigningConfigLoader::new(module_dir);

    match loader.load(properties) {
        Ok(Some(config)) => {
            Status::header("Release signing");
            Status::field(
                "storeFile",
                &config
                    .store_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(unset)".to_string()),
            );
            Status::field(
                "storePassword",
                &config
                    .store_password
                    .as_deref()
                    .map(mask_secret)
                    .unwrap_or_else(|| "(unset)".to_string()),
            );
            Status::field(
                "keyAlias",
                config.key_alias.as_deref().unwrap_or("(unset)"),
            );
            Status::field(
                "keyPassword",
                &config
                    .key_password
                    .as_deref()
                    .map(mask_secret)
                    .unwrap_or_else(|| "(unset)".to_string()),
            );
            exit_codes::SUCCESS
        }
        Ok(None) => {
            Status::info(&format!("{} not found", properties.display()));
            exit_codes::SUCCESS
        }
        Err(e) => {
            Status::error(&format!("{}", e));
            exit_code_for(&e)
        }
    }
}

fn run_build(
    configuration: &str,
    clean: bool,
    bundle: bool,
    project_dir: &Path,
    settings_path: Option<&Path>,
) -> i32 {
    let build_type = match BuildType::parse(configuration) {
        Ok(bt) => bt,
        Err(e) => {
            Status::error(&format!("{}", e));
            return exit_code_for(&e);
        }
    };

    let settings = match ProjectSettings::load(settings_path) {
        Ok(s) => s,
        Err(e) => {
            Status::error(&format!("{}", e));
            return exit_code_for(&e);
        }
    };

    let project = GradleProject::new(project_dir);

    if build_type == BuildType::Release {
        let loader = SigningConfigLoader::new(project_dir.join("app"));
        let signing = match loader.load(project_dir.join("key.properties")) {
            Ok(s) => s,
            Err(e) => {
                Status::error(&format!("{}", e));
                return exit_code_for(&e);
            }
        };

        match gradle::preflight_release(signing.as_ref()) {
            Ok(ReleaseSigning::Unsigned) => {
                Status::warning("No key.properties: the release artifact will be unsigned");
            }
            Ok(ReleaseSigning::Signed { keystore }) => {
                Status::info(&format!("Signing with {}", keystore.display()));
            }
            Err(e) => {
                Status::error(&format!("{}", e));
                return exit_code_for(&e);
            }
        }
    }

    if clean {
        Status::info("Cleaning...");
        if let Err(e) = project.clean() {
            Status::error(&format!("Clean failed: {}", e));
            return exit_code_for(&e);
        }
    }

    let artifact = if bundle { "bundle" } else { "APK" };
    let pb = progress::spinner(&format!(
        "Building {} {} ({} {})",
        settings.app.application_id, settings.app.version_name, build_type, artifact
    ));

    let result = if bundle {
        project.bundle(build_type)
    } else {
        project.assemble(build_type)
    };

    match result {
        Ok(r) => {
            if r.success {
                progress::finish_success(&pb, "Build succeeded");
                exit_codes::SUCCESS
            } else {
                progress::finish_error(&pb, "Build failed");
                eprintln!("{}", r.stderr);
                exit_codes::FAILURE
            }
        }
        Err(e) => {
            progress::finish_error(&pb, "Build error");
            Status::error(&format!("{}", e));
            exit_code_for(&e)
        }
    }
}

fn run_settings(settings_path: Option<&Path>, json: bool) -> i32 {
    let settings = match ProjectSettings::load(settings_path) {
        Ok(s) => s,
        Err(e) => {
            Status::error(&format!("{}", e));
            return exit_code_for(&e);
        }
    };

    if json {
        match serde_json::to_string_pretty(&settings) {
            Ok(out) => {
                println!("{}", out);
                exit_codes::SUCCESS
            }
            Err(e) => {
                Status::error(&format!("Failed to serialize settings: {}", e));
                exit_codes::FAILURE
            }
        }
    } else {
        Status::header("Project settings");
        Status::field("applicationId", &settings.app.application_id);
        Status::field("namespace", &settings.app.namespace);
        Status::field("compileSdk", &settings.app.compile_sdk.to_string());
        Status::field("minSdk", &settings.app.min_sdk.to_string());
        Status::field("targetSdk", &settings.app.target_sdk.to_string());
        Status::field("ndkVersion", &settings.app.ndk_version);
        Status::field("versionCode", &settings.app.version_code.to_string());
        Status::field("versionName", &settings.app.version_name);
        Status::field("javaTarget", &settings.toolchain.java_target.to_string());
        Status::field(
            "release",
            &format!(
                "minify={} shrinkResources={}",
                settings.build_types.release.minify_enabled,
                settings.build_types.release.shrink_resources
            ),
        );
        exit_codes::SUCCESS
    }
}

fn run_doctor(project_dir: &Path) -> i32 {
    Status::header("Environment check");

    let mut healthy = true;

    for tool in ["java", "keytool", "adb"] {
        if command_exists(tool) {
            Status::success(&format!("{}: installed", tool));
        } else {
            Status::warning(&format!("{}: not found", tool));
            healthy = false;
        }
    }

    let project = GradleProject::new(project_dir);
    if project.wrapper_exists() {
        Status::success(&format!("gradle wrapper: {}", project_dir.display()));
    } else {
        Status::error(&format!("gradle wrapper: not found in {}", project_dir.display()));
        healthy = false;
    }

    if healthy {
        exit_codes::SUCCESS
    } else {
        exit_codes::FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_for_signing_errors() {
        let err = Error::incomplete_signing_config(&["keyAlias"]);
        assert_eq!(exit_code_for(&err), exit_codes::SIGNING_ERROR);

        let err = Error::keystore_not_found("app/release.keystore");
        assert_eq!(exit_code_for(&err), exit_codes::SIGNING_ERROR);
    }

    #[test]
    fn test_exit_code_for_config_errors() {
        let err = Error::properties_syntax("key.properties", 1, "bad escape");
        assert_eq!(exit_code_for(&err), exit_codes::CONFIG_ERROR);
    }

    #[test]
    fn test_exit_code_for_other_errors() {
        let err = Error::io("disk on fire");
        assert_eq!(exit_code_for(&err), exit_codes::FAILURE);
    }
}
