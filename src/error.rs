//! Error types and handling for extcheck
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Extraction-level problems (a single malformed archive entry) are not
//! represented here: they are logged and skipped so a bad entry never
//! invalidates an otherwise valid inventory. This enum covers the fatal
//! failure class only: configuration, store and version-resolution errors
//! that must abort the whole run.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for extcheck operations
#[derive(Error, Diagnostic, Debug)]
pub enum ExtcheckError {
    // Archive errors
    #[error("Failed to open archive: {path}")]
    #[diagnostic(
        code(extcheck::archive::open_failed),
        help("Check that the path points to a readable zip-based archive (.amp, .jar, .war)")
    )]
    ArchiveOpenFailed { path: String, reason: String },

    #[error("Unsupported archive type: {path}")]
    #[diagnostic(
        code(extcheck::archive::unsupported),
        help("Supported extension archive types are .amp and .jar")
    )]
    UnsupportedArchiveType { path: String },

    // Inventory store errors
    #[error("Inventory store directory not found: {path}")]
    #[diagnostic(
        code(extcheck::store::not_found),
        help("Point --store at a directory of inventory report JSON files")
    )]
    StoreNotFound { path: String },

    #[error("Failed to read inventory report: {path}")]
    #[diagnostic(code(extcheck::store::read_failed))]
    StoreReadFailed { path: String, reason: String },

    #[error("Inventory report {path} carries no version tag")]
    #[diagnostic(
        code(extcheck::store::untagged_report),
        help("Baseline reports must be generated with 'extcheck inventory --version <V>'")
    )]
    StoreUntaggedReport { path: String },

    #[error("Duplicate inventory reports for version {version}")]
    #[diagnostic(code(extcheck::store::duplicate_version))]
    StoreDuplicateVersion { version: String },

    #[error("Target version {version} is not present in the inventory store")]
    #[diagnostic(
        code(extcheck::store::unknown_version),
        help("Run 'extcheck list-versions' to see the known baseline versions")
    )]
    UnknownTargetVersion { version: String },

    // Configuration errors
    #[error("Failed to read allow-list file: {path}")]
    #[diagnostic(
        code(extcheck::config::allowlist_read_failed),
        help("Allow-list files are JSON arrays of strings")
    )]
    AllowListReadFailed { path: String, reason: String },

    #[error("Invalid version or range: {spec}")]
    #[diagnostic(
        code(extcheck::config::invalid_version_spec),
        help("Pass a single version (6.0.0) or an inclusive range (6.0.0-6.2.1)")
    )]
    InvalidVersionSpec { spec: String },

    // Report output errors
    #[error("Failed to write report: {path}")]
    #[diagnostic(code(extcheck::report::write_failed))]
    ReportWriteFailed { path: String, reason: String },

    #[error("Failed to serialize report")]
    #[diagnostic(code(extcheck::report::serialize_failed))]
    ReportSerializeFailed {
        #[from]
        source: serde_json::Error,
    },

    #[error("Unsupported shell: {shell}")]
    #[diagnostic(
        code(extcheck::cli::unsupported_shell),
        help("Supported shells: bash, elvish, fish, powershell, zsh")
    )]
    UnsupportedShell { shell: String },
}

/// Result type alias using `ExtcheckError`
pub type Result<T> = std::result::Result<T, ExtcheckError>;

/// Creates an archive open error
pub fn archive_open_failed(path: impl Into<String>, reason: impl Into<String>) -> ExtcheckError {
    ExtcheckError::ArchiveOpenFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a store read error
pub fn store_read_failed(path: impl Into<String>, reason: impl Into<String>) -> ExtcheckError {
    ExtcheckError::StoreReadFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates an allow-list read error
pub fn allowlist_read_failed(path: impl Into<String>, reason: impl Into<String>) -> ExtcheckError {
    ExtcheckError::AllowListReadFailed {
        path: path.into(),
        reason: reason.into(),
    }
}
