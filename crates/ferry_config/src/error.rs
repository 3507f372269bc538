//! Error types for configuration loading and validation.

use std::path::PathBuf;

use ferry_common::{UnknownVariant, UnsupportedPlatform};

/// Errors that can occur when loading, validating, or resolving `ferry.toml`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the configuration file.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// A required field is missing from the configuration.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A configuration value failed validation.
    #[error("validation error: {0}")]
    ValidationError(String),

    /// The requested platform has no host layout.
    #[error(transparent)]
    UnsupportedPlatform(#[from] UnsupportedPlatform),

    /// The requested build variant is not recognized.
    #[error(transparent)]
    UnknownVariant(#[from] UnknownVariant),

    /// The host path does not look like a host engine checkout.
    #[error("host path {} is not usable: {reason}", path.display())]
    HostNotFound {
        /// The configured host path.
        path: PathBuf,
        /// Why the path was rejected.
        reason: String,
    },

    /// The embedding runtime's disambiguated include root is not set up.
    #[error(
        "embedding runtime requires manual setup, expected header {} was not found\n\
         \n\
         1. Inside the runtime base ({}) create a directory called '{include_dir}'.\n\
         2. Inside it create a symlink (a directory junction on Windows) called\n   \
            '{header_subdir}' that points back to the runtime's own include directory.\n\
         \n\
         The runtime's headers collide with host headers of the same base name;\n\
         keeping them under '{header_subdir}/' lets generated code include them unambiguously.",
        header.display(),
        base.display()
    )]
    RuntimeSetup {
        /// The probe header that was looked for.
        header: PathBuf,
        /// The runtime base directory.
        base: PathBuf,
        /// Name of the include root directory under `base`.
        include_dir: String,
        /// Name of the disambiguating subdirectory.
        header_subdir: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_missing_field() {
        let err = ConfigError::MissingField("project.name".to_string());
        assert_eq!(format!("{err}"), "missing required field: project.name");
    }

    #[test]
    fn display_parse_error() {
        let err = ConfigError::ParseError("expected '=' at line 3".to_string());
        assert_eq!(
            format!("{err}"),
            "failed to parse configuration: expected '=' at line 3"
        );
    }

    #[test]
    fn display_unsupported_platform_is_transparent() {
        let err = ConfigError::from(UnsupportedPlatform("PS4".to_string()));
        assert_eq!(format!("{err}"), "unsupported platform: PS4");
    }

    #[test]
    fn display_runtime_setup_has_instructions() {
        let err = ConfigError::RuntimeSetup {
            header: PathBuf::from("/py/include_ferry/Python/Python.h"),
            base: PathBuf::from("/py"),
            include_dir: "include_ferry".to_string(),
            header_subdir: "Python".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/py/include_ferry/Python/Python.h"));
        assert!(msg.contains("create a directory called 'include_ferry'"));
        assert!(msg.contains("symlink"));
    }

    #[test]
    fn display_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = ConfigError::IoError(io_err);
        assert!(format!("{err}").starts_with("failed to read configuration:"));
    }
}
