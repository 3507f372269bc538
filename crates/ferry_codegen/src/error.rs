//! Error types for code generation.

use std::path::PathBuf;

/// Errors raised while generating intermediate sources.
#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    /// The extension compiler could not be started.
    #[error("failed to run extension compiler '{program}' for module '{module}': {source}")]
    SpawnFailed {
        /// The module being compiled.
        module: String,
        /// The compiler executable.
        program: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The extension compiler exited with a non-zero status.
    #[error("extension compiler failed for module '{module}' (exit code {code}): {command}{}", stderr_suffix(.stderr))]
    CompilerFailed {
        /// The module being compiled.
        module: String,
        /// The full command line.
        command: String,
        /// Exit code, `-1` when terminated by a signal.
        code: i32,
        /// Captured diagnostic output.
        stderr: String,
    },

    /// The generated source could not be read or written.
    #[error("failed to post-process {}: {source}", path.display())]
    Io {
        /// The generated source path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim_end();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("\n{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiler_failed_names_module_and_code() {
        let err = CodegenError::CompilerFailed {
            module: "alpha".to_string(),
            command: "cython alpha.pyx".to_string(),
            code: 1,
            stderr: "alpha.pyx:3:0: undeclared name\n".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("extension compiler failed for module 'alpha' (exit code 1)"));
        assert!(msg.ends_with("\nalpha.pyx:3:0: undeclared name"));
    }

    #[test]
    fn compiler_failed_without_output() {
        let err = CodegenError::CompilerFailed {
            module: "alpha".to_string(),
            command: "cython alpha.pyx".to_string(),
            code: 2,
            stderr: String::new(),
        };
        assert_eq!(
            err.to_string(),
            "extension compiler failed for module 'alpha' (exit code 2): cython alpha.pyx"
        );
    }
}
