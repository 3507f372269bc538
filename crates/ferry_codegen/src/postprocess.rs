//! Post-processing of compiler output.

use std::path::Path;
use std::sync::OnceLock;

use ferry_common::RuntimePaths;
use regex::Regex;

use crate::error::CodegenError;

/// A quoted include of a bare header name.
const INCLUDE_PATTERN: &str = r#"^\s*#include\s+"([\w.]+)""#;

static INCLUDE_REGEX: OnceLock<Regex> = OnceLock::new();

fn include_pattern() -> &'static Regex {
    INCLUDE_REGEX.get_or_init(|| Regex::new(INCLUDE_PATTERN).expect("invalid regex pattern"))
}

/// Rewrites generated source text for the host toolchain.
///
/// The precompiled-header include becomes the first content of the file.
/// Every include of a bare header for which `disambiguate` returns a path is
/// rewritten in place to that path. All other bytes, line order and line
/// endings included, are kept.
pub fn rewrite_source(
    text: &str,
    pch: &str,
    disambiguate: impl Fn(&str) -> Option<String>,
) -> String {
    let mut out = String::with_capacity(text.len() + pch.len() + 16);
    out.push_str(&format!("#include \"{pch}\"\n\n"));
    for line in text.split_inclusive('\n') {
        let replacement = include_pattern().captures(line).and_then(|caps| {
            let header = caps.get(1)?;
            let path = disambiguate(header.as_str())?;
            Some((header.range(), path))
        });
        match replacement {
            Some((range, path)) => {
                out.push_str(&line[..range.start]);
                out.push_str(&path);
                out.push_str(&line[range.end..]);
            }
            None => out.push_str(line),
        }
    }
    out
}

/// Applies [`rewrite_source`] to a generated file in place.
pub fn postprocess_file(
    path: &Path,
    pch: &str,
    runtime: &RuntimePaths,
) -> Result<(), CodegenError> {
    let io_err = |e: std::io::Error| CodegenError::Io {
        path: path.to_path_buf(),
        source: e,
    };
    let text = std::fs::read_to_string(path).map_err(io_err)?;
    let rewritten = rewrite_source(&text, pch, |header| runtime.disambiguate(header));
    std::fs::write(path, rewritten).map_err(io_err)
}
