//! Derivation of host-module names from source module identities.
//!
//! A module identity such as `foo_bar` becomes the host-module name
//! `<Prefix>_FooBar`: each word is title-cased and underscores are dropped.
//! The result must be a valid identifier in the host project's language.

/// Raised when a module identity cannot produce a valid host identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("module name '{identity}' does not produce a valid host identifier ('{derived}')")]
pub struct InvalidModuleName {
    /// The source module identity.
    pub identity: String,
    /// The rejected derived name.
    pub derived: String,
}

/// Derives the namespaced host-module name for a module identity.
///
/// ```
/// use ferry_common::host_module_name;
/// assert_eq!(host_module_name("Ferry", "foo_bar").unwrap(), "Ferry_FooBar");
/// ```
pub fn host_module_name(prefix: &str, identity: &str) -> Result<String, InvalidModuleName> {
    let derived = format!("{}_{}", prefix, title_case(identity).replace('_', ""));
    if identity.is_empty() || !is_valid_identifier(&derived) {
        return Err(InvalidModuleName {
            identity: identity.to_string(),
            derived,
        });
    }
    Ok(derived)
}

/// Uppercases the first letter of every alphabetic run and lowercases the rest.
///
/// A letter that follows a non-letter (digit, underscore, start of string)
/// starts a new word: `http2_client` becomes `Http2_Client`.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
        } else {
            out.push(c);
        }
        prev_alpha = c.is_alphabetic();
    }
    out
}

/// Returns `true` if `s` is an ASCII identifier: a letter or underscore
/// followed by letters, digits, or underscores.
pub fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
