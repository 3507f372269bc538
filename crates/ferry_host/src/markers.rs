//! The marker region of a foreign text file.
//!
//! A file is treated as three segments: the prefix up to and including the
//! begin-marker line, the owned region, and the suffix starting at the
//! end-marker line. Only the owned region is ever changed; prefix and suffix
//! bytes are copied verbatim, including their line endings.

/// Token identifying the begin-marker line.
pub const BEGIN_TOKEN: &str = "@FERRY@";
/// Token identifying the end-marker line.
pub const END_TOKEN: &str = "@/FERRY@";
/// The begin-marker line users add to the registration file.
pub const BEGIN_MARKER: &str = "// @FERRY@";
/// The end-marker line users add to the registration file.
pub const END_MARKER: &str = "// @/FERRY@";

/// Inserts `lines` immediately after the first begin-marker line.
///
/// Each inserted line takes the marker line's ending (`\r\n` or `\n`).
/// Both markers must be present, the end marker after the begin marker;
/// otherwise the missing one is reported and nothing is produced.
pub fn inject_lines(text: &str, lines: &[String]) -> Result<String, MissingMarker> {
    check_region(text)?;
    let extra: usize = lines.iter().map(|l| l.len() + 2).sum();
    let mut out = String::with_capacity(text.len() + extra);
    let mut injected = false;
    for line in text.split_inclusive('\n') {
        out.push_str(line);
        if !injected && line.contains(BEGIN_TOKEN) {
            injected = true;
            let ending = if line.ends_with("\r\n") { "\r\n" } else { "\n" };
            for injected_line in lines {
                out.push_str(injected_line);
                out.push_str(ending);
            }
        }
    }
    Ok(out)
}

/// Checks that a begin-marker line is followed by an end-marker line.
fn check_region(text: &str) -> Result<(), MissingMarker> {
    let mut lines = text.split_inclusive('\n');
    if !lines.by_ref().any(|line| line.contains(BEGIN_TOKEN)) {
        return Err(MissingMarker::Begin);
    }
    if !lines.any(|line| line.contains(END_TOKEN)) {
        return Err(MissingMarker::End);
    }
    Ok(())
}

/// Which marker a file is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingMarker {
    /// No begin-marker line.
    Begin,
    /// A begin marker without a following end-marker line.
    End,
}

impl MissingMarker {
    /// The token that was not found.
    pub fn token(self) -> &'static str {
        match self {
            MissingMarker::Begin => BEGIN_TOKEN,
            MissingMarker::End => END_TOKEN,
        }
    }
}

/// Drops every line strictly between the begin and end markers.
///
/// Both marker lines and everything outside them are kept byte for byte.
pub fn clean_region(text: &str) -> Result<String, MissingMarker> {
    let mut out = String::with_capacity(text.len());
    let mut in_region = false;
    let mut seen_begin = false;
    let mut seen_end = false;
    for line in text.split_inclusive('\n') {
        if in_region {
            if line.contains(END_TOKEN) {
                in_region = false;
                seen_end = true;
                out.push_str(line);
            }
            continue;
        }
        out.push_str(line);
        if !seen_begin && line.contains(BEGIN_TOKEN) {
            seen_begin = true;
            in_region = true;
        }
    }
    match (seen_begin, seen_end) {
        (false, _) => Err(MissingMarker::Begin),
        (true, false) => Err(MissingMarker::End),
        (true, true) => Ok(out),
    }
}
