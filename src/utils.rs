//! Text cleanup helpers and file system checks.
//!
//! This module provides helper functions used throughout the application:
//! - Whitespace normalization for text scraped out of HTML
//! - Phone number cleanup
//! - String truncation for logging response bodies
//! - File system validation for the output location

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Non-breaking and typographic spaces that listing pages use between words.
///
/// The replacement list this cleanup reproduces names U+00A0 twice, under
/// two spellings (`\xa0` and `\u00a0`); it is one code point, listed once here.
const SPECIAL_SPACES: [char; 7] = [
    '\u{00A0}', // no-break space
    '\u{2000}', // en quad
    '\u{2001}', // em quad
    '\u{2002}', // en space
    '\u{2003}', // em space
    '\u{2009}', // thin space
    '\u{200A}', // hair space
];

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Normalize text scraped out of an HTML element.
///
/// Special spaces become ordinary spaces, runs of whitespace collapse to one
/// space, and both ends are trimmed. Applying it twice is the same as
/// applying it once.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(clean_text("  Capilla\u{00A0}\u{2009}San  Pío \n"), "Capilla San Pío");
/// ```
pub fn clean_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let replaced: String = text
        .chars()
        .map(|c| if SPECIAL_SPACES.contains(&c) { ' ' } else { c })
        .collect();
    WHITESPACE_RUN.replace_all(&replaced, " ").trim().to_string()
}

/// Clean a phone number.
///
/// The value is normalized with [`clean_text`]; numbers in international
/// format (leading `+`) additionally have every space removed. Anything else
/// is left as normalized.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(clean_phone_number("+1 800 555 0100"), "+18005550100");
/// assert_eq!(clean_phone_number("(01) 555 0100"), "(01) 555 0100");
/// ```
pub fn clean_phone_number(phone: &str) -> String {
    let phone = clean_text(phone);
    if phone.starts_with('+') {
        phone.replace(' ', "")
    } else {
        phone
    }
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes, backing off to a character
/// boundary, with an ellipsis and the dropped byte count appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…(+{} bytes)", &s[..end], s.len() - end)
}

/// Ensure the directory that will hold `file_path` exists and is writable.
///
/// Creates the directory if needed, then creates and removes a probe file.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %file_path.display()))]
pub async fn ensure_writable_parent(file_path: &Path) -> Result<(), Box<dyn Error>> {
    let dir = match file_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => Path::new(".").to_path_buf(),
    };
    fs::create_dir_all(&dir).await?;

    let probe_path = dir.join("..__probe_write__");
    stdfs::File::create(&probe_path)?;
    let _ = stdfs::remove_file(&probe_path);
    info!(dir = %dir.display(), "Output directory is writable");
    Ok(())
}
