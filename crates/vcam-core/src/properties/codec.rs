//! Text codec for Java-style `.properties` files.
//!
//! File format:
//! ```text
//! #VCAM Configuration
//! audio_volume=80
//! app_video_com.example.app=/sdcard/DCIM/Camera1/clip.mp4
//! ```
//!
//! Reading follows the full properties grammar:
//!
//! - Lines starting (after leading whitespace) with `#` or `!` are comments.
//! - The key ends at the first unescaped `=`, `:` or whitespace character.
//!   Whitespace around the separator is skipped.
//! - `\t`, `\n`, `\r`, `\f` and `\uXXXX` escapes are decoded; any other
//!   escaped character stands for itself.
//! - A line ending in an odd number of backslashes continues on the next
//!   line, whose leading whitespace is dropped.
//!
//! Writing produces pure ASCII: every character outside `0x20..=0x7E` is
//! emitted as a `\uXXXX` escape (one per UTF-16 code unit), so the output is
//! valid ISO-8859-1 as well.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use thiserror::Error;

/// Flat key/value map held by a properties file.
///
/// A `BTreeMap` keeps the written file in a stable, sorted order so two saves
/// of the same state produce byte-identical files.
pub type Properties = BTreeMap<String, String>;

/// Errors that can occur while decoding a properties file.
#[derive(Debug, Error, PartialEq)]
pub enum PropertiesError {
    /// A `\u` escape was not followed by four hexadecimal digits.
    #[error("malformed \\uXXXX escape on line {line}")]
    MalformedUnicodeEscape { line: usize },
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Decodes raw file bytes as ISO-8859-1 (every byte maps to the code point of
/// the same value).
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Parses properties text into a [`Properties`] map.
///
/// Later duplicates of a key overwrite earlier ones.
///
/// # Errors
///
/// Returns [`PropertiesError::MalformedUnicodeEscape`] when a `\u` escape is
/// truncated or contains non-hexadecimal digits.
///
/// # Examples
///
/// ```rust
/// use vcam_core::properties::parse_properties;
///
/// let props = parse_properties("# comment\nshow_fps = true\nloop_delay:250\n").unwrap();
/// assert_eq!(props["show_fps"], "true");
/// assert_eq!(props["loop_delay"], "250");
/// ```
pub fn parse_properties(text: &str) -> Result<Properties, PropertiesError> {
    let mut props = Properties::new();
    for (line, logical) in logical_lines(text) {
        let (raw_key, raw_value) = split_key_value(&logical);
        let key = unescape(raw_key, line)?;
        let value = unescape(raw_value, line)?;
        props.insert(key, value);
    }
    Ok(props)
}

/// Serialises `props` to properties text, preceded by `#<comment>` when a
/// comment is given.
///
/// # Examples
///
/// ```rust
/// use vcam_core::properties::{store_properties, Properties};
///
/// let mut props = Properties::new();
/// props.insert("video_index".to_string(), "2".to_string());
/// assert_eq!(store_properties(&props, Some("VCAM Configuration")),
///            "#VCAM Configuration\nvideo_index=2\n");
/// ```
pub fn store_properties(props: &Properties, comment: Option<&str>) -> String {
    let mut out = String::new();
    if let Some(comment) = comment {
        write_comment(&mut out, comment);
    }
    for (key, value) in props {
        escape_into(&mut out, key, true);
        out.push('=');
        escape_into(&mut out, value, false);
        out.push('\n');
    }
    out
}

// ── Reading ───────────────────────────────────────────────────────────────────

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0c')
}

/// Joins continuation lines and drops blanks and comments.
///
/// Each logical line is paired with the 1-based number of the natural line it
/// starts on, for error reporting.
fn logical_lines(text: &str) -> Vec<(usize, String)> {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut lines = Vec::new();
    let mut pending: Option<(usize, String)> = None;

    for (idx, raw) in normalized.split('\n').enumerate() {
        let trimmed = raw.trim_start_matches(is_blank);
        let continues = ends_with_continuation(trimmed);
        let body = if continues {
            &trimmed[..trimmed.len() - 1]
        } else {
            trimmed
        };

        match pending.take() {
            Some((start, mut acc)) => {
                acc.push_str(body);
                if continues {
                    pending = Some((start, acc));
                } else {
                    lines.push((start, acc));
                }
            }
            None => {
                if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                    continue;
                }
                if continues {
                    pending = Some((idx + 1, body.to_string()));
                } else {
                    lines.push((idx + 1, body.to_string()));
                }
            }
        }
    }

    if let Some(last) = pending {
        lines.push(last);
    }
    lines
}

/// True when the line ends with an odd number of backslashes.
fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

/// Splits a logical line into its still-escaped key and value parts.
fn split_key_value(line: &str) -> (&str, &str) {
    let mut key_end = line.len();
    let mut value_start = line.len();
    let mut has_separator = false;
    let mut escaped = false;

    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => {
                key_end = i;
                value_start = i + 1;
                has_separator = true;
                break;
            }
            c if is_blank(c) => {
                key_end = i;
                value_start = i + c.len_utf8();
                break;
            }
            _ => {}
        }
    }

    let mut value = line[value_start..].trim_start_matches(is_blank);
    if !has_separator {
        if let Some(rest) = value.strip_prefix(|c| c == '=' || c == ':') {
            value = rest.trim_start_matches(is_blank);
        }
    }
    (&line[..key_end], value)
}

/// Decodes backslash escapes.
///
/// Works on UTF-16 code units so that escaped surrogate pairs written by other
/// tools (`\uD83C\uDFA5`) decode to a single character.
fn unescape(raw: &str, line: usize) -> Result<String, PropertiesError> {
    let mut units: Vec<u16> = Vec::with_capacity(raw.len());
    let mut buf = [0u16; 2];
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            units.extend_from_slice(c.encode_utf16(&mut buf));
            continue;
        }
        let decoded = match chars.next() {
            Some('t') => '\t',
            Some('n') => '\n',
            Some('r') => '\r',
            Some('f') => '\x0c',
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                if hex.chars().count() != 4 {
                    return Err(PropertiesError::MalformedUnicodeEscape { line });
                }
                let unit = u16::from_str_radix(&hex, 16)
                    .map_err(|_| PropertiesError::MalformedUnicodeEscape { line })?;
                units.push(unit);
                continue;
            }
            Some(other) => other,
            // A dangling backslash at the end of the value is dropped.
            None => break,
        };
        units.extend_from_slice(decoded.encode_utf16(&mut buf));
    }

    Ok(String::from_utf16_lossy(&units))
}

// ── Writing ───────────────────────────────────────────────────────────────────

fn write_comment(out: &mut String, comment: &str) {
    out.push('#');
    let mut chars = comment.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' | '\n' => {
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push('\n');
                if !matches!(chars.peek(), Some('#') | Some('!')) {
                    out.push('#');
                }
            }
            c if (c as u32) > 0x7e => push_unicode_escape(out, c),
            c => out.push(c),
        }
    }
    out.push('\n');
}

fn escape_into(out: &mut String, text: &str, is_key: bool) {
    for (i, c) in text.chars().enumerate() {
        match c {
            // Leading spaces of values and all spaces of keys would be eaten
            // by the reader's separator handling.
            ' ' if is_key || i == 0 => out.push_str("\\ "),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\x0c' => out.push_str("\\f"),
            '=' | ':' | '#' | '!' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            c if (c as u32) < 0x20 || (c as u32) > 0x7e => push_unicode_escape(out, c),
            c => out.push(c),
        }
    }
}

fn push_unicode_escape(out: &mut String, c: char) {
    let mut buf = [0u16; 2];
    for unit in c.encode_utf16(&mut buf) {
        // Writing to a String cannot fail.
        let _ = write!(out, "\\u{unit:04X}");
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
