//! Common utilities for certificate generation.
//!
//! Shared helpers for value formatting and output file naming.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

/// Placeholder printed for optional fields left blank.
pub const NOT_AVAILABLE: &str = "N/A";

/// Certificate number shown on the document: the submission id zero-padded to 6 digits.
pub fn certificate_number(submission_id: i64) -> String {
    format!("{:06}", submission_id)
}

/// Uppercase the first character, keep the rest as entered ("male" -> "Male").
pub fn capitalize_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Value of an optional field, or `N/A` when missing or empty.
pub fn or_not_available(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or(NOT_AVAILABLE)
}

/// Indian short date format without padding (e.g. "5/1/2025").
pub fn format_generated_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.day(), date.month(), date.year())
}

/// File name for a certificate: unique per submission and generation instant.
pub fn certificate_file_name(submission_id: i64, generated_at: DateTime<Utc>) -> String {
    format!(
        "birth_certificate_{}_{}.pdf",
        submission_id,
        generated_at.timestamp_millis()
    )
}

/// WinAnsi byte for a character, if the encoding has one.
///
/// Latin-1 maps to itself; 0x80-0x9F hold typographic punctuation and a few letters.
pub fn win_ansi_byte(ch: char) -> Option<u8> {
    let byte = match ch {
        ' '..='~' | '\u{a0}'..='\u{ff}' => return Some(u32::from(ch) as u8),
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8a,
        '‹' => 0x8b,
        'Œ' => 0x8c,
        'Ž' => 0x8e,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201c}' => 0x93,
        '\u{201d}' => 0x94,
        '•' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9a,
        '›' => 0x9b,
        'œ' => 0x9c,
        'ž' => 0x9e,
        'Ÿ' => 0x9f,
        _ => return None,
    };
    Some(byte)
}

/// Map text to single-byte WinAnsi codes; characters the encoding lacks become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| win_ansi_byte(ch).unwrap_or(b'?'))
        .collect()
}
