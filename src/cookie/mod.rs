//! Cookie decoding for `Set-Cookie` response headers.
//!
//! Each header line is a semicolon-delimited attribute list. Splitting must
//! not break apart a value holding the literal quoted-semicolon sequence
//! `";"`, so that sequence is swapped for a sentinel token before the split
//! and restored in every segment afterwards.
//!
//! Attribute keys are case-folded; the first occurrence of an attribute wins
//! and later duplicates on the same line are discarded. Unknown attributes
//! (`Max-Age`, `SameSite`, ...) are ignored.

use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime, Utc};
use percent_encoding::percent_decode_str;
use regex::Regex;
use serde::Serialize;

mod jar;

pub use jar::CookieJar;

/// Attribute separator: a semicolon with optional trailing blanks.
static ATTR_SPLIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r";[ \t]*").unwrap());

/// Quoted semicolon that must survive the attribute split.
const QUOTED_SEMI: &str = "\";\"";

/// Stand-in for [`QUOTED_SEMI`] while splitting.
const SENTINEL: &str = "{__cookie_replace__}";

/// One decoded `Set-Cookie` entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CookieRecord {
    /// Cookie name, as sent.
    pub name: String,
    /// URL-decoded value.
    pub value: String,
    /// Absolute expiry, when an `Expires` attribute was present and parseable.
    pub expire: Option<DateTime<Utc>>,
    /// `Path` attribute.
    pub path: Option<String>,
    /// `Domain` attribute.
    pub domain: Option<String>,
    /// `Secure` flag.
    pub secure: bool,
    /// `HttpOnly` flag.
    pub http_only: bool,
}

impl CookieRecord {
    /// Creates a record with only name and value set.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        CookieRecord {
            name: name.into(),
            value: value.into(),
            expire: None,
            path: None,
            domain: None,
            secure: false,
            http_only: false,
        }
    }

    /// Whether the record is expired at `now`.
    #[inline]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expire, Some(expire) if expire <= now)
    }
}

/// Cookie decoding errors.
#[derive(Debug, Clone, PartialEq)]
pub enum CookieError {
    /// A header line's first segment lacks a `name=value` pair.
    MissingNameValue {
        line: String,
    },
}

impl fmt::Display for CookieError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CookieError::MissingNameValue { line } => {
                write!(f, "set-cookie line has no name=value pair: {:?}", line)
            }
        }
    }
}

impl std::error::Error for CookieError {}

/// Decodes a list of raw `Set-Cookie` header values into records.
///
/// Fails on the first malformed line instead of silently producing a
/// partial record.
pub fn parse_set_cookie<S: AsRef<str>>(lines: &[S]) -> Result<Vec<CookieRecord>, CookieError> {
    lines.iter().map(|line| parse_line(line.as_ref())).collect()
}

fn parse_line(line: &str) -> Result<CookieRecord, CookieError> {
    let masked = line.replace(QUOTED_SEMI, SENTINEL);
    let parts: Vec<String> = ATTR_SPLIT
        .split(&masked)
        .map(|part| part.replace(SENTINEL, QUOTED_SEMI))
        .collect();

    let (name, raw_value) = match parts[0].split_once('=') {
        Some(pair) => pair,
        None => {
            return Err(CookieError::MissingNameValue {
                line: line.to_string(),
            })
        }
    };

    let mut record = CookieRecord::new(name, url_decode(raw_value));
    let mut expire_seen = false;
    let mut path_seen = false;
    let mut domain_seen = false;

    for part in &parts[1..] {
        if part.is_empty() {
            continue;
        }
        let (key, value) = match part.split_once('=') {
            Some((key, value)) => (key, Some(value)),
            None => (part.as_str(), None),
        };
        match key.to_ascii_lowercase().as_str() {
            "httponly" => record.http_only = true,
            "secure" => record.secure = true,
            "expires" => {
                if !expire_seen {
                    expire_seen = true;
                    record.expire = value.and_then(parse_expires);
                }
            }
            "path" => {
                if !path_seen {
                    path_seen = true;
                    record.path = value.map(str::to_string);
                }
            }
            "domain" => {
                if !domain_seen {
                    domain_seen = true;
                    record.domain = value.map(str::to_string);
                }
            }
            _ => {}
        }
    }

    Ok(record)
}

/// PHP-style URL decoding: `+` means space, then percent sequences.
fn url_decode(value: &str) -> String {
    let plus_decoded = value.replace('+', " ");
    percent_decode_str(&plus_decoded)
        .decode_utf8_lossy()
        .into_owned()
}

/// Parses the HTTP date formats an `Expires` attribute may carry.
fn parse_expires(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    // RFC 1123 / RFC 2822, e.g. "Wed, 21 Oct 2015 07:28:00 GMT"
    if let Ok(parsed) = DateTime::parse_from_rfc2822(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    // RFC 850, e.g. "Sunday, 06-Nov-94 08:49:37 GMT"
    if let Ok(parsed) = NaiveDateTime::parse_from_str(value, "%A, %d-%b-%y %H:%M:%S GMT") {
        return Some(parsed.and_utc());
    }
    // asctime, e.g. "Sun Nov  6 08:49:37 1994"
    if let Ok(parsed) = NaiveDateTime::parse_from_str(value, "%a %b %e %H:%M:%S %Y") {
        return Some(parsed.and_utc());
    }
    None
}
