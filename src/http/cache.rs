//! HTTP caching module
//!
//! `ETag` / `Last-Modified` validators and the conditional request checks
//! built on them.

use chrono::{DateTime, NaiveDateTime, Utc};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// `Cache-Control` for content-hashed build output
pub const IMMUTABLE: &str = "public, max-age=31536000, immutable";

/// IMF-fixdate layout, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Generate a quoted `ETag` from file content
pub fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("\"{:x}\"", hasher.finish())
}

/// Whether `If-None-Match` lists `etag` (or is `*`)
///
/// Weak comparison: a `W/` prefix on the client's tag is ignored.
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|header| {
        header.split(',').map(str::trim).any(|candidate| {
            candidate == "*" || candidate.strip_prefix("W/").unwrap_or(candidate) == etag
        })
    })
}

/// Format a timestamp as an HTTP-date
pub fn format_http_date(time: DateTime<Utc>) -> String {
    time.format(HTTP_DATE_FORMAT).to_string()
}

/// Parse an HTTP-date (IMF-fixdate or RFC 2822 style)
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, HTTP_DATE_FORMAT)
        .map(|naive| naive.and_utc())
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc2822(value)
                .ok()
                .map(|t| t.with_timezone(&Utc))
        })
}

/// `If-Modified-Since` check, at whole-second precision
///
/// Unknown modification time or an unparsable header means "modified".
pub fn not_modified_since(if_modified_since: Option<&str>, last_modified: Option<DateTime<Utc>>) -> bool {
    let (Some(header), Some(modified)) = (if_modified_since, last_modified) else {
        return false;
    };
    parse_http_date(header).is_some_and(|since| modified.timestamp() <= since.timestamp())
}

/// Whether an `If-Range` precondition lets a `Range` header apply
///
/// The validator may be an entity tag (strong match only) or an HTTP-date
/// that must equal `Last-Modified`.
pub fn if_range_allows(if_range: Option<&str>, etag: &str, last_modified: Option<DateTime<Utc>>) -> bool {
    let Some(validator) = if_range.map(str::trim) else {
        return true;
    };
    if validator.starts_with('"') {
        return validator == etag;
    }
    match (parse_http_date(validator), last_modified) {
        (Some(date), Some(modified)) => date.timestamp() == modified.timestamp(),
        _ => false,
    }
}
