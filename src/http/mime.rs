//! Content-Type inference
//!
//! Extension lookup goes through `mime_guess`. Textual types get an explicit
//! UTF-8 charset. Files with no known extension are sniffed.

const OCTET_STREAM: &str = "application/octet-stream";

/// Content-Type for the file at `path` with content `data`
///
/// # Examples
/// ```ignore
/// assert_eq!(content_type_for("index.html", b""), "text/html; charset=utf-8");
/// assert_eq!(content_type_for("logo.png", b""), "image/png");
/// ```
pub fn content_type_for(path: &str, data: &[u8]) -> &'static str {
    match mime_guess::from_path(path).first_raw() {
        Some("text/html") => "text/html; charset=utf-8",
        Some("text/css") => "text/css; charset=utf-8",
        Some("text/plain") => "text/plain; charset=utf-8",
        Some("text/javascript" | "application/javascript") => "text/javascript; charset=utf-8",
        Some("text/xml") => "text/xml; charset=utf-8",
        Some(essence) => essence,
        None => sniff(data),
    }
}

/// Guess a type from leading bytes
fn sniff(data: &[u8]) -> &'static str {
    let head = &data[..data.len().min(512)];
    let trimmed = trim_leading_whitespace(head);

    if starts_with_ignore_case(trimmed, b"<!doctype html") || starts_with_ignore_case(trimmed, b"<html") {
        return "text/html; charset=utf-8";
    }
    if trimmed.starts_with(b"%PDF-") {
        return "application/pdf";
    }
    if trimmed.starts_with(b"\x89PNG\r\n\x1a\n") {
        return "image/png";
    }
    if !head.is_empty() && !head.contains(&0) && std::str::from_utf8(head).is_ok() {
        return "text/plain; charset=utf-8";
    }
    OCTET_STREAM
}

fn trim_leading_whitespace(data: &[u8]) -> &[u8] {
    let start = data
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(data.len());
    &data[start..]
}

fn starts_with_ignore_case(data: &[u8], prefix: &[u8]) -> bool {
    data.len() >= prefix.len() && data[..prefix.len()].eq_ignore_ascii_case(prefix)
}
