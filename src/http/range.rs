//! `Range` header handling
//!
//! Single `bytes` ranges only (RFC 7233). Multi-range requests are answered
//! with the full body.

/// Inclusive byte span within a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    pub const fn byte_count(self) -> usize {
        self.end - self.start + 1
    }

    /// `Content-Range` value for a file of `total` bytes
    pub fn content_range(self, total: usize) -> String {
        format!("bytes {}-{}/{total}", self.start, self.end)
    }
}

/// How a request's `Range` header applies to a file
#[derive(Debug, PartialEq, Eq)]
pub enum RangeOutcome {
    /// Absent, malformed or unsupported: send everything
    Full,
    Partial(ByteRange),
    /// Well-formed but outside the file: 416
    Unsatisfiable,
}

/// Resolve a `Range` header against a file of `total` bytes
///
/// Supported forms: `bytes=start-end`, `bytes=start-`, `bytes=-suffix`.
pub fn resolve(range_header: Option<&str>, total: usize) -> RangeOutcome {
    let Some(byte_spec) = range_header.and_then(|h| h.trim().strip_prefix("bytes=")) else {
        return RangeOutcome::Full;
    };
    if byte_spec.contains(',') {
        return RangeOutcome::Full;
    }
    let Some((first, last)) = byte_spec.split_once('-') else {
        return RangeOutcome::Full;
    };

    match (first.trim(), last.trim()) {
        ("", suffix) => suffix_range(suffix, total),
        (start, end) => bounded_range(start, end, total),
    }
}

fn suffix_range(suffix: &str, total: usize) -> RangeOutcome {
    let Ok(suffix) = suffix.parse::<usize>() else {
        return RangeOutcome::Full;
    };
    if suffix == 0 || total == 0 {
        return RangeOutcome::Unsatisfiable;
    }
    RangeOutcome::Partial(ByteRange {
        start: total.saturating_sub(suffix),
        end: total - 1,
    })
}

fn bounded_range(start: &str, end: &str, total: usize) -> RangeOutcome {
    let Ok(start) = start.parse::<usize>() else {
        return RangeOutcome::Full;
    };
    if start >= total {
        return RangeOutcome::Unsatisfiable;
    }

    let end = if end.is_empty() {
        total - 1
    } else {
        match end.parse::<usize>() {
            Ok(end) if end < start => return RangeOutcome::Unsatisfiable,
            Ok(end) => end.min(total - 1),
            Err(_) => return RangeOutcome::Full,
        }
    };

    RangeOutcome::Partial(ByteRange { start, end })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_or_foreign_unit() {
        assert_eq!(resolve(None, 100), RangeOutcome::Full);
        assert_eq!(resolve(Some("items=0-5"), 100), RangeOutcome::Full);
    }

    #[test]
    fn test_bounded() {
        let RangeOutcome::Partial(range) = resolve(Some("bytes=0-9"), 100) else {
            panic!("Expected partial");
        };
        assert_eq!(range, ByteRange { start: 0, end: 9 });
        assert_eq!(range.byte_count(), 10);
        assert_eq!(range.content_range(100), "bytes 0-9/100");
    }

    #[test]
    fn test_open_ended_and_clamped() {
        assert_eq!(
            resolve(Some("bytes=50-"), 100),
            RangeOutcome::Partial(ByteRange { start: 50, end: 99 })
        );
        assert_eq!(
            resolve(Some("bytes=90-500"), 100),
            RangeOutcome::Partial(ByteRange { start: 90, end: 99 })
        );
    }

    #[test]
    fn test_suffix() {
        assert_eq!(
            resolve(Some("bytes=-20"), 100),
            RangeOutcome::Partial(ByteRange { start: 80, end: 99 })
        );
        assert_eq!(
            resolve(Some("bytes=-500"), 100),
            RangeOutcome::Partial(ByteRange { start: 0, end: 99 })
        );
        assert_eq!(resolve(Some("bytes=-0"), 100), RangeOutcome::Unsatisfiable);
    }

    #[test]
    fn test_unsatisfiable() {
        assert_eq!(resolve(Some("bytes=200-"), 100), RangeOutcome::Unsatisfiable);
        assert_eq!(resolve(Some("bytes=20-10"), 100), RangeOutcome::Unsatisfiable);
        assert_eq!(resolve(Some("bytes=0-"), 0), RangeOutcome::Unsatisfiable);
    }

    #[test]
    fn test_malformed_is_ignored() {
        assert_eq!(resolve(Some("bytes=a-b"), 100), RangeOutcome::Full);
        assert_eq!(resolve(Some("bytes=0-9,20-29"), 100), RangeOutcome::Full);
        assert_eq!(resolve(Some("bytes=5"), 100), RangeOutcome::Full);
    }
}
