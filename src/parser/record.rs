use std::borrow::Cow;

/// Outcome of splitting one line of a GeoNames dump
#[derive(Debug, PartialEq)]
pub enum ParsedLine<'a> {
    /// `#`-prefixed header or comment line
    Comment,
    /// Exactly the expected number of tab-separated fields
    Fields(Vec<&'a str>),
    /// Wrong field count; the line is skipped
    Malformed { found: usize },
}

/// A skipped source line, reported back to the operator
#[derive(Debug, Clone, PartialEq)]
pub struct MalformedLine {
    /// 1-based line number in the source file
    pub line: usize,
    pub found: usize,
    pub expected: usize,
}

impl std::fmt::Display for MalformedLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: got {} fields (expected {})",
            self.line, self.found, self.expected
        )
    }
}

/// Turn one raw line (as read up to and including `\n`) into text.
///
/// The line terminator (`\n` or `\r\n`) is stripped. Invalid UTF-8 is
/// replaced with U+FFFD; the line is still loaded.
pub fn decode_line(raw: &[u8]) -> Cow<'_, str> {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw)
}

/// Split a tab-separated line and check its field count.
///
/// Field contents are returned untouched, including empty fields.
pub fn parse_line(line: &str, expected: usize) -> ParsedLine<'_> {
    if line.starts_with('#') {
        return ParsedLine::Comment;
    }

    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() != expected {
        return ParsedLine::Malformed {
            found: fields.len(),
        };
    }

    ParsedLine::Fields(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_lines_are_skipped() {
        assert_eq!(parse_line("#ISO\tISO3", 2), ParsedLine::Comment);
        assert_eq!(parse_line("# free text", 19), ParsedLine::Comment);
    }

    #[test]
    fn test_fields_kept_verbatim() {
        let parsed = parse_line("US.06\tCalifornia\t\t5332921", 4);
        assert_eq!(
            parsed,
            ParsedLine::Fields(vec!["US.06", "California", "", "5332921"])
        );
    }

    #[test]
    fn test_wrong_field_count() {
        assert_eq!(
            parse_line("US.06\tCalifornia", 4),
            ParsedLine::Malformed { found: 2 }
        );
        assert_eq!(parse_line("", 4), ParsedLine::Malformed { found: 1 });
        assert_eq!(
            parse_line("a\tb\tc\td\te", 4),
            ParsedLine::Malformed { found: 5 }
        );
    }

    #[test]
    fn test_hash_inside_line_is_data() {
        assert_eq!(
            parse_line("XX.01\t#1\t#1\t1", 4),
            ParsedLine::Fields(vec!["XX.01", "#1", "#1", "1"])
        );
    }

    #[test]
    fn test_decode_line_strips_terminator() {
        assert_eq!(decode_line(b"US.06\tCalifornia\n"), "US.06\tCalifornia");
        assert_eq!(decode_line(b"US.06\tCalifornia\r\n"), "US.06\tCalifornia");
        assert_eq!(decode_line(b"last line"), "last line");
    }

    #[test]
    fn test_decode_line_replaces_invalid_utf8() {
        let decoded = decode_line(b"GR.ESYE31\tAtti\xCEki\tAttiki\t6692632\n");
        assert_eq!(decoded, "GR.ESYE31\tAtti\u{FFFD}ki\tAttiki\t6692632");
        assert!(matches!(parse_line(&decoded, 4), ParsedLine::Fields(_)));
    }

    #[test]
    fn test_malformed_display() {
        let m = MalformedLine {
            line: 12,
            found: 3,
            expected: 4,
        };
        assert_eq!(m.to_string(), "12: got 3 fields (expected 4)");
    }
}
