// GEDCOM line grammar.
//
// Every GEDCOM line is `level [@XREF@] TAG [value]`. The level is a decimal
// number, the optional cross-reference id is wrapped in `@`, the tag is a
// single token, and the value is everything after the single delimiter
// that follows the tag (kept verbatim, including inner spacing).
//
// Files in the wild use LF, CRLF, or bare CR line endings; `split_lines`
// normalizes all three without shifting line numbers.

use crate::error::GedcomError;

/// One parsed GEDCOM line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GedcomLine {
    pub level: u8,
    /// Cross-reference id without the surrounding `@`s (e.g. `I1`).
    pub xref: Option<String>,
    pub tag: String,
    /// Line value, `None` when the line carries no value.
    pub value: Option<String>,
}

/// Parse a single non-blank GEDCOM line. `line_number` is 1-based and only
/// used for error reporting.
pub fn parse_line(raw: &str, line_number: usize) -> Result<GedcomLine, GedcomError> {
    let malformed = || GedcomError::MalformedLine {
        line_number,
        content: raw.to_string(),
    };

    let (level_text, rest) = split_token(raw.trim_start());
    let level: u8 = level_text.parse().map_err(|_| malformed())?;

    let rest = rest.trim_start();
    let (xref, rest) = if rest.starts_with('@') {
        let (token, rest) = split_token(rest);
        if token.len() < 3 || !token.ends_with('@') {
            return Err(malformed());
        }
        (Some(token[1..token.len() - 1].to_string()), rest.trim_start())
    } else {
        (None, rest)
    };

    let (tag, rest) = split_token(rest);
    if tag.is_empty() {
        return Err(malformed());
    }

    let value = rest
        .strip_prefix(' ')
        .or_else(|| rest.strip_prefix('\t'))
        .unwrap_or(rest);

    Ok(GedcomLine {
        level,
        xref,
        tag: tag.to_ascii_uppercase(),
        value: (!value.is_empty()).then(|| value.to_string()),
    })
}

/// Split text into lines on LF, CRLF, or bare CR.
pub(crate) fn split_lines(text: &str) -> Vec<&str> {
    if text.contains('\n') {
        text.split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .collect()
    } else {
        text.split('\r').collect()
    }
}

/// Split off the first whitespace-delimited token. The remainder keeps its
/// leading whitespace so the caller can honor the single-delimiter rule.
fn split_token(s: &str) -> (&str, &str) {
    match s.find(char::is_whitespace) {
        Some(i) => (&s[..i], &s[i..]),
        None => (s, ""),
    }
}
