// Year extraction from free-text genealogical dates.
//
// GEDCOM dates come in many shapes ("12 MAR 1890", "ABT 1890",
// "BET 1890 AND 1895", "1890-1895", or nothing at all). Rather than parse
// the date grammar, we take the first run of exactly four ASCII digits.
// Anything without such a run has no year. The value is not range-checked:
// "9999" comes back as 9999.

/// A calendar year as found in a date string (0..=9999).
pub type Year = u16;

const YEAR_DIGITS: usize = 4;

/// Return the first maximal run of exactly four digits in `text` as a year.
///
/// Runs of other lengths are skipped entirely, so "12345 1890" yields 1890,
/// not 1234. Absent or digit-free text yields `None`.
pub fn extract_year(text: Option<&str>) -> Option<Year> {
    let bytes = text?.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if !bytes[i].is_ascii_digit() {
            i += 1;
            continue;
        }
        let start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i - start == YEAR_DIGITS {
            let year = bytes[start..i]
                .iter()
                .fold(0, |acc: Year, b| acc * 10 + Year::from(b - b'0'));
            return Some(year);
        }
    }
    None
}
