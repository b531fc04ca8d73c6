//! Mapping between the book numbers shown to API consumers and the internal
//! book IDs stored with books and chapters.
//!
//! | display        | internal |
//! |----------------|----------|
//! | `introduction` | `-1`     |
//! | `N` (N ≥ 0)    | `N`      |
//! | `Nb` (N ≥ 2)   | `-N`     |
//!
//! Both directions are pure and total over IDs. Display numbers are canonical
//! (no sign, no leading zeros), which keeps the mapping injective.

pub const INTRODUCTION: &str = "introduction";
const INTRODUCTION_ID: i64 = -1;
const SUPPLEMENT_SUFFIX: char = 'b';

/// Resolve a display book number to its internal ID.
pub fn to_id(number: &str) -> Option<i64> {
    if number == INTRODUCTION {
        return Some(INTRODUCTION_ID);
    }

    if let Some(base) = number.strip_suffix(SUPPLEMENT_SUFFIX) {
        return parse_canonical(base).filter(|n| *n >= 2).map(|n| -n);
    }

    parse_canonical(number)
}

/// Render an internal book ID as the display book number.
pub fn from_id(id: i64) -> String {
    match id {
        INTRODUCTION_ID => INTRODUCTION.to_string(),
        n if n < 0 => format!("{}{}", n.unsigned_abs(), SUPPLEMENT_SUFFIX),
        n => n.to_string(),
    }
}

fn parse_canonical(digits: &str) -> Option<i64> {
    let canonical = !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
        && (digits == "0" || !digits.starts_with('0'));
    if !canonical {
        return None;
    }
    digits.parse().ok()
}
