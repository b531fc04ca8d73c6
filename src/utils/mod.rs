//! Parsing helpers shared by the route handlers.

use std::str::FromStr;

use hadith_db::book_number;
use hadith_http::AppError;

/// Parse a typed path segment. A segment of the wrong shape means the route
/// does not exist, so failures are `NotFound`.
pub fn path_segment<T: FromStr>(raw: &str) -> Result<T, AppError> {
    raw.parse().map_err(|_| AppError::not_found())
}

/// Chapter numbers are written as dotted decimals (`1.0`, `2.5`). Integral,
/// signed or exponent forms do not name a chapter.
pub fn chapter_segment(raw: &str) -> Result<f64, AppError> {
    let dotted = raw
        .split_once('.')
        .is_some_and(|(whole, fraction)| is_digits(whole) && is_digits(fraction));
    if !dotted {
        return Err(AppError::not_found());
    }
    path_segment(raw)
}

fn is_digits(raw: &str) -> bool {
    !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit())
}

/// Internal ID of a display book number (`introduction`, `N`, `Nb`).
pub fn book_id(number: &str) -> Result<i64, AppError> {
    book_number::to_id(number)
        .ok_or_else(|| AppError::bad_request(format!("Invalid book number: {number}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_segments_miss_as_not_found() {
        assert_eq!(path_segment::<i64>("305").unwrap(), 305);
        assert!(matches!(path_segment::<i64>("abc"), Err(AppError::NotFound { .. })));
    }

    #[test]
    fn chapter_segments_are_dotted_decimals() {
        assert_eq!(chapter_segment("1.5").unwrap(), 1.5);
        assert_eq!(chapter_segment("3.0").unwrap(), 3.0);
        for raw in ["3", "1e0", "-1.5", ".5", "1.", "1.2.3", "inf", "NaN", "one"] {
            assert!(matches!(chapter_segment(raw), Err(AppError::NotFound { .. })), "{raw}");
        }
    }

    #[test]
    fn book_numbers_map_or_reject() {
        assert_eq!(book_id("introduction").unwrap(), -1);
        assert_eq!(book_id("35b").unwrap(), -35);
        assert!(matches!(book_id("abc"), Err(AppError::BadRequest { .. })));
    }
}
