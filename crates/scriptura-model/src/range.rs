use std::collections::BTreeSet;
use thiserror::Error;

/// Errors from resolving a chapter selector expression.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RangeError {
    #[error("invalid chapter token '{0}'")]
    InvalidToken(String),
    #[error("chapter {0} is outside 1..={1}")]
    OutOfBounds(u32, u32),
    #[error("descending range '{0}-{1}'")]
    Descending(u32, u32),
}

/// Resolve a chapter selector against a book's chapter count.
///
/// `all` (any case) selects every chapter. Otherwise the selector is a
/// comma-separated list of tokens, each a single chapter number or an
/// inclusive `low-high` range. The result is distinct and ascending.
///
/// Any malformed token, descending range, or chapter outside
/// `1..=ceiling` fails the whole selector; nothing is silently skipped.
pub fn resolve_chapters(selector: &str, ceiling: u32) -> Result<Vec<u32>, RangeError> {
    if selector.trim().eq_ignore_ascii_case("all") {
        return Ok((1..=ceiling).collect());
    }

    let mut chapters = BTreeSet::new();
    for token in selector.split(',') {
        let token = token.trim();
        match token.split_once('-') {
            Some((low, high)) => {
                let low = parse_bound(low, token, ceiling)?;
                let high = parse_bound(high, token, ceiling)?;
                if low > high {
                    return Err(RangeError::Descending(low, high));
                }
                chapters.extend(low..=high);
            }
            None => {
                chapters.insert(parse_bound(token, token, ceiling)?);
            }
        }
    }
    Ok(chapters.into_iter().collect())
}

fn parse_bound(raw: &str, token: &str, ceiling: u32) -> Result<u32, RangeError> {
    let value: u32 = raw
        .trim()
        .parse()
        .map_err(|_| RangeError::InvalidToken(token.to_string()))?;
    if value == 0 || value > ceiling {
        return Err(RangeError::OutOfBounds(value, ceiling));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_and_range_tokens() {
        assert_eq!(resolve_chapters("1-3,5", 10).unwrap(), vec![1, 2, 3, 5]);
    }

    #[test]
    fn test_all_selects_every_chapter() {
        assert_eq!(resolve_chapters("all", 5).unwrap(), vec![1, 2, 3, 4, 5]);
        assert_eq!(resolve_chapters("ALL", 3).unwrap(), vec![1, 2, 3]);
        assert_eq!(resolve_chapters(" all ", 2).unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_zero_bound_fails() {
        assert_eq!(
            resolve_chapters("0-2", 5).unwrap_err(),
            RangeError::OutOfBounds(0, 5)
        );
    }

    #[test]
    fn test_descending_range_fails() {
        assert_eq!(
            resolve_chapters("3-1", 5).unwrap_err(),
            RangeError::Descending(3, 1)
        );
    }

    #[test]
    fn test_above_ceiling_fails() {
        assert_eq!(
            resolve_chapters("4,6", 5).unwrap_err(),
            RangeError::OutOfBounds(6, 5)
        );
        assert_eq!(
            resolve_chapters("3-7", 5).unwrap_err(),
            RangeError::OutOfBounds(7, 5)
        );
    }

    #[test]
    fn test_malformed_tokens_fail() {
        assert!(matches!(
            resolve_chapters("two", 5),
            Err(RangeError::InvalidToken(_))
        ));
        assert!(matches!(
            resolve_chapters("1,,3", 5),
            Err(RangeError::InvalidToken(_))
        ));
        assert!(matches!(
            resolve_chapters("1-2-3", 5),
            Err(RangeError::InvalidToken(_))
        ));
        assert!(matches!(
            resolve_chapters("", 5),
            Err(RangeError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_duplicates_collapse_ascending() {
        assert_eq!(resolve_chapters("5,1,3,1-2", 5).unwrap(), vec![1, 2, 3, 5]);
    }

    #[test]
    fn test_single_chapter_range() {
        assert_eq!(resolve_chapters("4-4", 5).unwrap(), vec![4]);
    }

    #[test]
    fn test_whitespace_tolerated_around_tokens() {
        assert_eq!(resolve_chapters(" 1 , 2 - 3 ", 5).unwrap(), vec![1, 2, 3]);
    }
}
