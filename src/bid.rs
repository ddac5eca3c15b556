//! The bid record stored by both indexes.

use std::fmt;

use crate::IndexError;

/// One auction bid.
///
/// `id` is the only field the indexes look at: it orders the tree and feeds
/// the hash table. A bid with an empty id is the "empty" bid returned by
/// `Bid::default()`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bid {
    /// Unique identifier of the bid.
    pub id: String,
    /// Item title.
    pub title: String,
    /// Fund the bid is paid from.
    pub fund: String,
    /// Winning amount.
    pub amount: f64,
}

impl Bid {
    /// Creates a bid from its parts.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        fund: impl Into<String>,
        amount: f64,
    ) -> Self {
        Self { id: id.into(), title: title.into(), fund: fund.into(), amount }
    }

    /// Returns true for the empty bid, i.e. one without an id.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.id.is_empty()
    }
}

impl fmt::Display for Bid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} | {} | {}", self.id, self.title, self.amount, self.fund)
    }
}

/// Parses a currency string such as `"$1,250.50"` into a number.
///
/// Every `symbol` and every thousands separator is stripped before parsing.
/// An empty value reads as `0.0`.
///
/// # Errors
///
/// Returns [`IndexError::InvalidAmount`] when what is left is not a number.
pub fn parse_amount(raw: &str, symbol: char) -> Result<f64, IndexError> {
    let cleaned: String = raw.chars().filter(|&c| c != symbol && c != ',').collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return Ok(0.0);
    }
    cleaned.parse::<f64>().map_err(|_| IndexError::InvalidAmount(raw.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        let bid = Bid::default();
        assert!(bid.is_empty());
        assert!(bid.amount.abs() < f64::EPSILON);
        assert!(!Bid::new("98109", "Chair", "General Fund", 12.0).is_empty());
    }

    #[test]
    fn test_display() {
        let bid = Bid::new("98109", "Office Chair", "Enterprise", 35.5);
        assert_eq!(bid.to_string(), "98109: Office Chair | 35.5 | Enterprise");
    }

    #[test]
    fn test_parse_amount() {
        assert!((parse_amount("$27.00", '$').unwrap() - 27.0).abs() < f64::EPSILON);
        assert!((parse_amount(" $1,250.50 ", '$').unwrap() - 1250.5).abs() < f64::EPSILON);
        assert!((parse_amount("", '$').unwrap()).abs() < f64::EPSILON);
        assert!((parse_amount("$", '$').unwrap()).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_amount_rejects_garbage() {
        match parse_amount("$12abc", '$') {
            Err(IndexError::InvalidAmount(raw)) => assert_eq!(raw, "$12abc"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
