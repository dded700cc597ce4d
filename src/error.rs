//! Errors returned by the checked positional operations.

use thiserror::Error;

/// Why a checked positional operation on an `OrderedSet` was rejected.
///
/// The set is left untouched whenever one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("index {index} is out of bounds for an ordered set of length {len}")]
    OutOfBounds { index: usize, len: usize },
    #[error("range {start}..{end} is out of bounds for an ordered set of length {len}")]
    RangeOutOfBounds { start: usize, end: usize, len: usize },
    /// The value being written already lives at another position.
    #[error("value is already present at index {index}")]
    DuplicateValue { index: usize },
}

#[cfg(test)]
mod tests {
    use super::PositionError;

    #[test]
    fn messages_name_index_and_length() {
        let e = PositionError::OutOfBounds { index: 7, len: 3 };
        assert_eq!(
            e.to_string(),
            "index 7 is out of bounds for an ordered set of length 3"
        );

        let e = PositionError::RangeOutOfBounds {
            start: 2,
            end: 9,
            len: 4,
        };
        assert_eq!(
            e.to_string(),
            "range 2..9 is out of bounds for an ordered set of length 4"
        );

        let e = PositionError::DuplicateValue { index: 1 };
        assert_eq!(e.to_string(), "value is already present at index 1");
    }
}
