//! Table cell positions in A1 notation.
//!
//! Table cells are keyed by A1-style strings: column letters followed by a
//! 1-based row number (`"A1"`, `"B3"`, `"AA10"`). Internally positions are
//! 0-based `(row, column)` pairs ordered row-major.

use crate::common::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Convert alphabetic column to numeric (0-indexed).
///
/// # Examples
///
/// ```
/// use flowdoc::common::coordinates::alpha_to_digit;
///
/// assert_eq!(alpha_to_digit("A").unwrap(), 0);
/// assert_eq!(alpha_to_digit("Z").unwrap(), 25);
/// assert_eq!(alpha_to_digit("AA").unwrap(), 26);
/// ```
pub fn alpha_to_digit(alpha: &str) -> Result<u32> {
    if alpha.is_empty() || !alpha.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(Error::InvalidCellKey(format!(
            "Column value '{}' is malformed, must contain only letters",
            alpha
        )));
    }

    let mut column = 0u32;
    for c in alpha.bytes() {
        let val = (c.to_ascii_uppercase() - b'A' + 1) as u32;
        column = column
            .checked_mul(26)
            .and_then(|v| v.checked_add(val))
            .ok_or_else(|| Error::InvalidCellKey(format!("Column '{}' is too large", alpha)))?;
    }

    Ok(column - 1)
}

/// Convert numeric column (0-indexed) to alphabetic notation.
///
/// # Examples
///
/// ```
/// use flowdoc::common::coordinates::digit_to_alpha;
///
/// assert_eq!(digit_to_alpha(0), "A");
/// assert_eq!(digit_to_alpha(26), "AA");
/// ```
pub fn digit_to_alpha(digit: u32) -> String {
    let mut column = Vec::new();
    let mut digit = digit as u64 + 1;

    while digit > 0 {
        let c = ((digit - 1) % 26) as u8;
        column.push(b'A' + c);
        digit = (digit - 1) / 26;
    }

    column.reverse();
    String::from_utf8(column).unwrap_or_default()
}

/// Grid position, both coordinates 0-indexed.
///
/// Ordering is row-major: all of row 0 sorts before row 1.
///
/// # Examples
///
/// ```
/// use flowdoc::common::coordinates::CellPosition;
///
/// let pos: CellPosition = "B3".parse().unwrap();
/// assert_eq!(pos.row(), 2);
/// assert_eq!(pos.column(), 1);
/// assert_eq!(pos.to_string(), "B3");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellPosition {
    row: u32,
    column: u32,
}

impl CellPosition {
    #[inline]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    #[inline]
    pub const fn row(&self) -> u32 {
        self.row
    }

    #[inline]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Convert to A1 notation string.
    pub fn to_a1(&self) -> String {
        format!("{}{}", digit_to_alpha(self.column), self.row as u64 + 1)
    }
}

impl FromStr for CellPosition {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let split = s
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(s.len());
        let (alpha, numeric) = s.split_at(split);

        if alpha.is_empty() {
            return Err(Error::InvalidCellKey(format!(
                "No column letter found in '{}'",
                s
            )));
        }
        if numeric.is_empty() || !numeric.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidCellKey(format!("No row number found in '{}'", s)));
        }

        let column = alpha_to_digit(alpha)?;
        let row: u32 = numeric
            .parse()
            .map_err(|_| Error::InvalidCellKey(format!("Row number out of range in '{}'", s)))?;

        if row == 0 {
            return Err(Error::InvalidCellKey(format!(
                "Row number must be >= 1 in '{}'",
                s
            )));
        }

        Ok(Self::new(row - 1, column))
    }
}

impl fmt::Display for CellPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_a1())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alpha_to_digit() {
        assert_eq!(alpha_to_digit("A").unwrap(), 0);
        assert_eq!(alpha_to_digit("Z").unwrap(), 25);
        assert_eq!(alpha_to_digit("AZ").unwrap(), 51);
        assert_eq!(alpha_to_digit("ba").unwrap(), 52);
        assert!(alpha_to_digit("").is_err());
        assert!(alpha_to_digit("A1").is_err());
    }

    #[test]
    fn test_round_trip() {
        for i in 0..1000 {
            assert_eq!(alpha_to_digit(&digit_to_alpha(i)).unwrap(), i);
        }
    }

    #[test]
    fn test_parse_position() {
        let pos: CellPosition = "aa10".parse().unwrap();
        assert_eq!(pos, CellPosition::new(9, 26));
        assert_eq!(pos.to_a1(), "AA10");

        for bad in ["", "1", "A", "A0", "A-1", "A1B", "default"] {
            assert!(
                matches!(bad.parse::<CellPosition>(), Err(Error::InvalidCellKey(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_row_major_order() {
        let mut positions = vec![
            CellPosition::new(1, 0),
            CellPosition::new(0, 2),
            CellPosition::new(0, 1),
        ];
        positions.sort();
        assert_eq!(
            positions,
            vec![
                CellPosition::new(0, 1),
                CellPosition::new(0, 2),
                CellPosition::new(1, 0)
            ]
        );
    }
}
