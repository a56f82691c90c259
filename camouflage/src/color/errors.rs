use std::error::Error;
use std::fmt;

/// An error type indicating a malformed `#RRGGBB` color string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    /// The string held a character that is not a hex digit.
    InvalidDigit(char),
    /// The string did not hold exactly six hex digits.
    InvalidLength(usize),
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDigit(c) => write!(f, "invalid hex digit {:?} in color", c),
            Self::InvalidLength(len) => {
                write!(f, "expected 6 hex digits in color, found {}", len)
            }
        }
    }
}

impl Error for ColorParseError {}
