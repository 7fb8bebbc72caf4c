use std::{fmt, str::FromStr};

use crate::constants::WINDOW_SECS;
use crate::error::InvalidArgument;

/// A query window length in whole seconds, always within `1..=300`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowSpan(u16);

impl WindowSpan {
    pub const FULL: WindowSpan = WindowSpan(WINDOW_SECS as u16);

    pub fn secs(self) -> usize {
        usize::from(self.0)
    }
}

impl TryFrom<i64> for WindowSpan {
    type Error = InvalidArgument;

    fn try_from(seconds: i64) -> Result<Self, Self::Error> {
        if (1..=WINDOW_SECS as i64).contains(&seconds) {
            Ok(WindowSpan(seconds as u16))
        } else {
            Err(InvalidArgument::OutOfRange(seconds))
        }
    }
}

impl TryFrom<f64> for WindowSpan {
    type Error = InvalidArgument;

    fn try_from(seconds: f64) -> Result<Self, Self::Error> {
        if !seconds.is_finite() || seconds.fract() != 0.0 {
            return Err(InvalidArgument::NotAnInteger(seconds));
        }
        // Integral and finite; anything beyond i64 saturates and is out of range anyway.
        WindowSpan::try_from(seconds as i64)
    }
}

impl FromStr for WindowSpan {
    type Err = InvalidArgument;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(whole) = s.parse::<i64>() {
            return WindowSpan::try_from(whole);
        }
        match s.parse::<f64>() {
            Ok(value) => WindowSpan::try_from(value),
            Err(_) => Err(InvalidArgument::Malformed(s.to_string())),
        }
    }
}

impl fmt::Display for WindowSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}
