//! Team colors.

use std::fmt;

use crate::{StrategyError, StrategyResult};

/// A color as a team may supply it: a named color understood by the
/// renderer, or three channels in `[0, 1]`.
#[derive(Clone, Debug, PartialEq)]
pub enum Color {
    Named(String),
    Rgb(f64, f64, f64),
}

impl Color {
    pub fn named(name: impl Into<String>) -> Self {
        Color::Named(name.into())
    }

    /// Check the shape contract.
    ///
    /// Names must be non-blank.  Channels must be finite and within `[0, 1]`.
    pub fn validate(&self) -> StrategyResult<()> {
        match self {
            Color::Named(name) if name.trim().is_empty() => {
                Err(StrategyError::InvalidColor("blank color name".into()))
            }
            Color::Named(_) => Ok(()),
            Color::Rgb(r, g, b) => {
                for c in [r, g, b] {
                    if !c.is_finite() || !(0.0..=1.0).contains(c) {
                        return Err(StrategyError::InvalidColor(format!(
                            "channel {c} outside [0, 1]"
                        )));
                    }
                }
                Ok(())
            }
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::named(crate::DEFAULT_COLOR)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Named(name)  => f.write_str(name),
            Color::Rgb(r, g, b) => write!(f, "({r:.3}, {g:.3}, {b:.3})"),
        }
    }
}

impl From<&str> for Color {
    fn from(name: &str) -> Self {
        Color::named(name)
    }
}

impl From<(f64, f64, f64)> for Color {
    fn from((r, g, b): (f64, f64, f64)) -> Self {
        Color::Rgb(r, g, b)
    }
}
