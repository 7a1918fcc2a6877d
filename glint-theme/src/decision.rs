//! Theme decisions and author-supplied region tags.
//!
//! The naming convention is fixed once, here, and tested exhaustively:
//! [ThemeDecision::Light] means the *backdrop* counted as light, so chrome
//! renders dark-on-light. [ThemeDecision::Dark] means the backdrop counted
//! as dark, so chrome renders light-on-dark. Region tags use the same
//! convention and map to decisions verbatim.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ThemeError;

/// The binary outcome of a theme pass for one probe point.
///
/// A decision is always one of exactly two values and is never absent once
/// a resolution pass completes; when nothing resolves, the engine falls
/// back to the previous decision or the configured default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeDecision {
    /// The backdrop is light; chrome should render dark-on-light.
    Light,
    /// The backdrop is dark; chrome should render light-on-dark.
    Dark,
}

impl ThemeDecision {
    /// Classify a backdrop by relative luminance.
    ///
    /// Luminance strictly above `threshold` counts as a light backdrop.
    pub fn from_luminance(luminance: f64, threshold: f64) -> Self {
        if luminance > threshold {
            Self::Light
        } else {
            Self::Dark
        }
    }

    /// Whether chrome glyphs should be drawn dark (true over light backdrops).
    pub fn chrome_renders_dark(self) -> bool {
        matches!(self, Self::Light)
    }

    /// The opposite decision.
    pub fn inverse(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl fmt::Display for ThemeDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Light => write!(f, "light"),
            Self::Dark => write!(f, "dark"),
        }
    }
}

impl FromStr for ThemeDecision {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(ThemeError::InvalidDecision(other.to_string())),
        }
    }
}

/// An author-supplied hint tagging a content region as visually light or dark.
///
/// Tags are static per page and read-only to the resolver. An explicit tag
/// on a node or any of its ancestors always overrides computed color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeTag {
    /// The author declares this region visually light.
    Light,
    /// The author declares this region visually dark.
    Dark,
}

impl ThemeTag {
    /// The decision this tag dictates, verbatim.
    pub fn decision(self) -> ThemeDecision {
        match self {
            Self::Light => ThemeDecision::Light,
            Self::Dark => ThemeDecision::Dark,
        }
    }
}

impl fmt::Display for ThemeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Light => write!(f, "light"),
            Self::Dark => write!(f, "dark"),
        }
    }
}

impl FromStr for ThemeTag {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(ThemeError::InvalidDecision(other.to_string())),
        }
    }
}
