//! # Resolver Configuration
//!
//! Tunable knobs for the viewport theme resolver, loadable from environment
//! variables, TOML files, or set programmatically.
//!
//! ## Environment Variables
//!
//! - `GLINT_THEME`: the default decision when nothing resolves (`light` or `dark`)
//! - `GLINT_THEME_CONFIG`: path to a TOML configuration file
//! - `GLINT_RASTER_ASSUMPTION`: the raster-content heuristic
//!   (`assume-dark`, `assume-light` or `sample`)
//!
//! ## Configuration File Format
//!
//! ```toml
//! [resolver]
//! default-decision = "light"
//! luminance-threshold = 0.5
//! see-through-alpha = 0.5
//! raster-assumption = "assume-dark"
//! image-cache-capacity = 32
//! ```
//!
//! ## Programmatic Configuration
//!
//! ```rust
//! use glint_theme::config::{RasterAssumption, ResolverConfig};
//! use glint_theme::decision::ThemeDecision;
//!
//! let config = ResolverConfig::new()
//!     .with_default_decision(ThemeDecision::Dark)
//!     .with_raster_assumption(RasterAssumption::Sample);
//! ```

use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::decision::ThemeDecision;
use crate::error::{ThemeError, ThemeResult};

/// How the engine treats a probe point over untagged raster content.
///
/// The original heuristic assumed photographs are dark backgrounds and
/// decided `dark` immediately rather than waiting on an async sample. That
/// latency/accuracy trade-off is unverified business logic, so it is a
/// configuration knob here rather than a hardcoded rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RasterAssumption {
    /// Decide `dark` immediately over raster content.
    AssumeDark,
    /// Decide `light` immediately over raster content.
    AssumeLight,
    /// Make no assumption; keep the previous decision and wait for sampling.
    Sample,
}

/// Configuration for the viewport theme resolver.
///
/// All values have sensible defaults; thresholds outside `[0, 1]` are
/// clamped (with a warning) by [ResolverConfig::normalized] rather than
/// rejected, since a wrong threshold only degrades cosmetics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ResolverConfig {
    /// Decision applied when no backdrop resolves at all.
    pub default_decision: ThemeDecision,
    /// Luminance strictly above this value counts as a light backdrop.
    pub luminance_threshold: f64,
    /// Background colors with alpha below this value are treated as
    /// see-through during traversal, even though they visually tint.
    pub see_through_alpha: f32,
    /// Heuristic for probe points over untagged raster content.
    pub raster_assumption: RasterAssumption,
    /// Capacity of the decoded-image LRU cache.
    pub image_cache_capacity: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            default_decision: ThemeDecision::Light,
            luminance_threshold: 0.5,
            see_through_alpha: 0.5,
            raster_assumption: RasterAssumption::AssumeDark,
            image_cache_capacity: 32,
        }
    }
}

/// Wrapper matching the `[resolver]` table in configuration files.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    resolver: ResolverConfig,
}

impl ResolverConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration from environment variables or use defaults.
    ///
    /// A configuration file named by `GLINT_THEME_CONFIG` is loaded first
    /// (falling back to defaults if it fails, with a warning); the plain
    /// `GLINT_THEME` and `GLINT_RASTER_ASSUMPTION` variables then override
    /// individual fields.
    pub fn from_env_or_default() -> Self {
        let mut config = Self::new();

        if let Ok(path) = env::var("GLINT_THEME_CONFIG") {
            match Self::from_file(&path) {
                Ok(file_config) => config = file_config,
                Err(err) => {
                    log::warn!("ignoring GLINT_THEME_CONFIG ({path}): {err}");
                }
            }
        }

        if let Ok(theme) = env::var("GLINT_THEME") {
            match theme.parse() {
                Ok(decision) => config.default_decision = decision,
                Err(_) => log::warn!("ignoring invalid GLINT_THEME value: {theme}"),
            }
        }

        if let Ok(assumption) = env::var("GLINT_RASTER_ASSUMPTION") {
            match assumption.to_ascii_lowercase().as_str() {
                "assume-dark" => config.raster_assumption = RasterAssumption::AssumeDark,
                "assume-light" => config.raster_assumption = RasterAssumption::AssumeLight,
                "sample" => config.raster_assumption = RasterAssumption::Sample,
                other => log::warn!("ignoring invalid GLINT_RASTER_ASSUMPTION value: {other}"),
            }
        }

        config
    }

    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ThemeResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ThemeError::config_not_found(path));
        }
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|err| match err {
            ThemeError::ConfigParse { details, .. } => ThemeError::config_parse(path, details),
            other => other,
        })
    }

    /// Load configuration from TOML content.
    pub fn from_toml(content: &str) -> ThemeResult<Self> {
        let file: ConfigFile = toml::from_str(content)
            .map_err(|err| ThemeError::config_parse("<inline>", err.to_string()))?;
        Ok(file.resolver)
    }

    /// Set the default decision.
    pub fn with_default_decision(mut self, decision: ThemeDecision) -> Self {
        self.default_decision = decision;
        self
    }

    /// Set the light/dark luminance threshold.
    pub fn with_luminance_threshold(mut self, threshold: f64) -> Self {
        self.luminance_threshold = threshold;
        self
    }

    /// Set the see-through alpha threshold.
    pub fn with_see_through_alpha(mut self, alpha: f32) -> Self {
        self.see_through_alpha = alpha;
        self
    }

    /// Set the raster-content assumption.
    pub fn with_raster_assumption(mut self, assumption: RasterAssumption) -> Self {
        self.raster_assumption = assumption;
        self
    }

    /// Set the decoded-image cache capacity.
    pub fn with_image_cache_capacity(mut self, capacity: usize) -> Self {
        self.image_cache_capacity = capacity;
        self
    }

    /// Clamp out-of-range values into their valid domains.
    ///
    /// Thresholds land in `[0, 1]` and the cache capacity is at least 1.
    pub fn normalized(mut self) -> Self {
        if !(0.0..=1.0).contains(&self.luminance_threshold) {
            log::warn!(
                "luminance-threshold {} out of range, clamping",
                self.luminance_threshold
            );
            self.luminance_threshold = self.luminance_threshold.clamp(0.0, 1.0);
        }
        if !(0.0..=1.0).contains(&self.see_through_alpha) {
            log::warn!(
                "see-through-alpha {} out of range, clamping",
                self.see_through_alpha
            );
            self.see_through_alpha = self.see_through_alpha.clamp(0.0, 1.0);
        }
        if self.image_cache_capacity == 0 {
            log::warn!("image-cache-capacity of 0 is not usable, using 1");
            self.image_cache_capacity = 1;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = ResolverConfig::new();
        assert_eq!(config.default_decision, ThemeDecision::Light);
        assert_eq!(config.luminance_threshold, 0.5);
        assert_eq!(config.see_through_alpha, 0.5);
        assert_eq!(config.raster_assumption, RasterAssumption::AssumeDark);
    }

    #[test]
    fn parses_toml() {
        let config = ResolverConfig::from_toml(
            r#"
            [resolver]
            default-decision = "dark"
            luminance-threshold = 0.6
            raster-assumption = "sample"
            "#,
        )
        .unwrap();
        assert_eq!(config.default_decision, ThemeDecision::Dark);
        assert_eq!(config.luminance_threshold, 0.6);
        assert_eq!(config.raster_assumption, RasterAssumption::Sample);
        // Unspecified fields keep defaults.
        assert_eq!(config.see_through_alpha, 0.5);
    }

    #[test]
    fn empty_toml_is_defaults() {
        let config = ResolverConfig::from_toml("").unwrap();
        assert_eq!(config.default_decision, ThemeDecision::Light);
    }

    #[test]
    fn bad_toml_is_an_error() {
        assert!(ResolverConfig::from_toml("[resolver]\ndefault-decision = 7").is_err());
    }

    #[test]
    fn normalization_clamps() {
        let config = ResolverConfig::new()
            .with_luminance_threshold(1.5)
            .with_see_through_alpha(-0.2)
            .with_image_cache_capacity(0)
            .normalized();
        assert_eq!(config.luminance_threshold, 1.0);
        assert_eq!(config.see_through_alpha, 0.0);
        assert_eq!(config.image_cache_capacity, 1);
    }
}
