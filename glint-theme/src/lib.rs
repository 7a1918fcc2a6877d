#![warn(missing_docs)]

//! # Glint Theming Primitives
//!
//! Color utilities, theme decisions and configuration for the glint
//! viewport theming system.
//!
//! ## Overview
//!
//! Chrome elements (navigation labels, logos, icons) floating above
//! scrolling content need to know whether the content directly behind them
//! is visually light or dark so they can render with readable contrast.
//! This crate provides the vocabulary for that question:
//!
//! - **[decision::ThemeDecision]**: the binary light/dark outcome per probe point
//! - **[decision::ThemeTag]**: an author-supplied hint tagging a content region
//! - **[color]**: WCAG relative luminance and CSS-style color parsing
//! - **[config::ResolverConfig]**: tunable thresholds and heuristics,
//!   loadable from environment variables and TOML files
//! - **[error::ThemeError]**: error taxonomy for the theming system
//!
//! The actual tree traversal, image sampling and per-frame orchestration
//! live in `glint-core`; this crate is deliberately leaf-level and has no
//! async or I/O concerns beyond reading configuration files.
//!
//! ## Quick Start
//!
//! ```rust
//! use glint_theme::color::{luminance, parse_color};
//! use glint_theme::decision::ThemeDecision;
//!
//! let background = parse_color("#ffffff").unwrap();
//! let decision = ThemeDecision::from_luminance(luminance(background), 0.5);
//!
//! // A light background means chrome renders dark-on-light.
//! assert_eq!(decision, ThemeDecision::Light);
//! ```
//!
//! ## Configuration
//!
//! Behavior is tuned through [config::ResolverConfig], read from the
//! environment or a TOML file:
//!
//! ```bash
//! export GLINT_THEME=dark                 # default decision when nothing resolves
//! export GLINT_THEME_CONFIG=glint.toml    # path to a configuration file
//! export GLINT_RASTER_ASSUMPTION=sample   # raster-content heuristic
//! ```

/// Contains WCAG luminance computation and CSS color-string parsing.
pub mod color;
/// Contains the [config::ResolverConfig] struct for resolver configuration.
pub mod config;
/// Contains the [decision::ThemeDecision] and [decision::ThemeTag] types.
pub mod decision;
/// Contains error types for the theming system.
pub mod error;
