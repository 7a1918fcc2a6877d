#![warn(missing_docs)]

//! # Glint Core
//!
//! The working half of the glint viewport theming system: a paint-tree
//! abstraction standing in for the host's render tree, the background
//! resolver that walks it, an async image sampler, the decision engine
//! combining author tags with computed luminance, and the frame-coalescing
//! orchestrator that drives everything on scroll/resize/mutation events.
//!
//! The leaf-level vocabulary (decisions, tags, color math, configuration)
//! lives in `glint-theme`.
//!
//! ## Typical wiring
//!
//! ```rust
//! use glint_core::geometry::{ProbeId, ProbePoint, Rect};
//! use glint_core::orchestrator::ThemeOrchestrator;
//! use glint_core::tree::{PaintProps, PaintTree};
//! use glint_theme::config::ResolverConfig;
//! use nalgebra::Point2;
//! use vello::peniko::Color;
//!
//! let mut tree = PaintTree::new().with_base_background(Color::WHITE);
//! tree.insert(
//!     None,
//!     PaintProps::new(Rect::new(0.0, 0.0, 1920.0, 600.0))
//!         .with_background(Color::from_rgb8(10, 10, 10)),
//! );
//!
//! let mut orchestrator = ThemeOrchestrator::new(ResolverConfig::default());
//! orchestrator.track(ProbePoint::new(ProbeId::new("logo"), Point2::new(60.0, 40.0)));
//!
//! orchestrator.on_scroll();
//! orchestrator.frame(&tree);
//! ```

/// Contains the theme decision engine.
pub mod engine;
/// Contains screen-space geometry and probe point types.
pub mod geometry;
/// Contains the scroll/resize orchestrator and its invalidation flags.
pub mod orchestrator;
/// Contains the [resolver::BackgroundProvider] trait and backdrop types.
pub mod resolver;
/// Contains the async image sampler and its decoded-image cache.
pub mod sampler;
/// Contains the listener-based per-probe decision store.
pub mod store;
/// Contains the [tree::PaintTree] render-tree abstraction.
pub mod tree;
