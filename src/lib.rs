#![warn(missing_docs)]

//! Adaptive light/dark theming for UI chrome overlaid on arbitrary content.

pub use nalgebra as math;
pub use vello::peniko as color;

pub use glint_core as core;
pub use glint_theme as theme;

/// A "prelude" for users of the glint resolver.
///
/// Importing this module brings into scope the most common types
/// needed to wire up viewport theming.
///
/// ```rust
/// use glint::prelude::*;
/// ```
pub mod prelude {
    pub use crate::core::engine::{DecisionEngine, EngineMetrics};
    pub use crate::core::geometry::{ProbeId, ProbePoint, Rect};
    pub use crate::core::orchestrator::{Invalidation, ThemeOrchestrator};
    pub use crate::core::resolver::{Backdrop, Background, BackgroundProvider};
    pub use crate::core::sampler::{DecodedImage, ImageSampler};
    pub use crate::core::store::DecisionStore;
    pub use crate::core::tree::{ImageRef, NodeId, PaintProps, PaintTree};

    // Decisions and configuration
    pub use crate::theme::config::{RasterAssumption, ResolverConfig};
    pub use crate::theme::decision::{ThemeDecision, ThemeTag};
    pub use crate::theme::error::{ThemeError, ThemeResult};

    // Color math
    pub use crate::theme::color::{average_color, luminance, parse_color};

    // Math
    pub use nalgebra::{Point2, Vector2};

    // Color
    pub use vello::peniko::Color;
}
