//! Background resolution: what is effectively painted behind a point.
//!
//! The [BackgroundProvider] trait is the seam between the theming system
//! and the host's scene graph. It has a single capability: report the
//! effective backdrop behind a screen point. The built-in implementation
//! walks a [PaintTree] upward through see-through layers the way the
//! resolver walks transparent layers in a browser render tree.

use nalgebra::Point2;
use vello::peniko::Color;

use glint_theme::decision::ThemeTag;

use crate::geometry::Rect;
use crate::tree::{ImageRef, PaintTree};

/// The paint found behind a probe point.
#[derive(Clone, Debug, PartialEq)]
pub enum Background {
    /// A solid, sufficiently opaque color.
    Solid(Color),
    /// A background image; sampling it is asynchronous.
    Image(ImageRef),
}

/// Everything the decision engine needs to know about one probe point.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Backdrop {
    /// The first author tag found walking from the hit node to the root.
    pub tag: Option<ThemeTag>,
    /// The effective background, or `None` when traversal exhausts with no
    /// usable paint anywhere.
    pub background: Option<Background>,
    /// Bounds of the node that supplied the background; needed to map a
    /// probe point into image pixel coordinates.
    pub surface: Option<Rect>,
    /// A color wash painted by the image-bearing node itself, when the
    /// background is an image. Dark washes short-circuit sampling.
    pub overlay: Option<Color>,
    /// Whether the hit node carries embedded raster content.
    pub raster_content: bool,
}

impl Backdrop {
    /// A backdrop with nothing resolved.
    pub fn none() -> Self {
        Self::default()
    }
}

/// Effective paint behind a screen point.
///
/// Implementations must be cheap enough to call once per probe per frame;
/// anything slow (decoding, I/O) belongs in the async sampler instead.
pub trait BackgroundProvider {
    /// Report the backdrop behind `point`.
    fn backdrop_at(&self, point: Point2<f64>) -> Backdrop;
}

impl BackgroundProvider for PaintTree {
    fn backdrop_at(&self, point: Point2<f64>) -> Backdrop {
        let Some(hit) = self.node_at(point) else {
            return Backdrop {
                background: self.base_background().map(Background::Solid),
                ..Backdrop::none()
            };
        };

        let tag = self.tag_for(hit);
        let raster_content = self
            .props(hit)
            .map(|props| props.raster_content)
            .unwrap_or(false);

        let mut current = Some(hit);
        while let Some(id) = current {
            let Some(props) = self.props(id) else {
                break;
            };
            if let Some(image) = &props.image {
                let overlay = props
                    .background
                    .filter(|color| color.components[3] > 0.0);
                return Backdrop {
                    tag,
                    background: Some(Background::Image(image.clone())),
                    surface: Some(props.bounds),
                    overlay,
                    raster_content,
                };
            }
            if let Some(color) = props.background {
                if color.components[3] >= self.see_through_alpha() {
                    return Backdrop {
                        tag,
                        background: Some(Background::Solid(color)),
                        surface: Some(props.bounds),
                        overlay: None,
                        raster_content,
                    };
                }
            }
            current = self.parent(id);
        }

        Backdrop {
            tag,
            background: self.base_background().map(Background::Solid),
            surface: None,
            overlay: None,
            raster_content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::PaintProps;

    fn screen() -> Rect {
        Rect::new(0.0, 0.0, 1920.0, 1080.0)
    }

    #[test]
    fn translucent_layers_are_see_through() {
        let mut tree = PaintTree::new();
        let opaque = tree.insert(
            None,
            PaintProps::new(screen()).with_background(Color::from_rgb8(30, 30, 30)),
        );
        let veil = tree.insert(
            Some(opaque),
            PaintProps::new(screen()).with_background(Color::from_rgba8(255, 255, 255, 60)),
        );
        let _clear = tree.insert(Some(veil), PaintProps::new(screen()));

        let backdrop = tree.backdrop_at(Point2::new(500.0, 500.0));
        assert_eq!(
            backdrop.background,
            Some(Background::Solid(Color::from_rgb8(30, 30, 30)))
        );
    }

    #[test]
    fn image_wins_over_color_on_same_node() {
        let mut tree = PaintTree::new();
        tree.insert(
            None,
            PaintProps::new(screen())
                .with_background(Color::from_rgb8(0, 0, 0))
                .with_image(ImageRef::new("hero.png")),
        );
        let backdrop = tree.backdrop_at(Point2::new(10.0, 10.0));
        assert_eq!(
            backdrop.background,
            Some(Background::Image(ImageRef::new("hero.png")))
        );
        assert!(backdrop.overlay.is_some());
        assert_eq!(backdrop.surface, Some(screen()));
    }

    #[test]
    fn exhausted_traversal_falls_back_to_base() {
        let mut tree = PaintTree::new().with_base_background(Color::WHITE);
        tree.insert(None, PaintProps::new(screen()));
        let backdrop = tree.backdrop_at(Point2::new(10.0, 10.0));
        assert_eq!(backdrop.background, Some(Background::Solid(Color::WHITE)));

        tree.set_base_background(None);
        let backdrop = tree.backdrop_at(Point2::new(10.0, 10.0));
        assert_eq!(backdrop.background, None);
    }
}
