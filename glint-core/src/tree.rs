//! A retained paint tree standing in for the host's render tree.
//!
//! The resolver only cares about paint properties: what each node's
//! background looks like, whether it carries raster content, and whether an
//! author tagged the region light or dark. Hosts mirror those properties of
//! their real render tree into a [PaintTree] (or implement
//! [crate::resolver::BackgroundProvider] directly over their own scene
//! graph).

use std::fmt;
use std::sync::Arc;

use nalgebra::Point2;
use vello::peniko::Color;

use glint_theme::decision::ThemeTag;

use crate::geometry::Rect;

/// Opaque reference to a background image, resolved by the sampler.
///
/// The built-in loader treats the reference as a filesystem path; hosts with
/// other origins pre-seed the sampler cache with decoded pixels instead.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ImageRef(Arc<str>);

impl ImageRef {
    /// Create an image reference.
    pub fn new(reference: impl AsRef<str>) -> Self {
        Self(Arc::from(reference.as_ref()))
    }

    /// The reference as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a node in a [PaintTree].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Paint properties of one tree node, as seen by the resolver.
#[derive(Clone, Debug)]
pub struct PaintProps {
    /// Screen-space bounds of the node.
    pub bounds: Rect,
    /// Effective background color, if any. `None` means fully transparent.
    pub background: Option<Color>,
    /// Background image reference, if any. Takes precedence over the
    /// background color during resolution; the color then acts as an
    /// overlay wash.
    pub image: Option<ImageRef>,
    /// Whether the node is (or directly contains) embedded raster content,
    /// e.g. a photograph placed in the layout rather than painted as a
    /// background.
    pub raster_content: bool,
    /// Author-supplied theme tag for the region rooted at this node.
    pub tag: Option<ThemeTag>,
}

impl PaintProps {
    /// Create transparent, untagged paint properties with the given bounds.
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            background: None,
            image: None,
            raster_content: false,
            tag: None,
        }
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    /// Set the background image reference.
    pub fn with_image(mut self, image: ImageRef) -> Self {
        self.image = Some(image);
        self
    }

    /// Mark the node as carrying embedded raster content.
    pub fn with_raster_content(mut self) -> Self {
        self.raster_content = true;
        self
    }

    /// Set the author theme tag.
    pub fn with_tag(mut self, tag: ThemeTag) -> Self {
        self.tag = Some(tag);
        self
    }
}

#[derive(Clone, Debug)]
struct PaintNode {
    props: PaintProps,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A retained tree of paint properties with hit-testing.
///
/// Later siblings paint above earlier ones, so hit-testing visits children
/// in reverse insertion order and returns the deepest node containing the
/// point.
#[derive(Clone, Debug)]
pub struct PaintTree {
    nodes: Vec<Option<PaintNode>>,
    free: Vec<usize>,
    roots: Vec<NodeId>,
    base_background: Option<Color>,
    see_through_alpha: f32,
}

impl PaintTree {
    /// Create an empty tree with no base background and the standard
    /// see-through alpha threshold of `0.5`.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            roots: Vec::new(),
            base_background: None,
            see_through_alpha: 0.5,
        }
    }

    /// Set the document base background, the final fallback of traversal.
    pub fn with_base_background(mut self, color: Color) -> Self {
        self.base_background = Some(color);
        self
    }

    /// Replace the document base background.
    pub fn set_base_background(&mut self, color: Option<Color>) {
        self.base_background = color;
    }

    /// The document base background, if any.
    pub fn base_background(&self) -> Option<Color> {
        self.base_background
    }

    /// Background colors with alpha below this threshold are treated as
    /// see-through during resolution.
    pub fn see_through_alpha(&self) -> f32 {
        self.see_through_alpha
    }

    /// Replace the see-through alpha threshold (clamped to `[0, 1]`).
    pub fn set_see_through_alpha(&mut self, alpha: f32) {
        self.see_through_alpha = alpha.clamp(0.0, 1.0);
    }

    /// Insert a node under `parent` (or as a root when `None`).
    pub fn insert(&mut self, parent: Option<NodeId>, props: PaintProps) -> NodeId {
        let node = PaintNode {
            props,
            parent,
            children: Vec::new(),
        };
        let index = match self.free.pop() {
            Some(index) => {
                self.nodes[index] = Some(node);
                index
            }
            None => {
                self.nodes.push(Some(node));
                self.nodes.len() - 1
            }
        };
        let id = NodeId(index);
        match parent {
            Some(parent_id) => {
                if let Some(parent_node) = self.node_mut(parent_id) {
                    parent_node.children.push(id);
                } else {
                    log::warn!("inserting under unknown parent {parent_id:?}, treating as root");
                    self.roots.push(id);
                }
            }
            None => self.roots.push(id),
        }
        id
    }

    /// Remove a node and its entire subtree.
    pub fn remove(&mut self, id: NodeId) {
        let Some(node) = self.node(id) else {
            return;
        };
        let parent = node.parent;
        match parent {
            Some(parent_id) => {
                if let Some(parent_node) = self.node_mut(parent_id) {
                    parent_node.children.retain(|child| *child != id);
                }
            }
            None => self.roots.retain(|root| *root != id),
        }
        self.release(id);
    }

    fn release(&mut self, id: NodeId) {
        let Some(node) = self.nodes[id.0].take() else {
            return;
        };
        self.free.push(id.0);
        for child in node.children {
            self.release(child);
        }
    }

    /// Paint properties of a node.
    pub fn props(&self, id: NodeId) -> Option<&PaintProps> {
        self.node(id).map(|node| &node.props)
    }

    /// Mutable paint properties of a node.
    pub fn props_mut(&mut self, id: NodeId) -> Option<&mut PaintProps> {
        self.node_mut(id).map(|node| &mut node.props)
    }

    /// Parent of a node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|node| node.parent)
    }

    /// The deepest, topmost node whose bounds contain the point.
    pub fn node_at(&self, point: Point2<f64>) -> Option<NodeId> {
        self.roots.iter().rev().find_map(|&root| self.hit(root, point))
    }

    /// The first theme tag found walking from the node to the root.
    pub fn tag_for(&self, id: NodeId) -> Option<ThemeTag> {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.node(node_id)?;
            if let Some(tag) = node.props.tag {
                return Some(tag);
            }
            current = node.parent;
        }
        None
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Whether the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn hit(&self, id: NodeId, point: Point2<f64>) -> Option<NodeId> {
        let node = self.node(id)?;
        if !node.props.bounds.contains(point) {
            return None;
        }
        for &child in node.children.iter().rev() {
            if let Some(found) = self.hit(child, point) {
                return Some(found);
            }
        }
        Some(id)
    }

    fn node(&self, id: NodeId) -> Option<&PaintNode> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut PaintNode> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }
}

impl Default for PaintTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_screen() -> Rect {
        Rect::new(0.0, 0.0, 1000.0, 1000.0)
    }

    #[test]
    fn hit_testing_prefers_deepest_and_later_siblings() {
        let mut tree = PaintTree::new();
        let section = tree.insert(None, PaintProps::new(full_screen()));
        let early = tree.insert(Some(section), PaintProps::new(Rect::new(0.0, 0.0, 500.0, 500.0)));
        let late = tree.insert(Some(section), PaintProps::new(Rect::new(0.0, 0.0, 500.0, 500.0)));

        assert_eq!(tree.node_at(Point2::new(100.0, 100.0)), Some(late));
        assert_eq!(tree.node_at(Point2::new(900.0, 900.0)), Some(section));
        assert_ne!(tree.node_at(Point2::new(100.0, 100.0)), Some(early));
        assert_eq!(tree.node_at(Point2::new(2000.0, 0.0)), None);
    }

    #[test]
    fn tags_are_inherited_from_ancestors() {
        let mut tree = PaintTree::new();
        let section = tree.insert(
            None,
            PaintProps::new(full_screen()).with_tag(ThemeTag::Dark),
        );
        let inner = tree.insert(Some(section), PaintProps::new(full_screen()));
        assert_eq!(tree.tag_for(inner), Some(ThemeTag::Dark));
    }

    #[test]
    fn removal_releases_subtrees() {
        let mut tree = PaintTree::new();
        let section = tree.insert(None, PaintProps::new(full_screen()));
        let child = tree.insert(Some(section), PaintProps::new(full_screen()));
        let _grandchild = tree.insert(Some(child), PaintProps::new(full_screen()));
        assert_eq!(tree.len(), 3);

        tree.remove(section);
        assert!(tree.is_empty());
        assert_eq!(tree.node_at(Point2::new(10.0, 10.0)), None);

        // Freed slots are reused.
        let reused = tree.insert(None, PaintProps::new(full_screen()));
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.node_at(Point2::new(10.0, 10.0)), Some(reused));
    }
}
