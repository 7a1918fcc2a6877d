//! Event coalescing and store notification through the orchestrator.

use std::cell::Cell;
use std::rc::Rc;

use glint_core::geometry::{ProbeId, ProbePoint, Rect};
use glint_core::orchestrator::ThemeOrchestrator;
use glint_core::resolver::{Backdrop, BackgroundProvider};
use glint_core::tree::{PaintProps, PaintTree};
use glint_theme::config::ResolverConfig;
use glint_theme::decision::ThemeDecision;
use nalgebra::Point2;
use vello::peniko::Color;

/// Counts backdrop queries so tests can prove how many passes actually ran.
struct CountingProvider {
    tree: PaintTree,
    queries: Cell<usize>,
}

impl CountingProvider {
    fn new(tree: PaintTree) -> Self {
        Self {
            tree,
            queries: Cell::new(0),
        }
    }
}

impl BackgroundProvider for CountingProvider {
    fn backdrop_at(&self, point: Point2<f64>) -> Backdrop {
        self.queries.set(self.queries.get() + 1);
        self.tree.backdrop_at(point)
    }
}

fn white_page() -> PaintTree {
    let mut tree = PaintTree::new();
    tree.insert(
        None,
        PaintProps::new(Rect::new(0.0, 0.0, 1000.0, 1000.0)).with_background(Color::WHITE),
    );
    tree
}

#[test]
fn event_storms_coalesce_into_one_pass() {
    let provider = CountingProvider::new(white_page());
    let mut orchestrator = ThemeOrchestrator::new(ResolverConfig::default());
    orchestrator.track(ProbePoint::new(ProbeId::new("logo"), Point2::new(50.0, 50.0)));

    for _ in 0..50 {
        orchestrator.on_scroll();
    }
    orchestrator.on_resize();
    orchestrator.on_mutation();

    assert!(orchestrator.frame(&provider));
    assert_eq!(orchestrator.passes(), 1);
    assert_eq!(provider.queries.get(), 1);

    // Nothing pending; the next frame does no work.
    assert!(!orchestrator.frame(&provider));
    assert_eq!(orchestrator.passes(), 1);
    assert_eq!(provider.queries.get(), 1);
}

#[test]
fn all_tracked_probes_are_decided_in_a_pass() {
    let mut tree = white_page();
    tree.insert(
        None,
        PaintProps::new(Rect::new(0.0, 500.0, 1000.0, 500.0))
            .with_background(Color::from_rgb8(12, 12, 12)),
    );

    let mut orchestrator = ThemeOrchestrator::new(ResolverConfig::default());
    orchestrator.track(ProbePoint::new(ProbeId::new("logo"), Point2::new(100.0, 100.0)));
    orchestrator.track(ProbePoint::new(ProbeId::new("footer"), Point2::new(100.0, 900.0)));
    orchestrator.frame(&tree);

    assert_eq!(
        orchestrator.decision(&ProbeId::new("logo")),
        Some(ThemeDecision::Light)
    );
    assert_eq!(
        orchestrator.decision(&ProbeId::new("footer")),
        Some(ThemeDecision::Dark)
    );
}

#[test]
fn listeners_hear_changes_but_not_repeats() {
    let notifications: Rc<Cell<usize>> = Rc::default();
    let tree = white_page();

    let mut orchestrator = ThemeOrchestrator::new(ResolverConfig::default());
    let sink = notifications.clone();
    orchestrator.subscribe(move |_, _| sink.set(sink.get() + 1));
    orchestrator.track(ProbePoint::new(ProbeId::new("logo"), Point2::new(50.0, 50.0)));

    orchestrator.frame(&tree);
    assert_eq!(notifications.get(), 1);

    // Same backdrop, same decision; listeners stay quiet.
    orchestrator.on_scroll();
    orchestrator.frame(&tree);
    assert_eq!(notifications.get(), 1);
    assert_eq!(orchestrator.passes(), 2);
}

#[test]
fn region_probes_average_their_spread() {
    // Light panels flanking a transparent gap; the region center resolves
    // nothing so the averaged spread decides.
    let mut tree = PaintTree::new();
    tree.insert(
        None,
        PaintProps::new(Rect::new(0.0, 0.0, 480.0, 100.0))
            .with_background(Color::from_rgb8(245, 245, 245)),
    );
    tree.insert(
        None,
        PaintProps::new(Rect::new(520.0, 0.0, 480.0, 100.0))
            .with_background(Color::from_rgb8(235, 235, 235)),
    );

    let mut orchestrator = ThemeOrchestrator::new(
        ResolverConfig::default().with_default_decision(ThemeDecision::Dark),
    );
    orchestrator.track_region(ProbeId::new("nav"), Rect::new(0.0, 0.0, 1000.0, 100.0));
    orchestrator.frame(&tree);

    assert_eq!(
        orchestrator.decision(&ProbeId::new("nav")),
        Some(ThemeDecision::Light)
    );
}

#[test]
fn untracked_probes_are_forgotten() {
    let tree = white_page();
    let mut orchestrator = ThemeOrchestrator::new(ResolverConfig::default());
    orchestrator.track(ProbePoint::new(ProbeId::new("logo"), Point2::new(50.0, 50.0)));
    orchestrator.frame(&tree);
    assert!(orchestrator.decision(&ProbeId::new("logo")).is_some());

    orchestrator.untrack(&ProbeId::new("logo"));
    orchestrator.frame(&tree);
    assert_eq!(orchestrator.decision(&ProbeId::new("logo")), None);
    assert!(orchestrator.store().is_empty());
}
